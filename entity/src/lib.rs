//! # Entity 模块
//!
//! 包含所有 Sea-ORM 实体定义

pub mod users;
pub mod packages;
pub mod members;
pub mod trainers;
pub mod payments;
pub mod attendance;
pub mod gym_settings;

pub use users::Entity as Users;
pub use packages::Entity as Packages;
pub use members::Entity as Members;
pub use trainers::Entity as Trainers;
pub use payments::Entity as Payments;
pub use attendance::Entity as Attendance;
pub use gym_settings::Entity as GymSettings;

#[cfg(test)]
mod tests;
