//! # 实体定义测试
//!
//! 测试所有 Sea-ORM 实体定义的正确性

#[cfg(test)]
mod tests {
    use crate::{attendance, members, packages, payments, users};
    use sea_orm::Set;

    #[tokio::test]
    async fn test_user_entity_creation() {
        // 测试实体可以正常创建
        let user = users::ActiveModel {
            username: Set("front_desk".to_string()),
            email: Set("desk@gym.example".to_string()),
            password_hash: Set("hash123".to_string()),
            salt: Set("salt123".to_string()),
            is_active: Set(true),
            is_admin: Set(false),
            ..Default::default()
        };

        assert_eq!(user.username.as_ref(), "front_desk");
        assert_eq!(user.email.as_ref(), "desk@gym.example");
        assert_eq!(user.is_active.as_ref(), &true);
    }

    #[tokio::test]
    async fn test_member_entity_creation() {
        let now = chrono::Utc::now().naive_utc();
        let member = members::ActiveModel {
            name: Set("Alice Zhang".to_string()),
            email: Set("alice@example.com".to_string()),
            phone: Set(Some("13800000000".to_string())),
            package_id: Set(Some(1)),
            joined_at: Set(now),
            is_active: Set(true),
            ..Default::default()
        };

        assert_eq!(member.name.as_ref(), "Alice Zhang");
        assert_eq!(member.package_id.as_ref(), &Some(1));
    }

    #[tokio::test]
    async fn test_package_entity_creation() {
        let package = packages::ActiveModel {
            name: Set("Monthly".to_string()),
            description: Set(Some("30 天畅练".to_string())),
            duration_days: Set(30),
            price_cents: Set(29900),
            is_active: Set(true),
            ..Default::default()
        };

        assert_eq!(package.duration_days.as_ref(), &30);
        assert_eq!(package.price_cents.as_ref(), &29900);
    }

    #[tokio::test]
    async fn test_payment_and_attendance_creation() {
        let now = chrono::Utc::now().naive_utc();

        let payment = payments::ActiveModel {
            member_id: Set(1),
            amount_cents: Set(29900),
            method: Set("card".to_string()),
            status: Set("completed".to_string()),
            paid_at: Set(now),
            note: Set(None),
            ..Default::default()
        };
        assert_eq!(payment.method.as_ref(), "card");

        let visit = attendance::ActiveModel {
            member_id: Set(1),
            checked_in_at: Set(now),
            checked_out_at: Set(None),
            ..Default::default()
        };
        assert_eq!(visit.checked_out_at.as_ref(), &None);
    }
}
