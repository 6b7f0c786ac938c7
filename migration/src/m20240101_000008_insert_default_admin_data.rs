use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 插入默认管理员用户
        // 密码: *** (bcrypt hash)
        manager
            .exec_stmt(
                Query::insert()
                    .into_table(Users::Table)
                    .columns([
                        Users::Username,
                        Users::Email,
                        Users::PasswordHash,
                        Users::Salt,
                        Users::IsActive,
                        Users::IsAdmin,
                    ])
                    .values_panic([
                        "admin".into(),
                        "admin@gym-console.local".into(),
                        "$2b$12$LMURIch2lHkm1y1uhuh1HOJ/RDlGjddn6NCiAOCuvsjjmHMXiGTn2".into(),
                        "default_salt_32_chars_long_12345".into(),
                        true.into(),
                        true.into(),
                    ])
                    .to_owned(),
            )
            .await?;

        // 插入初始套餐
        manager
            .exec_stmt(
                Query::insert()
                    .into_table(Packages::Table)
                    .columns([
                        Packages::Name,
                        Packages::Description,
                        Packages::DurationDays,
                        Packages::PriceCents,
                    ])
                    .values_panic([
                        "Monthly".into(),
                        "30 天畅练".into(),
                        30.into(),
                        29900i64.into(),
                    ])
                    .values_panic([
                        "Quarterly".into(),
                        "90 天畅练".into(),
                        90.into(),
                        79900i64.into(),
                    ])
                    .values_panic([
                        "Annual".into(),
                        "365 天畅练".into(),
                        365.into(),
                        259900i64.into(),
                    ])
                    .to_owned(),
            )
            .await?;

        // 插入场馆设置（单行）
        manager
            .exec_stmt(
                Query::insert()
                    .into_table(GymSettings::Table)
                    .columns([
                        GymSettings::GymName,
                        GymSettings::ContactEmail,
                        GymSettings::Currency,
                    ])
                    .values_panic([
                        "My Gym".into(),
                        "contact@gym-console.local".into(),
                        "USD".into(),
                    ])
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Users::Table)
                    .and_where(Expr::col(Users::Username).eq("admin"))
                    .to_owned(),
            )
            .await?;

        manager
            .exec_stmt(Query::delete().from_table(GymSettings::Table).to_owned())
            .await?;

        manager
            .exec_stmt(Query::delete().from_table(Packages::Table).to_owned())
            .await?;

        Ok(())
    }
}

// 表定义枚举
#[derive(DeriveIden)]
enum Users {
    Table,
    Username,
    Email,
    PasswordHash,
    Salt,
    IsActive,
    IsAdmin,
}

#[derive(DeriveIden)]
enum Packages {
    Table,
    Name,
    Description,
    DurationDays,
    PriceCents,
}

#[derive(DeriveIden)]
enum GymSettings {
    Table,
    GymName,
    ContactEmail,
    Currency,
}
