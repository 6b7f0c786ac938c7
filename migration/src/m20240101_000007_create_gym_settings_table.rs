use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GymSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GymSettings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GymSettings::GymName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GymSettings::ContactEmail)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GymSettings::ContactPhone).string_len(30))
                    .col(ColumnDef::new(GymSettings::Address).text())
                    .col(ColumnDef::new(GymSettings::OpeningHours).string_len(100))
                    .col(
                        ColumnDef::new(GymSettings::Currency)
                            .string_len(10)
                            .not_null()
                            .default("USD"),
                    )
                    .col(
                        ColumnDef::new(GymSettings::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GymSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GymSettings {
    Table,
    Id,
    GymName,
    ContactEmail,
    ContactPhone,
    Address,
    OpeningHours,
    Currency,
    UpdatedAt,
}
