use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum UserNotificationPreferences {
    Table,
    Id,
    UserId,
    Category,
    Event,
    NoneEnabled,
    InAppEnabled,
    EmailEnabled,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserNotificationPreferences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserNotificationPreferences::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserNotificationPreferences::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserNotificationPreferences::Category)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserNotificationPreferences::Event)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserNotificationPreferences::NoneEnabled)
                            .boolean()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(UserNotificationPreferences::InAppEnabled)
                            .boolean()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(UserNotificationPreferences::EmailEnabled)
                            .boolean()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(UserNotificationPreferences::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(UserNotificationPreferences::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_notification_preferences_user_id")
                            .from(
                                UserNotificationPreferences::Table,
                                UserNotificationPreferences::UserId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Upserts conflict on this pair.
        manager
            .create_index(
                Index::create()
                    .name("idx_user_notification_preferences_user_event")
                    .table(UserNotificationPreferences::Table)
                    .col(UserNotificationPreferences::UserId)
                    .col(UserNotificationPreferences::Event)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(UserNotificationPreferences::Table)
                    .to_owned(),
            )
            .await
    }
}
