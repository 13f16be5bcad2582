use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create admins table
        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Admins::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Admins::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Admins::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Admins::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create users table (resellers live here with role = "reseller")
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Users::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null().default("user"))
                    .col(ColumnDef::new(Users::Credits).integer().not_null().default(0))
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create licenses table
        manager
            .create_table(
                Table::create()
                    .table(Licenses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Licenses::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Licenses::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Licenses::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Licenses::Hwid).string().null())
                    .col(ColumnDef::new(Licenses::ExpiresAt).big_integer().null())
                    .col(ColumnDef::new(Licenses::Expired).boolean().not_null().default(false))
                    .col(ColumnDef::new(Licenses::Paused).boolean().not_null().default(false))
                    .col(ColumnDef::new(Licenses::Revoked).boolean().not_null().default(false))
                    .col(ColumnDef::new(Licenses::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Licenses::UserId).integer().null())
                    .col(ColumnDef::new(Licenses::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_licenses_user_id")
                            .from(Licenses::Table, Licenses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for reseller-scoped license queries
        manager
            .create_index(
                Index::create()
                    .name("idx_licenses_user_id")
                    .table(Licenses::Table)
                    .col(Licenses::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Licenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Admins {
    Table,
    Id,
    Email,
    PasswordHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
    Credits,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Licenses {
    Table,
    Id,
    Username,
    PasswordHash,
    Hwid,
    ExpiresAt,
    Expired,
    Paused,
    Revoked,
    CreatedBy,
    UserId,
    CreatedAt,
}
