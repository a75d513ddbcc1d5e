// migrations/m202506010001_create_rate_limits.rs
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum RateLimits {
    Table,
    Id,
    Timestamp,
    LimitName,
    Maximum,
    Remaining,
    InUse,
    InUsePercent,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202506010001_create_rate_limits"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RateLimits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RateLimits::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RateLimits::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RateLimits::LimitName).string().not_null())
                    .col(ColumnDef::new(RateLimits::Maximum).big_integer().not_null())
                    .col(ColumnDef::new(RateLimits::Remaining).big_integer().not_null())
                    .col(ColumnDef::new(RateLimits::InUse).big_integer().not_null())
                    .col(ColumnDef::new(RateLimits::InUsePercent).double().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_rate_limits_timestamp")
                    .table(RateLimits::Table)
                    .col(RateLimits::Timestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RateLimits::Table).to_owned())
            .await
    }
}
