use sea_orm_migration::prelude::*;

use crate::m2025_10_20_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Predictions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Predictions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Predictions::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Predictions::TestScore).double().not_null())
                    .col(ColumnDef::new(Predictions::InterviewScore).double().not_null())
                    .col(ColumnDef::new(Predictions::YearsExperience).double().not_null())
                    .col(ColumnDef::new(Predictions::PredictedSalary).double().not_null())
                    .col(
                        ColumnDef::new(Predictions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_predictions_user")
                            .from(Predictions::Table, Predictions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_predictions_user_created")
                    .table(Predictions::Table)
                    .col(Predictions::UserId)
                    .col(Predictions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Predictions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Predictions {
    Table,
    Id,
    UserId,
    TestScore,
    InterviewScore,
    YearsExperience,
    PredictedSalary,
    CreatedAt,
}
