//! Initial schema: users, trips, sharing and the budget ledger.
//!
//! - `users`: bearer-token authentication
//! - `trips`: root of every ownership check
//! - `trip_shares`: viewer/editor access granted by the owner
//! - `budget_categories`: allocation plus the cached `spent_minor` total
//! - `budget_transactions`: expense/income rows feeding `spent_minor`

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
pub(crate) enum Users {
    Table,
    Username,
    ApiToken,
}

#[derive(Iden)]
pub(crate) enum Trips {
    Table,
    Id,
    UserId,
    Destination,
    StartDate,
    EndDate,
    Travelers,
    BudgetMinor,
    Status,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum TripShares {
    Table,
    TripId,
    UserId,
    Role,
}

#[derive(Iden)]
enum BudgetCategories {
    Table,
    Id,
    TripId,
    Name,
    AllocatedMinor,
    SpentMinor,
    Color,
    Icon,
}

#[derive(Iden)]
enum BudgetTransactions {
    Table,
    Id,
    CategoryId,
    Description,
    AmountMinor,
    Kind,
    TransactionDate,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::ApiToken)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Trips
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trips::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Trips::UserId).string().not_null())
                    .col(ColumnDef::new(Trips::Destination).string().not_null())
                    .col(ColumnDef::new(Trips::StartDate).date().not_null())
                    .col(ColumnDef::new(Trips::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Trips::Travelers)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Trips::BudgetMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Trips::Status)
                            .string()
                            .not_null()
                            .default("planned"),
                    )
                    .col(ColumnDef::new(Trips::Notes).string())
                    .col(
                        ColumnDef::new(Trips::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trips-user_id")
                            .from(Trips::Table, Trips::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-trips-user_id-start_date")
                    .table(Trips::Table)
                    .col(Trips::UserId)
                    .col(Trips::StartDate)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Trip shares
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(TripShares::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TripShares::TripId).string().not_null())
                    .col(ColumnDef::new(TripShares::UserId).string().not_null())
                    .col(ColumnDef::new(TripShares::Role).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(TripShares::TripId)
                            .col(TripShares::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trip_shares-trip_id")
                            .from(TripShares::Table, TripShares::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trip_shares-user_id")
                            .from(TripShares::Table, TripShares::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-trip_shares-user_id")
                    .table(TripShares::Table)
                    .col(TripShares::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Budget categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BudgetCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BudgetCategories::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BudgetCategories::TripId).string().not_null())
                    .col(ColumnDef::new(BudgetCategories::Name).string().not_null())
                    .col(
                        ColumnDef::new(BudgetCategories::AllocatedMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BudgetCategories::SpentMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(BudgetCategories::Color).string())
                    .col(ColumnDef::new(BudgetCategories::Icon).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budget_categories-trip_id")
                            .from(BudgetCategories::Table, BudgetCategories::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budget_categories-trip_id")
                    .table(BudgetCategories::Table)
                    .col(BudgetCategories::TripId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Budget transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BudgetTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BudgetTransactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BudgetTransactions::CategoryId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BudgetTransactions::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BudgetTransactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BudgetTransactions::Kind)
                            .string()
                            .not_null()
                            .default("expense"),
                    )
                    .col(
                        ColumnDef::new(BudgetTransactions::TransactionDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BudgetTransactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budget_transactions-category_id")
                            .from(BudgetTransactions::Table, BudgetTransactions::CategoryId)
                            .to(BudgetCategories::Table, BudgetCategories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budget_transactions-category_id-date")
                    .table(BudgetTransactions::Table)
                    .col(BudgetTransactions::CategoryId)
                    .col(BudgetTransactions::TransactionDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BudgetTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BudgetCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TripShares::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
