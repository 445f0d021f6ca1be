//! Trip planning tables: city catalog, itinerary and expense splits.

use sea_orm_migration::prelude::*;

use super::m20260601_000000_init::Trips;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Cities {
    Table,
    Id,
    Name,
    Country,
    Description,
    AvgDailyCostMinor,
}

#[derive(Iden)]
enum Activities {
    Table,
    Id,
    CityId,
    Name,
    Category,
    PriceMinor,
    RatingTenths,
    DurationMinutes,
    Description,
}

#[derive(Iden)]
enum ItineraryDays {
    Table,
    Id,
    TripId,
    DayNumber,
    Date,
    Title,
    Notes,
}

#[derive(Iden)]
enum ItineraryItems {
    Table,
    Id,
    DayId,
    Title,
    StartTime,
    Location,
    ActivityId,
    CostMinor,
    Notes,
    Position,
}

#[derive(Iden)]
enum ExpenseSplits {
    Table,
    Id,
    TripId,
    Description,
    TotalMinor,
    PaidBy,
    SplitType,
    CreatedAt,
}

#[derive(Iden)]
enum SplitShares {
    Table,
    Id,
    SplitId,
    Participant,
    AmountMinor,
    Settled,
    Position,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cities::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Cities::Name).string().not_null())
                    .col(ColumnDef::new(Cities::Country).string().not_null())
                    .col(ColumnDef::new(Cities::Description).string())
                    .col(
                        ColumnDef::new(Cities::AvgDailyCostMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cities-name-country-unique")
                    .table(Cities::Table)
                    .col(Cities::Name)
                    .col(Cities::Country)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activities::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activities::CityId).string().not_null())
                    .col(ColumnDef::new(Activities::Name).string().not_null())
                    .col(ColumnDef::new(Activities::Category).string().not_null())
                    .col(
                        ColumnDef::new(Activities::PriceMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Activities::RatingTenths)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Activities::DurationMinutes).integer())
                    .col(ColumnDef::new(Activities::Description).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-activities-city_id")
                            .from(Activities::Table, Activities::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-activities-city_id")
                    .table(Activities::Table)
                    .col(Activities::CityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ItineraryDays::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ItineraryDays::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ItineraryDays::TripId).string().not_null())
                    .col(ColumnDef::new(ItineraryDays::DayNumber).integer().not_null())
                    .col(ColumnDef::new(ItineraryDays::Date).date())
                    .col(ColumnDef::new(ItineraryDays::Title).string())
                    .col(ColumnDef::new(ItineraryDays::Notes).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-itinerary_days-trip_id")
                            .from(ItineraryDays::Table, ItineraryDays::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-itinerary_days-trip_id-day_number-unique")
                    .table(ItineraryDays::Table)
                    .col(ItineraryDays::TripId)
                    .col(ItineraryDays::DayNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ItineraryItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ItineraryItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ItineraryItems::DayId).string().not_null())
                    .col(ColumnDef::new(ItineraryItems::Title).string().not_null())
                    .col(ColumnDef::new(ItineraryItems::StartTime).time())
                    .col(ColumnDef::new(ItineraryItems::Location).string())
                    .col(ColumnDef::new(ItineraryItems::ActivityId).string())
                    .col(
                        ColumnDef::new(ItineraryItems::CostMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ItineraryItems::Notes).string())
                    .col(
                        ColumnDef::new(ItineraryItems::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-itinerary_items-day_id")
                            .from(ItineraryItems::Table, ItineraryItems::DayId)
                            .to(ItineraryDays::Table, ItineraryDays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-itinerary_items-activity_id")
                            .from(ItineraryItems::Table, ItineraryItems::ActivityId)
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-itinerary_items-day_id-position")
                    .table(ItineraryItems::Table)
                    .col(ItineraryItems::DayId)
                    .col(ItineraryItems::Position)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExpenseSplits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenseSplits::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExpenseSplits::TripId).string().not_null())
                    .col(ColumnDef::new(ExpenseSplits::Description).string().not_null())
                    .col(
                        ColumnDef::new(ExpenseSplits::TotalMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExpenseSplits::PaidBy).string().not_null())
                    .col(ColumnDef::new(ExpenseSplits::SplitType).string().not_null())
                    .col(
                        ColumnDef::new(ExpenseSplits::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expense_splits-trip_id")
                            .from(ExpenseSplits::Table, ExpenseSplits::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SplitShares::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SplitShares::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SplitShares::SplitId).string().not_null())
                    .col(ColumnDef::new(SplitShares::Participant).string().not_null())
                    .col(
                        ColumnDef::new(SplitShares::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SplitShares::Settled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SplitShares::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-split_shares-split_id")
                            .from(SplitShares::Table, SplitShares::SplitId)
                            .to(ExpenseSplits::Table, ExpenseSplits::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-split_shares-split_id")
                    .table(SplitShares::Table)
                    .col(SplitShares::SplitId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            SplitShares::Table.into_iden(),
            ExpenseSplits::Table.into_iden(),
            ItineraryItems::Table.into_iden(),
            ItineraryDays::Table.into_iden(),
            Activities::Table.into_iden(),
            Cities::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}
