use sea_orm_migration::prelude::*;

/// Daily Checkins (每日签到表)
/// 每个 (chat_id, user_id, checkin_date) 最多一条记录，重复签到只刷新消息信息
#[derive(DeriveIden)]
enum DailyCheckins {
    Table,
    Id,
    ChatId,
    UserId,
    CheckinDate,
    MessageId,
    MessageTime,
    CreatedAt,
    UpdatedAt,
}

/// Lottery Settings (每群抽奖设置)
#[derive(DeriveIden)]
enum LotterySettings {
    Table,
    Id,
    ChatId,
    WeeklyEnabled,
    WeeklyDrawAt,
    FullAttendanceFactor,
    Timezone,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 签到表
        manager
            .create_table(
                Table::create()
                    .table(DailyCheckins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyCheckins::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DailyCheckins::ChatId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyCheckins::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyCheckins::CheckinDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyCheckins::MessageId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyCheckins::MessageTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyCheckins::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(DailyCheckins::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 一人一天一条
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_daily_checkins_chat_user_date_unique")
                    .table(DailyCheckins::Table)
                    .col(DailyCheckins::ChatId)
                    .col(DailyCheckins::UserId)
                    .col(DailyCheckins::CheckinDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 周聚合查询索引 (chat_id, checkin_date)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_daily_checkins_chat_date")
                    .table(DailyCheckins::Table)
                    .col(DailyCheckins::ChatId)
                    .col(DailyCheckins::CheckinDate)
                    .to_owned(),
            )
            .await?;

        // 设置表
        manager
            .create_table(
                Table::create()
                    .table(LotterySettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LotterySettings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LotterySettings::ChatId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotterySettings::WeeklyEnabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(LotterySettings::WeeklyDrawAt)
                            .time()
                            .not_null()
                            .default("00:00:00"),
                    )
                    .col(
                        ColumnDef::new(LotterySettings::FullAttendanceFactor)
                            .integer()
                            .not_null()
                            .default(2),
                    )
                    .col(
                        ColumnDef::new(LotterySettings::Timezone)
                            .string_len(64)
                            .not_null()
                            .default("Asia/Shanghai"),
                    )
                    .col(
                        ColumnDef::new(LotterySettings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(LotterySettings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 一群一条设置
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lottery_settings_chat_unique")
                    .table(LotterySettings::Table)
                    .col(LotterySettings::ChatId)
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
                    .if_exists()
                    .table(LotterySettings::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(DailyCheckins::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
