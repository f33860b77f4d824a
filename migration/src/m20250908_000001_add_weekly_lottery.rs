use sea_orm_migration::prelude::*;
use sea_orm_migration::prelude::extension::postgres::Type;

/// Prize Sets (奖池版本表)
/// 一个奖池在 [valid_from, valid_to] 内生效；valid_to NULL 表示长期有效
#[derive(DeriveIden)]
enum PrizeSets {
    Table,
    Id,
    ChatId,
    SetType,
    ValidFrom,
    ValidTo,
    CreatedAt,
}

/// Prize Items (奖品条目表)
/// prize_rank 越小越先抽（头奖 rank=1），quantity 为该奖项名额数
#[derive(DeriveIden)]
enum PrizeItems {
    Table,
    Id,
    SetId,
    Name,
    Description,
    Quantity,
    Enabled,
    PrizeRank,
    CreatedAt,
}

/// Lottery Rounds (抽奖轮次表)
/// (chat_id, round_type, period_start_date, period_end_date) 唯一 —— 幂等关键
#[derive(DeriveIden)]
enum LotteryRounds {
    Table,
    Id,
    ChatId,
    RoundType,
    PeriodStartDate,
    PeriodEndDate,
    Status,
    TotalParticipants,
    TotalWeight,
    PrizeSetId,
    CreatedAt,
    CompletedAt,
}

/// Lottery Round Entries (轮次参与记录)
#[derive(DeriveIden)]
enum LotteryRoundEntries {
    Table,
    Id,
    RoundId,
    ChatId,
    UserId,
    CheckinDays,
    Weight,
    IsFullAttendance,
    CreatedAt,
}

/// Lottery Winners (中奖记录)
#[derive(DeriveIden)]
enum LotteryWinners {
    Table,
    Id,
    RoundId,
    ChatId,
    UserId,
    PrizeSetId,
    PrizeName,
    PrizeDescription,
    PrizeRank,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("prize_set_type"))
                    .values(vec![Alias::new("weekly")])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("lottery_round_type"))
                    .values(vec![Alias::new("weekly")])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("lottery_round_status"))
                    .values(vec![Alias::new("running"), Alias::new("done")])
                    .to_owned(),
            )
            .await?;

        // 奖池表
        manager
            .create_table(
                Table::create()
                    .table(PrizeSets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PrizeSets::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PrizeSets::ChatId).big_integer().not_null())
                    .col(
                        ColumnDef::new(PrizeSets::SetType)
                            .custom(Alias::new("prize_set_type"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(PrizeSets::ValidFrom).date().not_null())
                    .col(ColumnDef::new(PrizeSets::ValidTo).date().null())
                    .col(
                        ColumnDef::new(PrizeSets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 按群/类型/生效期检索
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_prize_sets_chat_type_from")
                    .table(PrizeSets::Table)
                    .col(PrizeSets::ChatId)
                    .col(PrizeSets::SetType)
                    .col(PrizeSets::ValidFrom)
                    .to_owned(),
            )
            .await?;

        // 奖品条目表
        manager
            .create_table(
                Table::create()
                    .table(PrizeItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PrizeItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PrizeItems::SetId).big_integer().not_null())
                    .col(ColumnDef::new(PrizeItems::Name).string_len(255).not_null())
                    .col(ColumnDef::new(PrizeItems::Description).text().null())
                    .col(
                        ColumnDef::new(PrizeItems::Quantity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(PrizeItems::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(PrizeItems::PrizeRank).integer().null())
                    .col(
                        ColumnDef::new(PrizeItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_prize_items_set")
                    .table(PrizeItems::Table)
                    .col(PrizeItems::SetId)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(PrizeItems::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_prize_item_set")
                            .from_tbl(PrizeItems::Table)
                            .from_col(PrizeItems::SetId)
                            .to_tbl(PrizeSets::Table)
                            .to_col(PrizeSets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 轮次表
        manager
            .create_table(
                Table::create()
                    .table(LotteryRounds::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LotteryRounds::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LotteryRounds::ChatId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotteryRounds::RoundType)
                            .custom(Alias::new("lottery_round_type"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotteryRounds::PeriodStartDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotteryRounds::PeriodEndDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotteryRounds::Status)
                            .custom(Alias::new("lottery_round_status"))
                            .not_null()
                            .default("running"),
                    )
                    .col(
                        ColumnDef::new(LotteryRounds::TotalParticipants)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LotteryRounds::TotalWeight)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LotteryRounds::PrizeSetId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LotteryRounds::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(LotteryRounds::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 幂等唯一键：一群一类型一周期最多一轮
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lottery_rounds_period_unique")
                    .table(LotteryRounds::Table)
                    .col(LotteryRounds::ChatId)
                    .col(LotteryRounds::RoundType)
                    .col(LotteryRounds::PeriodStartDate)
                    .col(LotteryRounds::PeriodEndDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 参与记录表
        manager
            .create_table(
                Table::create()
                    .table(LotteryRoundEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LotteryRoundEntries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LotteryRoundEntries::RoundId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotteryRoundEntries::ChatId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotteryRoundEntries::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotteryRoundEntries::CheckinDays)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotteryRoundEntries::Weight)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotteryRoundEntries::IsFullAttendance)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(LotteryRoundEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 一轮内一用户一条参与记录（重试覆盖而不是重复）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lottery_round_entries_round_user_unique")
                    .table(LotteryRoundEntries::Table)
                    .col(LotteryRoundEntries::RoundId)
                    .col(LotteryRoundEntries::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(LotteryRoundEntries::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_lottery_round_entry_round")
                            .from_tbl(LotteryRoundEntries::Table)
                            .from_col(LotteryRoundEntries::RoundId)
                            .to_tbl(LotteryRounds::Table)
                            .to_col(LotteryRounds::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 中奖记录表
        manager
            .create_table(
                Table::create()
                    .table(LotteryWinners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LotteryWinners::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LotteryWinners::RoundId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotteryWinners::ChatId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotteryWinners::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotteryWinners::PrizeSetId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LotteryWinners::PrizeName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotteryWinners::PrizeDescription)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LotteryWinners::PrizeRank)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(LotteryWinners::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 一轮内一用户至多中一个奖
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lottery_winners_round_user_unique")
                    .table(LotteryWinners::Table)
                    .col(LotteryWinners::RoundId)
                    .col(LotteryWinners::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(LotteryWinners::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_lottery_winner_round")
                            .from_tbl(LotteryWinners::Table)
                            .from_col(LotteryWinners::RoundId)
                            .to_tbl(LotteryRounds::Table)
                            .to_col(LotteryRounds::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除顺序：中奖 -> 参与 -> 轮次 -> 奖品 -> 奖池 -> 枚举类型
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(LotteryWinners::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(LotteryRoundEntries::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(LotteryRounds::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(PrizeItems::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(PrizeSets::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_type(
                Type::drop()
                    .if_exists()
                    .name(Alias::new("lottery_round_status"))
                    .to_owned(),
            )
            .await?;

        manager
            .drop_type(
                Type::drop()
                    .if_exists()
                    .name(Alias::new("lottery_round_type"))
                    .to_owned(),
            )
            .await?;

        manager
            .drop_type(
                Type::drop()
                    .if_exists()
                    .name(Alias::new("prize_set_type"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
