pub mod daily_checkins;
pub mod lottery_round_entries;
pub mod lottery_rounds;
pub mod lottery_settings;
pub mod lottery_winners;
pub mod prize_items;
pub mod prize_sets;

pub use daily_checkins as daily_checkin_entity;
pub use lottery_round_entries as lottery_round_entry_entity;
pub use lottery_rounds as lottery_round_entity;
pub use lottery_settings as lottery_settings_entity;
pub use lottery_winners as lottery_winner_entity;
pub use prize_items as prize_item_entity;
pub use prize_sets as prize_set_entity;

pub use lottery_rounds::{RoundStatus, RoundType};
pub use prize_sets::PrizeSetType;
