pub mod checkin;
pub mod lottery;
pub mod prize;
pub mod settings;
pub mod stats;

pub use checkin::*;
pub use lottery::*;
pub use prize::*;
pub use settings::*;
pub use stats::*;
