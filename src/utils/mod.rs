pub mod time_utils;
pub mod weighted_draw;

pub use weighted_draw::{RandomSource, SeededSource, ThreadRngSource};
