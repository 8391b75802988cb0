//! Criteria-driven screening flow.

mod criteria;
mod screener;

pub use criteria::ScreeningCriteria;
pub use screener::{
    ScreenConfig, Screener, ScreeningOutcome, ScreeningStatus, DEFAULT_SCREEN_BATCH_SIZE,
};
