// Play session: note timeline, tick scheduler, input queue, config and results

pub mod clock;
pub mod config;
mod controller;
mod input;
#[cfg(test)]
mod proptest;
mod result;
mod timeline;
mod timing_stats;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::PlayConfig;
pub use controller::{Controller, TickReport};
pub use input::{HitEvent, InputSender};
pub use result::PlayResult;
pub use timeline::{ColumnTimeline, Outcome, ResolvedNote, Timeline};
pub use timing_stats::TimingStats;
