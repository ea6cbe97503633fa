pub mod logger;
pub mod moves;
pub mod record;
pub mod render;

pub use record::{DailyRecord, RecordBook, Recorded};
pub use render::{render, Overlay};
