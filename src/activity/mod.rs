pub mod logger;
pub mod types;

pub use logger::ActivityLogger;
pub use types::{ActivityQuery, ActivityRecord, ActivityType, LoggedActivity};
