pub mod event;
pub mod logger;

pub use event::{ParseEvent, ParseTrigger};
pub use logger::TraceLogger;
