pub mod record_model;
pub mod recorder;

pub use record_model::{ClickRecord, Interaction, RecordedEvent};
pub use recorder::Recorder;
