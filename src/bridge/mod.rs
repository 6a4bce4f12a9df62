pub mod handler;
pub mod message;
pub mod store;

pub use handler::MessageHandler;
pub use message::{Message, Reply};
pub use store::SnapshotStore;
