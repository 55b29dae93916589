mod command;
mod controller;

pub use command::{Command, Surface, SyncOutcome};
pub use controller::IndexSyncController;
