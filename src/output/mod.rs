//! Output handling with clear separation of planning and execution.
//!
//! Commands produce serializable values; this module turns them into
//! indented JSON and delivers the text to exactly one destination.

mod types;
mod writer;

pub use types::DeliveryTarget;
pub use writer::{deliver, emit_json, render_json};
