//! Observer hooks dispatched around write operations.

mod registry;

pub use registry::{HookEvent, HookOutcome, HookRegistry};
