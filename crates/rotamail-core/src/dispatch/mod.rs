//! Dispatch Module - Rotation, quota enforcement, and the per-recipient loop

mod dispatcher;
mod quota;
mod selector;

pub use dispatcher::{DispatchError, Dispatcher};
pub use quota::QuotaTracker;
pub use selector::AccountSelector;
