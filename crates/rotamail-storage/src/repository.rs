//! Repository layer for data access

pub mod accounts;
pub mod delivery_log;

// Re-export concrete repository implementations with simple names
pub use accounts::DbAccountStore as AccountRepository;
pub use delivery_log::DbLogStore as LogRepository;

// Re-export the traits the dispatch core consumes
pub use accounts::AccountStore;
pub use delivery_log::{LogSearch, LogStore};
