//! RotaMail Storage - Database access for accounts and the delivery log
//!
//! This crate provides the Postgres-backed account store and the
//! append-only delivery log, behind traits the dispatch core consumes.

pub mod db;
pub mod models;
pub mod repository;

pub use db::DatabasePool;
pub use models::*;
pub use repository::*;
