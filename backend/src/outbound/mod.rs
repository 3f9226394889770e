//! Outbound adapters implementing domain ports for storage.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: a process-local store used when no database is configured
//!   and by behaviour tests
//!
//! Adapters are thin translators between domain types and storage
//! representations; each owns the transaction behind a unit of work.

pub mod memory;
pub mod persistence;
