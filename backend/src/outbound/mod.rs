//! Outbound adapters implementing the domain repository ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: in-process store used without a database and in tests.
//!
//! Adapters translate between domain records and storage representations;
//! they hold no business logic.

pub mod memory;
pub mod persistence;
