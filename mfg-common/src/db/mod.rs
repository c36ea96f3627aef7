//! Database initialization, migrations and shared reference data

pub mod currency;
pub mod init;
pub mod interactions;
pub mod locations;
pub mod migrations;
pub mod rollback;
pub mod sequence;

pub use currency::{get_exchange_rate, resolve_exchange_rate, set_exchange_rate, ExchangeRateStamp};
pub use init::{create_schema, init_database, init_memory_database, ISSUE_ASSOCIATION_TABLES};
pub use interactions::{delete_supplier_interaction, insert_supplier_interaction};
pub use locations::{get_default_location, set_default_location};
pub use migrations::run_migrations;
pub use rollback::RollbackLog;
pub use sequence::{next_sequence, SequenceKind};
