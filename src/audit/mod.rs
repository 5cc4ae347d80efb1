//! Append-only audit trail
//!
//! Every wallet, ledger entry and category change is recorded as one JSON line
//! holding the operation, the entity it touched and its state before and
//! after. The log lives next to the data files and is never rewritten.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
