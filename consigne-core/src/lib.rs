//! consigne-core: ledger transaction model, returnable item keys, time helpers

pub mod error;
pub mod item;
pub mod time;
pub mod transaction;

pub use error::{Error, Result};
pub use item::{Container, ItemKey};
pub use transaction::{Transaction, TransactionKind};
