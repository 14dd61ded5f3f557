//! Write-Ahead Log Module
//!
//! Append-only record stream that makes accepted mutations recoverable.
//! Records are line-oriented text (`PUT,<key>,<value>` / `DEL,<key>`);
//! the format is stable and must not change without breaking the on-disk
//! contract.

mod record;
mod replay;
mod writer;

pub use record::Record;
pub use replay::{replay, ReplaySummary};
pub use writer::WalWriter;
