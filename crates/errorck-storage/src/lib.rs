//! errorck-storage: the SQLite sink for classified watched calls.
//!
//! One table, one writer per run. The sink takes exclusive ownership of
//! the destination file and latches a sticky error on the first write
//! failure so the driver can exit non-zero without aborting the run.

pub mod schema;
pub mod sink;

pub use sink::{read_all, CallSink};
