//! Indexing-completion poller
//!
//! Writes to the back office are searchable only once the search indexer has
//! processed them. [`IndexingWaiter::after`] wraps such a write: it runs the
//! operation, reads the correlation id from the response and polls the
//! indexer's status endpoint until every entry for that id has succeeded.

pub mod error;
pub mod status;
pub mod waiter;

pub use error::{IndexingError, IndexingResult};
pub use status::{CorrelationId, HttpStatusSource, StatusEntry, StatusReport, StatusSource};
pub use waiter::{IndexingWaiter, PollPolicy};
