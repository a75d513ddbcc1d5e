//! Upstream limits client, fetch-and-persist, and the scheduled poller.

pub mod ingest;
pub mod limits;
pub mod poller;

pub use ingest::{IngestError, LimitsIngestor};
pub use limits::{LimitSnapshot, LimitUsage, LimitsClient, LimitsError, LimitsSource};
pub use poller::{Poller, PollerMode, PollerState, TickOutcome};
