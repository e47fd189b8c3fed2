//! Folio server library.
//!
//! Wires the media pipeline, object storage, and the asset registry into
//! an HTTP API. The [`ConsistencyCoordinator`] owns every mutation that
//! spans both backing stores.

pub mod coordinator;
pub mod error;
pub mod gc;
pub mod handlers;
pub mod locks;
pub mod metrics;
pub mod routes;
pub mod state;

pub use coordinator::ConsistencyCoordinator;
pub use error::{ApiError, ApiResult};
pub use locks::ParentLocks;
pub use routes::create_router;
pub use state::AppState;
