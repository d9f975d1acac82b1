//! Application services.
//!
//! These services hold the client's runtime state and coordinate the
//! outbound ports on behalf of the view layer.

pub mod aggregator;
pub mod client;
pub mod gateway;
pub mod invalidation;
pub mod session;
pub mod state;

pub use aggregator::Aggregator;
pub use client::NuruClient;
pub use gateway::Gateway;
pub use invalidation::{Action, Collection};
pub use session::{SessionManager, SessionStatus};
pub use state::{AppError, AppSnapshot, BootstrapState};
