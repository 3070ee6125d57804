// Synchronization controller for the Deskbot desk
//
// The controller reconciles locally held ticket snapshots with the
// authoritative store under two sources of change: user-triggered lifecycle
// transitions, and silent store-side writes by the external AI/notification
// processes. Observation of the latter is strictly pull-based; there is no
// push channel.

pub mod controller;
pub mod error;
pub mod intake;
pub mod state;

pub use controller::{DeskController, TICKET_CREATED_NOTICE};
pub use error::SyncError;
pub use intake::{validate_draft, ValidationError};
pub use state::{DeskSnapshot, DetailState, DetailView, ListState};
