//! Application layer managing wizard state and workflows.
//!
//! This module coordinates between the domain layer and the presentation
//! layer: it owns the collected form data, sequences the wizard steps and
//! describes the remote calls the infrastructure layer must run.

pub mod forms;
pub mod gateway;
pub mod state;
pub mod store;

pub use forms::*;
pub use gateway::*;
pub use state::*;
pub use store::*;
