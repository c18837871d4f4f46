//! Reference orchestrator for the deletion workflow.
//!
//! `Workflow<S>` makes out-of-order transitions a compile error; `AnyWorkflow`
//! applies commands arriving at runtime and refuses any action the contract for
//! the current state does not grant.

pub mod any;
pub mod error;
pub mod ids;
pub mod stage;
pub mod workflow;

pub use any::*;
pub use error::*;
pub use ids::*;
pub use workflow::*;
