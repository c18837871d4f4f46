//! Workflow safety contract: which actions a presentation layer may offer in
//! each workflow state, a UI description built from that set, and an
//! independent validator that rejects any description reaching outside it.

pub mod adapter;
pub mod contract;
pub mod error;
pub mod generate;
pub mod model;
pub mod proof;
pub mod ui;
pub mod validate;

pub use adapter::*;
pub use contract::*;
pub use error::*;
pub use generate::*;
pub use model::*;
pub use proof::*;
pub use ui::*;
pub use validate::*;
