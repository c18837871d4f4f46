pub mod ndjson;
pub mod store;

pub use ndjson::*;
pub use store::*;
