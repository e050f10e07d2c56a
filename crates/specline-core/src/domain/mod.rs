pub mod errors;

pub use errors::{SpeclineError, SpeclineErrorCategory, SpeclineResult};
