//! Error types produced while decoding and resolving hierarchy documents.

mod constructors;
mod conversions;
mod types;

pub use types::{DocumentFormat, HieraError};
