//! Lifts decoder results into [`HieraResult`].
//!
//! Decoders return their own error types; resolution returns
//! `Result<T, Arc<HieraError>>`. [`HieraResultExt::into_hiera`] bridges the
//! two for any error that converts into [`HieraError`], such as
//! `serde_json::Error` or `serde_saphyr::Error`.
//!
//! # Examples
//!
//! ```
//! use tiny_hiera::{HieraResult, HieraResultExt};
//!
//! fn decode() -> HieraResult<serde_json::Value> {
//!     serde_json::from_str("{\"a\": 1}").into_hiera()
//! }
//! assert!(decode().is_ok());
//! ```

use std::sync::Arc;

use crate::{HieraError, HieraResult};

/// Maps `Result<T, E>` into `HieraResult<T>` when `E: Into<HieraError>`.
pub trait HieraResultExt<T, E> {
    /// Convert the error side into a shared [`HieraError`].
    ///
    /// # Errors
    ///
    /// Returns the converted error when `self` is `Err`.
    fn into_hiera(self) -> HieraResult<T>;
}

impl<T, E> HieraResultExt<T, E> for Result<T, E>
where
    E: Into<HieraError>,
{
    fn into_hiera(self) -> HieraResult<T> {
        self.map_err(|err| Arc::new(err.into()))
    }
}
