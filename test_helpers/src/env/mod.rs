//! Helpers for safely mutating environment variables in tests.
//!
//! Each mutation acquires a global re-entrant mutex for the duration of the
//! set/remove operation and returns an RAII guard that restores the previous
//! state when dropped, removing the variable if it was previously absent.
//! Stacked guards for the same key restore in LIFO order. Use [`lock`] when
//! a test needs exclusive access across several operations, for example
//! while it reads the whole process environment.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let _g = env::set_var("TINY_HIERA_DOC_KEY", "VALUE");
//! // `TINY_HIERA_DOC_KEY` is set to `VALUE` for the duration of the guard.
//! ```

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// RAII guard restoring an environment variable to its prior value on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _guard = ENV_MUTEX.lock();
        match self.original.take() {
            // SAFETY: `ENV_MUTEX` is held during restoration.
            Some(value) => unsafe { env::set_var(&self.key, value) },
            // SAFETY: `ENV_MUTEX` is held during restoration.
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

/// RAII guard that serialises environment access for its lifetime.
#[must_use = "dropping releases the environment lock"]
pub struct EnvLock {
    _guard: ReentrantMutexGuard<'static, ()>,
}

/// Sets an environment variable and returns a guard restoring its prior value.
///
/// # Examples
/// ```
/// use test_helpers::env;
/// let _g = env::set_var("TINY_HIERA_DOC_FOO", "bar");
/// assert!(matches!(std::env::var("TINY_HIERA_DOC_FOO"), Ok(ref value) if value == "bar"));
/// ```
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    mutate(key.into(), |name| {
        // SAFETY: `mutate` holds `ENV_MUTEX` while this runs.
        unsafe { env::set_var(name, value.as_ref()) };
    })
}

/// Removes an environment variable and returns a guard restoring its prior value.
///
/// # Examples
/// ```
/// use test_helpers::env;
/// let _g = env::remove_var("TINY_HIERA_DOC_BAR");
/// assert!(std::env::var("TINY_HIERA_DOC_BAR").is_err());
/// ```
pub fn remove_var<K>(key: K) -> EnvVarGuard
where
    K: Into<String>,
{
    mutate(key.into(), |name| {
        // SAFETY: `mutate` holds `ENV_MUTEX` while this runs.
        unsafe { env::remove_var(name) };
    })
}

/// Acquire the global environment lock for the lifetime of the guard.
///
/// The lock is re-entrant, so guards may still be created while it is held.
///
/// # Examples
/// ```
/// use test_helpers::env;
///
/// let _lock = env::lock();
/// let _guard = env::set_var("TINY_HIERA_DOC_KEY", "VALUE");
/// ```
pub fn lock() -> EnvLock {
    EnvLock {
        _guard: ENV_MUTEX.lock(),
    }
}

fn mutate<F>(key: String, mutator: F) -> EnvVarGuard
where
    F: FnOnce(&str),
{
    let _guard = ENV_MUTEX.lock();
    let original = env::var_os(&key);
    mutator(&key);
    EnvVarGuard { key, original }
}

#[cfg(test)]
mod tests;
