//! Serialised environment overrides for tests.
//!
//! Tests in one binary share the process environment, so every override goes
//! through [`EnvScope`], which holds a global lock for its lifetime and
//! restores the previous values when dropped.

use std::{
    env,
    ffi::OsString,
    sync::{Mutex, MutexGuard, PoisonError},
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Exclusive access to the process environment with automatic restore.
///
/// # Examples
/// ```
/// use prima_test_support::env::EnvScope;
///
/// let mut scope = EnvScope::new();
/// scope.set("PRIMA_EXAMPLE_KEY", "7");
/// assert_eq!(std::env::var("PRIMA_EXAMPLE_KEY").as_deref(), Ok("7"));
/// drop(scope);
/// assert!(std::env::var("PRIMA_EXAMPLE_KEY").is_err());
/// ```
pub struct EnvScope {
    saved: Vec<(&'static str, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvScope {
    /// Waits for exclusive access to the environment.
    ///
    /// A lock poisoned by a failed test is recovered, since the previous
    /// holder restored its overrides while unwinding.
    #[must_use]
    pub fn new() -> Self {
        Self {
            saved: Vec::new(),
            _lock: ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Sets `key` to `value` until the scope ends.
    pub fn set(&mut self, key: &'static str, value: &str) -> &mut Self {
        self.remember(key);
        // SAFETY: ENV_LOCK serialises every environment mutation made by tests.
        unsafe { env::set_var(key, value) };
        self
    }

    /// Removes `key` until the scope ends.
    pub fn unset(&mut self, key: &'static str) -> &mut Self {
        self.remember(key);
        // SAFETY: ENV_LOCK serialises every environment mutation made by tests.
        unsafe { env::remove_var(key) };
        self
    }

    fn remember(&mut self, key: &'static str) {
        if self.saved.iter().all(|(saved, _)| *saved != key) {
            self.saved.push((key, env::var_os(key)));
        }
    }
}

impl Default for EnvScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        for (key, original) in self.saved.drain(..).rev() {
            match original {
                // SAFETY: the scope still holds ENV_LOCK.
                Some(value) => unsafe { env::set_var(key, value) },
                // SAFETY: the scope still holds ENV_LOCK.
                None => unsafe { env::remove_var(key) },
            }
        }
    }
}
