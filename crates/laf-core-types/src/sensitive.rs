//! Sensitive data marker for automatic redaction
//!
//! The `Sensitive<T>` wrapper keeps connection strings (which usually embed
//! credentials) out of log lines and `Debug` dumps of configuration.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Wrapper for sensitive data that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use laf_core_types::Sensitive;
///
/// let uri = Sensitive::new("file:/srv/laf?user=root&password=hunter2");
/// assert_eq!(format!("{:?}", uri), "***REDACTED***");
/// assert_eq!(format!("{}", uri), "***REDACTED***");
///
/// // Access the actual value when needed
/// assert!(uri.expose().contains("hunter2"));
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a sensitive value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying sensitive value
    ///
    /// Use this method sparingly and only where the raw value must be
    /// handed to the driver.
    pub fn expose(&self) -> &T {
        &self.0
    }

    /// Consume the wrapper and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

// Loaded straight out of configuration sources; never serialized back out.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Sensitive<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Sensitive)
    }
}
