//! Worker count configuration
//!
//! Every engine operation takes a [`ThreadCount`]. Callers coming from a raw
//! integer interface use [`ThreadCount::from_raw`], which understands two
//! sentinels:
//!
//! - `-1`: let the platform decide (rayon's global pool)
//! - `-2`: read the count from the environment (`QREG_NUM_THREADS`, then
//!   `OMP_NUM_THREADS`), falling back to the platform default when unset
//!
//! Zero and any other negative value are rejected.

use crate::error::QuantumError;
use crate::Result;
use std::num::NonZeroUsize;

/// Raw sentinel selecting the platform default
pub const THREADS_PLATFORM: i64 = -1;

/// Raw sentinel selecting the environment configuration
pub const THREADS_ENVIRONMENT: i64 = -2;

/// Environment variables consulted by [`ThreadCount::Environment`], in order
pub const THREAD_ENV_VARS: [&str; 2] = ["QREG_NUM_THREADS", "OMP_NUM_THREADS"];

/// Requested number of workers for one operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ThreadCount {
    /// Exactly this many workers
    Fixed(NonZeroUsize),
    /// Read from the process environment
    Environment,
    /// Platform default
    #[default]
    Platform,
}

/// Worker count after the environment has been consulted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workers {
    /// Use the global pool as configured by the platform
    Platform,
    /// Use a dedicated pool of this size
    Fixed(NonZeroUsize),
}

impl ThreadCount {
    /// Single worker: everything runs on one thread
    pub const SINGLE: Self = Self::Fixed(NonZeroUsize::MIN);

    /// Request exactly `count` workers
    ///
    /// # Errors
    /// Returns [`QuantumError::InvalidThreadCount`] for zero.
    pub fn fixed(count: usize) -> Result<Self> {
        NonZeroUsize::new(count)
            .map(Self::Fixed)
            .ok_or(QuantumError::InvalidThreadCount(0))
    }

    /// Decode the integer convention used by bindings
    ///
    /// # Example
    /// ```
    /// use qreg_core::ThreadCount;
    ///
    /// assert_eq!(ThreadCount::from_raw(-1).unwrap(), ThreadCount::Platform);
    /// assert_eq!(ThreadCount::from_raw(-2).unwrap(), ThreadCount::Environment);
    /// assert!(ThreadCount::from_raw(0).is_err());
    /// ```
    pub fn from_raw(raw: i64) -> Result<Self> {
        match raw {
            THREADS_PLATFORM => Ok(Self::Platform),
            THREADS_ENVIRONMENT => Ok(Self::Environment),
            n if n > 0 => usize::try_from(n)
                .ok()
                .and_then(NonZeroUsize::new)
                .map(Self::Fixed)
                .ok_or(QuantumError::InvalidThreadCount(raw)),
            _ => Err(QuantumError::InvalidThreadCount(raw)),
        }
    }

    /// Resolve against the process environment
    pub fn resolve(self) -> Result<Workers> {
        self.resolve_with(|var| std::env::var(var).ok())
    }

    /// Resolve using `lookup` in place of the process environment
    pub fn resolve_with<F>(self, lookup: F) -> Result<Workers>
    where
        F: Fn(&str) -> Option<String>,
    {
        match self {
            Self::Fixed(n) => Ok(Workers::Fixed(n)),
            Self::Platform => Ok(Workers::Platform),
            Self::Environment => {
                for var in THREAD_ENV_VARS {
                    if let Some(value) = lookup(var) {
                        let count = value
                            .trim()
                            .parse::<usize>()
                            .ok()
                            .and_then(NonZeroUsize::new)
                            .ok_or_else(|| QuantumError::InvalidEnvironment {
                                var: var.to_string(),
                                value: value.clone(),
                            })?;
                        return Ok(Workers::Fixed(count));
                    }
                }
                tracing::debug!("no thread configuration in environment, using platform default");
                Ok(Workers::Platform)
            },
        }
    }
}

impl TryFrom<i64> for ThreadCount {
    type Error = QuantumError;

    fn try_from(raw: i64) -> Result<Self> {
        Self::from_raw(raw)
    }
}

impl From<NonZeroUsize> for ThreadCount {
    fn from(count: NonZeroUsize) -> Self {
        Self::Fixed(count)
    }
}
