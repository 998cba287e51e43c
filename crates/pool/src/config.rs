//! Pool settings used by the registry

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Declarative settings for one registered pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoolSettings {
    /// Unique name the pool is looked up by
    pub name: String,
    /// Maximum number of instances, `0` for unbounded
    pub count: usize,
    /// Instantiate every instance up front instead of on demand
    pub non_lazy: bool,
}

impl PoolSettings {
    /// Settings for an unbounded, lazily populated pool.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the capacity.
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Request eager population.
    #[must_use]
    pub fn non_lazy(mut self) -> Self {
        self.non_lazy = true;
        self
    }

    /// Validate settings, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::configuration("pool name must not be empty"));
        }
        Ok(())
    }
}
