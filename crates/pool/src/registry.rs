//! Pool registry: named pools of different element types behind one
//! lookup surface.
//!
//! Pools are registered with their concrete element type through
//! [`RegistryBuilder::register`]; [`RegistryBuilder::build`] validates the
//! settings, rejects duplicate names and constructs every pool.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::fmt::{self, Debug};

use tracing::debug;

use crate::config::PoolSettings;
use crate::erased::{self, AnyPool};
use crate::error::{Error, Result};
use crate::hooks::Poolable;
use crate::host::Host;
use crate::pool::Pool;

type Constructor<C> = Box<dyn FnOnce(&PoolSettings) -> Box<dyn AnyPool<C>>>;

/// A registration waiting for [`RegistryBuilder::build`].
struct Pending<C> {
    settings: PoolSettings,
    element: &'static str,
    construct: Constructor<C>,
}

// ---------------------------------------------------------------------------
// RegistryBuilder
// ---------------------------------------------------------------------------

/// Collects pool registrations in declaration order.
pub struct RegistryBuilder<C> {
    pending: Vec<Pending<C>>,
}

impl<C> Debug for RegistryBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.pending
                    .iter()
                    .map(|pending| (&pending.settings.name, pending.element)),
            )
            .finish()
    }
}

impl<C> Default for RegistryBuilder<C> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<C: Clone + Debug + 'static> RegistryBuilder<C> {
    /// Declare a pool of `T` cloned from `source`.
    #[must_use]
    pub fn register<T, H>(
        mut self,
        settings: PoolSettings,
        source: T,
        host: H,
        container: Option<C>,
    ) -> Self
    where
        T: Poolable,
        H: Host<T, Container = C> + 'static,
    {
        self.pending.push(Pending {
            settings,
            element: type_name::<T>(),
            construct: Box::new(move |settings: &PoolSettings| -> Box<dyn AnyPool<C>> {
                Box::new(Pool::from_settings(source, host, settings, container))
            }),
        });
        self
    }

    /// Validate every registration and construct the pools.
    ///
    /// Nothing is instantiated unless all settings are valid and every name
    /// is unique.
    ///
    /// # Errors
    /// [`Error::Configuration`] for invalid settings,
    /// [`Error::DuplicatePoolName`] when two entries share a name.
    pub fn build(self) -> Result<PoolRegistry<C>> {
        let mut by_name = HashMap::with_capacity(self.pending.len());
        for (index, pending) in self.pending.iter().enumerate() {
            pending.settings.validate()?;
            if by_name.insert(pending.settings.name.clone(), index).is_some() {
                return Err(Error::DuplicatePoolName {
                    name: pending.settings.name.clone(),
                });
            }
        }

        let entries = self
            .pending
            .into_iter()
            .map(|pending| {
                let pool = (pending.construct)(&pending.settings);
                debug!(
                    name = %pending.settings.name,
                    element = pending.element,
                    count = pending.settings.count,
                    non_lazy = pending.settings.non_lazy,
                    "Registered pool"
                );
                Entry {
                    name: pending.settings.name,
                    pool,
                }
            })
            .collect();

        Ok(PoolRegistry { entries, by_name })
    }
}

// ---------------------------------------------------------------------------
// PoolRegistry
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Entry<C> {
    name: String,
    pool: Box<dyn AnyPool<C>>,
}

/// Pools indexed by declaration order, element type and name.
///
/// Every lookup resolves to the single pool registered for that slot; the
/// forwarders (`get_from_pool*`, `take_to_pool*`) are shorthand for a lookup
/// followed by [`Pool::get`] or [`Pool::take`].
#[derive(Debug)]
pub struct PoolRegistry<C> {
    entries: Vec<Entry<C>>,
    by_name: HashMap<String, usize>,
}

impl<C: Clone + Debug + 'static> PoolRegistry<C> {
    /// Start declaring pools.
    #[must_use]
    pub fn builder() -> RegistryBuilder<C> {
        RegistryBuilder::default()
    }

    /// Number of registered pools.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no pool is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pool names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Erased pool at `index`.
    ///
    /// # Errors
    /// [`Error::PoolNotFound`] when `index` is out of range.
    pub fn get(&mut self, index: usize) -> Result<&mut dyn AnyPool<C>> {
        match self.entries.get_mut(index) {
            Some(entry) => Ok(entry.pool.as_mut()),
            None => Err(Error::PoolNotFound {
                key: format!("index {index}"),
            }),
        }
    }

    /// Erased pool registered as `name`.
    ///
    /// # Errors
    /// [`Error::PoolNotFound`] when no pool has that name.
    pub fn get_named(&mut self, name: &str) -> Result<&mut dyn AnyPool<C>> {
        let index = self.index_of(name)?;
        self.get(index)
    }

    /// Pool of `T` at `index`.
    ///
    /// # Errors
    /// [`Error::PoolNotFound`] when `index` is out of range,
    /// [`Error::TypeMismatch`] when that pool does not hold `T`.
    pub fn pool<T: Poolable>(&mut self, index: usize) -> Result<&mut Pool<T, C>> {
        erased::downcast_mut(self.get(index)?)
    }

    /// First registered pool whose element type is `T`.
    ///
    /// # Errors
    /// [`Error::PoolNotFound`] when no pool holds `T`.
    pub fn pool_of<T: Poolable>(&mut self) -> Result<&mut Pool<T, C>> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.pool.element_type() == TypeId::of::<T>())
            .ok_or_else(|| Error::PoolNotFound {
                key: format!("element type '{}'", type_name::<T>()),
            })?;
        self.pool(index)
    }

    /// Pool of `T` registered as `name`.
    ///
    /// # Errors
    /// [`Error::PoolNotFound`] when no pool has that name,
    /// [`Error::TypeMismatch`] when that pool does not hold `T`.
    pub fn pool_named<T: Poolable>(&mut self, name: &str) -> Result<&mut Pool<T, C>> {
        let index = self.index_of(name)?;
        self.pool(index)
    }

    /// Look up the pool at `index` and get an instance from it.
    ///
    /// `Ok(None)` means the pool is exhausted.
    pub fn get_from_pool<T: Poolable>(&mut self, index: usize) -> Result<Option<T>> {
        Ok(self.pool::<T>(index)?.get())
    }

    /// Look up the first pool of `T` and get an instance from it.
    pub fn get_from_pool_of<T: Poolable>(&mut self) -> Result<Option<T>> {
        Ok(self.pool_of::<T>()?.get())
    }

    /// Look up the pool named `name` and get an instance from it.
    pub fn get_from_pool_named<T: Poolable>(&mut self, name: &str) -> Result<Option<T>> {
        Ok(self.pool_named::<T>(name)?.get())
    }

    /// Return `clone` to the pool at `index`.
    pub fn take_to_pool<T: Poolable>(&mut self, index: usize, clone: T) -> Result<()> {
        self.pool::<T>(index)?.take(clone)
    }

    /// Return `clone` to the first pool of `T`.
    pub fn take_to_pool_of<T: Poolable>(&mut self, clone: T) -> Result<()> {
        self.pool_of::<T>()?.take(clone)
    }

    /// Return `clone` to the pool named `name`.
    pub fn take_to_pool_named<T: Poolable>(&mut self, name: &str, clone: T) -> Result<()> {
        self.pool_named::<T>(name)?.take(clone)
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::PoolNotFound {
                key: format!("name \"{name}\""),
            })
    }
}
