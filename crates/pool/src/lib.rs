//! # Nebula Pool
//!
//! Reusable instance pools for component-based runtimes.
//!
//! A [`Pool`] hands out instances of one element type on demand and takes
//! them back for reuse, creating new ones lazily (or eagerly with
//! [`Pool::non_lazy`]) up to an optional capacity. The runtime that actually
//! owns the instances is reached through the [`Host`] trait; element types
//! may opt into the [`PoolObject`] hooks to reset their own state.
//!
//! Pools of different element types can be stored behind the [`AnyPool`]
//! facade and looked up by index, type or name in a [`PoolRegistry`].
//!
//! ```
//! use nebula_pool::Pool;
//! use nebula_pool::testing::RecordingHost;
//!
//! let host = RecordingHost::new();
//! let mut pool = Pool::new(host.prototype(), host.clone()).with_count(2);
//!
//! let a = pool.get().unwrap();
//! let _b = pool.get().unwrap();
//! assert!(pool.get().is_none());
//!
//! pool.take(a.clone())?;
//! assert_eq!(pool.get(), Some(a));
//! # Ok::<(), nebula_pool::Error>(())
//! ```
//!
//! Pools are single-threaded and meant to be driven from the host's frame
//! loop.

pub mod config;
pub mod erased;
pub mod error;
pub mod hooks;
pub mod host;
pub mod pool;
pub mod registry;
pub mod testing;
pub mod wait;

pub use config::PoolSettings;
pub use erased::AnyPool;
pub use error::{Error, Result};
pub use hooks::{PoolObject, Poolable};
pub use host::Host;
pub use pool::Pool;
pub use registry::{PoolRegistry, RegistryBuilder};
pub use wait::WaitForFree;
