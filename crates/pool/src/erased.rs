//! Type-erased pool facade.
//!
//! [`AnyPool`] lets pools of different element types sit side by side (e.g.
//! in a [`PoolRegistry`](crate::PoolRegistry)). It only forwards to
//! [`Pool`]; element values cross the boundary as `Box<dyn Any>` and are
//! downcast on the way in and out.

use std::any::{Any, TypeId, type_name};
use std::fmt::Debug;

use crate::error::{Error, Result};
use crate::hooks::Poolable;
use crate::pool::Pool;
use crate::wait::WaitForFree;

/// Object-safe view of a [`Pool`] whose element type has been erased.
///
/// The container type `C` stays concrete: every pool behind the facade is
/// attached to the same kind of host container.
pub trait AnyPool<C>: Debug {
    /// Prototype new instances are cloned from.
    fn source_any(&self) -> &dyn Any;

    /// `TypeId` of the element type.
    fn element_type(&self) -> TypeId;

    /// Name of the element type, for diagnostics.
    fn element_type_name(&self) -> &'static str;

    /// Maximum number of instances, `0` when unbounded.
    fn count(&self) -> usize;

    /// Container new and returned instances are attached to.
    fn container(&self) -> Option<&C>;

    /// Number of tracked instances.
    fn len(&self) -> usize;

    /// Whether the pool tracks no instances.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of instances currently handed out.
    fn busy_len(&self) -> usize;

    /// See [`Pool::set_count`].
    fn set_count(&mut self, count: usize, destroy_clones: bool) -> &mut dyn AnyPool<C>;

    /// See [`Pool::set_container`].
    fn set_container(
        &mut self,
        container: Option<C>,
        world_position_stays: bool,
    ) -> &mut dyn AnyPool<C>;

    /// See [`Pool::clear`].
    fn clear(&mut self, destroy_clones: bool) -> &mut dyn AnyPool<C>;

    /// See [`Pool::non_lazy`].
    fn non_lazy(&mut self) -> &mut dyn AnyPool<C>;

    /// See [`Pool::get`]. The instance is boxed as its element type.
    fn get_any(&mut self) -> Option<Box<dyn Any>>;

    /// See [`Pool::take`].
    ///
    /// # Errors
    /// [`Error::TypeMismatch`] when `clone` is not of the element type, plus
    /// everything [`Pool::take`] returns.
    fn take_any(&mut self, clone: Box<dyn Any>) -> Result<()>;

    /// See [`Pool::wait_for_free_object`].
    fn wait_for_free_object(&self) -> WaitForFree;

    /// Downcast support back to the concrete `Pool<T, C>`.
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support back to the concrete `Pool<T, C>`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Poolable, C: Clone + Debug + 'static> AnyPool<C> for Pool<T, C> {
    fn source_any(&self) -> &dyn Any {
        self.source()
    }

    fn element_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn element_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn count(&self) -> usize {
        Pool::count(self)
    }

    fn container(&self) -> Option<&C> {
        Pool::container(self)
    }

    fn len(&self) -> usize {
        Pool::len(self)
    }

    fn busy_len(&self) -> usize {
        Pool::busy_len(self)
    }

    fn set_count(&mut self, count: usize, destroy_clones: bool) -> &mut dyn AnyPool<C> {
        Pool::set_count(self, count, destroy_clones)
    }

    fn set_container(
        &mut self,
        container: Option<C>,
        world_position_stays: bool,
    ) -> &mut dyn AnyPool<C> {
        Pool::set_container(self, container, world_position_stays)
    }

    fn clear(&mut self, destroy_clones: bool) -> &mut dyn AnyPool<C> {
        Pool::clear(self, destroy_clones)
    }

    fn non_lazy(&mut self) -> &mut dyn AnyPool<C> {
        Pool::non_lazy(self)
    }

    fn get_any(&mut self) -> Option<Box<dyn Any>> {
        Pool::get(self).map(|instance| Box::new(instance) as Box<dyn Any>)
    }

    fn take_any(&mut self, clone: Box<dyn Any>) -> Result<()> {
        let clone = clone.downcast::<T>().map_err(|_| Error::TypeMismatch {
            expected: type_name::<T>(),
            actual: "a value of another type",
        })?;
        Pool::take(self, *clone)
    }

    fn wait_for_free_object(&self) -> WaitForFree {
        Pool::wait_for_free_object(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Downcast an erased pool back to its typed form.
///
/// # Errors
/// [`Error::TypeMismatch`] when the pool's element type is not `T`.
pub fn downcast_mut<T: Poolable, C: Clone + Debug + 'static>(
    pool: &mut dyn AnyPool<C>,
) -> Result<&mut Pool<T, C>> {
    let actual = pool.element_type_name();
    pool.as_any_mut()
        .downcast_mut::<Pool<T, C>>()
        .ok_or(Error::TypeMismatch {
            expected: type_name::<T>(),
            actual,
        })
}

/// Shared-reference variant of [`downcast_mut`].
///
/// # Errors
/// [`Error::TypeMismatch`] when the pool's element type is not `T`.
pub fn downcast_ref<T: Poolable, C: Clone + Debug + 'static>(
    pool: &dyn AnyPool<C>,
) -> Result<&Pool<T, C>> {
    pool.as_any()
        .downcast_ref::<Pool<T, C>>()
        .ok_or(Error::TypeMismatch {
            expected: type_name::<T>(),
            actual: pool.element_type_name(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Probe, RecordingHost};

    fn erased(count: usize) -> Box<dyn AnyPool<String>> {
        let host = RecordingHost::new();
        Box::new(Pool::new(host.prototype(), host).with_count(count))
    }

    #[test]
    fn forwards_to_typed_pool() {
        let mut pool = erased(2);
        pool.non_lazy();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.count(), 2);
        assert_eq!(pool.element_type(), TypeId::of::<Probe>());

        let first = pool.get_any().unwrap();
        assert!(first.downcast_ref::<Probe>().is_some());
        assert_eq!(pool.busy_len(), 1);

        pool.take_any(first).unwrap();
        assert_eq!(pool.busy_len(), 0);
    }

    #[test]
    fn chained_reconfiguration() {
        let mut pool = erased(0);
        pool.set_count(3, true)
            .set_container(Some("root".into()), true)
            .non_lazy();
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.container().map(String::as_str), Some("root"));

        pool.clear(false);
        assert!(pool.is_empty());
    }

    #[test]
    fn take_rejects_foreign_values() {
        let mut pool = erased(0);
        let err = pool.take_any(Box::new(7_u32)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn downcast_back_to_typed_pool() {
        let mut pool = erased(1);
        let typed = downcast_mut::<Probe, _>(pool.as_mut()).unwrap();
        let probe = typed.get().unwrap();
        assert!(typed.is_busy(&probe));

        assert!(downcast_ref::<Probe, _>(pool.as_ref()).is_ok());
    }

    #[test]
    fn source_is_reachable_through_facade() {
        let pool = erased(0);
        assert!(pool.source_any().downcast_ref::<Probe>().is_some());
    }
}
