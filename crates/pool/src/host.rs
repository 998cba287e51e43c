//! Host collaborator: the object-lifecycle system that owns the actual
//! instances.
//!
//! A pool never creates, destroys or shows instances by itself. It asks the
//! host, which is the scene/runtime the instances live in.

use std::fmt::Debug;

/// Lifecycle operations the surrounding runtime provides for instances of `T`.
///
/// `T` is a handle to a host object (two handles compare equal when they
/// refer to the same object). The pool stores handles and passes them back
/// to the host for every lifecycle transition.
pub trait Host<T> {
    /// Attachment context instances are parented under.
    type Container: Clone + Debug;

    /// Create a new instance from `source`, parented under `container`.
    fn instantiate(&mut self, source: &T, container: Option<&Self::Container>) -> T;

    /// Release an instance's underlying resources permanently.
    fn destroy(&mut self, instance: &T);

    /// Whether the instance still exists on the host side.
    ///
    /// Instances destroyed outside the pool's control report `false` and are
    /// skipped when the pool destroys its clones.
    fn is_alive(&self, instance: &T) -> bool {
        let _ = instance;
        true
    }

    /// Toggle visibility/liveness without destroying.
    fn set_active(&mut self, instance: &T, active: bool);

    /// Move an instance under a new attachment point.
    fn reparent(
        &mut self,
        instance: &T,
        container: Option<&Self::Container>,
        world_position_stays: bool,
    );
}
