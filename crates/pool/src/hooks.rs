//! Pool-object capability: optional hooks an element type opts into.
//!
//! The pool checks the capability at each hook site through
//! [`Poolable::as_pool_object`]. Types that do not opt in keep the default
//! and are skipped silently.

/// Hooks invoked by the pool on its instances.
///
/// Both hooks are called by the pool only, never by the instance itself.
pub trait PoolObject {
    /// Called once, right after the pool instantiated this object on demand,
    /// before it is marked busy.
    fn on_created_in_pool(&mut self);

    /// Called every time the object moves from free to busy, after it was
    /// activated and before it is handed to the caller. Reset per-use state
    /// here.
    fn on_getting_from_pool(&mut self);
}

/// Element types a [`Pool`](crate::Pool) can manage.
///
/// Elements are handles: cloning yields another handle to the same object
/// and equality is identity.
pub trait Poolable: Clone + PartialEq + 'static {
    /// Capability query for the [`PoolObject`] hooks.
    fn as_pool_object(&mut self) -> Option<&mut dyn PoolObject> {
        None
    }
}

/// Hook that fired on an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HookEvent {
    /// [`PoolObject::on_created_in_pool`]
    Created,
    /// [`PoolObject::on_getting_from_pool`]
    Getting,
}

impl std::fmt::Display for HookEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "OnCreatedInPool"),
            Self::Getting => write!(f, "OnGettingFromPool"),
        }
    }
}

/// Fire `event` on `instance` if it implements the capability.
///
/// Returns whether a hook ran.
pub(crate) fn dispatch<T: Poolable>(instance: &mut T, event: HookEvent) -> bool {
    let Some(object) = instance.as_pool_object() else {
        return false;
    };
    match event {
        HookEvent::Created => object.on_created_in_pool(),
        HookEvent::Getting => object.on_getting_from_pool(),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq)]
    struct Inert;

    impl Poolable for Inert {}

    #[derive(Clone, PartialEq, Default)]
    struct Counting {
        created: u32,
        getting: u32,
    }

    impl PoolObject for Counting {
        fn on_created_in_pool(&mut self) {
            self.created += 1;
        }

        fn on_getting_from_pool(&mut self) {
            self.getting += 1;
        }
    }

    impl Poolable for Counting {
        fn as_pool_object(&mut self) -> Option<&mut dyn PoolObject> {
            Some(self)
        }
    }

    #[test]
    fn types_without_capability_are_skipped() {
        assert!(!dispatch(&mut Inert, HookEvent::Created));
        assert!(!dispatch(&mut Inert, HookEvent::Getting));
    }

    #[test]
    fn dispatch_routes_to_matching_hook() {
        let mut obj = Counting::default();
        assert!(dispatch(&mut obj, HookEvent::Created));
        assert!(dispatch(&mut obj, HookEvent::Getting));
        assert!(dispatch(&mut obj, HookEvent::Getting));
        assert_eq!((obj.created, obj.getting), (1, 2));
    }

    #[test]
    fn hook_event_display() {
        assert_eq!(HookEvent::Created.to_string(), "OnCreatedInPool");
        assert_eq!(HookEvent::Getting.to_string(), "OnGettingFromPool");
    }
}
