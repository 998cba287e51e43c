//! Object pool tracking which instances exist and which are busy.
//!
//! `Pool<T, C>` hands out instances of `T` on demand and takes them back for
//! reuse. Instances are created, destroyed, shown and re-parented through a
//! [`Host`], whose containers are of type `C`.

use std::any::type_name;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::config::PoolSettings;
use crate::error::{Error, Result};
use crate::hooks::{self, HookEvent, Poolable};
use crate::host::Host;
use crate::wait::{Occupancy, WaitForFree};

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// A tracked instance and its busy flag.
///
/// Keeping the flag on the slot means an instance that leaves tracking can
/// never stay marked busy.
struct Slot<T> {
    instance: T,
    busy: bool,
}

impl<T> Slot<T> {
    fn free(instance: T) -> Self {
        Self {
            instance,
            busy: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Pool<T, C>
// ---------------------------------------------------------------------------

/// Pool of reusable `T` instances.
///
/// Holds up to [`count`](Self::count) instances (`0` means unbounded), all
/// cloned from [`source`](Self::source). Every tracked instance is either
/// free or busy; [`get`](Self::get) moves the first free one (in creation
/// order) to busy, creating a new one when none is free and capacity allows,
/// and [`take`](Self::take) moves it back.
///
/// The pool is single-threaded: it is driven from the host's frame loop and
/// does no locking.
pub struct Pool<T, C> {
    source: T,
    count: usize,
    container: Option<C>,
    slots: Vec<Slot<T>>,
    occupancy: Rc<Occupancy>,
    host: Box<dyn Host<T, Container = C>>,
}

impl<T, C: fmt::Debug> fmt::Debug for Pool<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("element", &type_name::<T>())
            .field("count", &self.count)
            .field("container", &self.container)
            .field("tracked", &self.slots.len())
            .field("busy", &self.slots.iter().filter(|slot| slot.busy).count())
            .finish_non_exhaustive()
    }
}

impl<T: Poolable, C: Clone + fmt::Debug + 'static> Pool<T, C> {
    /// Create an empty, unbounded pool without a container.
    pub fn new<H>(source: T, host: H) -> Self
    where
        H: Host<T, Container = C> + 'static,
    {
        Self {
            source,
            count: 0,
            container: None,
            slots: Vec::new(),
            occupancy: Rc::new(Occupancy::default()),
            host: Box::new(host),
        }
    }

    /// Create a pool from registry settings, pre-populating it when the
    /// settings ask for it.
    pub fn from_settings<H>(
        source: T,
        host: H,
        settings: &PoolSettings,
        container: Option<C>,
    ) -> Self
    where
        H: Host<T, Container = C> + 'static,
    {
        let mut pool = Self::new(source, host)
            .with_count(settings.count)
            .with_container(container);
        if settings.non_lazy {
            pool.non_lazy();
        }
        pool
    }

    /// Builder form of [`set_count`](Self::set_count).
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.set_count(count, true);
        self
    }

    /// Builder form of [`set_container`](Self::set_container).
    #[must_use]
    pub fn with_container(mut self, container: Option<C>) -> Self {
        self.set_container(container, true);
        self
    }

    /// Prototype new instances are cloned from.
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Maximum number of instances, `0` when unbounded.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Container new and returned instances are attached to.
    pub fn container(&self) -> Option<&C> {
        self.container.as_ref()
    }

    /// Number of tracked instances, free and busy.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the pool tracks no instances.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of instances currently handed out.
    pub fn busy_len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.busy).count()
    }

    /// Number of tracked instances ready to be handed out.
    pub fn free_len(&self) -> usize {
        self.len() - self.busy_len()
    }

    /// Whether a bounded pool tracks as many instances as it may hold.
    pub fn is_full(&self) -> bool {
        self.count != 0 && self.slots.len() >= self.count
    }

    /// Whether `instance` is tracked by this pool.
    pub fn contains(&self, instance: &T) -> bool {
        self.slots.iter().any(|slot| slot.instance == *instance)
    }

    /// Whether `instance` is tracked and currently handed out.
    pub fn is_busy(&self, instance: &T) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.busy && slot.instance == *instance)
    }

    /// Tracked instances in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter().map(|slot| &slot.instance)
    }

    /// Change the capacity.
    ///
    /// - `0` switches to unbounded mode; nothing is removed.
    /// - Growing a bounded pool only raises the limit.
    /// - Anything else truncates the tracked instances to `count` by creation
    ///   order. Truncated instances leave the pool even when busy; with
    ///   `destroy_clones` they are destroyed, otherwise they stay alive and
    ///   are no longer controlled by the pool.
    pub fn set_count(&mut self, count: usize, destroy_clones: bool) -> &mut Self {
        if count == 0 {
            self.count = 0;
            debug!(element = type_name::<T>(), "Pool is now unbounded");
            return self;
        }

        if self.count != 0 && count > self.count {
            self.count = count;
            self.slots.reserve(count - self.slots.len());
            debug!(element = type_name::<T>(), count, "Pool capacity raised");
            return self;
        }

        if count < self.slots.len() {
            let truncated = self.slots.split_off(count);
            if destroy_clones {
                for slot in &truncated {
                    self.host.destroy(&slot.instance);
                }
            }
            debug!(
                element = type_name::<T>(),
                count,
                truncated = truncated.len(),
                busy = truncated.iter().filter(|slot| slot.busy).count(),
                destroyed = destroy_clones,
                "Pool shrunk"
            );
        }

        self.count = count;
        self.publish();
        self
    }

    /// Replace the container and re-parent every tracked instance into it.
    pub fn set_container(&mut self, container: Option<C>, world_position_stays: bool) -> &mut Self {
        self.container = container;
        for slot in &self.slots {
            self.host
                .reparent(&slot.instance, self.container.as_ref(), world_position_stays);
        }
        self
    }

    /// Stop tracking every instance.
    ///
    /// With `destroy_clones`, instances the host still reports alive are
    /// destroyed; otherwise they stay alive and are no longer controlled by
    /// the pool. Busy state goes away with the instances.
    pub fn clear(&mut self, destroy_clones: bool) -> &mut Self {
        if destroy_clones {
            for slot in &self.slots {
                if self.host.is_alive(&slot.instance) {
                    self.host.destroy(&slot.instance);
                }
            }
        }

        if !self.slots.is_empty() {
            debug!(
                element = type_name::<T>(),
                cleared = self.slots.len(),
                destroyed = destroy_clones,
                "Pool cleared"
            );
        }
        self.slots.clear();
        self.publish();
        self
    }

    /// Instantiate instances until the pool is at capacity.
    ///
    /// Does nothing for unbounded pools. Eagerly created instances are
    /// deactivated and do not receive
    /// [`on_created_in_pool`](crate::PoolObject::on_created_in_pool).
    pub fn non_lazy(&mut self) -> &mut Self {
        let before = self.slots.len();
        while self.slots.len() < self.count {
            let instance = self.host.instantiate(&self.source, self.container.as_ref());
            self.host.set_active(&instance, false);
            self.slots.push(Slot::free(instance));
        }

        if self.slots.len() > before {
            debug!(
                element = type_name::<T>(),
                created = self.slots.len() - before,
                "Pool pre-populated"
            );
        }
        self.publish();
        self
    }

    /// Hand out a free instance.
    ///
    /// Picks the first free instance in creation order. When none is free, a
    /// new instance is created from the source unless the pool is bounded and
    /// full, in which case `None` is returned. The instance is activated and
    /// receives [`on_getting_from_pool`](crate::PoolObject::on_getting_from_pool)
    /// before it is returned.
    ///
    /// Give it back with [`take`](Self::take).
    pub fn get(&mut self) -> Option<T> {
        let index = match self.slots.iter().position(|slot| !slot.busy) {
            Some(index) => index,
            None => {
                if self.is_full() {
                    debug!(
                        element = type_name::<T>(),
                        count = self.count,
                        "Pool exhausted"
                    );
                    return None;
                }

                let mut instance =
                    self.host.instantiate(&self.source, self.container.as_ref());
                hooks::dispatch(&mut instance, HookEvent::Created);
                self.slots.push(Slot::free(instance));
                debug!(
                    element = type_name::<T>(),
                    tracked = self.slots.len(),
                    "Created pool instance"
                );
                self.slots.len() - 1
            }
        };

        let slot = &mut self.slots[index];
        slot.busy = true;
        self.host.set_active(&slot.instance, true);
        hooks::dispatch(&mut slot.instance, HookEvent::Getting);
        let instance = slot.instance.clone();

        self.publish();
        trace!(element = type_name::<T>(), slot = index, "Got pool instance");
        Some(instance)
    }

    /// Mark `clone` as free.
    ///
    /// An instance the pool does not track yet is adopted: it is re-parented
    /// into the container and tracked as free. Either way it is deactivated.
    ///
    /// # Errors
    /// [`Error::PoolFull`] when adopting into a bounded pool that is full,
    /// [`Error::AlreadyFree`] when a tracked instance is returned twice.
    pub fn take(&mut self, clone: T) -> Result<()> {
        match self.slots.iter().position(|slot| slot.instance == clone) {
            None => {
                if self.is_full() {
                    warn!(
                        element = type_name::<T>(),
                        count = self.count,
                        "Rejected instance, pool is full"
                    );
                    return Err(Error::PoolFull {
                        element: type_name::<T>(),
                        capacity: self.count,
                    });
                }

                self.host.reparent(&clone, self.container.as_ref(), true);
                self.host.set_active(&clone, false);
                self.slots.push(Slot::free(clone));
                debug!(
                    element = type_name::<T>(),
                    tracked = self.slots.len(),
                    "Adopted instance"
                );
            }
            Some(index) => {
                let slot = &mut self.slots[index];
                if !slot.busy {
                    warn!(
                        element = type_name::<T>(),
                        slot = index,
                        "Instance returned while already free"
                    );
                    return Err(Error::AlreadyFree {
                        element: type_name::<T>(),
                    });
                }

                slot.busy = false;
                self.host.set_active(&slot.instance, false);
                trace!(element = type_name::<T>(), slot = index, "Took pool instance");
            }
        }

        self.publish();
        Ok(())
    }

    /// Waiter that stays blocked while every tracked instance is busy.
    ///
    /// See [`WaitForFree`] for the race between readiness and the next
    /// [`get`](Self::get).
    pub fn wait_for_free_object(&self) -> WaitForFree {
        WaitForFree::new(Rc::clone(&self.occupancy))
    }

    fn publish(&self) {
        self.occupancy.update(self.slots.len(), self.busy_len());
    }
}
