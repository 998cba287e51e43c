//! Testing utilities: an in-memory host that records every call it receives,
//! and a probe element whose handles share state.
//!
//! ```
//! use nebula_pool::Pool;
//! use nebula_pool::testing::RecordingHost;
//!
//! let host = RecordingHost::new();
//! let mut pool = Pool::new(host.prototype(), host.clone()).with_count(1);
//! let probe = pool.get().unwrap();
//! assert_eq!(probe.getting_hooks(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::hooks::{PoolObject, Poolable};
use crate::host::Host;

/// A call observed by the [`RecordingHost`], or a hook observed on a [`Probe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `Host::instantiate` created probe `id`.
    Instantiated {
        /// New probe id
        id: u64,
        /// Container it was parented under
        container: Option<String>,
    },
    /// `Host::destroy` on probe `id`.
    Destroyed(u64),
    /// `Host::set_active` on probe `id`.
    SetActive {
        /// Probe id
        id: u64,
        /// New state
        active: bool,
    },
    /// `Host::reparent` on probe `id`.
    Reparented {
        /// Probe id
        id: u64,
        /// New container
        container: Option<String>,
        /// Whether world placement was preserved
        world_position_stays: bool,
    },
    /// `PoolObject::on_created_in_pool` on probe `id`.
    CreatedInPool(u64),
    /// `PoolObject::on_getting_from_pool` on probe `id`.
    GettingFromPool(u64),
}

type Journal = Rc<RefCell<Vec<Event>>>;

struct ProbeState {
    id: u64,
    hooks: bool,
    active: Cell<bool>,
    alive: Cell<bool>,
    parent: RefCell<Option<String>>,
    created_hooks: Cell<usize>,
    getting_hooks: Cell<usize>,
    journal: Journal,
}

/// Handle to a host object. Clones share state; equality is identity.
#[derive(Clone)]
pub struct Probe {
    state: Rc<ProbeState>,
}

impl Probe {
    fn new(id: u64, hooks: bool, parent: Option<String>, journal: Journal) -> Self {
        Self {
            state: Rc::new(ProbeState {
                id,
                hooks,
                active: Cell::new(true),
                alive: Cell::new(true),
                parent: RefCell::new(parent),
                created_hooks: Cell::new(0),
                getting_hooks: Cell::new(0),
                journal,
            }),
        }
    }

    /// Host-assigned id. Prototypes and spawned objects get ids too.
    pub fn id(&self) -> u64 {
        self.state.id
    }

    /// Whether the probe opts into the pool-object hooks.
    pub fn has_hooks(&self) -> bool {
        self.state.hooks
    }

    /// Current activation state.
    pub fn is_active(&self) -> bool {
        self.state.active.get()
    }

    /// `false` once destroyed.
    pub fn is_alive(&self) -> bool {
        self.state.alive.get()
    }

    /// Container the probe is attached to.
    pub fn parent(&self) -> Option<String> {
        self.state.parent.borrow().clone()
    }

    /// How many times `on_created_in_pool` ran on this probe.
    ///
    /// Counted on the probe itself, so draining the host journal does not
    /// reset it.
    pub fn created_hooks(&self) -> usize {
        self.state.created_hooks.get()
    }

    /// How many times `on_getting_from_pool` ran on this probe.
    pub fn getting_hooks(&self) -> usize {
        self.state.getting_hooks.get()
    }

    fn record(&self, event: Event) {
        self.state.journal.borrow_mut().push(event);
    }
}

impl PartialEq for Probe {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe")
            .field("id", &self.id())
            .field("active", &self.is_active())
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl PoolObject for Probe {
    fn on_created_in_pool(&mut self) {
        bump(&self.state.created_hooks);
        self.record(Event::CreatedInPool(self.id()));
    }

    fn on_getting_from_pool(&mut self) {
        bump(&self.state.getting_hooks);
        self.record(Event::GettingFromPool(self.id()));
    }
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

impl Poolable for Probe {
    fn as_pool_object(&mut self) -> Option<&mut dyn PoolObject> {
        if self.state.hooks { Some(self) } else { None }
    }
}

/// In-memory [`Host`] for [`Probe`]s using named string containers.
///
/// Clones share the journal and id counter, so a test can keep one clone
/// and move another into a pool.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    journal: Journal,
    next_id: Rc<Cell<u64>>,
}

impl RecordingHost {
    /// Create a host with an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A prototype whose clones implement the pool-object hooks.
    pub fn prototype(&self) -> Probe {
        Probe::new(self.allocate_id(), true, None, Rc::clone(&self.journal))
    }

    /// A prototype whose clones do not implement the pool-object hooks.
    pub fn plain_prototype(&self) -> Probe {
        Probe::new(self.allocate_id(), false, None, Rc::clone(&self.journal))
    }

    /// An active object created outside any pool.
    pub fn spawn(&self) -> Probe {
        self.prototype()
    }

    /// Destroy `probe` behind the pool's back. Not journaled.
    pub fn kill(&self, probe: &Probe) {
        probe.state.alive.set(false);
    }

    /// Everything recorded so far.
    pub fn events(&self) -> Vec<Event> {
        self.journal.borrow().clone()
    }

    /// Drain the journal.
    pub fn take_events(&self) -> Vec<Event> {
        std::mem::take(&mut *self.journal.borrow_mut())
    }

    /// Ids of probes created through [`Host::instantiate`], in order.
    pub fn instantiated(&self) -> Vec<u64> {
        self.journal
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Instantiated { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Ids of probes destroyed through [`Host::destroy`], in order.
    pub fn destroyed(&self) -> Vec<u64> {
        self.journal
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Destroyed(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    fn allocate_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn record(&self, event: Event) {
        self.journal.borrow_mut().push(event);
    }
}

impl Host<Probe> for RecordingHost {
    type Container = String;

    fn instantiate(&mut self, source: &Probe, container: Option<&String>) -> Probe {
        let id = self.allocate_id();
        let probe = Probe::new(
            id,
            source.has_hooks(),
            container.cloned(),
            Rc::clone(&self.journal),
        );
        probe.state.active.set(source.is_active());
        self.record(Event::Instantiated {
            id,
            container: container.cloned(),
        });
        probe
    }

    fn destroy(&mut self, instance: &Probe) {
        instance.state.alive.set(false);
        self.record(Event::Destroyed(instance.id()));
    }

    fn is_alive(&self, instance: &Probe) -> bool {
        instance.is_alive()
    }

    fn set_active(&mut self, instance: &Probe, active: bool) {
        instance.state.active.set(active);
        self.record(Event::SetActive {
            id: instance.id(),
            active,
        });
    }

    fn reparent(
        &mut self,
        instance: &Probe,
        container: Option<&String>,
        world_position_stays: bool,
    ) {
        *instance.state.parent.borrow_mut() = container.cloned();
        self.record(Event::Reparented {
            id: instance.id(),
            container: container.cloned(),
            world_position_stays,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probes_compare_by_identity() {
        let host = RecordingHost::new();
        let a = host.prototype();
        let b = host.prototype();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn host_records_lifecycle_calls() {
        let mut host = RecordingHost::new();
        let source = host.prototype();
        let clone = host.instantiate(&source, Some(&"root".to_string()));
        host.set_active(&clone, false);
        host.destroy(&clone);

        assert_eq!(clone.parent().as_deref(), Some("root"));
        assert!(!clone.is_alive());
        assert_eq!(host.instantiated(), vec![clone.id()]);
        assert_eq!(host.destroyed(), vec![clone.id()]);
    }

    #[test]
    fn plain_probes_have_no_capability() {
        let host = RecordingHost::new();
        let mut plain = host.plain_prototype();
        assert!(plain.as_pool_object().is_none());
        let mut hooked = host.prototype();
        assert!(hooked.as_pool_object().is_some());
    }

    #[test]
    fn hook_counts_survive_draining_the_journal() {
        let host = RecordingHost::new();
        let mut probe = host.prototype();
        probe.on_created_in_pool();
        probe.on_getting_from_pool();
        assert_eq!(host.take_events().len(), 2);

        probe.on_getting_from_pool();
        host.take_events();
        assert_eq!(probe.created_hooks(), 1);
        assert_eq!(probe.getting_hooks(), 2);
        assert!(host.events().is_empty());
    }
}
