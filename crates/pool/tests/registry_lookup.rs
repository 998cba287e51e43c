//! Registry tests: declaration-order, type and name lookups across pools of
//! different element types, plus registration-time validation.

use std::cell::Cell;
use std::rc::Rc;

use nebula_pool::testing::{Probe, RecordingHost};
use nebula_pool::{Error, Host, PoolObject, PoolRegistry, PoolSettings, Poolable};
use pretty_assertions::assert_eq;

// ---------------------------------------------------------------------------
// A second element type with its own host
// ---------------------------------------------------------------------------

/// Particle handle; `charge` is reset on every reuse.
#[derive(Debug, Clone)]
struct Spark {
    charge: Rc<Cell<u32>>,
}

impl Spark {
    fn new() -> Self {
        Self {
            charge: Rc::new(Cell::new(0)),
        }
    }
}

impl PartialEq for Spark {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.charge, &other.charge)
    }
}

impl PoolObject for Spark {
    fn on_created_in_pool(&mut self) {}

    fn on_getting_from_pool(&mut self) {
        self.charge.set(100);
    }
}

impl Poolable for Spark {
    fn as_pool_object(&mut self) -> Option<&mut dyn PoolObject> {
        Some(self)
    }
}

#[derive(Default)]
struct SparkHost {
    created: Rc<Cell<usize>>,
}

impl Host<Spark> for SparkHost {
    type Container = String;

    fn instantiate(&mut self, _source: &Spark, _container: Option<&String>) -> Spark {
        self.created.set(self.created.get() + 1);
        Spark::new()
    }

    fn destroy(&mut self, _instance: &Spark) {}

    fn set_active(&mut self, _instance: &Spark, _active: bool) {}

    fn reparent(&mut self, _instance: &Spark, _container: Option<&String>, _stays: bool) {}
}

fn registry() -> (PoolRegistry<String>, RecordingHost, Rc<Cell<usize>>) {
    let host = RecordingHost::new();
    let spark_host = SparkHost::default();
    let sparks_created = Rc::clone(&spark_host.created);

    let registry = PoolRegistry::builder()
        .register(
            PoolSettings::new("enemies").with_count(2).non_lazy(),
            host.prototype(),
            host.clone(),
            Some("enemies-root".to_string()),
        )
        .register(
            PoolSettings::new("sparks").with_count(8),
            Spark::new(),
            spark_host,
            None,
        )
        .register(
            PoolSettings::new("bosses").with_count(1),
            host.prototype(),
            host.clone(),
            None,
        )
        .build()
        .unwrap();

    (registry, host, sparks_created)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn names_follow_declaration_order() {
    let (registry, _host, _sparks) = registry();
    assert_eq!(registry.len(), 3);
    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["enemies", "sparks", "bosses"]
    );
}

#[test]
fn non_lazy_entries_are_populated_at_build() {
    let (mut registry, host, sparks) = registry();
    assert_eq!(host.instantiated().len(), 2);
    assert_eq!(sparks.get(), 0);
    assert_eq!(registry.pool::<Probe>(0).unwrap().free_len(), 2);
}

#[test]
fn type_lookup_returns_first_matching_pool() {
    let (mut registry, _host, _sparks) = registry();
    let enemy = registry.get_from_pool_of::<Probe>().unwrap().unwrap();
    assert_eq!(enemy.parent().as_deref(), Some("enemies-root"));
    assert_eq!(registry.pool_named::<Probe>("enemies").unwrap().busy_len(), 1);
    assert_eq!(registry.pool_named::<Probe>("bosses").unwrap().busy_len(), 0);

    registry.take_to_pool_of(enemy).unwrap();
    assert_eq!(registry.pool_of::<Probe>().unwrap().busy_len(), 0);
}

#[test]
fn name_lookup_reaches_later_pools_of_the_same_type() {
    let (mut registry, _host, _sparks) = registry();
    let boss = registry.get_from_pool_named::<Probe>("bosses").unwrap().unwrap();
    assert!(registry.get_from_pool_named::<Probe>("bosses").unwrap().is_none());

    registry.take_to_pool_named("bosses", boss).unwrap();
    assert!(registry.get_from_pool::<Probe>(2).unwrap().is_some());
}

#[test]
fn hooks_fire_through_forwarders() {
    let (mut registry, _host, sparks) = registry();
    let spark = registry.get_from_pool_of::<Spark>().unwrap().unwrap();
    assert_eq!(spark.charge.get(), 100);
    assert_eq!(sparks.get(), 1);

    spark.charge.set(3);
    registry.take_to_pool::<Spark>(1, spark.clone()).unwrap();
    let again = registry.get_from_pool_named::<Spark>("sparks").unwrap().unwrap();
    assert_eq!(again, spark);
    assert_eq!(again.charge.get(), 100);
}

#[test]
fn wrong_element_type_is_a_type_mismatch() {
    let (mut registry, _host, _sparks) = registry();
    let err = registry.pool::<Spark>(0).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));

    let err = registry
        .take_to_pool_named("sparks", RecordingHost::new().spawn())
        .unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn erased_lookup_exposes_facade() {
    let (mut registry, _host, _sparks) = registry();
    let sparks = registry.get_named("sparks").unwrap();
    assert_eq!(sparks.count(), 8);
    assert!(sparks.element_type_name().ends_with("Spark"));

    sparks.set_count(2, true).non_lazy();
    assert_eq!(registry.get(1).unwrap().len(), 2);
}

#[test]
fn errors_propagate_from_forwarders() {
    let (mut registry, host, _sparks) = registry();
    let err = registry
        .take_to_pool_named("bosses", host.spawn())
        .and_then(|()| registry.take_to_pool_named("bosses", host.spawn()))
        .unwrap_err();
    assert!(matches!(err, Error::PoolFull { capacity: 1, .. }));

    let err = registry.pool_named::<Probe>("missing").unwrap_err();
    assert_eq!(err.to_string(), "No pool registered for name \"missing\"");
}

#[test]
fn duplicate_names_are_a_configuration_conflict() {
    let host = RecordingHost::new();
    let err = PoolRegistry::builder()
        .register(PoolSettings::new("fx"), Spark::new(), SparkHost::default(), None)
        .register(PoolSettings::new("fx"), host.prototype(), host, None)
        .build()
        .unwrap_err();

    assert!(err.is_configuration());
    assert_eq!(
        err.to_string(),
        "Pool registry already contains pool with name \"fx\""
    );
}
