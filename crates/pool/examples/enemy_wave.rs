//! Enemy wave example
//!
//! A tiny frame loop spawning enemies from a registry pool. Enemies reset
//! their health when they come out of the pool; the spawner waits for a
//! free enemy when the wave is at capacity.
//!
//! Run with `RUST_LOG=debug` to see the pool's tracing output.

use std::cell::RefCell;
use std::rc::Rc;

use nebula_pool::{Host, PoolObject, PoolRegistry, PoolSettings, Poolable};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Alive,
    Died,
}

#[derive(Debug)]
struct EnemyState {
    name: String,
    health: i32,
    state: State,
    active: bool,
}

/// Handle to an enemy living in the scene.
#[derive(Debug, Clone)]
struct Enemy(Rc<RefCell<EnemyState>>);

impl PartialEq for Enemy {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PoolObject for Enemy {
    fn on_created_in_pool(&mut self) {
        tracing::info!(name = %self.0.borrow().name, "enemy created");
    }

    fn on_getting_from_pool(&mut self) {
        let mut enemy = self.0.borrow_mut();
        enemy.state = State::Alive;
        enemy.health = 100;
    }
}

impl Poolable for Enemy {
    fn as_pool_object(&mut self) -> Option<&mut dyn PoolObject> {
        Some(self)
    }
}

/// Minimal scene: counts spawned enemies and names them.
#[derive(Default)]
struct Scene {
    spawned: usize,
}

impl Host<Enemy> for Scene {
    type Container = &'static str;

    fn instantiate(&mut self, source: &Enemy, container: Option<&&'static str>) -> Enemy {
        self.spawned += 1;
        let source = source.0.borrow();
        Enemy(Rc::new(RefCell::new(EnemyState {
            name: format!(
                "{}/{}#{}",
                container.copied().unwrap_or("scene"),
                source.name,
                self.spawned
            ),
            health: source.health,
            state: source.state,
            active: true,
        })))
    }

    fn destroy(&mut self, instance: &Enemy) {
        tracing::info!(name = %instance.0.borrow().name, "enemy destroyed");
    }

    fn set_active(&mut self, instance: &Enemy, active: bool) {
        instance.0.borrow_mut().active = active;
    }

    fn reparent(&mut self, _instance: &Enemy, _container: Option<&&'static str>, _stays: bool) {}
}

fn main() -> nebula_pool::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let prefab = Enemy(Rc::new(RefCell::new(EnemyState {
        name: "grunt".into(),
        health: 0,
        state: State::Died,
        active: false,
    })));

    let mut pools = PoolRegistry::builder()
        .register(
            PoolSettings::new("grunts").with_count(3),
            prefab,
            Scene::default(),
            Some("wave-1"),
        )
        .build()?;

    let mut alive: Vec<Enemy> = Vec::new();
    let mut waiter = None;

    for tick in 0..10 {
        // Damage everything on screen; the dead go back to the pool.
        for enemy in &alive {
            let mut state = enemy.0.borrow_mut();
            state.health -= 40;
            if state.health <= 0 {
                state.state = State::Died;
            }
        }
        let (dead, living): (Vec<_>, Vec<_>) = alive
            .drain(..)
            .partition(|enemy| enemy.0.borrow().state == State::Died);
        alive = living;
        for enemy in dead {
            pools.take_to_pool_of(enemy)?;
        }

        // Spawn one enemy per tick, waiting while the wave is full.
        let still_waiting = waiter
            .as_ref()
            .is_some_and(nebula_pool::WaitForFree::keep_waiting);
        if still_waiting {
            println!("tick {tick}: waiting for a free grunt");
            continue;
        }
        waiter = None;

        match pools.get_from_pool_of::<Enemy>()? {
            Some(enemy) => {
                println!(
                    "tick {tick}: spawned {} with {} hp",
                    enemy.0.borrow().name,
                    enemy.0.borrow().health
                );
                alive.push(enemy);
            }
            None => waiter = Some(pools.pool_of::<Enemy>()?.wait_for_free_object()),
        }
    }

    let pool = pools.pool_of::<Enemy>()?;
    println!(
        "done: {} tracked, {} busy, {} active on screen",
        pool.len(),
        pool.busy_len(),
        alive.iter().filter(|enemy| enemy.0.borrow().active).count()
    );
    pool.clear(true);
    Ok(())
}
