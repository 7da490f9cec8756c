#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative wheel state management for Lucky Wheel.

mod items;
mod spin;

use lucky_wheel_core::{Command, Event, ItemId, SpinPhase, WELCOME_BANNER};
use tracing::debug;

pub use items::{Item, WeightAdjustment, WeightedItemSet};
pub use spin::{decelerated_velocity, SpinEngine, SpinTick};

/// Represents the authoritative Lucky Wheel state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    items: WeightedItemSet,
    engine: SpinEngine,
}

impl World {
    /// Creates an empty wheel at rest.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            items: WeightedItemSet::new(),
            engine: SpinEngine::new(),
        }
    }

    fn publish_winner(&mut self, previous: Option<ItemId>, out_events: &mut Vec<Event>) {
        let winner = self.engine.refresh_winner(&self.items);
        if winner != previous {
            out_events.push(Event::WinnerChanged { winner });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Rejected commands leave the world untouched and are reported through
/// [`Event::ItemRejected`] or [`Event::SpinRejected`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let previous_winner = world.engine.current_winner();
    match command {
        Command::AddItem { name, weight } => match world.items.add(&name, weight) {
            Ok(item) => {
                let name = world
                    .items
                    .get(item)
                    .map(|stored| stored.name().to_owned())
                    .unwrap_or(name);
                out_events.push(Event::ItemAdded { item, name, weight });
                world.publish_winner(previous_winner, out_events);
            }
            Err(reason) => {
                debug!(%reason, "item rejected");
                out_events.push(Event::ItemRejected { reason });
            }
        },
        Command::AdjustWeight { item, delta } => match world.items.adjust_weight(item, delta) {
            Ok(WeightAdjustment::Updated { weight }) => {
                out_events.push(Event::ItemWeightChanged { item, weight });
                world.publish_winner(previous_winner, out_events);
            }
            Ok(WeightAdjustment::Removed) => {
                out_events.push(Event::ItemRemoved { item });
                world.publish_winner(previous_winner, out_events);
            }
            Err(reason) => {
                debug!(%reason, item = item.get(), delta, "weight adjustment rejected");
                out_events.push(Event::ItemRejected { reason });
            }
        },
        Command::RemoveItem { item } => match world.items.remove(item) {
            Ok(_) => {
                out_events.push(Event::ItemRemoved { item });
                world.publish_winner(previous_winner, out_events);
            }
            Err(reason) => {
                debug!(%reason, item = item.get(), "removal rejected");
                out_events.push(Event::ItemRejected { reason });
            }
        },
        Command::StartSpin => match world.engine.start_spin(&world.items) {
            Ok(()) => {
                debug!("spin started");
                out_events.push(Event::SpinPhaseChanged {
                    phase: SpinPhase::Spinning,
                });
            }
            Err(reason) => {
                debug!(%reason, "spin rejected");
                out_events.push(Event::SpinRejected { reason });
            }
        },
        Command::RequestStop => match world.engine.request_stop() {
            Ok(true) => {
                debug!("deceleration requested");
                out_events.push(Event::SpinPhaseChanged {
                    phase: SpinPhase::Decelerating,
                });
            }
            Ok(false) => {}
            Err(reason) => {
                debug!(%reason, "stop rejected");
                out_events.push(Event::SpinRejected { reason });
            }
        },
        Command::Advance { now } => {
            let tick = world.engine.advance(now, &world.items);
            if tick == SpinTick::Idle {
                return;
            }

            out_events.push(Event::WheelAdvanced {
                angle: world.engine.current_angle(),
            });
            let winner = world.engine.current_winner();
            if winner != previous_winner {
                out_events.push(Event::WinnerChanged { winner });
            }
            if tick == SpinTick::Settled {
                debug!(winner = ?winner.map(|id| id.get()), "wheel settled");
                out_events.push(Event::SpinPhaseChanged {
                    phase: SpinPhase::Idle,
                });
                out_events.push(Event::SpinSettled { winner });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use lucky_wheel_core::{
        ItemError, ItemId, ItemSnapshot, ItemView, Sector, SpinPhase, SpinSnapshot,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Captures the items in wheel order.
    #[must_use]
    pub fn items(world: &World) -> ItemView {
        ItemView::from_snapshots(world.items.items().iter().map(|item| item.snapshot()).collect())
    }

    /// Captures a single item, if present.
    #[must_use]
    pub fn item(world: &World, id: ItemId) -> Option<ItemSnapshot> {
        world.items.get(id).map(|item| item.snapshot())
    }

    /// Sum of all item weights.
    #[must_use]
    pub fn total_weight(world: &World) -> u64 {
        world.items.total_weight()
    }

    /// Probability that the item wins.
    pub fn probability(world: &World, id: ItemId) -> Result<f64, ItemError> {
        world.items.probability(id)
    }

    /// Sector layout in wheel order, relative to the wheel's own zero angle.
    #[must_use]
    pub fn sectors(world: &World) -> Vec<Sector> {
        world.items.sectors()
    }

    /// Wheel angle in radians within `[0, 2π)`.
    #[must_use]
    pub fn current_angle(world: &World) -> f64 {
        world.engine.current_angle()
    }

    /// Current spin phase.
    #[must_use]
    pub fn spin_phase(world: &World) -> SpinPhase {
        world.engine.phase()
    }

    /// Immutable copy of the rotational state.
    #[must_use]
    pub fn spin_snapshot(world: &World) -> SpinSnapshot {
        world.engine.snapshot()
    }

    /// Item currently under the pointer.
    #[must_use]
    pub fn current_winner(world: &World) -> Option<ItemSnapshot> {
        world
            .engine
            .current_winner()
            .and_then(|id| world.items.get(id))
            .map(|item| item.snapshot())
    }
}
