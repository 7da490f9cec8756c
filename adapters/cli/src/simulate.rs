//! Headless spins driven by a fixed frame interval.

use std::time::Duration;

use anyhow::{bail, Result};
use lucky_wheel_core::{Command, Event, ItemSnapshot, SpinPhase};
use lucky_wheel_world::{self as world, query, World};
use tracing::debug;

/// Timing of a headless spin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SimulationPlan {
    /// Time between the start of the spin and the stop request.
    pub spin: Duration,
    /// Interval between two ticks.
    pub frame: Duration,
}

/// Outcome of a headless spin.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SimulationReport {
    /// Item under the pointer once the wheel settled.
    pub winner: Option<ItemSnapshot>,
    /// Number of ticks issued after the spin started.
    pub ticks: u64,
    /// Timestamp of the tick that settled the wheel.
    pub settled_at: Duration,
}

/// Spins the wheel, requests a stop after `plan.spin` and ticks until it settles.
pub(crate) fn run(world: &mut World, plan: SimulationPlan) -> Result<SimulationReport> {
    if plan.frame.is_zero() {
        bail!("the frame interval must be positive");
    }

    let mut events = Vec::new();
    world::apply(world, Command::StartSpin, &mut events);
    world::apply(world, Command::Advance { now: Duration::ZERO }, &mut events);
    if let Some(reason) = events.iter().find_map(|event| match event {
        Event::SpinRejected { reason } => Some(*reason),
        _ => None,
    }) {
        bail!("cannot start the spin: {reason}");
    }

    let mut now = Duration::ZERO;
    let mut ticks = 0_u64;
    loop {
        now += plan.frame;
        ticks += 1;

        events.clear();
        if now >= plan.spin && query::spin_phase(world) == SpinPhase::Spinning {
            debug!(at_ms = now.as_millis() as u64, "requesting stop");
            world::apply(world, Command::RequestStop, &mut events);
        }
        world::apply(world, Command::Advance { now }, &mut events);

        let settled = events.iter().find_map(|event| match event {
            Event::SpinSettled { winner } => Some(*winner),
            _ => None,
        });
        if let Some(winner) = settled {
            return Ok(SimulationReport {
                winner: winner.and_then(|id| query::item(world, id)),
                ticks,
                settled_at: now,
            });
        }
    }
}

/// Probability table rows as `(ordinal, item, probability)`.
pub(crate) fn probability_table(world: &World) -> Vec<(usize, ItemSnapshot, f64)> {
    query::items(world)
        .into_vec()
        .into_iter()
        .enumerate()
        .map(|(row, item)| {
            let probability = query::probability(world, item.id).unwrap_or(0.0);
            (row + 1, item, probability)
        })
        .collect()
}
