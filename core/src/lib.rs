#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lucky Wheel engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that systems and
//! views react to. Views never mutate state directly; they read immutable
//! snapshots such as [`ItemSnapshot`] and [`SpinSnapshot`].

use std::{f64::consts::PI, time::Duration};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Lucky Wheel.";

/// Angular velocity applied when a spin starts, in radians per millisecond.
pub const INITIAL_ANGULAR_VELOCITY: f64 = 0.05;

/// Viscous friction coefficient applied during deceleration, per second.
pub const DAMPING_PER_SECOND: f64 = 0.24;

/// Time after which a decelerating wheel is forced to rest.
pub const DECELERATION_DURATION: Duration = Duration::from_millis(12_500);

/// One full revolution of the wheel in radians.
pub const FULL_TURN: f64 = 2.0 * PI;

/// Angle of the fixed pointer.
///
/// Angles follow the canvas convention: zero points at 3 o'clock and angles
/// grow clockwise, so `3π/2` is 12 o'clock.
pub const POINTER_ANGLE: f64 = 3.0 * PI / 2.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Appends a new weighted item to the end of the wheel.
    AddItem {
        /// Display name of the item. Surrounding whitespace is discarded.
        name: String,
        /// Relative weight of the item; must be at least one.
        weight: u32,
    },
    /// Changes the weight of an existing item by a signed amount.
    ///
    /// Items whose weight would fall below one are removed.
    AdjustWeight {
        /// Identifier of the item to adjust.
        item: ItemId,
        /// Signed change applied to the current weight.
        delta: i64,
    },
    /// Removes an item regardless of its weight.
    RemoveItem {
        /// Identifier of the item to remove.
        item: ItemId,
    },
    /// Starts spinning the wheel at the initial angular velocity.
    StartSpin,
    /// Asks a spinning wheel to begin decelerating.
    RequestStop,
    /// Advances the spin simulation to the provided host timestamp.
    Advance {
        /// Monotonic host timestamp measured from an arbitrary epoch.
        now: Duration,
    },
}

impl Command {
    /// Convenience constructor for a `+1` weight adjustment.
    #[must_use]
    pub const fn increase_weight(item: ItemId) -> Self {
        Self::AdjustWeight { item, delta: 1 }
    }

    /// Convenience constructor for a `-1` weight adjustment.
    #[must_use]
    pub const fn decrease_weight(item: ItemId) -> Self {
        Self::AdjustWeight { item, delta: -1 }
    }
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that an item was appended to the wheel.
    ItemAdded {
        /// Identifier allocated to the item.
        item: ItemId,
        /// Normalised name stored for the item.
        name: String,
        /// Weight assigned to the item.
        weight: u32,
    },
    /// Confirms that an item's weight changed in place.
    ItemWeightChanged {
        /// Identifier of the adjusted item.
        item: ItemId,
        /// Weight after the adjustment.
        weight: u32,
    },
    /// Confirms that an item left the wheel.
    ItemRemoved {
        /// Identifier of the removed item.
        item: ItemId,
    },
    /// Reports that an item command was rejected and state is unchanged.
    ItemRejected {
        /// Specific reason the command failed.
        reason: ItemError,
    },
    /// Announces that the spin lifecycle entered a new phase.
    SpinPhaseChanged {
        /// Phase that became active.
        phase: SpinPhase,
    },
    /// Reports that a spin command was rejected and state is unchanged.
    SpinRejected {
        /// Specific reason the command failed.
        reason: SpinError,
    },
    /// Indicates that the wheel rotated during a tick.
    WheelAdvanced {
        /// Wheel angle in radians after the tick, within `[0, 2π)`.
        angle: f64,
    },
    /// Announces that a different item (or none) now sits under the pointer.
    WinnerChanged {
        /// Item under the pointer, if the wheel has any items.
        winner: Option<ItemId>,
    },
    /// Announces that a deceleration finished and the wheel came to rest.
    SpinSettled {
        /// Item under the pointer when the wheel stopped.
        winner: Option<ItemId>,
    },
}

/// Unique identifier assigned to a wheel item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable representation of a single item used for queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    /// Identifier allocated to the item.
    pub id: ItemId,
    /// Display name of the item.
    pub name: String,
    /// Relative weight, never below one.
    pub weight: u32,
}

/// Read-only snapshot of all items in wheel order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemView {
    snapshots: Vec<ItemSnapshot>,
}

impl ItemView {
    /// Creates a new item view from snapshots already in wheel order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<ItemSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured items in wheel order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemSnapshot> {
        self.snapshots.iter()
    }

    /// Item displayed at the provided zero-based row, if any.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&ItemSnapshot> {
        self.snapshots.get(row)
    }

    /// Number of items captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Sum of all captured weights.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.snapshots
            .iter()
            .map(|snapshot| u64::from(snapshot.weight))
            .sum()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ItemSnapshot> {
        self.snapshots
    }
}

/// Angular extent of one item expressed as fractions of a full turn.
///
/// Fractions are relative to the wheel's own zero angle, so views add the
/// current wheel angle to place the sector on screen.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    /// Item that owns the sector.
    pub item: ItemId,
    /// Fraction of the turn at which the sector begins.
    pub start_fraction: f64,
    /// Fraction of the turn covered by the sector.
    pub sweep_fraction: f64,
}

impl Sector {
    /// Fraction of the turn at which the sector ends.
    #[must_use]
    pub fn end_fraction(&self) -> f64 {
        self.start_fraction + self.sweep_fraction
    }
}

/// Lifecycle phase of a spin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpinPhase {
    /// The wheel is at rest.
    #[default]
    Idle,
    /// The wheel turns at constant angular velocity.
    Spinning,
    /// The wheel slows down under exponential friction.
    Decelerating,
}

/// Immutable copy of the rotational state published to views.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpinSnapshot {
    /// Current lifecycle phase.
    pub phase: SpinPhase,
    /// Wheel angle in radians within `[0, 2π)`.
    pub angle: f64,
    /// Angular velocity in radians per millisecond.
    pub angular_velocity: f64,
    /// Timestamp latched by the first tick of the current deceleration.
    pub deceleration_started_at: Option<Duration>,
    /// Timestamp of the most recent tick while the wheel was moving.
    pub last_tick: Option<Duration>,
}

/// Reasons an item command may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum ItemError {
    /// The name was blank or the weight was not a positive integer.
    #[error("item needs a non-blank name and a weight of at least one")]
    InvalidItem,
    /// No item with the provided identifier exists.
    #[error("no item with the requested id")]
    NotFound,
    /// The operation needs at least one item.
    #[error("the wheel has no items")]
    EmptySet,
    /// A probability was requested while the total weight is zero.
    #[error("probability is undefined for an empty wheel")]
    DivisionUndefined,
}

/// Reasons a spin command may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum SpinError {
    /// A spin was requested while the wheel has no items.
    #[error("cannot spin a wheel without items")]
    NoItems,
    /// A spin was requested while the wheel is already moving.
    #[error("the wheel is already spinning")]
    AlreadySpinning,
    /// A stop was requested while the wheel is at rest.
    #[error("the wheel is not spinning")]
    NotSpinning,
}

/// Wraps an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_TURN);
    // rem_euclid can round up to exactly 2π for tiny negative inputs.
    if wrapped >= FULL_TURN {
        0.0
    } else {
        wrapped
    }
}

/// Converts a wheel rotation into the fraction of the sector layout that sits
/// under the pointer.
///
/// Sectors are laid out from the wheel angle in increasing-angle order, so the
/// pointer reads the layout at `pointer - angle`.
#[must_use]
pub fn pointer_fraction(angle: f64) -> f64 {
    let relative = (FULL_TURN - angle + POINTER_ANGLE).rem_euclid(FULL_TURN);
    let fraction = relative / FULL_TURN;
    if fraction >= 1.0 {
        0.0
    } else {
        fraction
    }
}
