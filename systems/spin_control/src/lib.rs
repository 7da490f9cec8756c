#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that maps the single spin button onto spin commands.

use lucky_wheel_core::{Command, Event, SpinPhase};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpinButtonInput {
    /// Indicates whether the player pressed the spin button on this frame.
    pub pressed: bool,
}

impl SpinButtonInput {
    /// Creates a new input descriptor with an explicit press state.
    #[must_use]
    pub const fn new(pressed: bool) -> Self {
        Self { pressed }
    }
}

/// Caption the view should show on the spin button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinButtonLabel {
    /// Pressing starts a spin.
    Start,
    /// Pressing begins the deceleration.
    Stop,
    /// The wheel is slowing down and the button does nothing.
    Stopping,
}

impl SpinButtonLabel {
    /// Human-readable caption.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Stop => "Stop",
            Self::Stopping => "Stopping...",
        }
    }
}

/// Spin button system that toggles between starting and stopping the wheel.
#[derive(Debug, Clone, Default)]
pub struct SpinControl {
    phase: SpinPhase,
}

impl SpinControl {
    /// Creates a new spin control system that assumes the wheel is idle.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: SpinPhase::Idle,
        }
    }

    /// Consumes world events and the button state to emit spin commands.
    ///
    /// A press while idle starts a spin and a press while spinning requests a
    /// stop. Presses during deceleration are ignored.
    pub fn handle(&mut self, events: &[Event], input: SpinButtonInput, out: &mut Vec<Command>) {
        self.observe(events);

        if !input.pressed {
            return;
        }

        match self.phase {
            SpinPhase::Idle => out.push(Command::StartSpin),
            SpinPhase::Spinning => out.push(Command::RequestStop),
            SpinPhase::Decelerating => {}
        }
    }

    /// Tracks phase changes without reading any button input.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            if let Event::SpinPhaseChanged { phase } = event {
                self.phase = *phase;
            }
        }
    }

    /// Phase last observed through world events.
    #[must_use]
    pub const fn phase(&self) -> SpinPhase {
        self.phase
    }

    /// Caption matching the observed phase.
    #[must_use]
    pub const fn label(&self) -> SpinButtonLabel {
        match self.phase {
            SpinPhase::Idle => SpinButtonLabel::Start,
            SpinPhase::Spinning => SpinButtonLabel::Stop,
            SpinPhase::Decelerating => SpinButtonLabel::Stopping,
        }
    }
}
