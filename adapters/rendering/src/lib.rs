#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Lucky Wheel adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use lucky_wheel_core::{ItemId, ItemView, Sector, SpinPhase, FULL_TURN, POINTER_ANGLE};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::{collections::HashMap, time::Duration};

/// Saturation applied to generated item colours.
pub const ITEM_SATURATION: f32 = 0.7;
/// Lightness applied to generated item colours.
pub const ITEM_LIGHTNESS: f32 = 0.7;
/// Distance of sector labels from the wheel centre, relative to the radius.
pub const LABEL_RADIUS_RATIO: f32 = 0.65;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Creates an opaque color from hue (degrees), saturation and lightness.
    #[must_use]
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let hue = hue.rem_euclid(360.0) / 60.0;
        let saturation = saturation.clamp(0.0, 1.0);
        let lightness = lightness.clamp(0.0, 1.0);

        let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let secondary = chroma * (1.0 - (hue % 2.0 - 1.0).abs());
        let (red, green, blue) = match hue as u32 {
            0 => (chroma, secondary, 0.0),
            1 => (secondary, chroma, 0.0),
            2 => (0.0, chroma, secondary),
            3 => (0.0, secondary, chroma),
            4 => (secondary, 0.0, chroma),
            _ => (chroma, 0.0, secondary),
        };
        let offset = lightness - chroma / 2.0;

        Self::new(red + offset, green + offset, blue + offset, 1.0)
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Assigns each item a random pastel colour that stays stable for its lifetime.
#[derive(Debug)]
pub struct Palette {
    rng: ChaCha8Rng,
    colors: HashMap<ItemId, Color>,
}

impl Palette {
    /// Creates a palette whose hue sequence is fixed by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            colors: HashMap::new(),
        }
    }

    /// Colour of the item, drawing a fresh hue on first use.
    pub fn color_for(&mut self, item: ItemId) -> Color {
        let rng = &mut self.rng;
        *self.colors.entry(item).or_insert_with(|| {
            let hue = rng.gen_range(0..360_u32);
            Color::from_hsl(hue as f32, ITEM_SATURATION, ITEM_LIGHTNESS)
        })
    }

    /// Forgets colours of items that are no longer on the wheel.
    pub fn retain(&mut self, items: &ItemView) {
        self.colors
            .retain(|id, _| items.iter().any(|item| item.id == *id));
    }

    /// Number of items with an assigned colour.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Reports whether no colours have been assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Angular span of one item on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectorSpan {
    /// Item drawn in the span.
    pub item: ItemId,
    /// Screen angle at which the sector starts, in radians.
    pub start_angle: f32,
    /// Screen angle at which the sector ends, in radians.
    pub end_angle: f32,
}

impl SectorSpan {
    /// Unit vector pointing at the middle of the sector.
    #[must_use]
    pub fn bisector(&self) -> Vec2 {
        let middle = (self.start_angle + self.end_angle) / 2.0;
        Vec2::new(middle.cos(), middle.sin())
    }

    /// Reports whether the screen angle falls within the sector.
    #[must_use]
    pub fn contains(&self, angle: f32) -> bool {
        let turn = FULL_TURN as f32;
        let offset = (angle - self.start_angle).rem_euclid(turn);
        offset < self.end_angle - self.start_angle
    }
}

/// Places the world's sectors on screen, rotated by the current wheel `angle`.
#[must_use]
pub fn sector_spans(sectors: &[Sector], angle: f64) -> Vec<SectorSpan> {
    sectors
        .iter()
        .map(|sector| SectorSpan {
            item: sector.item,
            start_angle: (angle + sector.start_fraction * FULL_TURN) as f32,
            end_angle: (angle + sector.end_fraction() * FULL_TURN) as f32,
        })
        .collect()
}

/// Sector ready to be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct SectorPresentation {
    /// Geometry of the sector.
    pub span: SectorSpan,
    /// Text drawn inside the sector.
    pub label: String,
    /// Fill colour.
    pub color: Color,
}

impl SectorPresentation {
    /// Position of the label relative to the wheel centre for `radius`.
    #[must_use]
    pub fn label_anchor(&self, radius: f32) -> Vec2 {
        self.span.bisector() * radius * LABEL_RADIUS_RATIO
    }
}

/// One line of the menu list.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuRowPresentation {
    /// One-based ordinal shown before the name.
    pub ordinal: usize,
    /// Item shown on the row.
    pub item: ItemId,
    /// Item name.
    pub name: String,
    /// Item weight.
    pub weight: u32,
    /// Chance of winning, already formatted.
    pub chance: String,
    /// Colour swatch matching the sector.
    pub color: Color,
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct WheelScene {
    /// Sectors in wheel order; empty when the wheel has no items.
    pub sectors: Vec<SectorPresentation>,
    /// Screen angle of the pointer.
    pub pointer_angle: f32,
    /// Rows of the menu list.
    pub rows: Vec<MenuRowPresentation>,
    /// Name of the item under the pointer.
    pub result: Option<String>,
    /// Current spin phase.
    pub phase: SpinPhase,
    /// Caption of the spin button.
    pub spin_button_label: String,
    /// Feedback shown under the add form after a rejected submission.
    pub feedback: Option<String>,
}

impl WheelScene {
    /// Creates an empty scene for a wheel without items.
    #[must_use]
    pub fn new(spin_button_label: impl Into<String>) -> Self {
        Self {
            sectors: Vec::new(),
            pointer_angle: POINTER_ANGLE as f32,
            rows: Vec::new(),
            result: None,
            phase: SpinPhase::Idle,
            spin_button_label: spin_button_label.into(),
            feedback: None,
        }
    }

    /// Reports whether the wheel placeholder should be drawn instead of sectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// Text shown in the result box.
    #[must_use]
    pub fn result_text(&self) -> String {
        match &self.result {
            Some(name) => format!("Winner: {name}"),
            None => "Winner: none".to_owned(),
        }
    }
}

/// Action attached to a menu row button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowButton {
    /// The ▲ button.
    Increase,
    /// The ▼ button.
    Decrease,
    /// The delete button.
    Remove,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Whether the spin button (or its shortcut) was pressed on this frame.
    pub spin_pressed: bool,
    /// Row button pressed on this frame, as `(row, button)`.
    pub row_button: Option<(usize, RowButton)>,
    /// Add form submitted on this frame, as raw `(name, count)` text.
    pub submitted: Option<(String, String)>,
}

/// Describes the data required to present a wheel.
#[derive(Clone, Debug)]
pub struct Presentation {
    /// Title used for the window.
    pub window_title: String,
    /// Colour used to clear the frame.
    pub clear_color: Color,
    /// Initial scene.
    pub scene: WheelScene,
}

impl Presentation {
    /// Creates a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: WheelScene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting a wheel.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the host timestamp of the
    /// frame, per-frame input captured by the adapter, and rebuilds the scene
    /// before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut WheelScene) + 'static;
}
