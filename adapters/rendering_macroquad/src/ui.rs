//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use lucky_wheel_rendering::{RowButton, WheelScene};
use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};

/// Count the add form starts with and returns to after each submission.
const DEFAULT_COUNT: &str = "1";

/// Text held by the add form between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FormFields {
    name: String,
    count: String,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            count: DEFAULT_COUNT.to_owned(),
        }
    }
}

impl FormFields {
    fn submit(&mut self) -> (String, String) {
        let submitted = (self.name.clone(), self.count.clone());
        *self = Self::default();
        submitted
    }
}

/// Interactions captured while drawing the panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct PanelUiResult {
    /// Whether the spin button was pressed.
    pub spin_pressed: bool,
    /// Row button pressed, as `(row, button)`.
    pub row_button: Option<(usize, RowButton)>,
    /// Raw `(name, count)` of a submitted add form.
    pub submitted: Option<(String, String)>,
    /// Whether typing changed a form field, meaning the keyboard belonged to the form.
    pub text_edited: bool,
}

/// Snapshot of the panel's layout and data for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PanelUiContext<'a> {
    /// Top-left corner of the panel in screen coordinates.
    pub origin: Vec2,
    /// Panel dimensions in screen space.
    pub size: Vec2,
    /// Background colour applied to the window skin so the UI matches the
    /// adapter's solid rectangle.
    pub background: Color,
    /// Scene supplying rows, the button label and form feedback.
    pub scene: &'a WheelScene,
}

/// Renders the add form, the menu rows and the spin button.
pub(crate) fn draw_panel_ui(
    ui: &mut Ui,
    context: PanelUiContext<'_>,
    form: &mut FormFields,
) -> PanelUiResult {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .color_selected(Color::from_rgba(70, 70, 70, 255))
        .color_selected_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_inactive(Color::from_rgba(56, 56, 56, 200))
        .margin(RectOffset::new(4.0, 4.0, 4.0, 4.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let mut result = PanelUiResult::default();
    let before = form.clone();
    let scene = context.scene;
    let _ = ui.window(hash!("menu_panel"), context.origin, context.size, |ui| {
        ui.label(None, "Add item");
        ui.input_text(hash!("item_name"), "Name", &mut form.name);
        ui.input_text(hash!("item_count"), "Count", &mut form.count);
        if ui.button(None, "Add") {
            result.submitted = Some(form.submit());
        }
        if let Some(feedback) = &scene.feedback {
            ui.label(None, feedback);
        }

        ui.separator();
        ui.label(None, "Menu");
        for (row, item) in scene.rows.iter().enumerate() {
            let text = format!(
                "{}. {} x{} ({})",
                item.ordinal, item.name, item.weight, item.chance
            );
            ui.label(None, &text);
            if ui.button(None, "+") {
                result.row_button = Some((row, RowButton::Increase));
            }
            ui.same_line(0.0);
            if ui.button(None, "-") {
                result.row_button = Some((row, RowButton::Decrease));
            }
            ui.same_line(0.0);
            if ui.button(None, "Delete") {
                result.row_button = Some((row, RowButton::Remove));
            }
        }

        ui.separator();
        result.spin_pressed = ui.button(None, scene.spin_button_label.as_str());
        ui.label(None, "Space spins, Esc quits.");
    });

    ui.pop_skin();

    result.text_edited = result.submitted.is_none() && *form != before;

    result
}
