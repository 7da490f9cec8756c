#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Lucky Wheel.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! All uses of `macroquad::ui` live inside the local `ui` module.

mod ui;

use self::ui::{draw_panel_ui, FormFields, PanelUiContext, PanelUiResult};
use anyhow::Result;
use glam::Vec2;
use lucky_wheel_rendering::{
    Color, FrameInput, Presentation, RenderingBackend, RowButton, SectorPresentation, SectorSpan,
    WheelScene,
};
use macroquad::{
    color::{BLACK, DARKGRAY, RED, WHITE},
    input::{is_key_pressed, KeyCode},
    math::Vec2 as MacroquadVec2,
};
use std::{f32::consts::TAU, time::Duration};

/// Width of the menu panel docked to the right edge of the window.
const PANEL_WIDTH: f32 = 340.0;
/// Share of the smaller wheel-area dimension used as the wheel radius.
const WHEEL_RADIUS_RATIO: f32 = 0.42;
/// Angular resolution of the triangle fans approximating each sector.
const FAN_SEGMENTS_PER_TURN: f32 = 120.0;
const SEPARATOR_THICKNESS: f32 = 2.0;
const RIM_THICKNESS: f32 = 4.0;
const LABEL_FONT_SIZE: f32 = 22.0;
const RESULT_FONT_SIZE: f32 = 30.0;
const EMPTY_WHEEL_FILL: macroquad::color::Color =
    macroquad::color::Color::new(0.93, 0.93, 0.93, 1.0);

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Debug, Default)]
pub struct PanelInputState {
    spin_latched: bool,
    row_button_latched: Option<(usize, RowButton)>,
    submission_latched: Option<(String, String)>,
}

impl PanelInputState {
    /// Returns whether the spin button was pressed and clears the latch so the
    /// action fires only once.
    pub fn take_spin(&mut self) -> bool {
        let latched = self.spin_latched;
        self.spin_latched = false;
        latched
    }

    /// Records that the panel's spin button was pressed this frame.
    pub fn register_spin(&mut self) {
        self.spin_latched = true;
    }

    /// Returns the latched row button, clearing it so the action fires once.
    pub fn take_row_button(&mut self) -> Option<(usize, RowButton)> {
        self.row_button_latched.take()
    }

    /// Records that a row button was pressed this frame.
    pub fn register_row_button(&mut self, row: usize, button: RowButton) {
        self.row_button_latched = Some((row, button));
    }

    /// Returns the latched form submission, clearing it so the action fires once.
    pub fn take_submission(&mut self) -> Option<(String, String)> {
        self.submission_latched.take()
    }

    /// Records that the add form was submitted this frame.
    pub fn register_submission(&mut self, name: String, count: String) {
        self.submission_latched = Some((name, count));
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
///
/// Letter keys are left alone so item names can be typed freely.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` to quit.
    quit_requested: bool,
    /// `Space` presses the spin button unless a form field took the key.
    spin: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            spin: is_key_pressed(KeyCode::Space),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut WheelScene) + 'static,
    {
        let Self { swap_interval } = self;
        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 1100,
            window_height: 720,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut panel_input = PanelInputState::default();
            let mut form = FormFields::default();
            let background = to_macroquad_color(clear_color);

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let now = Duration::from_secs_f64(macroquad::time::get_time().max(0.0));

                let frame_input = gather_frame_input(&mut panel_input);
                update_scene(now, frame_input, &mut scene);

                let metrics = WheelMetrics::from_screen(screen_width, screen_height);
                draw_wheel(&scene, &metrics);
                draw_pointer(&scene, &metrics);
                draw_result(&scene, &metrics);

                let panel_background = to_macroquad_color(clear_color.lighten(0.08));
                macroquad::shapes::draw_rectangle(
                    metrics.panel_left,
                    0.0,
                    PANEL_WIDTH,
                    screen_height,
                    panel_background,
                );
                let mut panel_ui = macroquad::ui::root_ui();
                let panel = draw_panel_ui(
                    &mut panel_ui,
                    PanelUiContext {
                        origin: MacroquadVec2::new(metrics.panel_left, 0.0),
                        size: MacroquadVec2::new(PANEL_WIDTH, screen_height),
                        background: panel_background,
                        scene: &scene,
                    },
                    &mut form,
                );
                latch_interactions(&mut panel_input, panel, keyboard);

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Records this frame's panel clicks and shortcuts for the next scene update.
///
/// Runs after the panel is drawn, once the form has had its chance to consume
/// the typed characters.
fn latch_interactions(
    panel_input: &mut PanelInputState,
    panel: PanelUiResult,
    keyboard: KeyboardShortcuts,
) {
    let PanelUiResult {
        spin_pressed,
        row_button,
        submitted,
        text_edited,
    } = panel;

    if spin_pressed || (keyboard.spin && !text_edited) {
        panel_input.register_spin();
    }
    if let Some((row, button)) = row_button {
        panel_input.register_row_button(row, button);
    }
    if let Some((name, count)) = submitted {
        panel_input.register_submission(name, count);
    }
}

fn gather_frame_input(panel_input: &mut PanelInputState) -> FrameInput {
    FrameInput {
        spin_pressed: panel_input.take_spin(),
        row_button: panel_input.take_row_button(),
        submitted: panel_input.take_submission(),
    }
}

/// Screen-space layout of the wheel area.
#[derive(Clone, Copy, Debug, PartialEq)]
struct WheelMetrics {
    center: Vec2,
    radius: f32,
    panel_left: f32,
}

impl WheelMetrics {
    fn from_screen(screen_width: f32, screen_height: f32) -> Self {
        let panel_left = (screen_width - PANEL_WIDTH).max(0.0);
        let radius = (panel_left.min(screen_height) * WHEEL_RADIUS_RATIO).max(0.0);

        Self {
            center: Vec2::new(panel_left * 0.5, screen_height * 0.5),
            radius,
            panel_left,
        }
    }

    fn point_at(&self, angle: f32, distance: f32) -> Vec2 {
        self.center + Vec2::new(angle.cos(), angle.sin()) * distance
    }
}

/// Rim points of the triangle fan approximating a sector, from start to end.
fn fan_points(span: &SectorSpan, metrics: &WheelMetrics) -> Vec<Vec2> {
    let sweep = (span.end_angle - span.start_angle).max(0.0);
    let segments = ((sweep / TAU) * FAN_SEGMENTS_PER_TURN).ceil().max(1.0) as usize;
    let step = sweep / segments as f32;

    (0..=segments)
        .map(|index| metrics.point_at(span.start_angle + step * index as f32, metrics.radius))
        .collect()
}

/// Corners of the pointer triangle: the tip inside the rim, then the outer base.
fn pointer_triangle(pointer_angle: f32, metrics: &WheelMetrics) -> [Vec2; 3] {
    let direction = Vec2::new(pointer_angle.cos(), pointer_angle.sin());
    let across = direction.perp();
    let tip = metrics.center + direction * (metrics.radius - 12.0);
    let base = metrics.center + direction * (metrics.radius + 24.0);

    [tip, base + across * 14.0, base - across * 14.0]
}

fn draw_wheel(scene: &WheelScene, metrics: &WheelMetrics) {
    if metrics.radius <= f32::EPSILON {
        return;
    }

    if scene.is_empty() {
        macroquad::shapes::draw_circle(
            metrics.center.x,
            metrics.center.y,
            metrics.radius,
            EMPTY_WHEEL_FILL,
        );
        macroquad::shapes::draw_circle_lines(
            metrics.center.x,
            metrics.center.y,
            metrics.radius,
            RIM_THICKNESS,
            BLACK,
        );
        draw_centered_text("no items", metrics.center, LABEL_FONT_SIZE, DARKGRAY);
        return;
    }

    for sector in &scene.sectors {
        draw_sector(sector, metrics);
    }

    for sector in &scene.sectors {
        let edge = metrics.point_at(sector.span.start_angle, metrics.radius);
        macroquad::shapes::draw_line(
            metrics.center.x,
            metrics.center.y,
            edge.x,
            edge.y,
            SEPARATOR_THICKNESS,
            WHITE,
        );
    }

    macroquad::shapes::draw_circle_lines(
        metrics.center.x,
        metrics.center.y,
        metrics.radius,
        RIM_THICKNESS,
        BLACK,
    );

    for sector in &scene.sectors {
        let anchor = metrics.center + sector.label_anchor(metrics.radius);
        draw_centered_text(&sector.label, anchor, LABEL_FONT_SIZE, BLACK);
    }
}

fn draw_sector(sector: &SectorPresentation, metrics: &WheelMetrics) {
    let color = to_macroquad_color(sector.color);
    let center = to_macroquad_vec2(metrics.center);

    for pair in fan_points(&sector.span, metrics).windows(2) {
        macroquad::shapes::draw_triangle(
            center,
            to_macroquad_vec2(pair[0]),
            to_macroquad_vec2(pair[1]),
            color,
        );
    }
}

fn draw_pointer(scene: &WheelScene, metrics: &WheelMetrics) {
    if metrics.radius <= f32::EPSILON {
        return;
    }

    let [tip, left, right] = pointer_triangle(scene.pointer_angle, metrics);
    macroquad::shapes::draw_triangle(
        to_macroquad_vec2(tip),
        to_macroquad_vec2(left),
        to_macroquad_vec2(right),
        RED,
    );
}

fn draw_result(scene: &WheelScene, metrics: &WheelMetrics) {
    let position = metrics.center + Vec2::new(0.0, metrics.radius + 56.0);
    draw_centered_text(&scene.result_text(), position, RESULT_FONT_SIZE, WHITE);
}

fn draw_centered_text(text: &str, center: Vec2, font_size: f32, color: macroquad::color::Color) {
    let dimensions = macroquad::text::measure_text(text, None, font_size as u16, 1.0);
    let x = center.x - dimensions.width * 0.5;
    let y = center.y + dimensions.offset_y * 0.5;
    let _ = macroquad::text::draw_text(text, x, y, font_size, color);
}

fn to_macroquad_vec2(point: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(point.x, point.y)
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
