//! Frame loop glue between the rendering backend, the systems and the world.

use std::time::Duration;

use lucky_wheel_core::{Command, Event};
use lucky_wheel_rendering::{
    sector_spans, FrameInput, MenuRowPresentation, Palette, RowButton, SectorPresentation,
    WheelScene,
};
use lucky_wheel_system_menu::{chance_label, AddItemForm, Menu, MenuInput, RowAction};
use lucky_wheel_system_spin_control::{SpinButtonInput, SpinControl};
use lucky_wheel_world::{self as world, query, World};
use tracing::info;

/// Owns the world and the systems driving it from frame input.
#[derive(Debug)]
pub(crate) struct WheelApp {
    world: World,
    spin_control: SpinControl,
    menu: Menu,
    palette: Palette,
}

impl WheelApp {
    /// Wraps a populated world; `seed` fixes the sector colours.
    pub(crate) fn new(world: World, seed: u64) -> Self {
        Self {
            world,
            spin_control: SpinControl::new(),
            menu: Menu::new(),
            palette: Palette::new(seed),
        }
    }

    /// Scene describing the current state, used before the first frame.
    pub(crate) fn initial_scene(&mut self) -> WheelScene {
        let mut scene = WheelScene::new(self.spin_control.label().as_str());
        self.populate_scene(&mut scene);
        scene
    }

    /// Handles one frame of input, advances the wheel to `now` and refreshes `scene`.
    pub(crate) fn frame(&mut self, now: Duration, input: FrameInput, scene: &mut WheelScene) {
        let mut commands = Vec::new();
        let menu_input = MenuInput {
            submitted: input
                .submitted
                .map(|(name, count)| AddItemForm::new(name, count)),
            row_action: input
                .row_button
                .map(|(row, button)| (row, row_action(button))),
        };
        self.menu
            .handle(&query::items(&self.world), &menu_input, &mut commands);
        self.spin_control.handle(
            &[],
            SpinButtonInput::new(input.spin_pressed),
            &mut commands,
        );
        commands.push(Command::Advance { now });

        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        self.spin_control.observe(&events);

        for event in &events {
            if let Event::SpinSettled { winner } = event {
                let name = winner
                    .and_then(|id| query::item(&self.world, id))
                    .map(|item| item.name);
                info!(winner = ?name, "wheel stopped");
            }
        }

        self.populate_scene(scene);
    }

    fn populate_scene(&mut self, scene: &mut WheelScene) {
        let items = query::items(&self.world);
        self.palette.retain(&items);
        let total = items.total_weight();

        let spans = sector_spans(
            &query::sectors(&self.world),
            query::current_angle(&self.world),
        );
        scene.sectors = spans
            .into_iter()
            .zip(items.iter())
            .map(|(span, item)| SectorPresentation {
                span,
                label: item.name.clone(),
                color: self.palette.color_for(span.item),
            })
            .collect();

        scene.rows = items
            .iter()
            .enumerate()
            .map(|(row, item)| MenuRowPresentation {
                ordinal: row + 1,
                item: item.id,
                name: item.name.clone(),
                weight: item.weight,
                chance: chance_label(item.weight, total),
                color: self.palette.color_for(item.id),
            })
            .collect();

        scene.result = query::current_winner(&self.world).map(|item| item.name);
        scene.phase = query::spin_phase(&self.world);
        scene.spin_button_label = self.spin_control.label().as_str().to_owned();
        scene.feedback = self.menu.last_rejection().map(|reason| reason.to_string());
    }
}

fn row_action(button: RowButton) -> RowAction {
    match button {
        RowButton::Increase => RowAction::Increase,
        RowButton::Decrease => RowAction::Decrease,
        RowButton::Remove => RowAction::Remove,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucky_wheel_core::SpinPhase;

    fn submit(name: &str, count: &str) -> FrameInput {
        FrameInput {
            submitted: Some((name.to_owned(), count.to_owned())),
            ..FrameInput::default()
        }
    }

    fn spin() -> FrameInput {
        FrameInput {
            spin_pressed: true,
            ..FrameInput::default()
        }
    }

    #[test]
    fn empty_world_yields_placeholder_scene() {
        let mut app = WheelApp::new(World::new(), 1);

        let scene = app.initial_scene();

        assert!(scene.is_empty());
        assert!(scene.rows.is_empty());
        assert_eq!(scene.result, None);
        assert_eq!(scene.spin_button_label, "Start");
    }

    #[test]
    fn form_submissions_become_rows_and_sectors() {
        let mut app = WheelApp::new(World::new(), 1);
        let mut scene = app.initial_scene();

        app.frame(Duration::ZERO, submit("Pizza", "1"), &mut scene);
        app.frame(Duration::from_millis(16), submit("Sushi", "3"), &mut scene);

        assert_eq!(scene.sectors.len(), 2);
        let chances: Vec<_> = scene.rows.iter().map(|row| row.chance.as_str()).collect();
        assert_eq!(chances, vec!["25%", "75%"]);
        assert_eq!(scene.rows[1].ordinal, 2);
        assert_eq!(scene.rows[0].color, scene.sectors[0].color);
        assert_eq!(scene.sectors[1].span.item, scene.rows[1].item);
        // At rest the pointer sits three quarters of the way round: Sushi.
        assert_eq!(scene.result.as_deref(), Some("Sushi"));
    }

    #[test]
    fn invalid_submission_shows_feedback() {
        let mut app = WheelApp::new(World::new(), 1);
        let mut scene = app.initial_scene();

        app.frame(Duration::ZERO, submit("Pizza", "0"), &mut scene);

        assert!(scene.rows.is_empty());
        assert!(scene.feedback.is_some());
    }

    #[test]
    fn spin_button_label_follows_the_phase() {
        let mut app = WheelApp::new(World::new(), 1);
        let mut scene = app.initial_scene();
        app.frame(Duration::ZERO, submit("Pizza", "1"), &mut scene);

        app.frame(Duration::from_millis(16), spin(), &mut scene);
        assert_eq!(scene.phase, SpinPhase::Spinning);
        assert_eq!(scene.spin_button_label, "Stop");

        app.frame(Duration::from_millis(32), spin(), &mut scene);
        assert_eq!(scene.phase, SpinPhase::Decelerating);
        assert_eq!(scene.spin_button_label, "Stopping...");

        app.frame(Duration::from_millis(48), spin(), &mut scene);
        assert_eq!(scene.phase, SpinPhase::Decelerating);

        app.frame(Duration::from_millis(12_600), FrameInput::default(), &mut scene);
        assert_eq!(scene.phase, SpinPhase::Idle);
        assert_eq!(scene.spin_button_label, "Start");
    }

    #[test]
    fn pointer_sector_matches_the_reported_winner() {
        let mut app = WheelApp::new(World::new(), 9);
        let mut scene = app.initial_scene();
        for (name, count) in [("Bibimbap", "2"), ("Ramen", "1"), ("Tacos", "4")] {
            app.frame(Duration::ZERO, submit(name, count), &mut scene);
        }
        app.frame(Duration::ZERO, spin(), &mut scene);

        for step in 1..=40_u64 {
            app.frame(
                Duration::from_millis(step * 37 + 3),
                FrameInput::default(),
                &mut scene,
            );
            let under_pointer = scene
                .sectors
                .iter()
                .find(|sector| sector.span.contains(scene.pointer_angle))
                .map(|sector| sector.label.clone());
            assert_eq!(under_pointer, scene.result, "frame {step}");
        }
    }

    #[test]
    fn removing_rows_forgets_their_colours() {
        let mut app = WheelApp::new(World::new(), 2);
        let mut scene = app.initial_scene();
        app.frame(Duration::ZERO, submit("Pizza", "1"), &mut scene);
        app.frame(Duration::ZERO, submit("Sushi", "1"), &mut scene);

        app.frame(
            Duration::ZERO,
            FrameInput {
                row_button: Some((0, RowButton::Decrease)),
                ..FrameInput::default()
            },
            &mut scene,
        );

        assert_eq!(scene.rows.len(), 1);
        assert_eq!(scene.rows[0].name, "Sushi");
        assert_eq!(app.palette.len(), 1);
        assert_eq!(query::total_weight(&app.world), 1);
    }
}
