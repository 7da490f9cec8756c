use std::time::Duration;

use lucky_wheel_core::{
    Command, Event, ItemId, SpinPhase, DECELERATION_DURATION, INITIAL_ANGULAR_VELOCITY,
};
use lucky_wheel_world::{self as world, query, World};

#[test]
fn weighted_pair_matches_expected_probabilities() {
    let mut world = World::new();
    let (a, b) = seed_pair(&mut world);

    assert_eq!(query::total_weight(&world), 4);
    assert!((query::probability(&world, a).expect("present") - 0.25).abs() < 1e-12);
    assert!((query::probability(&world, b).expect("present") - 0.75).abs() < 1e-12);
    let items = query::items(&world).into_vec();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "A");
    assert_eq!(items[1].name, "B");
}

#[test]
fn immediate_stop_keeps_angle_and_settles_once() {
    let mut world = World::new();
    let _ = seed_pair(&mut world);
    let mut events = Vec::new();

    world::apply(&mut world, Command::StartSpin, &mut events);
    let snapshot = query::spin_snapshot(&world);
    assert_eq!(snapshot.phase, SpinPhase::Spinning);
    assert_eq!(snapshot.angular_velocity, INITIAL_ANGULAR_VELOCITY);

    let angle_before_stop = query::current_angle(&world);
    world::apply(&mut world, Command::RequestStop, &mut events);
    assert_eq!(query::spin_phase(&world), SpinPhase::Decelerating);
    assert_eq!(query::current_angle(&world), angle_before_stop);

    let settled = drive(&mut world, Duration::from_millis(16), Duration::from_secs(14));
    assert_eq!(settled, 1, "the wheel must settle exactly once");
    assert_eq!(query::spin_phase(&world), SpinPhase::Idle);
    assert_eq!(query::spin_snapshot(&world).angular_velocity, 0.0);
}

#[test]
fn tick_granularity_only_changes_the_resting_angle() {
    let coarse = run_stopped_spin(DECELERATION_DURATION);
    let fine = run_stopped_spin(Duration::from_millis(5));

    assert_eq!(coarse.phase, SpinPhase::Idle);
    assert_eq!(fine.phase, SpinPhase::Idle);
    assert_eq!(coarse.settled, 1);
    assert_eq!(fine.settled, 1);
    // Integration step size is an accepted discretisation error.
    assert!(coarse.angle >= 0.0 && coarse.angle < std::f64::consts::TAU);
    assert!(fine.angle >= 0.0 && fine.angle < std::f64::consts::TAU);
}

#[test]
fn replay_is_deterministic() {
    let first = run_stopped_spin(Duration::from_millis(16));
    let second = run_stopped_spin(Duration::from_millis(16));

    assert_eq!(first, second);
}

#[test]
fn winner_events_track_the_pointer() {
    let mut world = World::new();
    let (a, b) = seed_pair(&mut world);
    let mut events = Vec::new();

    world::apply(&mut world, Command::StartSpin, &mut events);
    events.clear();

    // At rest the pointer reads B; just over half a turn brings A under it.
    world::apply(
        &mut world,
        Command::Advance {
            now: Duration::ZERO,
        },
        &mut events,
    );
    let half_turn_ms = (std::f64::consts::PI / INITIAL_ANGULAR_VELOCITY) as u64 + 4;
    world::apply(
        &mut world,
        Command::Advance {
            now: Duration::from_millis(half_turn_ms),
        },
        &mut events,
    );

    let winners: Vec<Option<ItemId>> = events
        .iter()
        .filter_map(|event| match event {
            Event::WinnerChanged { winner } => Some(*winner),
            _ => None,
        })
        .collect();
    assert_eq!(winners, vec![Some(a)]);
    assert_ne!(Some(b), query::current_winner(&world).map(|item| item.id));
}

#[derive(Debug, PartialEq)]
struct Outcome {
    phase: SpinPhase,
    angle: f64,
    settled: usize,
    winner: Option<ItemId>,
}

fn run_stopped_spin(step: Duration) -> Outcome {
    let mut world = World::new();
    let _ = seed_pair(&mut world);
    let mut events = Vec::new();

    world::apply(&mut world, Command::StartSpin, &mut events);
    world::apply(
        &mut world,
        Command::Advance {
            now: Duration::ZERO,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::Advance {
            now: Duration::from_millis(1_000),
        },
        &mut events,
    );
    world::apply(&mut world, Command::RequestStop, &mut events);

    let mut settled = 0;
    let mut now = Duration::from_millis(1_000);
    let end = now + DECELERATION_DURATION + Duration::from_secs(1);
    while now < end {
        let mut tick_events = Vec::new();
        world::apply(&mut world, Command::Advance { now }, &mut tick_events);
        settled += count_settled(&tick_events);
        now += step;
    }

    Outcome {
        phase: query::spin_phase(&world),
        angle: query::current_angle(&world),
        settled,
        winner: query::current_winner(&world).map(|item| item.id),
    }
}

fn drive(world: &mut World, step: Duration, horizon: Duration) -> usize {
    let mut settled = 0;
    let mut now = Duration::ZERO;
    while now <= horizon {
        let mut events = Vec::new();
        world::apply(world, Command::Advance { now }, &mut events);
        settled += count_settled(&events);
        now += step;
    }
    settled
}

fn count_settled(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::SpinSettled { .. }))
        .count()
}

fn seed_pair(world: &mut World) -> (ItemId, ItemId) {
    let mut events = Vec::new();
    for (name, weight) in [("A", 1), ("B", 3)] {
        world::apply(
            world,
            Command::AddItem {
                name: name.to_owned(),
                weight,
            },
            &mut events,
        );
    }

    let ids: Vec<ItemId> = events
        .iter()
        .filter_map(|event| match event {
            Event::ItemAdded { item, .. } => Some(*item),
            _ => None,
        })
        .collect();
    (ids[0], ids[1])
}
