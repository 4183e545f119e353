use std::time::{Duration, Instant};

use plane_dodge::config::Settings;
use plane_dodge::entities::*;
use plane_dodge::pool::batch_size;
use plane_dodge::session::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

const FRAME: Duration = Duration::from_millis(33);

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn settings(initial_fuel: u32) -> Settings {
    Settings {
        plane_speed: 1.0,
        initial_fuel,
        fuel_step: 5,
        viewport: Viewport {
            width: 40.0,
            height: 20.0,
        },
    }
}

fn started(initial_fuel: u32, t0: Instant, rng: &mut StdRng) -> GameSession {
    let mut s = GameSession::new(settings(initial_fuel));
    s.start(t0, rng);
    s
}

/// Leave exactly one entity of `kind`, placed on top of the plane.
fn stage_on_plane(session: &mut GameSession, kind: EntityKind) {
    let field = session.playfield_mut().unwrap();
    let at = field.plane.position;
    let pool = field.pools.iter_mut().find(|p| p.kind == kind).unwrap();
    pool.entities.truncate(1);
    pool.entities[0].position = at;
}

fn count_finished(events: &[GameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::Finished(_)))
        .count()
}

// ── State machine ────────────────────────────────────────────────────────────

#[test]
fn transition_table() {
    use SessionState::*;
    assert_eq!(Idle.next(Command::Start), Some(Running));
    assert_eq!(Running.next(Command::Pause), Some(Paused));
    assert_eq!(Paused.next(Command::Resume), Some(Running));
    assert_eq!(Running.next(Command::Finish), Some(Over));
    assert_eq!(Over.next(Command::Reset), Some(Idle));

    assert_eq!(Idle.next(Command::Pause), None);
    assert_eq!(Idle.next(Command::Finish), None);
    assert_eq!(Running.next(Command::Start), None);
    assert_eq!(Paused.next(Command::Finish), None);
    assert_eq!(Over.next(Command::Start), None);
    assert_eq!(Over.next(Command::Resume), None);
}

#[test]
fn new_session_is_idle_and_inert() {
    let t0 = Instant::now();
    let mut s = GameSession::new(settings(10));
    assert_eq!(s.state(), SessionState::Idle);
    assert!(s.playfield().is_none());
    assert!(s.update(t0 + FRAME, &mut seeded_rng()).is_empty());
    assert!(s.toggle_pause(t0).is_empty());
    assert!(s.finish(t0).is_empty());
    assert_eq!(s.elapsed(t0 + Duration::from_secs(5)), Duration::ZERO);
}

#[test]
fn start_initialises_run() {
    let t0 = Instant::now();
    let mut rng = seeded_rng();
    let mut s = GameSession::new(settings(7));
    let events = s.start(t0, &mut rng);

    assert_eq!(events, vec![GameEvent::Started]);
    assert_eq!(s.state(), SessionState::Running);
    assert_eq!(s.score(), 0);
    assert_eq!(s.fuel(), 7);
    let field = s.playfield().unwrap();
    for kind in EntityKind::ALL {
        assert_eq!(field.pool(kind).unwrap().len(), batch_size(kind));
    }

    // A second start is ignored
    assert!(s.start(t0, &mut rng).is_empty());
}

// ── Pause ─────────────────────────────────────────────────────────────────────

#[test]
fn paused_session_does_not_move() {
    let t0 = Instant::now();
    let mut rng = seeded_rng();
    let mut s = started(10, t0, &mut rng);
    s.set_direction(Direction::Down, true);

    assert_eq!(s.toggle_pause(t0 + FRAME), vec![GameEvent::Paused]);
    assert_eq!(s.state(), SessionState::Paused);

    let before = s.playfield().unwrap().clone();
    assert!(s.update(t0 + FRAME * 2, &mut rng).is_empty());
    let after = s.playfield().unwrap();
    assert_eq!(after.plane, before.plane);
    assert_eq!(after.pools[0].entities, before.pools[0].entities);

    assert_eq!(s.toggle_pause(t0 + FRAME * 3), vec![GameEvent::Resumed]);
    assert_eq!(s.state(), SessionState::Running);
}

#[test]
fn pause_is_neutral_for_time_and_fuel() {
    let t0 = Instant::now();
    let mut rng = seeded_rng();
    let mut s = started(10, t0, &mut rng);

    s.toggle_pause(t0 + Duration::from_millis(500));
    s.toggle_pause(t0 + Duration::from_secs(100));
    s.update(t0 + Duration::from_millis(100_400), &mut rng);

    assert_eq!(s.elapsed(t0 + Duration::from_millis(100_400)), Duration::from_millis(900));
    assert_eq!(s.fuel(), 10);
}

// ── Movement ─────────────────────────────────────────────────────────────────

#[test]
fn held_direction_moves_plane_on_running_frames() {
    let t0 = Instant::now();
    let mut rng = seeded_rng();
    let mut s = GameSession::new(settings(10));
    s.set_direction(Direction::Right, true); // held before start
    s.start(t0, &mut rng);
    let x0 = s.plane().unwrap().position.x;

    s.update(t0 + FRAME, &mut rng);
    assert_eq!(s.plane().unwrap().position.x, x0 + 1.0);

    s.set_direction(Direction::Right, false);
    s.update(t0 + FRAME * 2, &mut rng);
    assert_eq!(s.plane().unwrap().position.x, x0 + 1.0);
}

// ── Fuel ──────────────────────────────────────────────────────────────────────

#[test]
fn fuel_burns_once_per_second() {
    let t0 = Instant::now();
    let mut rng = seeded_rng();
    let mut s = started(10, t0, &mut rng);

    s.update(t0 + Duration::from_millis(900), &mut rng);
    assert_eq!(s.fuel(), 10);
    s.update(t0 + Duration::from_secs(1), &mut rng);
    assert_eq!(s.fuel(), 9);
    s.update(t0 + Duration::from_millis(1_500), &mut rng);
    assert_eq!(s.fuel(), 9);
    // A long stall charges every missed second
    s.update(t0 + Duration::from_secs(3), &mut rng);
    assert_eq!(s.fuel(), 7);
}

#[test]
fn empty_tank_finishes_exactly_once() {
    let t0 = Instant::now();
    let mut rng = seeded_rng();
    let mut s = started(1, t0, &mut rng);

    let events = s.update(t0 + Duration::from_secs(1), &mut rng);
    assert!(events.contains(&GameEvent::FuelExhausted));
    assert_eq!(count_finished(&events), 1);
    assert_eq!(s.state(), SessionState::Over);

    // Later frames and stray finish calls do nothing
    assert!(s.update(t0 + Duration::from_secs(2), &mut rng).is_empty());
    assert!(s.finish(t0 + Duration::from_secs(2)).is_empty());
}

#[test]
fn parachute_refuels() {
    let t0 = Instant::now();
    let mut rng = seeded_rng();
    let mut s = started(3, t0, &mut rng);
    stage_on_plane(&mut s, EntityKind::Parachute);

    let events = s.update(t0 + FRAME, &mut rng);
    assert_eq!(events, vec![GameEvent::ParachuteCollected]);
    assert_eq!(s.fuel(), 8);
}

// ── Pickups ───────────────────────────────────────────────────────────────────

#[test]
fn star_pickup_scores_and_refills_pool() {
    let t0 = Instant::now();
    let mut rng = seeded_rng();
    let mut s = started(10, t0, &mut rng);
    stage_on_plane(&mut s, EntityKind::Star);

    let events = s.update(t0 + FRAME, &mut rng);
    assert_eq!(events, vec![GameEvent::StarCollected]);
    assert_eq!(s.score(), 1);
    let stars = s.playfield().unwrap().pool(EntityKind::Star).unwrap();
    assert_eq!(stars.len(), batch_size(EntityKind::Star));
}

#[test]
fn bird_hit_ends_run_and_tears_down() {
    let t0 = Instant::now();
    let mut rng = seeded_rng();
    let mut s = started(10, t0, &mut rng);
    stage_on_plane(&mut s, EntityKind::Star);
    stage_on_plane(&mut s, EntityKind::Bird);

    let now = t0 + Duration::from_millis(2_500);
    let events = s.update(now, &mut rng);
    assert!(events.contains(&GameEvent::StarCollected));
    assert!(events.contains(&GameEvent::BirdHit));
    assert_eq!(count_finished(&events), 1);
    assert_eq!(s.state(), SessionState::Over);

    let result = s.current_result().unwrap();
    assert_eq!(result.score, 1);
    assert_eq!(result.time, Duration::from_millis(2_500));
    assert!(s.playfield().unwrap().pools.iter().all(|p| p.is_empty()));

    // Time is frozen once over
    assert_eq!(s.elapsed(now + Duration::from_secs(30)), result.time);
}

// ── Restart ───────────────────────────────────────────────────────────────────

#[test]
fn restart_moves_result_to_previous() {
    let t0 = Instant::now();
    let mut rng = seeded_rng();
    let mut s = started(10, t0, &mut rng);
    stage_on_plane(&mut s, EntityKind::Star);
    s.update(t0 + FRAME, &mut rng);
    s.finish(t0 + Duration::from_secs(4));
    let finished = s.current_result().unwrap();

    let t1 = t0 + Duration::from_secs(10);
    let events = s.restart(t1, &mut rng);
    assert_eq!(events, vec![GameEvent::Started]);
    assert_eq!(s.state(), SessionState::Running);
    assert_eq!(s.previous_result(), Some(finished));
    assert_eq!(s.current_result(), None);
    assert_eq!(s.score(), 0);
    assert_eq!(s.fuel(), 10);
    assert_eq!(s.elapsed(t1), Duration::ZERO);
    assert_eq!(
        s.playfield().unwrap().pool(EntityKind::Star).unwrap().len(),
        batch_size(EntityKind::Star)
    );
}

#[test]
fn restart_only_from_over() {
    let t0 = Instant::now();
    let mut rng = seeded_rng();
    let mut s = started(10, t0, &mut rng);
    assert!(s.restart(t0, &mut rng).is_empty());
    assert_eq!(s.state(), SessionState::Running);
}

// ── Resize ────────────────────────────────────────────────────────────────────

#[test]
fn resize_keeps_plane_inside() {
    let t0 = Instant::now();
    let mut rng = seeded_rng();
    let mut s = started(10, t0, &mut rng);
    s.playfield_mut().unwrap().plane.position = Position { x: 35.0, y: 18.0 };

    let small = Viewport {
        width: 20.0,
        height: 10.0,
    };
    s.resize(small);
    assert_eq!(s.viewport(), small);
    let plane = s.plane().unwrap();
    assert_eq!(plane.position, Position { x: 15.0, y: 8.0 });
}
