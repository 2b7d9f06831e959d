use orrery_ngin::{
    Vector3,
    game::{self, GameInput, GameState, SHIP_PARKED, STARTING_LIVES},
};
use rand::{SeedableRng, rngs::StdRng};

fn press(f: impl FnOnce(&mut GameInput)) -> GameInput {
    let mut input = GameInput::default();
    f(&mut input);
    input
}

/// Every asteroid parked far above the field.
fn calm(state: &mut GameState) {
    for asteroid in state.asteroids.iter_mut() {
        asteroid.transform.translation = Vector3::new(-9.0, 200.0, 0.0);
    }
}

#[test]
fn restart_keeps_the_chosen_fall_speed() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut state = GameState::new(&mut rng);
    calm(&mut state);

    let faster = press(|i| i.faster = true);
    for _ in 0..3 {
        state = game::advance(&state, 0.0, &faster, &mut rng);
    }
    let speed = state.fall_speed;
    assert!(speed > game::DEFAULT_FALL_SPEED);

    let restarted = game::advance(&state, 0.0, &press(|i| i.restart = true), &mut rng);
    assert_eq!(restarted.fall_speed, speed);
    assert_eq!(restarted.score, 0);
    assert_eq!(restarted.lives, STARTING_LIVES);
    assert!(restarted.ship.alive);
}

#[test]
fn a_parked_ship_ignores_controls_until_restart() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut state = GameState::new(&mut rng);
    calm(&mut state);
    // just above the ship, so it has not yet slipped past the field
    state.asteroids[0].transform.translation = state.ship.position + Vector3::new(0.0, 1.0, 0.0);

    state = game::advance(&state, 0.0, &GameInput::default(), &mut rng);
    assert!(!state.ship.alive);
    assert_eq!(state.lives, STARTING_LIVES - 1);
    assert_eq!(state.ship.position, SHIP_PARKED);

    let busy_input = press(|i| {
        i.fire = true;
        i.left = true;
    });
    let after = game::advance(&state, 0.1, &busy_input, &mut rng);
    assert_eq!(after.ship.position, SHIP_PARKED);
    assert_eq!(after.busy_bullets(), 0);

    let revived = game::advance(&after, 0.0, &press(|i| i.restart = true), &mut rng);
    assert!(revived.ship.alive);
    assert_eq!(revived.ship.position, game::SHIP_START);
}

#[test]
fn a_volley_drains_the_pool_and_reload_refills_it() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut state = GameState::new(&mut rng);
    calm(&mut state);

    let fire = press(|i| i.fire = true);
    for _ in 0..game::BULLET_COUNT + 3 {
        state = game::advance(&state, 0.01, &fire, &mut rng);
    }
    assert_eq!(state.busy_bullets(), game::BULLET_COUNT);
    assert_eq!(state.bullets.len(), game::BULLET_COUNT);

    state = game::advance(&state, 0.01, &press(|i| i.reload = true), &mut rng);
    assert_eq!(state.busy_bullets(), 0);
    for bullet in &state.bullets {
        assert_eq!(bullet.position, state.ship.position);
    }
}

#[test]
fn summary_reports_score_and_lives() {
    let mut rng = StdRng::seed_from_u64(1);
    let state = GameState::new(&mut rng);
    let summary = state.summary();
    assert!(summary.contains('0'));
    assert!(summary.contains(&STARTING_LIVES.to_string()));
    assert!(!state.is_over());
}
