//! Asteroids rules, kept free of any rendering so a frame can be stepped in tests.

use cgmath::Vector3;
use rand::Rng;

use crate::data_structures::transform::Transform;

pub const ASTEROID_COUNT: usize = 20;
pub const BULLET_COUNT: usize = 10;
pub const STARTING_LIVES: u32 = 3;

/// Units per second.
pub const BULLET_SPEED: f32 = 60.0;
pub const DEFAULT_FALL_SPEED: f32 = 3.0;
pub const MIN_FALL_SPEED: f32 = 3.0;
pub const MAX_FALL_SPEED: f32 = 90.0;
pub const FALL_SPEED_STEP: f32 = 3.0;

/// Radians per second around x and y.
pub const ASTEROID_SPIN: (f32, f32) = (3.0, 6.0);

/// Collision radii. Overlap is tested against their sum.
pub const ASTEROID_RADIUS: f32 = 1.0;
pub const BULLET_RADIUS: f32 = 1.0;
pub const SHIP_RADIUS: f32 = 1.5;

/// Drawn sizes, independent of the collision radii.
pub const ASTEROID_SCALE: f32 = 1.2;
pub const BULLET_SCALE: f32 = 0.2;

/// Bullets above this height are recalled.
pub const FIELD_TOP: f32 = 20.0;
/// Asteroids below this height have slipped past the ship.
pub const FIELD_BOTTOM: f32 = -3.0;

pub const SHIP_START: Vector3<f32> = Vector3 {
    x: 0.0,
    y: -4.0,
    z: 0.0,
};
pub const SHIP_PARKED: Vector3<f32> = Vector3 {
    x: -100.0,
    y: 30.0,
    z: 0.0,
};
pub const SHIP_STEP: f32 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub position: Vector3<f32>,
    pub alive: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Asteroid {
    pub transform: Transform,
    pub radius: f32,
}

impl Asteroid {
    pub fn position(&self) -> Vector3<f32> {
        self.transform.translation
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bullet {
    pub position: Vector3<f32>,
    pub busy: bool,
}

/// Keys held (or pressed) during one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameInput {
    pub fire: bool,
    pub reload: bool,
    pub left: bool,
    pub right: bool,
    pub restart: bool,
    pub faster: bool,
    pub slower: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub ship: Ship,
    pub asteroids: Vec<Asteroid>,
    pub bullets: [Bullet; BULLET_COUNT],
    /// Where the last asteroid was shot down.
    pub explosion: Option<Vector3<f32>>,
    pub score: i32,
    pub lives: u32,
    pub fall_speed: f32,
}

impl GameState {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let asteroids = (0..ASTEROID_COUNT)
            .map(|_| Asteroid {
                transform: Transform {
                    scale: Vector3::new(ASTEROID_SCALE, ASTEROID_SCALE, ASTEROID_SCALE),
                    ..Transform::from(scatter_position(rng))
                },
                radius: ASTEROID_RADIUS,
            })
            .collect();
        Self {
            ship: Ship {
                position: SHIP_START,
                alive: true,
            },
            asteroids,
            bullets: [Bullet {
                position: SHIP_START,
                busy: false,
            }; BULLET_COUNT],
            explosion: None,
            score: 0,
            lives: STARTING_LIVES,
            fall_speed: DEFAULT_FALL_SPEED,
        }
    }

    /// The ship was hit and waits for a restart.
    pub fn is_over(&self) -> bool {
        !self.ship.alive
    }

    pub fn busy_bullets(&self) -> usize {
        self.bullets.iter().filter(|b| b.busy).count()
    }

    /// Status line shown in the window title.
    pub fn summary(&self) -> String {
        if self.is_over() {
            format!("score {} | lives {} | hit! press B to restart", self.score, self.lives)
        } else {
            format!("score {} | lives {}", self.score, self.lives)
        }
    }
}

fn scatter_position<R: Rng>(rng: &mut R) -> Vector3<f32> {
    Vector3::new(rng.gen_range(-10.0..10.0), rng.gen_range(10.0..40.0), 0.0)
}

fn respawn_height<R: Rng>(rng: &mut R) -> f32 {
    rng.gen_range(50.0..150.0)
}

/// Axis-aligned overlap in the play plane.
fn overlaps(a: Vector3<f32>, b: Vector3<f32>, reach: f32) -> bool {
    (a.x - b.x).abs() < reach && (a.y - b.y).abs() < reach
}

/// Step the game by `dt` seconds.
pub fn advance<R: Rng>(state: &GameState, dt: f32, input: &GameInput, rng: &mut R) -> GameState {
    if input.restart {
        let fall_speed = state.fall_speed;
        let mut fresh = GameState::new(rng);
        fresh.fall_speed = fall_speed;
        log::info!("asteroids restarted");
        return fresh;
    }

    let mut next = state.clone();

    if input.faster {
        next.fall_speed = (next.fall_speed + FALL_SPEED_STEP).min(MAX_FALL_SPEED);
    }
    if input.slower {
        next.fall_speed = (next.fall_speed - FALL_SPEED_STEP).max(MIN_FALL_SPEED);
    }

    if next.ship.alive {
        if input.left {
            next.ship.position.x -= SHIP_STEP;
        }
        if input.right {
            next.ship.position.x += SHIP_STEP;
        }
        if input.fire {
            if let Some(bullet) = next.bullets.iter_mut().find(|b| !b.busy) {
                bullet.busy = true;
            }
        }
    }
    if input.reload {
        for bullet in next.bullets.iter_mut() {
            bullet.busy = false;
        }
    }

    let ship = next.ship.position;
    for bullet in next.bullets.iter_mut() {
        if bullet.busy {
            bullet.position.y += BULLET_SPEED * dt;
            if bullet.position.y > FIELD_TOP {
                bullet.busy = false;
            }
        }
        if !bullet.busy {
            bullet.position = ship;
        }
    }

    let spin_x = ASTEROID_SPIN.0 * dt;
    let spin_y = ASTEROID_SPIN.1 * dt;
    for asteroid in next.asteroids.iter_mut() {
        asteroid.transform.rotate_x(spin_x);
        asteroid.transform.rotate_y(spin_y);
        asteroid.transform.translate(Vector3::new(0.0, -next.fall_speed * dt, 0.0));
        if asteroid.position().y < FIELD_BOTTOM {
            asteroid.transform.translation.y = respawn_height(rng);
            next.score -= 1;
        }
    }

    // a bullet clears every asteroid it overlaps this frame
    for bullet in next.bullets.iter_mut().filter(|b| b.busy) {
        let at = bullet.position;
        for asteroid in next.asteroids.iter_mut() {
            if overlaps(asteroid.position(), at, asteroid.radius + BULLET_RADIUS) {
                next.explosion = Some(asteroid.position());
                asteroid.transform.translation.y = respawn_height(rng);
                bullet.busy = false;
                bullet.position = ship;
                next.score += 1;
            }
        }
    }

    if next.ship.alive
        && next
            .asteroids
            .iter()
            .any(|a| overlaps(a.position(), ship, a.radius + SHIP_RADIUS))
    {
        next.lives = next.lives.saturating_sub(1);
        next.ship.position = SHIP_PARKED;
        next.ship.alive = false;
        for bullet in next.bullets.iter_mut() {
            bullet.busy = false;
            bullet.position = SHIP_PARKED;
        }
        log::info!("ship hit, {} lives left", next.lives);
    }

    next
}
