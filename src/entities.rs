use std::collections::HashSet;
use crossterm::style::Color;
use rand::Rng;
use log::debug;

use crate::constants::*;
use crate::phase::Phase;
use crate::rendering::GameGrid;
use crate::terminal_io::Key;
use crate::types::{direction_to, fully_inside, Rect, Vector2D};

/// Capability shared by everything that lives in the arena.
pub trait Entity {
    fn rect(&self) -> Rect;

    fn is_alive(&self) -> bool {
        true
    }

    fn draw(&self, game_grid: &mut GameGrid);
}

// --- Eight-way facing ---
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Right,
    UpRight,
    Up,
    UpLeft,
    Left,
    DownLeft,
    Down,
    DownRight,
}

impl Direction {
    /// Maps the sign of a movement vector to a facing. `(0, 0)` has none.
    pub fn from_delta(dx: i8, dy: i8) -> Option<Direction> {
        match (dx.signum(), dy.signum()) {
            (1, 0) => Some(Direction::Right),
            (1, -1) => Some(Direction::UpRight),
            (0, -1) => Some(Direction::Up),
            (-1, -1) => Some(Direction::UpLeft),
            (-1, 0) => Some(Direction::Left),
            (-1, 1) => Some(Direction::DownLeft),
            (0, 1) => Some(Direction::Down),
            (1, 1) => Some(Direction::DownRight),
            _ => None,
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Direction::Right => '>',
            Direction::UpRight => '/',
            Direction::Up => '^',
            Direction::UpLeft => '\\',
            Direction::Left => '<',
            Direction::DownLeft => '/',
            Direction::Down => 'v',
            Direction::DownRight => '\\',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expression {
    Normal,
    Flinch,
}

// --- Bird: the player ---
pub struct Bird {
    pub rect: Rect,
    pub facing: Direction,
    pub speed: f64,
    pub expression: Expression,
}

impl Bird {
    pub fn new(center: Vector2D) -> Self {
        Bird {
            rect: Rect::from_center(center, BIRD_SIZE, BIRD_SIZE),
            facing: Direction::Right,
            speed: BIRD_FAST_SPEED,
            expression: Expression::Normal,
        }
    }

    /// Applies one frame of keyboard movement. A move that would leave the
    /// arena on either axis is undone entirely.
    pub fn update(&mut self, keys: &HashSet<Key>) -> (Vector2D, Direction) {
        let mut dx: i8 = 0;
        let mut dy: i8 = 0;
        for key in keys {
            match key {
                Key::Up => dy -= 1,
                Key::Down => dy += 1,
                Key::Left => dx -= 1,
                Key::Right => dx += 1,
                _ => {}
            }
        }
        self.speed = if keys.contains(&Key::Slow) { BIRD_SLOW_SPEED } else { BIRD_FAST_SPEED };

        let step = Vector2D::new(dx as f64, dy as f64).scale(self.speed);
        self.rect.translate(step);
        if !fully_inside(&self.rect) {
            self.rect.translate(step.negate());
        }
        if let Some(facing) = Direction::from_delta(dx, dy) {
            self.facing = facing;
            self.expression = Expression::Normal;
        }
        (self.rect.center(), self.facing)
    }

    /// Cosmetic reaction to a bomb popping on the shield; cleared by moving.
    pub fn flinch(&mut self) {
        self.expression = Expression::Flinch;
    }
}

impl Entity for Bird {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn draw(&self, game_grid: &mut GameGrid) {
        match self.expression {
            Expression::Normal => game_grid.fill_rect(&self.rect, self.facing.glyph(), Color::Yellow),
            Expression::Flinch => game_grid.fill_rect(&self.rect, 'x', Color::Red),
        }
    }
}

// --- Enemy: descends, parks, then drops bombs ---
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyState {
    Descending,
    Stopped,
}

pub struct Enemy {
    pub rect: Rect,
    pub velocity: Vector2D,
    pub stop_altitude: f64,
    pub state: EnemyState,
    pub interval: u64, // Frames between volleys
}

impl Enemy {
    pub fn new(phase: Phase, rng: &mut impl Rng) -> Self {
        let interval = match phase {
            Phase::Mid => ENEMY_RAPID_INTERVAL,
            Phase::Early | Phase::Late => {
                rng.gen_range(ENEMY_SLOW_INTERVAL_MIN..=ENEMY_SLOW_INTERVAL_MAX)
            }
        };
        Enemy {
            rect: Rect::from_center(
                Vector2D::new(ENEMY_SPAWN_X, ENEMY_SPAWN_Y),
                ENEMY_SIZE,
                ENEMY_SIZE,
            ),
            velocity: Vector2D::new(0.0, ENEMY_DESCENT_SPEED),
            stop_altitude: rng.gen_range(ENEMY_STOP_MIN..=ENEMY_STOP_MAX) as f64,
            state: EnemyState::Descending,
            interval,
        }
    }

    /// Freezes once the center has passed the stop altitude, then applies
    /// whatever velocity is left.
    pub fn update(&mut self) {
        if self.rect.center().y > self.stop_altitude {
            self.velocity = Vector2D::new(0.0, 0.0);
            self.state = EnemyState::Stopped;
        }
        self.rect.translate(self.velocity);
    }

    pub fn ready_to_fire(&self, frame: u64) -> bool {
        self.state == EnemyState::Stopped && frame % self.interval == 0
    }

    pub fn fire(&self, bird: &Bird, phase: Phase, rng: &mut impl Rng) -> Vec<Bomb> {
        match phase {
            Phase::Early => self.spread_burst(bird, rng),
            Phase::Mid | Phase::Late => vec![Bomb::new(&self.rect, &bird.rect, phase, None, rng)],
        }
    }

    /// One bomb aimed at the bird plus a fan of companions within ±60° of
    /// straight down.
    fn spread_burst(&self, bird: &Bird, rng: &mut impl Rng) -> Vec<Bomb> {
        let companions = rng.gen_range(SPREAD_MIN..=SPREAD_MAX);
        let mut bombs = Vec::with_capacity(companions + 1);
        bombs.push(Bomb::new(&self.rect, &bird.rect, Phase::Early, None, rng));
        for _ in 0..companions {
            let heading = spread_heading(rng);
            bombs.push(Bomb::new(&self.rect, &bird.rect, Phase::Early, Some(heading), rng));
        }
        debug!("Spread burst of {} bombs.", bombs.len());
        bombs
    }
}

fn spread_heading(rng: &mut impl Rng) -> Vector2D {
    loop {
        let angle = rng.gen_range(-SPREAD_HALF_ANGLE..=SPREAD_HALF_ANGLE);
        let raw = Vector2D::new(angle.sin(), angle.cos());
        let norm = raw.length();
        if norm > 0.0 {
            return raw.scale(1.0 / norm);
        }
    }
}

impl Entity for Enemy {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn draw(&self, game_grid: &mut GameGrid) {
        game_grid.fill_rect(&self.rect, 'W', Color::Green);
    }
}

// --- Bomb ---
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BombColor {
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
    Cyan,
}

impl BombColor {
    pub const ALL: [BombColor; 6] = [
        BombColor::Red,
        BombColor::Green,
        BombColor::Blue,
        BombColor::Yellow,
        BombColor::Magenta,
        BombColor::Cyan,
    ];

    pub fn random(rng: &mut impl Rng) -> Self {
        BombColor::ALL[rng.gen_range(0..BombColor::ALL.len())]
    }

    pub fn terminal_color(&self) -> Color {
        match self {
            BombColor::Red => Color::Red,
            BombColor::Green => Color::Green,
            BombColor::Blue => Color::Blue,
            BombColor::Yellow => Color::Yellow,
            BombColor::Magenta => Color::Magenta,
            BombColor::Cyan => Color::Cyan,
        }
    }
}

pub struct Bomb {
    pub rect: Rect,
    pub velocity: Vector2D,
    pub speed: f64,
    pub radius: f64,
    pub color: BombColor,
    alive: bool,
}

impl Bomb {
    /// Builds a bomb dropped by `spawner` at `target`.
    ///
    /// The heading starts aimed at the target. In the mid phase one bomb in
    /// three instead takes a random step heading from {-1,0,1}×{0,1}, left
    /// unnormalized. In the early phase an explicit heading (spread bursts)
    /// wins over the aim.
    pub fn new(
        spawner: &Rect,
        target: &Rect,
        phase: Phase,
        heading: Option<Vector2D>,
        rng: &mut impl Rng,
    ) -> Self {
        let mut velocity = direction_to(spawner, target);
        match phase {
            Phase::Mid => {
                if rng.gen_ratio(1, 3) {
                    velocity = random_step_heading(rng);
                }
            }
            Phase::Early => {
                if let Some(heading) = heading {
                    velocity = heading;
                }
            }
            Phase::Late => {}
        }

        let (radius, speed) = if phase.is_randomized() {
            (
                rng.gen_range(BOMB_RANDOM_RADIUS_MIN..=BOMB_RANDOM_RADIUS_MAX) as f64,
                rng.gen_range(BOMB_RANDOM_SPEED_MIN..=BOMB_RANDOM_SPEED_MAX) as f64,
            )
        } else {
            (BOMB_RADIUS, BOMB_SPEED)
        };

        Bomb {
            rect: Rect::from_center(spawner.bottom_center(), 2.0 * radius, 2.0 * radius),
            velocity,
            speed,
            radius,
            color: BombColor::random(rng),
            alive: true,
        }
    }

    fn advance(&mut self) {
        self.rect.translate(self.velocity.scale(self.speed));
    }

    /// Mid phase: jittery speed, bounces back off the arena edge. Otherwise
    /// the bomb flies straight and is gone one step after leaving the arena.
    pub fn update(&mut self, phase: Phase, rng: &mut impl Rng) {
        if phase.is_randomized() {
            self.speed = rng.gen_range(BOMB_RANDOM_SPEED_MIN..=BOMB_RANDOM_SPEED_MAX) as f64;
            self.advance();
            if !fully_inside(&self.rect) {
                self.velocity = self.velocity.negate();
                self.advance();
            }
        } else {
            self.advance();
            if !fully_inside(&self.rect) {
                self.advance();
                self.alive = false;
            }
        }
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }
}

fn random_step_heading(rng: &mut impl Rng) -> Vector2D {
    loop {
        let vx: i8 = rng.gen_range(-1..=1);
        let vy: i8 = rng.gen_range(0..=1);
        if vx != 0 || vy != 0 {
            return Vector2D::new(vx as f64, vy as f64);
        }
    }
}

impl Entity for Bomb {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn draw(&self, game_grid: &mut GameGrid) {
        game_grid.fill_rect(&self.rect, 'o', self.color.terminal_color());
    }
}
