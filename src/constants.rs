// --- Arena ---
pub const ARENA_WIDTH: f64 = 600.0;
pub const ARENA_HEIGHT: f64 = 700.0;

// --- Timing ---
pub const FRAMES_PER_SECOND: u64 = 50;
pub const MATCH_LENGTH_FRAMES: u64 = 9000; // 180 seconds
pub const MID_PHASE_START: u64 = 4500; // Bombs turn random and reflect from here
pub const ENEMY_SPAWN_INTERVAL: u64 = 3000; // Frames between enemy arrivals
pub const COUNTDOWN_START_SECONDS: u64 = 180;
pub const COUNTDOWN_WARNING_SECONDS: u64 = 10;
pub const COUNTDOWN_FLASH_INTERVAL: u64 = 5;
pub const END_SCREEN_PAUSE_MILLIS: u64 = 3000;

// --- Bird ---
pub const BIRD_START_X: f64 = 300.0;
pub const BIRD_START_Y: f64 = 400.0;
pub const BIRD_SIZE: f64 = 48.0;
pub const BIRD_FAST_SPEED: f64 = 10.0;
pub const BIRD_SLOW_SPEED: f64 = 3.0;

// --- Enemy ---
pub const ENEMY_SIZE: f64 = 64.0;
pub const ENEMY_SPAWN_X: f64 = (ARENA_WIDTH - 128.0) / 1.7;
pub const ENEMY_SPAWN_Y: f64 = ARENA_HEIGHT / 7.0;
pub const ENEMY_DESCENT_SPEED: f64 = 6.0;
pub const ENEMY_STOP_MIN: u32 = 50;
pub const ENEMY_STOP_MAX: u32 = (ARENA_HEIGHT as u32) / 8;
pub const ENEMY_SLOW_INTERVAL_MIN: u64 = 40;
pub const ENEMY_SLOW_INTERVAL_MAX: u64 = 45;
pub const ENEMY_RAPID_INTERVAL: u64 = 5;
pub const SPREAD_MIN: usize = 5;
pub const SPREAD_MAX: usize = 15;
pub const SPREAD_HALF_ANGLE: f64 = std::f64::consts::FRAC_PI_3; // ±60°

// --- Bomb ---
pub const BOMB_RADIUS: f64 = 13.0;
pub const BOMB_RANDOM_RADIUS_MIN: u32 = 5;
pub const BOMB_RANDOM_RADIUS_MAX: u32 = 11;
pub const BOMB_SPEED: f64 = 12.0;
pub const BOMB_RANDOM_SPEED_MIN: u32 = 3;
pub const BOMB_RANDOM_SPEED_MAX: u32 = 8;
pub const DIRECTION_EPSILON: f64 = 2.0; // Closer centers fall back to straight down

// --- Abilities ---
pub const ABILITY_USES: u32 = 3;
pub const SHIELD_LIFETIME: u32 = 50; // Frames
pub const EXPLOSION_LIFETIME: u32 = 50; // Frames
pub const EXPLOSION_FLICKER: u32 = 10; // Frames per explosion image

// --- Input ---
pub const HOLD_WINDOW_FRAMES: u64 = 6; // A key without release events counts as held this long
