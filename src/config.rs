//! Configuration constants for the crew simulation.

// Map and entities
pub const MAP_WIDTH: f64 = 1000.0; // Map width in pixels
pub const MAP_HEIGHT: f64 = 450.0; // Map height in pixels
pub const ENTITY_SIZE: f64 = 20.0; // Bounding square of the player and every bot
pub const WALL_THICKNESS: f64 = 4.0; // Thickness of a room outline wall
pub const DOOR_WIDTH: f64 = 40.0; // Gap left in the corridor-facing wall of each room
pub const PLAYER_SPAWN_X: f64 = 100.0;
pub const PLAYER_SPAWN_Y: f64 = 100.0;

// Movement
pub const PLAYER_STEP: f64 = 8.0; // Per axis, per movement attempt
pub const BOT_SPEED: f64 = 3.0; // Per tick
pub const AI_IMPOSTOR_SPEED: f64 = 5.0; // Per tick, faster than ordinary bots
pub const WANDER_REDIRECT_PROBABILITY: f64 = 0.05; // Chance per tick to pick a new heading
pub const DIAGONAL_COMPONENT: f64 = std::f64::consts::FRAC_1_SQRT_2;

// Scheduling
pub const TICK_MS: u64 = 100; // Fixed simulation cadence (10 Hz)
pub const TOUCH_POLL_MS: u64 = 16; // Joystick pseudo-tick (~60 Hz)
pub const KEY_REPEAT_DELAY_MS: u64 = 250; // Hold time before a direction key repeats
pub const KEY_REPEAT_MS: u64 = 33; // Step rate of a held direction key (~30 Hz)
pub const MOVE_PULSE_MS: u64 = 200; // How long an entity shows as "moving" after a step
pub const ROLE_BANNER_MS: u64 = 3_000;

// Roles and win conditions
pub const CREWMATE_PROBABILITY: f64 = 0.6;
pub const IMPOSTOR_WIN_KILLS: u32 = 7;

// Abilities
pub const KILL_RANGE: f64 = 30.0;
pub const KILL_COOLDOWN_MS: u64 = 8_000;
pub const VENT_COOLDOWN_MS: u64 = 2_000;
pub const MEETING_COOLDOWN_MS: u64 = 15_000;

// AI impostor
pub const AI_START_DELAY_MS: u64 = 2_000;
pub const AI_KILL_DELAY_MS: u64 = 8_000;
pub const AI_KILL_PROXIMITY: f64 = 20.0;

// Body reporting
pub const PLAYER_REPORT_RADIUS: f64 = 5.0; // Literally stepping onto the body
pub const BOT_REPORT_RADIUS: f64 = 10.0;

// Touch joystick
pub const JOYSTICK_RADIUS: f64 = 45.0; // Knob travel limit
pub const JOYSTICK_DEAD_ZONE: f64 = 10.0;

// Window (render adapter)
pub const WINDOW_WIDTH: i32 = 1000;
pub const WINDOW_HEIGHT: i32 = 560;
pub const HUD_HEIGHT: i32 = 110; // Status strip below the map
