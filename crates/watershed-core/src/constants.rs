//! Simulation constants and tuning parameters.

// --- Surface ---

pub const DEFAULT_SURFACE_WIDTH: f64 = 800.0;
pub const DEFAULT_SURFACE_HEIGHT: f64 = 600.0;

// --- Entity sizes (bounding box edge) ---

pub const COMMUNITY_SIZE: f64 = 40.0;
pub const TOWER_SIZE: f64 = 30.0;
pub const POLLUTANT_SIZE: f64 = 30.0;
pub const PICKUP_SIZE: f64 = 40.0;

/// Extra gap required between two placed entities, on top of their half sizes.
pub const PLACEMENT_CLEARANCE: f64 = 10.0;

// --- Roster ---

pub const STARTING_COMMUNITIES: usize = 3;
/// A new community is founded on every level divisible by this.
pub const COMMUNITY_LEVEL_INTERVAL: u32 = 5;

/// Annulus used when placing a tower around a community.
pub const TOWER_RING_MIN_DIST: f64 = 50.0;
pub const TOWER_RING_MAX_DIST: f64 = 90.0;
pub const TOWER_RING_MAX_TRIES: u32 = 20;

// --- Towers ---

pub const INITIAL_TOWER_RANGE: f64 = 60.0;
pub const INITIAL_TOWER_POWER: i64 = 100;
pub const INITIAL_TOWER_SPEED: f64 = 1.0;
pub const INITIAL_TOWER_HEALTH: i64 = 100;
pub const INITIAL_COMMUNITY_HEALTH: i64 = 100;

/// Ticks between shots at speed 1.0.
pub const FIRE_COOLDOWN_BASE: f64 = 30.0;

// --- Bullets ---

pub const BULLET_SPEED: f64 = 8.0;
pub const BULLET_HIT_RADIUS: f64 = 10.0;
/// Bullets leave the tower from this offset relative to its corner.
pub const BULLET_MUZZLE_OFFSET: f64 = 8.0;

// --- Pollutants ---

pub const POLLUTANT_BASE_HP: i64 = 50;
pub const POLLUTANT_HP_PER_LEVEL: i64 = 10;
pub const POLLUTANT_BASE_POWER: i64 = 50;
pub const POLLUTANT_POWER_PER_LEVEL: i64 = 10;
pub const POLLUTANT_BASE_SPEED: f64 = 1.0;
pub const POLLUTANT_SPEED_PER_LEVEL: f64 = 0.2;
pub const POLLUTANT_BASE_COIN_VALUE: u64 = 5;

/// Centers closer than this merge.
pub const MERGE_DISTANCE: f64 = 30.0;
pub const MERGE_COIN_BONUS: u64 = 5;
pub const MERGE_MIN_SPEED: f64 = 0.5;

/// A pollutant closer than this to its target hits it and is consumed.
pub const POLLUTANT_IMPACT_RADIUS: f64 = 20.0;
pub const POLLUTANT_IMPACT_DAMAGE: i64 = 50;

// --- Scoring ---

pub const KILL_SCORE: u64 = 10;
pub const TOWER_LOSS_PENALTY: u64 = 100;
pub const COMMUNITY_LOSS_PENALTY: u64 = 1000;
pub const LEVEL_CLEAR_BONUS: u64 = 1000;

// --- Waves ---

pub const FIRST_WAVE_QUOTA: u32 = 10;
pub const WAVE_QUOTA_PER_LEVEL: u32 = 5;
/// Every Nth level triggers a celebration signal.
pub const CELEBRATION_LEVEL_INTERVAL: u32 = 10;

// --- Timing ---

/// Tick period at tower speed 1.0 and multiplier 1.
pub const BASE_TICK_DELAY_MS: f64 = 300.0;
pub const DEFAULT_SPEED_LEVELS: [f64; 3] = [1.0, 10.0, 100.0];
pub const AUTO_ADVANCE_DELAY_MS: u64 = 800;

// --- Shop: temporary upgrades ---

pub const UPGRADE_PRICE: u64 = 10;
pub const UPGRADE_POWER_STEP: i64 = 10;
pub const UPGRADE_RANGE_STEP: f64 = 10.0;
pub const UPGRADE_SPEED_STEP: f64 = 0.2;
pub const UPGRADE_COMMUNITY_HEALTH_STEP: i64 = 20;

// --- Shop: permanent upgrades ---

pub const PERMANENT_UPGRADE_PRICE: u64 = 50;
pub const PERMANENT_FULL_HP_PRICE: u64 = 20;
pub const PERMANENT_POWER_PER_LEVEL: i64 = 5;
pub const PERMANENT_SPEED_FACTOR: f64 = 2.0;
pub const PERMANENT_EXTRA_TOWERS: usize = 3;
pub const FULL_HP_PER_LEVEL: i64 = 100;

// --- Pickups (interval/lifetime in ticks of the base delay) ---

pub const CAN_SCORE: u64 = 15;
pub const CAN_SPAWN_MIN_TICKS: u64 = 27;
pub const CAN_SPAWN_MAX_TICKS: u64 = 50;
pub const CAN_LIFETIME_TICKS: u64 = 23;

pub const MUD_PENALTY: u64 = 10;
pub const MUD_SPAWN_MIN_TICKS: u64 = 40;
pub const MUD_SPAWN_MAX_TICKS: u64 = 67;
pub const MUD_LIFETIME_TICKS: u64 = 20;
