//! Centralised gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::GameplayConfig::default`] mirrors every value below.
//!
//! World units are centimetres, angles are degrees, rates are in 1/s unless a
//! constant says otherwise.

// ── World ─────────────────────────────────────────────────────────────────────

/// Downward gravity applied by Rapier (u/s²).
pub const GRAVITY: f32 = 980.0;

// ── Interpolation ─────────────────────────────────────────────────────────────

/// Squared distance below which `finterp_to` snaps straight to the target.
pub const INTERP_SNAP_EPSILON_SQ: f32 = 1.0e-8;

// ── Character: Movement ───────────────────────────────────────────────────────

/// Maximum ground speed reached under full movement input (u/s).
pub const CHARACTER_MAX_WALK_SPEED: f32 = 600.0;

/// Acceleration toward the input velocity while walking (u/s²).
pub const CHARACTER_MAX_ACCELERATION: f32 = 2048.0;

/// Deceleration applied when there is no input or the body is over speed (u/s²).
pub const CHARACTER_BRAKING_DECELERATION: f32 = 2048.0;

/// Fraction of ground acceleration available while airborne.
pub const CHARACTER_AIR_CONTROL: f32 = 0.3;

/// Vertical launch speed of a jump (u/s).
pub const CHARACTER_JUMP_VELOCITY: f32 = 600.0;

/// Capsule radius of the character collider.
pub const CHARACTER_CAPSULE_RADIUS: f32 = 34.0;

/// Half the cylindrical segment of the character capsule.
pub const CHARACTER_CAPSULE_HALF_HEIGHT: f32 = 54.0;

/// Extra length below the capsule that still counts as standing on ground.
pub const GROUND_CHECK_SLACK: f32 = 4.0;

/// Upward speed above which the character never counts as grounded, so the
/// first frames of a jump are airborne even while the ray still reaches.
pub const GROUND_MAX_RISE_SPEED: f32 = 10.0;

// ── Character: Look ───────────────────────────────────────────────────────────

/// Turn rate for rate inputs while not aiming (deg/s at full deflection).
pub const HIP_TURN_RATE: f32 = 90.0;

/// Look-up rate for rate inputs while not aiming (deg/s).
pub const HIP_LOOK_UP_RATE: f32 = 90.0;

/// Turn rate for rate inputs while aiming (deg/s).
pub const AIMING_TURN_RATE: f32 = 20.0;

/// Look-up rate for rate inputs while aiming (deg/s).
pub const AIMING_LOOK_UP_RATE: f32 = 20.0;

/// Mouse turn scale while not aiming.
pub const MOUSE_HIP_TURN_SCALE: f32 = 1.0;

/// Mouse look-up scale while not aiming.
pub const MOUSE_HIP_LOOK_UP_SCALE: f32 = 1.0;

/// Mouse turn scale while aiming.
pub const MOUSE_AIMING_TURN_SCALE: f32 = 0.2;

/// Mouse look-up scale while aiming.
pub const MOUSE_AIMING_LOOK_UP_SCALE: f32 = 0.2;

/// Look-axis units produced per pixel of raw mouse motion.
pub const MOUSE_AXIS_PER_PIXEL: f32 = 0.07;

/// Degrees of controller rotation per unit of look axis (after sensitivity).
pub const CONTROLLER_INPUT_SCALE: f32 = 2.5;

/// Stick deflection below which gamepad axes read as zero.
pub const GAMEPAD_DEADZONE: f32 = 0.15;

/// Lowest allowed camera pitch (looking down).
pub const PITCH_MIN: f32 = -45.0;

/// Highest allowed camera pitch (looking up).
pub const PITCH_MAX: f32 = 85.0;

// ── Character: Camera ─────────────────────────────────────────────────────────

/// Spring-arm length behind the character.
pub const CHARACTER_ARM_LENGTH: f32 = 250.0;

/// Lateral shoulder offset of the camera socket; sign flips on side switch.
pub const CHARACTER_CAMERA_SIDE_OFFSET: f32 = 50.0;

/// Vertical offset of the camera socket.
pub const CHARACTER_CAMERA_HEIGHT_OFFSET: f32 = 70.0;

/// Field of view while not aiming (degrees).
pub const CAMERA_DEFAULT_FOV: f32 = 90.0;

/// Field of view while aiming (degrees).
pub const CAMERA_ZOOMED_FOV: f32 = 50.0;

/// Interpolation rate of the aim zoom.
pub const ZOOM_INTERP_SPEED: f32 = 20.0;

// ── Character: Combat ─────────────────────────────────────────────────────────

/// Length of the screen-centre trace.
pub const TRACE_DISTANCE: f32 = 50_000.0;

/// Damage applied to whatever the crosshair trace hits.
pub const NOMINAL_DAMAGE: f32 = 1.0;

/// Seconds between automatic shots.
pub const AUTOMATIC_FIRE_INTERVAL: f32 = 0.1;

/// Seconds the shooting factor stays raised after a shot.
pub const SHOOT_SPREAD_DURATION: f32 = 0.05;

/// Muzzle position in the character's local frame (right, up, forward).
pub const CHARACTER_MUZZLE_OFFSET: [f32; 3] = [20.0, 40.0, 60.0];

/// Health given to damageable targets in the arena.
pub const TARGET_HEALTH: f32 = 10.0;

// ── Character: Crosshair ──────────────────────────────────────────────────────

/// Horizontal speed mapped to a velocity factor of 1.
pub const CROSSHAIR_WALK_SPEED_MAX: f32 = 600.0;

/// Target air factor while falling.
pub const CROSSHAIR_AIR_TARGET: f32 = 2.25;

/// Rate at which the air factor grows while falling.
pub const CROSSHAIR_AIR_GROW_RATE: f32 = 2.25;

/// Rate at which the air factor shrinks on the ground.
pub const CROSSHAIR_AIR_SHRINK_RATE: f32 = 30.0;

/// Target aim factor while aiming.
pub const CROSSHAIR_AIM_TARGET: f32 = 0.5;

/// Rate of the aim factor in both directions.
pub const CROSSHAIR_AIM_RATE: f32 = 20.0;

/// Target shooting factor right after a shot.
pub const CROSSHAIR_SHOOT_TARGET: f32 = 0.3;

/// Rate of the shooting factor in both directions.
pub const CROSSHAIR_SHOOT_RATE: f32 = 60.0;

/// Constant base of the combined spread.
pub const CROSSHAIR_BASE_SPREAD: f32 = 0.5;

// ── Character: Abilities ──────────────────────────────────────────────────────

/// Velocity multiplier of the dash launch.
pub const DASH_FORCE_MULTIPLIER: f32 = 6.5;

/// Seconds before dash can be used again.
pub const DASH_COOLDOWN: f32 = 3.0;

/// Global time dilation while slow motion is active.
pub const SLOW_MOTION_DILATION: f32 = 0.5;

/// Seconds the drone stays possessed.
pub const DRONE_POSSESSION_TIME: f32 = 3.0;

/// Seconds after a drone returns before the ability can be used again.
pub const DRONE_ABILITY_COOLDOWN: f32 = 0.0;

/// Drone spawn offset from the character (side, up).
pub const DRONE_SPAWN_OFFSET: [f32; 2] = [50.0, 200.0];

// ── Drone ─────────────────────────────────────────────────────────────────────

/// Velocity added per second of full movement input.
pub const DRONE_MOVEMENT_SPEED: f32 = 200.0;

/// Degrees of arm rotation per unit of turn/look input per frame.
pub const DRONE_CAMERA_SPEED: f32 = 7.0;

/// Interpolation rate of the drone spring arm.
pub const DRONE_ARM_INTERP_SPEED: f32 = 8.0;

/// Interpolation rate of the camera look-at rotation.
pub const DRONE_LOOK_AT_INTERP_SPEED: f32 = 2.0;

/// Interpolation rate of the body lean.
pub const DRONE_LEAN_INTERP_SPEED: f32 = 4.0;

/// Roll in degrees per unit of right input.
pub const DRONE_LEAN_ROLL: f32 = 20.0;

/// Pitch in degrees per unit of forward input.
pub const DRONE_LEAN_PITCH: f32 = -7.0;

/// Spring-arm length behind the drone.
pub const DRONE_ARM_LENGTH: f32 = 250.0;

/// Vertical socket offset of the drone camera.
pub const DRONE_CAMERA_HEIGHT_OFFSET: f32 = 180.0;

/// Speed mapped to the minimum FOV.
pub const DRONE_FOV_SPEED_MIN: f32 = 300.0;

/// Speed mapped to the maximum FOV.
pub const DRONE_FOV_SPEED_MAX: f32 = 1000.0;

/// FOV at or below `DRONE_FOV_SPEED_MIN`.
pub const DRONE_FOV_MIN: f32 = 75.0;

/// FOV at or above `DRONE_FOV_SPEED_MAX`.
pub const DRONE_FOV_MAX: f32 = 110.0;

/// Interpolation rate of the drone FOV.
pub const DRONE_FOV_INTERP_SPEED: f32 = 8.0;

/// Velocity multiplier of the drone boost.
pub const DRONE_BOOST_MULTIPLIER: f32 = 2.0;

/// Seconds before the drone boost can be used again.
pub const DRONE_BOOST_COOLDOWN: f32 = 5.0;

/// Linear damping of the drone body.
pub const DRONE_LINEAR_DAMPING: f32 = 1.0;

/// Angular damping of the drone body.
pub const DRONE_ANGULAR_DAMPING: f32 = 1.0;

/// Radius of the drone's ball collider.
pub const DRONE_COLLIDER_RADIUS: f32 = 25.0;

/// Muzzle position in the drone's local frame (right, up, forward).
pub const DRONE_MUZZLE_OFFSET: [f32; 3] = [0.0, -10.0, 30.0];
