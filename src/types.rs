//! Core types for the Kaltrack pipeline
//!
//! This module defines the data that flows through each stage of the pipeline:
//! workout kinds, per-variant parameter sets, and derived metrics.

use serde::{Deserialize, Serialize};

/// Workout variant identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Walking,
    Swimming,
}

impl WorkoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Walking => "walking",
            WorkoutKind::Swimming => "swimming",
        }
    }

    /// Display name used in rendered summary lines
    pub fn display_name(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Walking => "SportsWalking",
            WorkoutKind::Swimming => "Swimming",
        }
    }

    /// Number of positional parameters a packet of this kind carries
    pub fn arity(&self) -> usize {
        match self {
            WorkoutKind::Running => 3,
            WorkoutKind::Walking => 4,
            WorkoutKind::Swimming => 5,
        }
    }
}

/// Parameters for a running session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunningParams {
    /// Step count
    pub action: u32,
    /// Session duration (hours)
    pub duration_h: f64,
    /// Athlete weight (kilograms)
    pub weight_kg: f64,
}

impl RunningParams {
    /// Distance covered per step (meters)
    pub const STEP_LENGTH_M: f64 = 0.65;
    pub const SPEED_MULTIPLIER: f64 = 18.0;
    pub const SPEED_SHIFT: f64 = 1.79;
}

/// Parameters for a sports-walking session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkingParams {
    /// Step count
    pub action: u32,
    /// Session duration (hours)
    pub duration_h: f64,
    /// Athlete weight (kilograms)
    pub weight_kg: f64,
    /// Athlete height (centimeters)
    pub height_cm: f64,
}

impl WalkingParams {
    /// Distance covered per step (meters)
    pub const STEP_LENGTH_M: f64 = 0.65;
    pub const WEIGHT_MULTIPLIER: f64 = 0.035;
    pub const SPEED_HEIGHT_MULTIPLIER: f64 = 0.029;
    /// km/h → m/s conversion factor (1000/3600, rounded to 3 decimals)
    pub const KMH_IN_MS: f64 = 0.278;
    pub const CM_IN_M: f64 = 100.0;
}

/// Parameters for a swimming session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwimmingParams {
    /// Stroke count
    pub action: u32,
    /// Session duration (hours)
    pub duration_h: f64,
    /// Athlete weight (kilograms)
    pub weight_kg: f64,
    /// Pool length (meters)
    pub length_pool_m: f64,
    /// Number of pool lengths swum
    pub count_pool: u32,
}

impl SwimmingParams {
    /// Distance covered per stroke (meters)
    pub const STROKE_LENGTH_M: f64 = 1.38;
    pub const SPEED_SHIFT: f64 = 1.1;
    pub const WEIGHT_MULTIPLIER: f64 = 2.0;
}

/// A decoded workout session - one of the three closed variants.
///
/// Construction from typed parameters cannot carry a wrong parameter count;
/// the runtime arity check lives only at the packet boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Workout {
    Running(RunningParams),
    Walking(WalkingParams),
    Swimming(SwimmingParams),
}

impl Workout {
    pub fn kind(&self) -> WorkoutKind {
        match self {
            Workout::Running(_) => WorkoutKind::Running,
            Workout::Walking(_) => WorkoutKind::Walking,
            Workout::Swimming(_) => WorkoutKind::Swimming,
        }
    }

    /// Atomic motion unit count (steps, or strokes for swimming)
    pub fn action(&self) -> u32 {
        match self {
            Workout::Running(p) => p.action,
            Workout::Walking(p) => p.action,
            Workout::Swimming(p) => p.action,
        }
    }

    /// Session duration (hours)
    pub fn duration_h(&self) -> f64 {
        match self {
            Workout::Running(p) => p.duration_h,
            Workout::Walking(p) => p.duration_h,
            Workout::Swimming(p) => p.duration_h,
        }
    }

    /// Athlete weight (kilograms)
    pub fn weight_kg(&self) -> f64 {
        match self {
            Workout::Running(p) => p.weight_kg,
            Workout::Walking(p) => p.weight_kg,
            Workout::Swimming(p) => p.weight_kg,
        }
    }
}

/// Metrics derived from one workout session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkoutMetrics {
    /// Total distance (kilometers)
    pub distance_km: f64,
    /// Mean speed over the full session (km/h)
    pub mean_speed_kmh: f64,
    /// Energy spent (kilocalories)
    pub calories_kcal: f64,
}
