//! Metric derivation
//!
//! This module derives session metrics from a decoded workout:
//! - Distance from motion-unit count and per-variant unit length
//! - Mean speed (swimming overrides the shared formula)
//! - Calories via the per-variant energy model

use crate::types::{
    RunningParams, SwimmingParams, WalkingParams, Workout, WorkoutMetrics,
};

/// Meters per kilometer
pub const M_IN_KM: f64 = 1000.0;

/// Minutes per hour
pub const MIN_IN_H: f64 = 60.0;

/// Metrics deriver for computing session metrics
pub struct MetricsDeriver;

impl MetricsDeriver {
    /// Derive distance, mean speed, and calories for one workout
    pub fn derive(workout: &Workout) -> WorkoutMetrics {
        WorkoutMetrics {
            distance_km: distance_km(workout),
            mean_speed_kmh: mean_speed_kmh(workout),
            calories_kcal: calories_kcal(workout),
        }
    }
}

/// Distance in km: motion units × unit length, shared across variants.
/// Swimming counts strokes with its own unit length.
fn distance_km(workout: &Workout) -> f64 {
    let unit_length_m = match workout {
        Workout::Running(_) => RunningParams::STEP_LENGTH_M,
        Workout::Walking(_) => WalkingParams::STEP_LENGTH_M,
        Workout::Swimming(_) => SwimmingParams::STROKE_LENGTH_M,
    };

    f64::from(workout.action()) * unit_length_m / M_IN_KM
}

/// Mean speed in km/h: distance over duration, except swimming, which uses
/// pool length × lap count and ignores the stroke-based distance.
fn mean_speed_kmh(workout: &Workout) -> f64 {
    match workout {
        Workout::Swimming(p) => {
            p.length_pool_m * f64::from(p.count_pool) / M_IN_KM / p.duration_h
        }
        _ => distance_km(workout) / workout.duration_h(),
    }
}

/// Calories in kcal via the per-variant energy model
fn calories_kcal(workout: &Workout) -> f64 {
    match workout {
        Workout::Running(p) => {
            (RunningParams::SPEED_MULTIPLIER * mean_speed_kmh(workout)
                + RunningParams::SPEED_SHIFT)
                * p.weight_kg
                / M_IN_KM
                * (p.duration_h * MIN_IN_H)
        }
        Workout::Walking(p) => {
            let speed_ms = mean_speed_kmh(workout) * WalkingParams::KMH_IN_MS;
            let height_m = p.height_cm / WalkingParams::CM_IN_M;

            (WalkingParams::WEIGHT_MULTIPLIER * p.weight_kg
                + speed_ms.powi(2) / height_m
                    * WalkingParams::SPEED_HEIGHT_MULTIPLIER
                    * p.weight_kg)
                * (p.duration_h * MIN_IN_H)
        }
        Workout::Swimming(p) => {
            (mean_speed_kmh(workout) + SwimmingParams::SPEED_SHIFT)
                * SwimmingParams::WEIGHT_MULTIPLIER
                * p.weight_kg
                * p.duration_h
        }
    }
}
