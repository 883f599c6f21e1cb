//! Summary rendering and encoding
//!
//! This module renders one workout session into the fixed-format summary line and
//! encodes summary batches into workout.summary.v1 JSON payloads with producer
//! metadata and batch totals.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ComputeError;
use crate::metrics::MetricsDeriver;
use crate::types::Workout;
use crate::{ENGINE_VERSION, PRODUCER_NAME};

/// Current summary schema version
pub const SUMMARY_SCHEMA_VERSION: &str = "workout.summary.v1";

/// Summary of one workout session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    /// Display name of the workout variant
    pub workout_type: String,
    /// Session duration (hours)
    pub duration_h: f64,
    /// Total distance (kilometers)
    pub distance_km: f64,
    /// Mean speed (km/h)
    pub mean_speed_kmh: f64,
    /// Energy spent (kilocalories)
    pub calories_kcal: f64,
}

impl WorkoutSummary {
    /// Build a summary from a decoded workout and its derived metrics
    pub fn from_workout(workout: &Workout) -> Self {
        let metrics = MetricsDeriver::derive(workout);

        WorkoutSummary {
            workout_type: workout.kind().display_name().to_string(),
            duration_h: workout.duration_h(),
            distance_km: metrics.distance_km,
            mean_speed_kmh: metrics.mean_speed_kmh,
            calories_kcal: metrics.calories_kcal,
        }
    }

    /// Render the fixed-format summary line.
    ///
    /// All four numeric fields carry exactly three decimal places; the decimal
    /// separator is always `.` (no locale handling).
    pub fn render(&self) -> String {
        format!(
            "Тип тренировки: {}; Длительность: {:.3} ч.; Дистанция: {:.3} км; \
             Ср. скорость: {:.3} км/ч; Потрачено ккал: {:.3}.",
            self.workout_type,
            self.duration_h,
            self.distance_km,
            self.mean_speed_kmh,
            self.calories_kcal
        )
    }
}

impl fmt::Display for WorkoutSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Running totals over a batch of summaries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchTotals {
    /// Number of summarized sessions
    pub sessions: u32,
    /// Total duration (hours)
    pub duration_h: f64,
    /// Total distance (kilometers)
    pub distance_km: f64,
    /// Total energy spent (kilocalories)
    pub calories_kcal: f64,
}

impl BatchTotals {
    /// Fold one summary into the totals
    pub fn update(&mut self, summary: &WorkoutSummary) {
        self.sessions += 1;
        self.duration_h += summary.duration_h;
        self.distance_km += summary.distance_km;
        self.calories_kcal += summary.calories_kcal;
    }
}

/// Producer metadata embedded in summary payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProducerInfo {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Complete workout.summary.v1 payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPayload {
    pub schema_version: String,
    pub producer: ProducerInfo,
    pub computed_at_utc: String,
    pub totals: BatchTotals,
    pub summaries: Vec<WorkoutSummary>,
}

/// Encoder for producing workout.summary.v1 payloads
pub struct SummaryEncoder {
    instance_id: String,
}

impl Default for SummaryEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Encode a batch of summaries into a payload
    pub fn encode(&self, summaries: &[WorkoutSummary]) -> BatchPayload {
        let mut totals = BatchTotals::default();
        for summary in summaries {
            totals.update(summary);
        }

        BatchPayload {
            schema_version: SUMMARY_SCHEMA_VERSION.to_string(),
            producer: ProducerInfo {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            totals,
            summaries: summaries.to_vec(),
        }
    }

    /// Encode to JSON string
    pub fn encode_to_json(&self, summaries: &[WorkoutSummary]) -> Result<String, ComputeError> {
        let payload = self.encode(summaries);
        serde_json::to_string_pretty(&payload).map_err(ComputeError::JsonError)
    }
}
