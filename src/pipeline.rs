//! Pipeline orchestration
//!
//! This module provides the public API for Kaltrack.
//! It orchestrates the full pipeline from raw sensor packets to summaries.

use crate::error::ComputeError;
use crate::packet::{PacketDecoder, WorkoutPacket};
use crate::summary::{BatchTotals, WorkoutSummary};

/// Compute the summary for one sensor packet.
///
/// # Arguments
/// * `workout_type` - Workout tag (`SWM`, `RUN`, or `WLK`)
/// * `data` - Positional parameters in the tag's fixed order
///
/// # Example
/// ```
/// let summary = kaltrack::process_packet("RUN", &[15000.0, 1.0, 75.0])?;
/// assert!(summary.render().starts_with("Тип тренировки: Running"));
/// # Ok::<(), kaltrack::ComputeError>(())
/// ```
pub fn process_packet(workout_type: &str, data: &[f64]) -> Result<WorkoutSummary, ComputeError> {
    let workout = PacketDecoder::decode(workout_type, data)?;
    Ok(WorkoutSummary::from_workout(&workout))
}

/// Stateful processor that accumulates batch totals across packets.
///
/// Use this when summarizing a whole batch and reporting aggregate
/// distance/calorie totals at the end.
#[derive(Debug, Clone, Default)]
pub struct SummaryProcessor {
    totals: BatchTotals,
}

impl SummaryProcessor {
    /// Create a new processor with empty totals
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one packet, folding its summary into the running totals
    pub fn process(&mut self, packet: &WorkoutPacket) -> Result<WorkoutSummary, ComputeError> {
        let workout = packet.decode()?;
        let summary = WorkoutSummary::from_workout(&workout);
        self.totals.update(&summary);
        Ok(summary)
    }

    /// Totals over every successfully processed packet so far
    pub fn totals(&self) -> &BatchTotals {
        &self.totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_packets() -> Vec<WorkoutPacket> {
        vec![
            WorkoutPacket::new("SWM", vec![720.0, 1.0, 80.0, 25.0, 40.0]),
            WorkoutPacket::new("RUN", vec![15000.0, 1.0, 75.0]),
            WorkoutPacket::new("WLK", vec![9000.0, 1.0, 75.0, 180.0]),
        ]
    }

    #[test]
    fn test_process_packet_end_to_end() {
        let lines: Vec<String> = sample_packets()
            .iter()
            .map(|p| process_packet(&p.workout_type, &p.data).unwrap().render())
            .collect();

        assert_eq!(
            lines,
            vec![
                "Тип тренировки: Swimming; Длительность: 1.000 ч.; \
                 Дистанция: 0.994 км; Ср. скорость: 1.000 км/ч; \
                 Потрачено ккал: 336.000."
                    .to_string(),
                "Тип тренировки: Running; Длительность: 1.000 ч.; \
                 Дистанция: 9.750 км; Ср. скорость: 9.750 км/ч; \
                 Потрачено ккал: 797.805."
                    .to_string(),
                "Тип тренировки: SportsWalking; Длительность: 1.000 ч.; \
                 Дистанция: 5.850 км; Ср. скорость: 5.850 км/ч; \
                 Потрачено ккал: 349.252."
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_process_packet_unknown_tag() {
        let err = process_packet("XYZ", &[720.0, 1.0, 80.0]).unwrap_err();
        assert!(err.to_string().contains("XYZ"));
    }

    #[test]
    fn test_processor_accumulates_totals() {
        let mut processor = SummaryProcessor::new();

        for packet in sample_packets() {
            processor.process(&packet).unwrap();
        }

        let totals = processor.totals();
        assert_eq!(totals.sessions, 3);
        assert!((totals.distance_km - 16.5936).abs() < 1e-9);
        assert!((totals.duration_h - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_processor_skips_failed_packets_in_totals() {
        let mut processor = SummaryProcessor::new();

        processor
            .process(&WorkoutPacket::new("RUN", vec![15000.0, 1.0, 75.0]))
            .unwrap();
        processor
            .process(&WorkoutPacket::new("RUN", vec![15000.0]))
            .unwrap_err();

        assert_eq!(processor.totals().sessions, 1);
    }
}
