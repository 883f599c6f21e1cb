//! workout.packet.v1 schema and decoding
//!
//! A sensor packet is a short workout-type tag plus an ordered list of numeric
//! parameters. This module parses packets from NDJSON or JSON arrays and decodes
//! them into typed workouts, validating tag, arity, and value ranges at the wire
//! boundary. Typed construction elsewhere needs none of these checks.

use serde::{Deserialize, Serialize};

use crate::error::ComputeError;
use crate::types::{
    RunningParams, SwimmingParams, WalkingParams, Workout, WorkoutKind,
};

/// Current packet schema version
pub const PACKET_SCHEMA_VERSION: &str = "workout.packet.v1";

/// Raw sensor packet for one workout session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPacket {
    /// Workout type tag (SWM, RUN, WLK)
    pub workout_type: String,
    /// Positional parameters; order and count are fixed per workout type
    pub data: Vec<f64>,
}

impl WorkoutPacket {
    pub fn new(workout_type: impl Into<String>, data: Vec<f64>) -> Self {
        WorkoutPacket {
            workout_type: workout_type.into(),
            data,
        }
    }

    /// Decode this packet into a typed workout
    pub fn decode(&self) -> Result<Workout, ComputeError> {
        PacketDecoder::decode(&self.workout_type, &self.data)
    }
}

impl WorkoutKind {
    /// Map a packet tag to a workout kind
    pub fn from_tag(tag: &str) -> Result<Self, ComputeError> {
        match tag {
            "RUN" => Ok(WorkoutKind::Running),
            "WLK" => Ok(WorkoutKind::Walking),
            "SWM" => Ok(WorkoutKind::Swimming),
            _ => Err(ComputeError::UnknownWorkoutType {
                tag: tag.to_string(),
            }),
        }
    }
}

/// Decoder for mapping sensor packets to typed workouts
pub struct PacketDecoder;

impl PacketDecoder {
    /// Decode a tag and positional parameter list into a typed workout.
    ///
    /// Parameter order per tag:
    /// - `RUN`: action, duration_h, weight_kg
    /// - `WLK`: action, duration_h, weight_kg, height_cm
    /// - `SWM`: action, duration_h, weight_kg, length_pool_m, count_pool
    pub fn decode(tag: &str, data: &[f64]) -> Result<Workout, ComputeError> {
        let kind = WorkoutKind::from_tag(tag)?;

        let expected = kind.arity();
        if data.len() != expected {
            return Err(ComputeError::ParameterCountMismatch {
                tag: tag.to_string(),
                expected,
                actual: data.len(),
            });
        }

        let action = decode_count(tag, "action", data[0])?;
        let duration_h = decode_positive(tag, "duration_h", data[1])?;
        let weight_kg = decode_positive(tag, "weight_kg", data[2])?;

        let workout = match kind {
            WorkoutKind::Running => Workout::Running(RunningParams {
                action,
                duration_h,
                weight_kg,
            }),
            WorkoutKind::Walking => Workout::Walking(WalkingParams {
                action,
                duration_h,
                weight_kg,
                height_cm: decode_positive(tag, "height_cm", data[3])?,
            }),
            WorkoutKind::Swimming => Workout::Swimming(SwimmingParams {
                action,
                duration_h,
                weight_kg,
                length_pool_m: decode_positive(tag, "length_pool_m", data[3])?,
                count_pool: decode_count(tag, "count_pool", data[4])?,
            }),
        };

        Ok(workout)
    }

    /// Parse a JSON string containing an array of packets
    pub fn parse_array(json: &str) -> Result<Vec<WorkoutPacket>, ComputeError> {
        let packets: Vec<WorkoutPacket> = serde_json::from_str(json)?;
        Ok(packets)
    }

    /// Parse NDJSON (newline-delimited JSON) containing packets
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<WorkoutPacket>, ComputeError> {
        let mut packets = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<WorkoutPacket>(trimmed) {
                Ok(packet) => packets.push(packet),
                Err(e) => {
                    return Err(ComputeError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(packets)
    }

    /// Decode-check a batch of packets, collecting per-packet failures
    pub fn validate_packets(packets: &[WorkoutPacket]) -> Vec<PacketValidation> {
        packets
            .iter()
            .enumerate()
            .map(|(idx, packet)| PacketValidation {
                index: idx,
                workout_type: packet.workout_type.clone(),
                error: packet.decode().err(),
            })
            .filter(|r| r.error.is_some())
            .collect()
    }
}

/// Result of validating one packet in a batch
#[derive(Debug)]
pub struct PacketValidation {
    pub index: usize,
    pub workout_type: String,
    pub error: Option<ComputeError>,
}

/// A count parameter must be a finite non-negative integer
fn decode_count(tag: &str, name: &'static str, value: f64) -> Result<u32, ComputeError> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(ComputeError::ParameterOutOfRange {
            tag: tag.to_string(),
            name,
            value,
        });
    }
    Ok(value as u32)
}

/// A magnitude parameter must be finite and strictly positive.
/// Duration in particular is a divisor in every speed formula.
fn decode_positive(tag: &str, name: &'static str, value: f64) -> Result<f64, ComputeError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ComputeError::ParameterOutOfRange {
            tag: tag.to_string(),
            name,
            value,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_running() {
        let workout = PacketDecoder::decode("RUN", &[15000.0, 1.0, 75.0]).unwrap();

        assert_eq!(
            workout,
            Workout::Running(RunningParams {
                action: 15000,
                duration_h: 1.0,
                weight_kg: 75.0,
            })
        );
    }

    #[test]
    fn test_decode_walking() {
        let workout = PacketDecoder::decode("WLK", &[9000.0, 1.0, 75.0, 180.0]).unwrap();

        assert_eq!(
            workout,
            Workout::Walking(WalkingParams {
                action: 9000,
                duration_h: 1.0,
                weight_kg: 75.0,
                height_cm: 180.0,
            })
        );
    }

    #[test]
    fn test_decode_swimming() {
        let workout =
            PacketDecoder::decode("SWM", &[720.0, 1.0, 80.0, 25.0, 40.0]).unwrap();

        assert_eq!(
            workout,
            Workout::Swimming(SwimmingParams {
                action: 720,
                duration_h: 1.0,
                weight_kg: 80.0,
                length_pool_m: 25.0,
                count_pool: 40,
            })
        );
    }

    #[test]
    fn test_unknown_tag() {
        let err = PacketDecoder::decode("XYZ", &[1.0, 1.0, 1.0]).unwrap_err();

        assert!(matches!(
            err,
            ComputeError::UnknownWorkoutType { ref tag } if tag == "XYZ"
        ));
        assert!(err.to_string().contains("XYZ"));
    }

    #[test]
    fn test_parameter_count_mismatch() {
        let err = PacketDecoder::decode("RUN", &[15000.0, 1.0]).unwrap_err();

        match err {
            ComputeError::ParameterCountMismatch {
                tag,
                expected,
                actual,
            } => {
                assert_eq!(tag, "RUN");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_count_mismatch_same_kind_for_every_variant() {
        for (tag, expected) in [("RUN", 3), ("WLK", 4), ("SWM", 5)] {
            let err = PacketDecoder::decode(tag, &[]).unwrap_err();
            assert!(matches!(
                err,
                ComputeError::ParameterCountMismatch { expected: e, actual: 0, .. } if e == expected
            ));
        }
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = PacketDecoder::decode("RUN", &[15000.0, 0.0, 75.0]).unwrap_err();

        assert!(matches!(
            err,
            ComputeError::ParameterOutOfRange { name: "duration_h", .. }
        ));
    }

    #[test]
    fn test_negative_action_rejected() {
        let err = PacketDecoder::decode("RUN", &[-10.0, 1.0, 75.0]).unwrap_err();

        assert!(matches!(
            err,
            ComputeError::ParameterOutOfRange { name: "action", .. }
        ));
    }

    #[test]
    fn test_fractional_count_rejected() {
        let err =
            PacketDecoder::decode("SWM", &[720.0, 1.0, 80.0, 25.0, 40.5]).unwrap_err();

        assert!(matches!(
            err,
            ComputeError::ParameterOutOfRange { name: "count_pool", .. }
        ));
    }

    #[test]
    fn test_parse_ndjson() {
        let ndjson = r#"{"workout_type": "RUN", "data": [15000, 1, 75]}

{"workout_type": "SWM", "data": [720, 1, 80, 25, 40]}
"#;

        let packets = PacketDecoder::parse_ndjson(ndjson).unwrap();
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0].workout_type, "RUN");
        assert_eq!(packets[1].data.len(), 5);
    }

    #[test]
    fn test_parse_ndjson_reports_line() {
        let ndjson = "{\"workout_type\": \"RUN\", \"data\": [15000, 1, 75]}\nnot json\n";

        let err = PacketDecoder::parse_ndjson(ndjson).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_array() {
        let json = r#"[
            {"workout_type": "WLK", "data": [9000, 1, 75, 180]},
            {"workout_type": "RUN", "data": [15000, 1, 75]}
        ]"#;

        let packets = PacketDecoder::parse_array(json).unwrap();
        assert_eq!(packets.len(), 2);
    }

    #[test]
    fn test_validate_packets() {
        let packets = vec![
            WorkoutPacket::new("RUN", vec![15000.0, 1.0, 75.0]),
            WorkoutPacket::new("XYZ", vec![1.0]),
            WorkoutPacket::new("SWM", vec![720.0, 1.0]),
        ];

        let failures = PacketDecoder::validate_packets(&packets);
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].index, 1);
        assert_eq!(failures[1].index, 2);
    }

    #[test]
    fn test_packet_serde_round_trip() {
        let packet = WorkoutPacket::new("SWM", vec![720.0, 1.0, 80.0, 25.0, 40.0]);

        let json = serde_json::to_string(&packet).unwrap();
        let back: WorkoutPacket = serde_json::from_str(&json).unwrap();
        assert_eq!(back, packet);
    }
}
