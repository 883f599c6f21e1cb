//! Kaltrack - On-device compute engine for workout session summaries
//!
//! Kaltrack transforms raw workout sensor packets into session summaries through a
//! deterministic pipeline: packet decoding → metric derivation → summary rendering.
//!
//! ## Modules
//!
//! - **Packet**: Decode `(tag, parameters)` sensor packets into typed workouts
//! - **Metrics**: Derive distance, mean speed, and calories per workout variant
//! - **Summary**: Render summary lines and encode summary batches as JSON

pub mod error;
pub mod metrics;
pub mod packet;
pub mod pipeline;
pub mod summary;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use error::ComputeError;
pub use packet::{PacketDecoder, WorkoutPacket, PACKET_SCHEMA_VERSION};
pub use pipeline::{process_packet, SummaryProcessor};
pub use summary::{BatchTotals, SummaryEncoder, WorkoutSummary, SUMMARY_SCHEMA_VERSION};
pub use types::{Workout, WorkoutKind, WorkoutMetrics};

/// Engine version embedded in all summary payloads
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for summary payloads
pub const PRODUCER_NAME: &str = "kaltrack";
