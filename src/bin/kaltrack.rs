//! Kaltrack CLI - Command-line interface for Kaltrack
//!
//! Commands:
//! - demo: Summarize the built-in sample packets (the reference driver)
//! - transform: Process workout packets into summaries (batch mode)
//! - validate: Decode-check workout packets and report failures

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use kaltrack::packet::{PacketDecoder, WorkoutPacket};
use kaltrack::pipeline::SummaryProcessor;
use kaltrack::summary::{SummaryEncoder, WorkoutSummary};
use kaltrack::{ComputeError, ENGINE_VERSION, PACKET_SCHEMA_VERSION};

/// Sample packets fed through the pipeline by `kaltrack demo`
const DEMO_PACKAGES: &[(&str, &[f64])] = &[
    ("SWM", &[720.0, 1.0, 80.0, 25.0, 40.0]),
    ("RUN", &[15000.0, 1.0, 75.0]),
    ("WLK", &[9000.0, 1.0, 75.0, 180.0]),
];

/// Kaltrack - On-device compute engine for workout session summaries
#[derive(Parser)]
#[command(name = "kaltrack")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Transform workout sensor packets into session summaries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the built-in sample packets
    Demo {
        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Process workout packets into summaries (batch mode)
    Transform {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,

        /// Keep processing after a packet fails instead of aborting the batch
        #[arg(long)]
        keep_going: bool,
    },

    /// Decode-check workout packets and report failures
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one packet per line)
    Ndjson,
    /// JSON array of packets
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// One rendered summary line per packet
    Text,
    /// Newline-delimited JSON (one summary record per line)
    Ndjson,
    /// Pretty-printed workout.summary.v1 payload with totals
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), KaltrackCliError> {
    match cli.command {
        Commands::Demo { output_format } => cmd_demo(output_format),

        Commands::Transform {
            input,
            output,
            input_format,
            output_format,
            keep_going,
        } => cmd_transform(&input, &output, input_format, output_format, keep_going),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),
    }
}

fn cmd_demo(output_format: OutputFormat) -> Result<(), KaltrackCliError> {
    let mut processor = SummaryProcessor::new();
    let mut summaries = Vec::with_capacity(DEMO_PACKAGES.len());

    // Fail-fast: a bad sample aborts the run, as in the reference driver
    for (tag, data) in DEMO_PACKAGES {
        let packet = WorkoutPacket::new(*tag, data.to_vec());
        summaries.push(processor.process(&packet)?);
    }

    print!("{}", format_output(&summaries, &output_format)?);
    Ok(())
}

fn cmd_transform(
    input: &PathBuf,
    output: &PathBuf,
    input_format: InputFormat,
    output_format: OutputFormat,
    keep_going: bool,
) -> Result<(), KaltrackCliError> {
    let packets = read_packets(input, &input_format)?;

    if packets.is_empty() {
        return Err(KaltrackCliError::NoPackets);
    }

    let mut processor = SummaryProcessor::new();
    let mut summaries = Vec::with_capacity(packets.len());
    let mut failed = 0usize;

    for (idx, packet) in packets.iter().enumerate() {
        match processor.process(packet) {
            Ok(summary) => summaries.push(summary),
            Err(e) if keep_going => {
                failed += 1;
                eprintln!("packet {} ({}): {}", idx, packet.workout_type, e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let output_data = format_output(&summaries, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    if failed > 0 {
        eprintln!("{} of {} packets skipped", failed, packets.len());
    }

    Ok(())
}

fn cmd_validate(
    input: &PathBuf,
    input_format: InputFormat,
    json: bool,
) -> Result<(), KaltrackCliError> {
    let packets = read_packets(input, &input_format)?;

    let failures = PacketDecoder::validate_packets(&packets);

    let report = ValidationReport {
        schema_version: PACKET_SCHEMA_VERSION.to_string(),
        total_packets: packets.len(),
        valid_packets: packets.len() - failures.len(),
        invalid_packets: failures.len(),
        errors: failures
            .iter()
            .map(|f| ValidationErrorDetail {
                index: f.index,
                workout_type: f.workout_type.clone(),
                error: f.error.as_ref().map(ToString::to_string).unwrap_or_default(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total packets:   {}", report.total_packets);
        println!("Valid packets:   {}", report.valid_packets);
        println!("Invalid packets: {}", report.invalid_packets);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Packet {} ({}): {}",
                    err.index, err.workout_type, err.error
                );
            }
        }
    }

    if report.invalid_packets > 0 {
        Err(KaltrackCliError::ValidationFailed(report.invalid_packets))
    } else {
        Ok(())
    }
}

// Helper functions

fn read_packets(
    input: &PathBuf,
    input_format: &InputFormat,
) -> Result<Vec<WorkoutPacket>, KaltrackCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(KaltrackCliError::StdinIsTty);
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let packets = match input_format {
        InputFormat::Ndjson => PacketDecoder::parse_ndjson(&input_data)?,
        InputFormat::Json => PacketDecoder::parse_array(&input_data)?,
    };

    Ok(packets)
}

fn format_output(
    summaries: &[WorkoutSummary],
    format: &OutputFormat,
) -> Result<String, KaltrackCliError> {
    match format {
        OutputFormat::Text => {
            let mut lines: Vec<String> = Vec::with_capacity(summaries.len());
            for summary in summaries {
                lines.push(summary.render());
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::with_capacity(summaries.len());
            for summary in summaries {
                lines.push(serde_json::to_string(summary)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => {
            let encoder = SummaryEncoder::new();
            Ok(encoder.encode_to_json(summaries)? + "\n")
        }
    }
}

// Error types

#[derive(Debug)]
enum KaltrackCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    NoPackets,
    ValidationFailed(usize),
    StdinIsTty,
}

impl From<io::Error> for KaltrackCliError {
    fn from(e: io::Error) -> Self {
        KaltrackCliError::Io(e)
    }
}

impl From<ComputeError> for KaltrackCliError {
    fn from(e: ComputeError) -> Self {
        KaltrackCliError::Compute(e)
    }
}

impl From<serde_json::Error> for KaltrackCliError {
    fn from(e: serde_json::Error) -> Self {
        KaltrackCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<KaltrackCliError> for CliError {
    fn from(e: KaltrackCliError) -> Self {
        match e {
            KaltrackCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            KaltrackCliError::Compute(e) => CliError {
                code: "COMPUTE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'kaltrack validate' for a per-packet report".to_string()),
            },
            KaltrackCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            KaltrackCliError::NoPackets => CliError {
                code: "NO_PACKETS".to_string(),
                message: "No packets found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            KaltrackCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} packets failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            KaltrackCliError::StdinIsTty => CliError {
                code: "STDIN_IS_TTY".to_string(),
                message: "stdin is a TTY; nothing piped".to_string(),
                hint: Some("Pipe packets via stdin or pass --input <file>".to_string()),
            },
        }
    }
}

#[derive(serde::Serialize)]
struct ValidationReport {
    schema_version: String,
    total_packets: usize,
    valid_packets: usize,
    invalid_packets: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    workout_type: String,
    error: String,
}
