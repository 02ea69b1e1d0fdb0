use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Args, Subcommand};
use osdlink_frame::{Profile, ARDUPILOT_115200, PROFILES};
use osdlink_session::{LinkSession, ReadExit, ReaderState};
use osdlink_transport::{DuplexStream, SerialConfig, DEFAULT_BAUD_RATE, DEFAULT_PORT};
use tracing::info;

use crate::exit::{session_error, CliError, CliResult, INTERNAL, SUCCESS, USAGE};
use crate::output::OutputFormat;

pub mod configure;
pub mod encode;
pub mod monitor;
pub mod ports;
pub mod version;

/// How often the main thread checks for Ctrl-C and reader shutdown.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a configuration frame, then keep printing device output.
    Configure(ConfigureArgs),
    /// Print device output without sending anything.
    Monitor(MonitorArgs),
    /// Print the frame for a payload without opening a port.
    Encode(EncodeArgs),
    /// List serial ports on this host.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Configure(args) => configure::run(args, format),
        Command::Monitor(args) => monitor::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Serial port path.
    #[arg(long, env = "OSDLINK_PORT", default_value = DEFAULT_PORT)]
    pub port: String,
    /// Baud rate.
    #[arg(long, env = "OSDLINK_BAUD", default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
}

impl LinkArgs {
    pub fn serial_config(&self) -> SerialConfig {
        SerialConfig::new(self.port.as_str(), self.baud)
    }
}

#[derive(Args, Debug)]
pub struct ConfigureArgs {
    #[command(flatten)]
    pub link: LinkArgs,
    /// Built-in device profile to send. Default: ardupilot-115200.
    #[arg(long, conflicts_with = "payload")]
    pub profile: Option<String>,
    /// Raw configuration payload, sent verbatim.
    #[arg(long)]
    pub payload: Option<String>,
    /// How long to keep printing device output after sending (e.g. 10s, 500ms).
    #[arg(long, default_value = "10s")]
    pub listen: String,
    /// Fail when the port accepts only part of the frame.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    #[command(flatten)]
    pub link: LinkArgs,
    /// Stop after this long (e.g. 30s). Default: until Ctrl-C or the device closes.
    #[arg(long)]
    pub duration: Option<String>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Built-in device profile to encode. Default: ardupilot-115200.
    #[arg(long, conflicts_with = "payload")]
    pub profile: Option<String>,
    /// Raw configuration payload.
    #[arg(long)]
    pub payload: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Pick the payload from `--payload`, `--profile`, or the default profile.
pub fn resolve_payload(profile: Option<&str>, payload: Option<&str>) -> CliResult<Vec<u8>> {
    if let Some(payload) = payload {
        if payload.is_empty() {
            return Err(CliError::new(USAGE, "--payload must not be empty"));
        }
        return Ok(payload.as_bytes().to_vec());
    }

    let name = profile.unwrap_or(ARDUPILOT_115200.name);
    let profile = Profile::find(name).ok_or_else(|| {
        let known: Vec<&str> = PROFILES.iter().map(|p| p.name).collect();
        CliError::new(
            USAGE,
            format!("unknown profile '{name}' (available: {})", known.join(", ")),
        )
    })?;
    Ok(profile.payload.as_bytes().to_vec())
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}

pub fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}

/// Block until `limit` elapses, Ctrl-C, or the reader stops.
pub fn drain<S: DuplexStream>(
    session: &LinkSession<S>,
    limit: Option<Duration>,
    running: &AtomicBool,
) {
    let started = Instant::now();
    while running.load(Ordering::SeqCst) && session.state() == ReaderState::Reading {
        if limit.is_some_and(|limit| started.elapsed() >= limit) {
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Close the session, turning a read failure into a CLI error.
pub fn close_session<S: DuplexStream>(session: LinkSession<S>) -> CliResult<i32> {
    match session.close() {
        Ok(ReadExit::EndOfStream) => {
            info!("device closed the link");
            Ok(SUCCESS)
        }
        Ok(ReadExit::Cancelled) => Ok(SUCCESS),
        Err(err) => Err(session_error("link failed", err)),
    }
}
