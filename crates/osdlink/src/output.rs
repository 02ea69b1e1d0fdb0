use std::io::{IsTerminal, Stdout, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use osdlink_frame::Frame;
use osdlink_session::{ObservationSink, TextSink, Utf8Carry};
use osdlink_transport::PortInfo;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    kind: &'a str,
    payload: String,
    checksum: String,
    size: usize,
    wire: String,
    hex: String,
}

pub fn print_frame(frame: &Frame, format: OutputFormat) {
    let payload = String::from_utf8_lossy(frame.payload()).into_owned();
    let checksum = format!("{:x}", frame.checksum());

    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                kind: "frame",
                payload,
                checksum,
                size: frame.len(),
                wire: frame.to_string(),
                hex: frame.hex_dump(),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PAYLOAD", "CRC", "SIZE", "WIRE"])
                .add_row(vec![
                    payload,
                    checksum,
                    frame.len().to_string(),
                    frame.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{frame} [{}]", frame.hex_dump());
        }
        OutputFormat::Raw => {
            print_raw(frame.as_bytes());
        }
    }
}

#[derive(Serialize)]
struct SendOutput {
    kind: &'static str,
    written: usize,
    expected: usize,
    timestamp: String,
}

pub fn print_send_report(written: usize, expected: usize, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&SendOutput {
            kind: "sent",
            written,
            expected,
            timestamp: now_unix_seconds(),
        }),
        OutputFormat::Raw => {}
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("Wrote {written} bytes.");
        }
    }
}

#[derive(Serialize)]
struct PortOutput<'a> {
    name: &'a str,
    kind: &'a str,
    description: Option<&'a str>,
}

pub fn print_ports(ports: &[PortInfo], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for port in ports {
                print_json(&PortOutput {
                    name: &port.name,
                    kind: port.kind,
                    description: port.description.as_deref(),
                });
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "TYPE", "DESCRIPTION"]);
            for port in ports {
                table.add_row(vec![
                    port.name.clone(),
                    port.kind.to_string(),
                    port.description.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for port in ports {
                match &port.description {
                    Some(desc) => println!("{} ({}, {desc})", port.name, port.kind),
                    None => println!("{} ({})", port.name, port.kind),
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct TelemetryOutput<'a> {
    kind: &'a str,
    size: usize,
    text: String,
    timestamp: String,
}

impl TelemetryOutput<'static> {
    /// One record per run of complete characters; `None` while only a
    /// partial character is held.
    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        Some(Self {
            kind: "telemetry",
            size: bytes.len(),
            text: String::from_utf8_lossy(bytes).into_owned(),
            timestamp: now_unix_seconds(),
        })
    }
}

/// Prints bytes drained from the device in the selected output format.
pub enum TelemetrySink {
    Json(Utf8Carry),
    Raw,
    Text(TextSink<Stdout>),
}

impl TelemetrySink {
    pub fn new(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::Json(Utf8Carry::new()),
            OutputFormat::Raw => Self::Raw,
            OutputFormat::Table | OutputFormat::Pretty => Self::Text(TextSink::stdout()),
        }
    }
}

impl ObservationSink for TelemetrySink {
    fn observe(&mut self, bytes: &[u8]) {
        match self {
            Self::Json(carry) => {
                if let Some(record) = TelemetryOutput::from_bytes(&carry.push(bytes)) {
                    print_json(&record);
                }
            }
            Self::Raw => print_raw(bytes),
            Self::Text(sink) => sink.observe(bytes),
        }
    }

    fn finish(&mut self) {
        match self {
            Self::Json(carry) => {
                if let Some(record) = TelemetryOutput::from_bytes(&carry.take_rest()) {
                    print_json(&record);
                }
            }
            Self::Raw => {}
            Self::Text(sink) => sink.finish(),
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
