use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use osdlink_frame::encode;
use osdlink_session::{LinkSession, SessionConfig};
use osdlink_transport::SerialLink;
use tracing::warn;

use crate::cmd::{
    close_session, drain, install_ctrlc_handler, parse_duration, resolve_payload, ConfigureArgs,
};
use crate::exit::{frame_error, session_error, transport_error, CliResult};
use crate::output::{print_frame, print_send_report, OutputFormat, TelemetrySink};

pub fn run(args: ConfigureArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(args.profile.as_deref(), args.payload.as_deref())?;
    let listen = parse_duration(&args.listen)?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let link = SerialLink::open(&args.link.serial_config())
        .map_err(|err| transport_error("open failed", err))?;
    let session = LinkSession::open_with_config(
        link,
        SessionConfig::default(),
        TelemetrySink::new(format),
    )
    .map_err(|err| session_error("session start failed", err))?;

    let frame = encode(&payload);
    print_frame(&frame, format);

    let sent = if args.strict {
        session.send_exact(&payload)
    } else {
        session.send(&payload)
    };
    let written = sent.map_err(|err| frame_error("send failed", err))?;
    if written < frame.len() {
        warn!(written, expected = frame.len(), "device accepted a partial frame");
    }
    print_send_report(written, frame.len(), format);

    drain(&session, Some(listen), &running);
    close_session(session)
}
