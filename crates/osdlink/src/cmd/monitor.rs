use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use osdlink_session::{LinkSession, SessionConfig};
use osdlink_transport::SerialLink;

use crate::cmd::{close_session, drain, install_ctrlc_handler, parse_duration, MonitorArgs};
use crate::exit::{session_error, transport_error, CliResult};
use crate::output::{OutputFormat, TelemetrySink};

pub fn run(args: MonitorArgs, format: OutputFormat) -> CliResult<i32> {
    let limit = args.duration.as_deref().map(parse_duration).transpose()?;

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

    drain(&session, limit, &running);
    close_session(session)
}
