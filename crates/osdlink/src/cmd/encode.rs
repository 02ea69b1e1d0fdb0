use osdlink_frame::encode;

use crate::cmd::{resolve_payload, EncodeArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(args.profile.as_deref(), args.payload.as_deref())?;
    print_frame(&encode(&payload), format);
    Ok(SUCCESS)
}
