//! Decode command implementation.

use crate::cli::DecodeArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use tombstone_reaper::TimerCodec;

/// Execute the decode command.
///
/// Accepts a bare link or a post body with a link embedded somewhere in it.
pub fn execute_decode(args: DecodeArgs, formatter: &Formatter) -> Result<()> {
    let link = TimerCodec::find_link(&args.link).unwrap_or(args.link.trim());
    let (format, deadline) = TimerCodec::decode_with_format(link)
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;

    println!("{}", formatter.format_decoded(format, deadline)?);
    Ok(())
}
