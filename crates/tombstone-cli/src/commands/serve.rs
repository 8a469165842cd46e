//! Serve command implementation.

use crate::cli::ServeArgs;
use crate::config::Config;
use crate::error::Result;

/// Execute the serve command.
pub async fn execute_serve(args: ServeArgs, config: &Config) -> Result<()> {
    let mut status = config.status.clone();
    if let Some(bind) = args.bind {
        status.bind_address = bind;
    }
    if let Some(port) = args.port {
        status.bind_port = port;
    }

    tombstone_status::start_server(status).await?;
    Ok(())
}
