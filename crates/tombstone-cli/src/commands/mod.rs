//! Command implementations.

pub mod decode;
pub mod once;
pub mod run;
pub mod serve;
pub mod show;

pub use self::decode::execute_decode;
pub use self::once::execute_once;
pub use self::run::execute_run;
pub use self::serve::execute_serve;
pub use self::show::execute_show;

use crate::config::Config;
use crate::error::{CliError, Result};
use tombstone_reaper::Reaper;
use tombstone_site::HttpSite;
use tombstone_store::JsonFileStore;

/// Reaper wired to the configured store file and site bridge.
///
/// The site client blocks, so call this off the async runtime.
pub fn build_reaper(config: &Config) -> Result<Reaper<JsonFileStore, HttpSite>> {
    let store = match &config.reaper.store_path {
        Some(path) => JsonFileStore::open(path)?,
        None => JsonFileStore::in_memory(),
    };
    let site = HttpSite::new(config.site.clone())?;
    Ok(Reaper::new(config.reaper.clone(), store, site))
}

/// Build the reaper on the blocking pool.
pub async fn spawn_reaper(config: &Config) -> Result<Reaper<JsonFileStore, HttpSite>> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || build_reaper(&config))
        .await
        .map_err(|e| CliError::Task(e.to_string()))?
}
