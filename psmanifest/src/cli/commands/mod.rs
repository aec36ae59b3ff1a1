// Command implementations

pub mod attributes;
pub mod get;
pub mod version;

use anyhow::Result;
use psmanifest_core::{Config, PsModule};
use tracing::debug;

use crate::cli::app::ModuleArgs;

/// Build a manifest handle for the path and name given on the command line
pub fn open_module(args: &ModuleArgs, config: &Config) -> Result<PsModule> {
    let module = PsModule::with_config(args.module_name(), &args.path, &config.reader)?;
    debug!("Opened {:?}", module);
    Ok(module)
}
