//! Version command

use anyhow::Result;
use psmanifest_core::Config;

use super::open_module;
use crate::cli::app::ModuleArgs;

/// Execute the version command
pub fn execute(args: &ModuleArgs, config: &Config) -> Result<()> {
    println!("{}", render(args, config)?);
    Ok(())
}

fn render(args: &ModuleArgs, config: &Config) -> Result<String> {
    let module = open_module(args, config)?;
    Ok(module.version()?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use psmanifest_core::ManifestError;
    use tempfile::TempDir;

    #[test]
    fn test_render_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("xNet.psd1");
        std::fs::write(&path, "@{\r\n  ModuleVersion = '5.7.0.0'\r\n}\r\n").unwrap();

        let args = ModuleArgs { path, name: None };
        assert_eq!(render(&args, &Config::default()).unwrap(), "5.7.0.0");
    }

    #[test]
    fn test_missing_version_names_module() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bare.psd1");
        std::fs::write(&path, "Author = 'x'\n").unwrap();

        let args = ModuleArgs { path, name: Some("Bare".to_string()) };
        let err = render(&args, &Config::default()).unwrap_err();
        let manifest_err = err.downcast_ref::<ManifestError>().unwrap();
        assert_eq!(manifest_err.module_name(), "Bare");
        assert!(err.to_string().starts_with("ModuleVersion not found for module Bare / "));
    }
}
