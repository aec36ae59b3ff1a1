//! Get command - print a single manifest attribute

use anyhow::{Result, bail};
use psmanifest_core::Config;

use super::open_module;
use crate::cli::app::GetArgs;

/// Execute the get command
pub fn execute(args: &GetArgs, config: &Config) -> Result<()> {
    println!("{}", render(args, config)?);
    Ok(())
}

fn render(args: &GetArgs, config: &Config) -> Result<String> {
    let module = open_module(&args.module, config)?;
    match module.get(&args.key)? {
        Some(value) => Ok(value.to_string()),
        None => bail!(
            "attribute '{}' not found in {} / {}",
            args.key,
            module.name(),
            module.path().display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::app::ModuleArgs;
    use tempfile::TempDir;

    fn args(dir: &TempDir, key: &str) -> GetArgs {
        let path = dir.path().join("m.psd1");
        std::fs::write(&path, "GUID = 'abc-123'\nAuthor = \"Jane Doe\";\n").unwrap();
        GetArgs { module: ModuleArgs { path, name: None }, key: key.to_string() }
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        assert_eq!(render(&args(&dir, "AUTHOR"), &Config::default()).unwrap(), "Jane Doe");
        assert_eq!(render(&args(&dir, "guid"), &Config::default()).unwrap(), "abc-123");
    }

    #[test]
    fn test_get_unknown_attribute() {
        let dir = TempDir::new().unwrap();
        let err = render(&args(&dir, "Tags"), &Config::default()).unwrap_err();
        assert!(err.to_string().starts_with("attribute 'Tags' not found in m / "));
    }
}
