use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "psmanifest",
    version,
    about = "psmanifest - Read attributes from PowerShell module manifests",
    long_about = "psmanifest reads PowerShell module manifest (.psd1) files in any common encoding and prints their module version or flat key/value attributes."
)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the module version
    #[command(about = "Print the ModuleVersion of a manifest")]
    Version(ModuleArgs),

    /// Print every parsed attribute
    #[command(about = "List all flat key/value attributes of a manifest")]
    Attributes(AttributesArgs),

    /// Print a single attribute
    #[command(about = "Print one attribute of a manifest")]
    Get(GetArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ModuleArgs {
    /// Path to the .psd1 manifest
    #[arg(help = "Path to the module manifest")]
    pub path: PathBuf,

    /// Module name used in messages (defaults to the file stem)
    #[arg(short, long, help = "Module name shown in error messages")]
    pub name: Option<String>,
}

impl ModuleArgs {
    pub fn module_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.path.display().to_string())
        })
    }
}

#[derive(Args, Debug)]
pub struct AttributesArgs {
    #[command(flatten)]
    pub module: ModuleArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub module: ModuleArgs,

    /// Attribute name, matched without regard to case
    #[arg(help = "Attribute to print")]
    pub key: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_version_command() {
        let cli = Cli::try_parse_from(["psmanifest", "-vv", "version", "mods/xNet.psd1"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Version(args) => {
                assert_eq!(args.path, PathBuf::from("mods/xNet.psd1"));
                assert_eq!(args.module_name(), "xNet");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_attributes_json_with_name() {
        let cli = Cli::try_parse_from([
            "psmanifest",
            "attributes",
            "m.psd1",
            "--name",
            "Custom",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Attributes(args) => {
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(args.module.module_name(), "Custom");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_get_requires_key() {
        assert!(Cli::try_parse_from(["psmanifest", "get", "m.psd1"]).is_err());
    }
}
