use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "concat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Concatenate every file of one extension under a directory into a single file")]
#[command(
    long_about = "concat walks a directory tree, collects every file whose name ends with \
                  .<EXTENSION> and writes them into one output file (concat.txt by default), \
                  each preceded by a `# <relative path>` header line."
)]
#[command(after_help = "EXAMPLES:\n  \
    concat rs\n  \
    concat md --root docs\n  \
    concat py --dry-run\n  \
    concat toml --output-format json")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// File extension to collect, without the leading dot
    #[arg(value_parser = validate_extension)]
    pub extension: String,

    /// Directory to search and to write the output file into
    #[arg(short, long, value_name = "DIR", help = "Root directory (defaults to the current directory)")]
    pub root: Option<PathBuf>,

    /// Name of the output file inside the root directory
    #[arg(long, value_name = "NAME", help = "Output file name (default: concat.txt)")]
    pub output_name: Option<String>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Also search hidden files and directories
    #[arg(long)]
    pub include_hidden: bool,

    /// Follow symbolic links while searching
    #[arg(long)]
    pub follow_links: bool,

    /// Maximum directory depth to descend into
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// List the files that would be concatenated without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        config.merge_with_cli_args(&self.create_cli_overrides());
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_output_name(self.output_name.clone())
            .with_include_hidden(self.include_hidden)
            .with_follow_links(self.follow_links)
            .with_max_depth(self.max_depth)
    }

    /// The explicit `--root`, or the current working directory.
    pub fn root_directory(&self) -> Result<PathBuf> {
        match self.root {
            Some(ref root) => Ok(root.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

/// Normalises an extension argument: one leading dot is dropped, and empty
/// values or values containing path separators are rejected.
pub fn validate_extension(s: &str) -> std::result::Result<String, String> {
    let extension = s.strip_prefix('.').unwrap_or(s);

    if extension.is_empty() {
        return Err("Extension must not be empty (e.g. `rs` or `md`)".to_string());
    }

    if extension.contains(|c: char| matches!(c, '/' | '\\' | '\0')) {
        return Err(format!(
            "Extension must not contain path separators: {}",
            extension
        ));
    }

    Ok(extension.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_validate_extension() {
        assert_eq!(validate_extension("rs").unwrap(), "rs");
        assert_eq!(validate_extension(".md").unwrap(), "md");
        assert_eq!(validate_extension("tar.gz").unwrap(), "tar.gz");

        assert!(validate_extension("").is_err());
        assert!(validate_extension(".").is_err());
        assert!(validate_extension("a/b").is_err());
        assert!(validate_extension("..\\x").is_err());
    }

    #[test]
    fn test_parse_single_extension() {
        let cli = Cli::try_parse_from(["concat", "rs"]).unwrap();
        assert_eq!(cli.extension, "rs");
        assert!(cli.root.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_parse_with_options() {
        let cli = Cli::try_parse_from([
            "concat", ".py", "--root", "/tmp/project", "--max-depth", "3", "-vv",
        ])
        .unwrap();

        assert_eq!(cli.extension, "py");
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/project")));
        assert_eq!(cli.max_depth, Some(3));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_wrong_argument_count() {
        let missing = Cli::try_parse_from(["concat"]).unwrap_err();
        assert_eq!(
            missing.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );

        let extra = Cli::try_parse_from(["concat", "rs", "md"]).unwrap_err();
        assert_ne!(extra.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["concat", "rs", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_overrides_reach_config() {
        let cli = Cli::try_parse_from([
            "concat", "rs", "--output-name", "all.rs.txt", "--include-hidden",
        ])
        .unwrap();

        let config = cli.load_config().unwrap();
        assert_eq!(config.output.file_name, "all.rs.txt");
        assert!(config.scan.include_hidden);
    }

    #[test]
    fn test_invalid_output_name_is_rejected() {
        let cli = Cli::try_parse_from(["concat", "rs", "--output-name", "../escape.txt"]).unwrap();
        assert!(cli.load_config().is_err());
    }

    #[test]
    fn test_root_directory_defaults_to_cwd() {
        let cli = Cli::try_parse_from(["concat", "rs"]).unwrap();
        assert_eq!(cli.root_directory().unwrap(), std::env::current_dir().unwrap());
    }
}
