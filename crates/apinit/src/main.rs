//! Command-line entry point
//!
//! Mirrors the build-system contract: the positional arguments are the
//! declared output files (or a single semicolon-separated list file), the
//! manifest supplies the module universe, and flags override config fields.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use apinit::{config::Config, universe::ModuleUniverse, writer};

#[derive(Debug, Parser)]
#[command(
    name = "apinit",
    version,
    about = "Generates the __init__.py files that assemble a Python library's public API \
             from export annotations"
)]
struct Cli {
    /// Output __init__.py paths. A single argument names a file containing a
    /// semicolon-separated list of outputs instead.
    #[arg(value_name = "OUTPUT", required = true)]
    outputs: Vec<String>,

    /// Export manifest describing the module universe
    #[arg(short, long, value_name = "FILE")]
    manifest: PathBuf,

    /// Only process modules whose name contains this substring
    #[arg(long, value_name = "SUBSTRING")]
    module_filter: Option<String>,

    /// Root module of the generated package
    #[arg(long, value_name = "DOTTED_PATH")]
    output_module: Option<String>,

    /// Path to an apinit.toml config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// RUST_LOG wins when set; otherwise `-v` counts pick the default level.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// A single output argument names a list file of `;`-separated paths.
fn resolve_output_files(outputs: &[String]) -> Result<Vec<String>> {
    if let [list_path] = outputs {
        let content = std::fs::read_to_string(list_path)
            .with_context(|| format!("Failed to read output list file: {list_path}"))?;
        Ok(content
            .split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_owned)
            .collect())
    } else {
        Ok(outputs.to_vec())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let universe = ModuleUniverse::from_toml_path(&cli.manifest)?;
    let mut config = Config::load(cli.config.as_deref())?;
    config.module_filter = cli.module_filter.or(config.module_filter);
    config.output_module = cli.output_module.or(config.output_module);

    let output_files = resolve_output_files(&cli.outputs)?;
    debug!("generating against {} declared outputs", output_files.len());
    writer::create_api_files(&output_files, &universe, &config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_arguments_are_taken_verbatim() {
        let outputs = vec!["api/__init__.py".to_owned(), "api/math/__init__.py".to_owned()];
        let resolved = resolve_output_files(&outputs).unwrap();
        assert_eq!(resolved, outputs);
    }

    #[test]
    fn test_single_argument_is_a_list_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let list_path = dir.path().join("outputs.txt");
        std::fs::write(&list_path, "api/__init__.py;api/math/__init__.py;\n").unwrap();

        let outputs = vec![list_path.to_string_lossy().into_owned()];
        let resolved = resolve_output_files(&outputs).unwrap();
        assert_eq!(resolved, ["api/__init__.py", "api/math/__init__.py"]);
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
