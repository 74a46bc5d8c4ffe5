//! Command-line surface of the `swagger-merger` binary.
//!
//! Every flag is optional; without arguments the tool merges the fixed
//! `tmp-swagger-gen` layout under the current directory.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use neutron_telemetry::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, RunSpanGuard, init_logging,
};

use crate::config::MergeConfig;
use crate::document::{DEFAULT_TITLE, Scaffold};
use crate::operation_id::OperationIdPolicy;

const EXIT_TELEMETRY: i32 = 4;
const TOOL_NAME: &str = "swagger-merger";

#[derive(Debug, Parser)]
#[command(
    name = "swagger-merger",
    version,
    about = "Merge per-module Swagger fragments into a single API document"
)]
struct Cli {
    #[arg(
        long,
        env = "NEUTRON_PROJECT_ROOT",
        default_value = ".",
        help = "Project root holding go.mod and tmp-swagger-gen/"
    )]
    project_root: PathBuf,
    #[arg(
        long,
        env = "NEUTRON_SWAGGER_MANIFEST",
        help = "Manifest to read the version from (default: <root>/go.mod)"
    )]
    manifest: Option<PathBuf>,
    #[arg(
        long,
        env = "NEUTRON_SWAGGER_INPUT",
        help = "Fragment directory (default: <root>/tmp-swagger-gen/_all)"
    )]
    input_dir: Option<PathBuf>,
    #[arg(
        long,
        env = "NEUTRON_SWAGGER_OUTPUT",
        help = "Merged document path (default: <root>/tmp-swagger-gen/FINAL.json)"
    )]
    output: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_TITLE, help = "Value of info.title")]
    title: String,
    #[arg(
        long = "operation-ids",
        value_enum,
        default_value_t = OperationIdArg::Preserve,
        help = "Keep operation ids or replace them with random identifiers"
    )]
    operation_ids: OperationIdArg,
    #[arg(long, env = "NEUTRON_LOG_FORMAT", value_enum)]
    log_format: Option<LogFormatArg>,
    #[arg(long, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OperationIdArg {
    Preserve,
    Randomize,
}

impl From<OperationIdArg> for OperationIdPolicy {
    fn from(value: OperationIdArg) -> Self {
        match value {
            OperationIdArg::Preserve => Self::Preserve,
            OperationIdArg::Randomize => Self::Randomize,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

impl Cli {
    fn merge_config(&self) -> MergeConfig {
        let root = self.project_root.as_path();
        let defaults = MergeConfig::for_project_root(root);
        MergeConfig {
            manifest: resolve(root, self.manifest.as_deref(), defaults.manifest),
            input_dir: resolve(root, self.input_dir.as_deref(), defaults.input_dir),
            output: resolve(root, self.output.as_deref(), defaults.output),
            scaffold: Scaffold::with_title(self.title.clone()),
            operation_ids: self.operation_ids.into(),
        }
    }
}

fn resolve(root: &Path, requested: Option<&Path>, default: PathBuf) -> PathBuf {
    requested.map_or(default, |path| root.join(path))
}

/// Parses CLI arguments, installs logging and runs the merge. Returns the
/// process exit code.
#[must_use]
pub fn run_cli() -> i32 {
    execute(&Cli::parse())
}

fn execute(cli: &Cli) -> i32 {
    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.map_or_else(LogFormat::infer, LogFormat::from),
        build_sha: option_env!("NEUTRON_BUILD_SHA").unwrap_or("dev"),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("error: {err:#}");
        return EXIT_TELEMETRY;
    }
    let _span = RunSpanGuard::new(TOOL_NAME, env!("CARGO_PKG_VERSION"));

    match crate::run(&cli.merge_config()) {
        Ok(_) => 0,
        Err(err) => {
            let exit_code = err.kind().exit_code();
            tracing::error!(exit_code, "swagger merge failed");
            eprintln!("error: {:#}", anyhow::Error::new(err));
            exit_code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("swagger-merger").chain(args.iter().copied()))
    }

    #[test]
    fn project_root_alone_uses_fixed_layout() -> Result<(), clap::Error> {
        let cli = parse(&["--project-root", "/work/neutron"])?;
        let config = cli.merge_config();
        assert_eq!(config, MergeConfig::for_project_root("/work/neutron"));
        Ok(())
    }

    #[test]
    fn relative_overrides_resolve_against_root() -> Result<(), clap::Error> {
        let cli = parse(&[
            "--project-root",
            "/work/neutron",
            "--input-dir",
            "gen/fragments",
            "--output",
            "/srv/docs/swagger.json",
        ])?;
        let config = cli.merge_config();
        assert_eq!(config.manifest, PathBuf::from("/work/neutron/go.mod"));
        assert_eq!(
            config.input_dir,
            PathBuf::from("/work/neutron/gen/fragments")
        );
        assert_eq!(config.output, PathBuf::from("/srv/docs/swagger.json"));
        Ok(())
    }

    #[test]
    fn title_and_policy_flags_are_applied() -> Result<(), clap::Error> {
        let cli = parse(&["--title", "Neutron Testnet", "--operation-ids", "randomize"])?;
        let config = cli.merge_config();
        assert_eq!(config.scaffold.title, "Neutron Testnet");
        assert_eq!(config.operation_ids, OperationIdPolicy::Randomize);
        Ok(())
    }

    #[test]
    fn log_format_maps_to_telemetry_format() -> Result<(), clap::Error> {
        let cli = parse(&["--log-format", "json"])?;
        assert_eq!(cli.log_format.map(LogFormat::from), Some(LogFormat::Json));
        assert_eq!(LogFormat::from(LogFormatArg::Pretty), LogFormat::Pretty);
        Ok(())
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(parse(&["--operation-ids", "shuffle"]).is_err());
    }
}
