//! Repairs stale `// Output:` blocks in Go example functions using the
//! actual output reported by a failing `go test` run.
//!
//! ```text
//! go test -run '^Example' | exfix
//! ```
//!
//! The transcript is read from stdin, every `*_test.go` file in the working
//! directory is scanned, and each failing example's expected-output comment
//! is replaced with what the test run printed under `got:`. Files are
//! rewritten in place with no backup.

pub mod config;
pub mod discovery;
pub mod errors;
pub mod fixer;
pub mod logging;
pub mod rewriter;
pub mod runtime;
pub mod transcript;
pub mod types;

use clap::{error::ErrorKind, Parser};
use config::{load_config, CliOverrides};
use errors::FixError;
use fixer::FixSession;
use logging::JsonlLogger;
use runtime::ProductionRuntime;
use serde_json::json;
use transcript::parse_transcript;
use types::WriteMode;

#[derive(Debug, Clone, Parser)]
#[command(name = "exfix", version)]
#[command(about = "Fix Go example output blocks from a `go test` transcript read on stdin")]
pub struct Cli {
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,
    #[arg(long)]
    pub working_dir: Option<std::path::PathBuf>,
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
    #[arg(long)]
    pub log_path: Option<std::path::PathBuf>,
}

/// Process exit status for a finished run; errors are printed to stderr.
pub fn exit_code(result: &Result<i32, FixError>) -> i32 {
    match result {
        Ok(code) => *code,
        Err(error) => {
            eprintln!("{error}");
            1
        }
    }
}

pub fn run() -> Result<i32, FixError> {
    let args = std::env::args_os().collect::<Vec<_>>();
    let cwd = std::env::current_dir().map_err(|e| FixError::Io(e.to_string()))?;
    let runtime = ProductionRuntime::new();
    run_with_runtime(&args, &cwd, &runtime)
}

pub fn run_with_runtime(
    args: &[std::ffi::OsString],
    cwd: &std::path::Path,
    runtime: &ProductionRuntime,
) -> Result<i32, FixError> {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                runtime.terminal.write_line(error.to_string().trim_end())?;
                return Ok(0);
            }
            _ => return Err(FixError::Cli(error.to_string())),
        },
    };

    let overrides = CliOverrides {
        config_path: cli.config,
        working_dir: cli.working_dir,
        dry_run: cli.dry_run,
        log_path: cli.log_path,
    };
    let (cfg, scope) = load_config(&overrides, cwd, runtime.file_system.as_ref())?;

    let logger = cfg.log.path.as_ref().map(|path| JsonlLogger {
        path: config::absolutize_path(&scope.process_cwd, path),
        max_payload_bytes: cfg.log.max_payload_bytes,
        max_file_bytes: cfg.log.max_file_bytes,
    });

    let transcript = runtime.terminal.read_input()?;
    let outputs = parse_transcript(&transcript);
    if let Some(logger) = &logger {
        logger.info(
            "transcript_parsed",
            json!({
                "entries": outputs.len(),
                "examples": outputs.keys().collect::<Vec<_>>(),
            }),
        )?;
    }

    let session = FixSession {
        file_system: runtime.file_system.as_ref(),
        terminal: runtime.terminal.as_ref(),
        logger: logger.as_ref(),
        mode: WriteMode::from_dry_run(cfg.rewrite.dry_run),
    };
    session.apply(&scope, &cfg.scan.pattern, &outputs)?;

    Ok(0)
}
