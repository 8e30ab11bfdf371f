use crate::discovery::DEFAULT_PATTERN;
use crate::errors::FixError;
use crate::logging::{DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_PAYLOAD_BYTES};
use crate::runtime::FileSystem;
use crate::types::RuntimeScope;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
    pub dry_run: bool,
    pub log_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub rewrite: RewriteConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanConfig {
    pub working_dir: Option<PathBuf>,
    pub pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RewriteConfig {
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub path: Option<PathBuf>,
    pub max_payload_bytes: usize,
    pub max_file_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scan: ScanConfig {
                working_dir: None,
                pattern: DEFAULT_PATTERN.to_string(),
            },
            rewrite: RewriteConfig { dry_run: false },
            log: LogConfig {
                path: None,
                max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
                max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialAppConfig {
    scan: Option<PartialScanConfig>,
    rewrite: Option<PartialRewriteConfig>,
    log: Option<PartialLogConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialScanConfig {
    working_dir: Option<PathBuf>,
    pattern: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialRewriteConfig {
    dry_run: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialLogConfig {
    path: Option<PathBuf>,
    max_payload_bytes: Option<usize>,
    max_file_bytes: Option<u64>,
}

pub fn load_config(
    overrides: &CliOverrides,
    process_cwd: &Path,
    fs: &dyn FileSystem,
) -> Result<(AppConfig, RuntimeScope), FixError> {
    let mut cfg = AppConfig::default();

    if let Some(path) = &overrides.config_path {
        let path = absolutize_path(process_cwd, path);
        let file_contents = fs.read_to_string(&path).map_err(|e| match e {
            FixError::Read(message) => FixError::ConfigRead(message),
            other => other,
        })?;
        let partial: PartialAppConfig = toml::from_str(&file_contents)
            .map_err(|e| FixError::ConfigParse(e.to_string()))?;
        merge_partial_config(&mut cfg, partial);
    }

    apply_cli_overrides(&mut cfg, overrides);
    validate_config(&cfg)?;

    let scope = resolve_scope(process_cwd, &cfg);
    Ok((cfg, scope))
}

fn merge_partial_config(cfg: &mut AppConfig, partial: PartialAppConfig) {
    if let Some(scan) = partial.scan {
        if let Some(working_dir) = scan.working_dir {
            cfg.scan.working_dir = Some(working_dir);
        }
        if let Some(pattern) = scan.pattern {
            cfg.scan.pattern = pattern;
        }
    }

    if let Some(rewrite) = partial.rewrite {
        if let Some(dry_run) = rewrite.dry_run {
            cfg.rewrite.dry_run = dry_run;
        }
    }

    if let Some(log) = partial.log {
        if let Some(path) = log.path {
            cfg.log.path = Some(path);
        }
        if let Some(value) = log.max_payload_bytes {
            cfg.log.max_payload_bytes = value;
        }
        if let Some(value) = log.max_file_bytes {
            cfg.log.max_file_bytes = value;
        }
    }
}

fn apply_cli_overrides(cfg: &mut AppConfig, overrides: &CliOverrides) {
    if let Some(working_dir) = &overrides.working_dir {
        cfg.scan.working_dir = Some(working_dir.clone());
    }
    if overrides.dry_run {
        cfg.rewrite.dry_run = true;
    }
    if let Some(log_path) = &overrides.log_path {
        cfg.log.path = Some(log_path.clone());
    }
}

pub fn resolve_scope(process_cwd: &Path, cfg: &AppConfig) -> RuntimeScope {
    let working_dir = match &cfg.scan.working_dir {
        Some(path) => absolutize_path(process_cwd, path),
        None => process_cwd.to_path_buf(),
    };
    RuntimeScope {
        process_cwd: process_cwd.to_path_buf(),
        working_dir,
    }
}

pub fn absolutize_path(base: &Path, value: &Path) -> PathBuf {
    if value.is_absolute() {
        value.to_path_buf()
    } else {
        base.join(value)
    }
}

fn validate_config(cfg: &AppConfig) -> Result<(), FixError> {
    if cfg.scan.pattern.trim().is_empty() {
        return Err(FixError::InvalidConfig(
            "scan.pattern must not be empty".to_string(),
        ));
    }

    if cfg.scan.pattern.contains(['/', '\\']) {
        return Err(FixError::InvalidConfig(format!(
            "scan.pattern must match file names only, got {:?}",
            cfg.scan.pattern
        )));
    }

    if cfg.log.max_payload_bytes == 0 {
        return Err(FixError::InvalidConfig(
            "log.max_payload_bytes must be greater than zero".to_string(),
        ));
    }

    Ok(())
}
