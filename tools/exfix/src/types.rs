use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    InPlace,
    DryRun,
}

impl WriteMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            Self::DryRun
        } else {
            Self::InPlace
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InPlace => "in_place",
            Self::DryRun => "dry_run",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeScope {
    pub process_cwd: PathBuf,
    pub working_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FixSummary {
    pub scanned: usize,
    pub rewritten: Vec<FileReport>,
}

impl FixSummary {
    pub fn rewritten_count(&self) -> usize {
        self.rewritten.len()
    }
}
