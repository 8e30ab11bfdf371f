use crate::discovery::discover_candidates;
use crate::errors::FixError;
use crate::logging::{content_digest, structured_report_line, JsonlLogger};
use crate::rewriter::rewrite_source;
use crate::runtime::{FileSystem, Terminal};
use crate::transcript::ActualOutputMap;
use crate::types::{FileReport, FixSummary, RuntimeScope, WriteMode};
use serde_json::json;
use std::path::Path;

pub struct FixSession<'a> {
    pub file_system: &'a dyn FileSystem,
    pub terminal: &'a dyn Terminal,
    pub logger: Option<&'a JsonlLogger>,
    pub mode: WriteMode,
}

impl FixSession<'_> {
    /// Rewrites every candidate in `scope.working_dir`, one file at a time.
    /// The first error aborts the run; files already written stay written.
    pub fn apply(
        &self,
        scope: &RuntimeScope,
        pattern: &str,
        outputs: &ActualOutputMap,
    ) -> Result<FixSummary, FixError> {
        let candidates = discover_candidates(self.file_system, &scope.working_dir, pattern)?;
        let mut summary = FixSummary::default();

        for path in candidates {
            summary.scanned += 1;
            if let Some(report) = self.fix_file(&path, outputs)? {
                summary.rewritten.push(report);
            }
        }

        self.log_info(
            "run_complete",
            json!({
                "mode": self.mode.as_str(),
                "scanned": summary.scanned,
                "rewritten": summary.rewritten_count(),
                "files": summary
                    .rewritten
                    .iter()
                    .map(|report| json!({
                        "file": report.path.display().to_string(),
                        "examples": report.examples,
                    }))
                    .collect::<Vec<_>>(),
            }),
        )?;
        Ok(summary)
    }

    fn fix_file(
        &self,
        path: &Path,
        outputs: &ActualOutputMap,
    ) -> Result<Option<FileReport>, FixError> {
        let original = self.file_system.read_to_string(path)?;
        let outcome = rewrite_source(&original, outputs);

        if let Some(id) = &outcome.unterminated {
            if let Some(logger) = self.logger {
                logger.warn(
                    "declaration_unterminated",
                    json!({ "file": path.display().to_string(), "example": id }),
                )?;
            }
        }
        self.log_info(
            "file_scanned",
            json!({ "file": path.display().to_string(), "modified": outcome.modified }),
        )?;

        if !outcome.modified {
            return Ok(None);
        }

        match self.mode {
            WriteMode::InPlace => {
                self.file_system.write_string(path, &outcome.content)?;
                self.log_info(
                    "file_rewritten",
                    json!({
                        "file": path.display().to_string(),
                        "examples": outcome.rewritten,
                        "sha256_before": content_digest(&original),
                        "sha256_after": content_digest(&outcome.content),
                    }),
                )?;
            }
            WriteMode::DryRun => {
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                self.terminal.write_line(&structured_report_line(
                    &name,
                    "would_rewrite",
                    &format!("examples={}", outcome.rewritten.join(",")),
                ))?;
            }
        }

        Ok(Some(FileReport {
            path: path.to_path_buf(),
            examples: outcome.rewritten,
        }))
    }

    fn log_info(&self, event_type: &str, payload: serde_json::Value) -> Result<(), FixError> {
        match self.logger {
            Some(logger) => logger.info(event_type, payload),
            None => Ok(()),
        }
    }
}
