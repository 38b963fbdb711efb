//! PDF compilation boundary.
//!
//! Compilation sits outside the reduction core: callers hand a finished
//! LaTeX string across this trait and get bytes plus the compiler log
//! back. A failed or garbled compile is reported, never retried here.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use crate::errors::AppError;

const COMPILE_TIMEOUT: Duration = Duration::from_secs(60);
const JOB_NAME: &str = "resume";

/// Result of one compile attempt.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub success: bool,
    pub pdf: Option<Vec<u8>>,
    pub log: String,
    pub errors: Vec<String>,
}

#[async_trait]
pub trait DocumentCompiler: Send + Sync {
    async fn compile(&self, latex: &str) -> Result<CompileOutput, AppError>;
}

/// `pdflatex` invocation in a scratch directory.
///
/// Two passes, so cross-references and page totals settle; shell escape
/// stays disabled since the input embeds user-supplied text.
#[derive(Debug, Default)]
pub struct PdflatexCompiler;

impl PdflatexCompiler {
    async fn run_pass(&self, dir: &Path) -> Result<std::process::Output, AppError> {
        let child = Command::new("pdflatex")
            .current_dir(dir)
            .arg("-interaction=nonstopmode")
            .arg("-no-shell-escape")
            .arg("-halt-on-error")
            .arg(format!("{JOB_NAME}.tex"))
            .output();

        tokio::time::timeout(COMPILE_TIMEOUT, child)
            .await
            .map_err(|_| AppError::Compile("pdflatex timed out".to_string()))?
            .map_err(AppError::Io)
    }
}

#[async_trait]
impl DocumentCompiler for PdflatexCompiler {
    async fn compile(&self, latex: &str) -> Result<CompileOutput, AppError> {
        let dir = tempfile::tempdir()?;
        let tex_path = dir.path().join(format!("{JOB_NAME}.tex"));
        tokio::fs::write(&tex_path, latex).await?;

        let mut last_output = None;
        for pass in 1..=2u8 {
            info!(pass, "running pdflatex");
            let output = self.run_pass(dir.path()).await?;
            let ok = output.status.success();
            last_output = Some(output);
            if !ok {
                warn!(pass, "pdflatex pass failed");
                break;
            }
        }

        let log = match tokio::fs::read_to_string(dir.path().join(format!("{JOB_NAME}.log"))).await
        {
            Ok(log) => log,
            Err(_) => last_output
                .as_ref()
                .map(|o| String::from_utf8_lossy(&o.stdout).into_owned())
                .unwrap_or_default(),
        };
        let errors = extract_log_errors(&log);

        let pdf_path = dir.path().join(format!("{JOB_NAME}.pdf"));
        let succeeded = last_output.as_ref().is_some_and(|o| o.status.success());
        let pdf = if succeeded {
            tokio::fs::read(&pdf_path).await.ok()
        } else {
            None
        };

        Ok(CompileOutput {
            success: succeeded && pdf.is_some(),
            pdf,
            log,
            errors,
        })
    }
}

/// Pulls the error lines out of a pdflatex log: lines starting with `!`
/// plus the `l.<n>` source-position line that usually follows.
pub fn extract_log_errors(log: &str) -> Vec<String> {
    let mut errors = Vec::new();
    let mut lines = log.lines().peekable();
    while let Some(line) = lines.next() {
        if !line.starts_with('!') {
            continue;
        }
        let mut error = line.trim().to_string();
        if let Some(next) = lines.peek() {
            if next.trim_start().starts_with("l.") {
                error.push_str(" (");
                error.push_str(next.trim());
                error.push(')');
            }
        }
        errors.push(error);
    }
    errors
}
