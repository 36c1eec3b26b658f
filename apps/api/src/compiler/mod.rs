//! Document compiler: turns rendered LaTeX into PDF bytes.
//!
//! One compile = one fresh temporary directory, one `pdflatex` process.
//! The directory is removed when the job ends, whether it succeeded or not.
//! Process output is captured into bounded buffers and only a tail of it
//! is kept for diagnostics.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::render::{Asset, RenderedDocument};

const TEX_FILE: &str = "resume.tex";
const PDF_FILE: &str = "resume.pdf";
/// Lines of compiler output kept in a failure report.
const LOG_TAIL_LINES: usize = 40;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Failed to start compiler '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Compiler working directory I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid asset name: {0}")]
    InvalidAssetName(String),

    #[error("Compiler timed out after {0:?}")]
    Timeout(Duration),

    #[error("Compiler exited with {status}")]
    Failed { status: String, log_tail: String },

    #[error("Compiler finished but produced no resume.pdf")]
    MissingOutput,
}

/// Everything the compiler needs for one document.
#[derive(Debug, Clone)]
pub struct CompileJob {
    pub source: String,
    pub assets: Vec<Asset>,
}

impl From<RenderedDocument> for CompileJob {
    fn from(rendered: RenderedDocument) -> Self {
        Self {
            source: rendered.latex,
            assets: rendered.assets,
        }
    }
}

/// External toolchain boundary. Implementations are invoked at most once
/// per render request.
#[async_trait]
pub trait DocumentCompiler: Send + Sync {
    async fn compile(&self, job: &CompileJob) -> Result<Bytes, CompileError>;
}

/// Runs a local `pdflatex` in a throwaway directory.
#[derive(Debug, Clone)]
pub struct PdfLatexCompiler {
    program: PathBuf,
    timeout: Duration,
    max_output_bytes: usize,
}

impl PdfLatexCompiler {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration, max_output_bytes: usize) -> Self {
        Self {
            program: program.into(),
            timeout,
            max_output_bytes,
        }
    }

    pub fn shared(self) -> Arc<dyn DocumentCompiler> {
        Arc::new(self)
    }
}

#[async_trait]
impl DocumentCompiler for PdfLatexCompiler {
    async fn compile(&self, job: &CompileJob) -> Result<Bytes, CompileError> {
        // Dropped at the end of this call on every path, removing the directory.
        let workdir = tempfile::Builder::new().prefix("resume-").tempdir()?;
        prepare_workdir(workdir.path(), job).await?;

        let mut child = Command::new(&self.program)
            .args(["-interaction=nonstopmode", "-halt-on-error", TEX_FILE])
            .current_dir(workdir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CompileError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let limit = self.max_output_bytes;

        let run = async {
            let (status, out, err) = tokio::join!(
                child.wait(),
                read_bounded(stdout, limit),
                read_bounded(stderr, limit)
            );
            Ok::<_, std::io::Error>((status?, out?, err?))
        };

        let outcome = tokio::time::timeout(self.timeout, run).await;
        let (status, stdout, stderr) = match outcome {
            Ok(result) => result?,
            Err(_) => {
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill timed-out compiler: {e}");
                }
                return Err(CompileError::Timeout(self.timeout));
            }
        };

        if !status.success() {
            // pdflatex reports errors on stdout; stderr is usually empty.
            let log_tail = log_tail(&stdout, LOG_TAIL_LINES);
            debug!(
                "Compiler stderr: {}",
                String::from_utf8_lossy(&stderr).trim()
            );
            return Err(CompileError::Failed {
                status: status.to_string(),
                log_tail,
            });
        }

        let pdf = match tokio::fs::read(workdir.path().join(PDF_FILE)).await {
            Ok(pdf) => pdf,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CompileError::MissingOutput)
            }
            Err(e) => return Err(e.into()),
        };

        info!("Compiled PDF: {} bytes", pdf.len());
        Ok(Bytes::from(pdf))
    }
}

/// Writes the source and every asset into `dir`. Asset names must be bare
/// file names.
async fn prepare_workdir(dir: &Path, job: &CompileJob) -> Result<(), CompileError> {
    tokio::fs::write(dir.join(TEX_FILE), &job.source).await?;

    for asset in &job.assets {
        let is_bare = Path::new(&asset.name).file_name() == Some(OsStr::new(&asset.name));
        if !is_bare || asset.name == TEX_FILE {
            return Err(CompileError::InvalidAssetName(asset.name.clone()));
        }
        tokio::fs::write(dir.join(&asset.name), asset.contents.as_bytes()).await?;
    }
    Ok(())
}

/// Reads `reader` to the end, keeping at most `limit` bytes. The rest is
/// drained and discarded so the child never blocks on a full pipe.
async fn read_bounded<R>(reader: Option<R>, limit: usize) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return Ok(Vec::new());
    };

    let mut kept = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        let room = limit.saturating_sub(kept.len());
        kept.extend_from_slice(&chunk[..n.min(room)]);
    }
    Ok(kept)
}

/// Last `lines` lines of captured output, lossily decoded.
fn log_tail(output: &[u8], lines: usize) -> String {
    let text = String::from_utf8_lossy(output);
    let all: Vec<&str> = text.lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}
