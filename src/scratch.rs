//! Scratch files for a single pipeline run.
//!
//! Every [`ScratchFile`] is a guard: it is released exactly once, either
//! explicitly through [`ScratchFile::release`] or implicitly when it is
//! dropped (early return, error propagation, panic unwinding). Release
//! failures are logged and never surface as pipeline errors.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempPath;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScratchKind {
    Video,
    Audio,
}

impl fmt::Display for ScratchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
        }
    }
}

#[derive(Debug, Default)]
struct Ledger {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

/// Creates uniquely named scratch files in one directory and counts
/// acquisitions against releases.
#[derive(Debug, Clone)]
pub struct ScratchManager {
    dir: PathBuf,
    ledger: Arc<Ledger>,
}

impl ScratchManager {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            ledger: Arc::new(Ledger::default()),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        match &config.scratch_dir {
            Some(dir) => Self::new(dir.clone()),
            None => Self::new(std::env::temp_dir()),
        }
    }

    /// Create an empty, uniquely named file owned by the returned guard.
    pub fn acquire(&self, kind: ScratchKind, suffix: &str) -> Result<ScratchFile> {
        let prefix = format!("vidlingo-{}-", kind);
        let temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(suffix)
            .tempfile_in(&self.dir)?
            .into_temp_path();

        self.ledger.acquired.fetch_add(1, Ordering::SeqCst);
        let path = temp.to_path_buf();
        debug!("Acquired {} scratch file: {}", kind, path.display());

        Ok(ScratchFile {
            kind,
            path,
            temp: Some(temp),
            ledger: Arc::clone(&self.ledger),
        })
    }

    /// Release a scratch file. Equivalent to [`ScratchFile::release`].
    pub fn release(&self, file: ScratchFile) {
        file.release();
    }

    pub fn acquired(&self) -> usize {
        self.ledger.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.ledger.released.load(Ordering::SeqCst)
    }

    /// Number of scratch files acquired but not yet released.
    pub fn outstanding(&self) -> usize {
        self.acquired().saturating_sub(self.released())
    }
}

pub struct ScratchFile {
    kind: ScratchKind,
    path: PathBuf,
    temp: Option<TempPath>,
    ledger: Arc<Ledger>,
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ScratchKind {
        self.kind
    }

    /// Delete the file now.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        let Some(temp) = self.temp.take() else {
            return;
        };

        self.ledger.released.fetch_add(1, Ordering::SeqCst);
        match temp.close() {
            Ok(()) => debug!("Released {} scratch file: {}", self.kind, self.path.display()),
            Err(e) => warn!(
                "Failed to remove {} scratch file {}: {}",
                self.kind,
                self.path.display(),
                e
            ),
        }
    }
}

impl fmt::Debug for ScratchFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchFile")
            .field("kind", &self.kind)
            .field("path", &self.path)
            .field("released", &self.temp.is_none())
            .finish()
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        self.release_inner();
    }
}
