//! Batch composition of block declaration files

use std::io::Write;
use std::path::{Path, PathBuf};

use blockforge_registry::{Block, BlockRegistrar, ComposedBlock, Composer};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::WorkerConfig;
use crate::error::{Result, WorkerError};

/// Outcome of one batch
#[derive(Debug, Default)]
pub struct Report {
    pub composed: Vec<ComposedBlock>,
    pub skipped: usize,
    pub failed: Vec<(PathBuf, String)>,
}

impl Report {
    pub fn total(&self) -> usize {
        self.composed.len() + self.skipped + self.failed.len()
    }

    /// Turn recorded failures into an error
    pub fn into_result(self) -> Result<Self> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            Err(WorkerError::BlocksFailed {
                failed: self.failed.len(),
                total: self.total(),
            })
        }
    }
}

/// Every `*.json` file in `dir`, sorted by file name
pub fn block_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Read one block declaration
pub fn load_block(path: &Path) -> Result<Block> {
    let text = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text)?;
    Ok(Block::from_value(value)?)
}

/// Compose every block declaration in the configured directory
///
/// A failing block is logged and recorded; the remaining blocks are still composed.
pub fn compose_dir<R: BlockRegistrar>(composer: &Composer<R>, dir: &Path) -> Result<Report> {
    let mut report = Report::default();

    for path in block_files(dir)? {
        let outcome = load_block(&path).and_then(|block| Ok(composer.compose(block)?));
        match outcome {
            Ok(Some(composed)) => {
                debug!(path = %path.display(), block = %composed.slug(), "composed block file");
                report.composed.push(composed);
            }
            Ok(None) => {
                debug!(path = %path.display(), "block has no name, skipped");
                report.skipped += 1;
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to compose block");
                report.failed.push((path, e.to_string()));
            }
        }
    }

    info!(
        composed = report.composed.len(),
        skipped = report.skipped,
        failed = report.failed.len(),
        "batch finished"
    );
    Ok(report)
}

fn to_json(value: &impl serde::Serialize, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

/// Write `<slug>.json` per composed field group into `dir`
pub fn write_dir(composed: &[ComposedBlock], dir: &Path, pretty: bool) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(composed.len());
    for block in composed {
        let path = dir.join(format!("{}.json", block.slug()));
        std::fs::write(&path, to_json(&block.field_group, pretty)?)?;
        debug!(path = %path.display(), "wrote field group");
        written.push(path);
    }
    Ok(written)
}

/// Write all composed field groups as one JSON array
pub fn write_stream<W: Write>(composed: &[ComposedBlock], out: &mut W, pretty: bool) -> Result<()> {
    let groups: Vec<_> = composed.iter().map(|block| &block.field_group).collect();
    writeln!(out, "{}", to_json(&groups, pretty)?)?;
    Ok(())
}

/// Compose the configured directory and write the results
pub fn run<R: BlockRegistrar, W: Write>(
    config: &WorkerConfig,
    composer: &Composer<R>,
    stdout: &mut W,
) -> Result<Report> {
    let report = compose_dir(composer, &config.blocks_dir)?;

    match &config.output_dir {
        Some(dir) => {
            let written = write_dir(&report.composed, dir, config.pretty)?;
            info!(dir = %dir.display(), files = written.len(), "wrote composed field groups");
        }
        None => write_stream(&report.composed, stdout, config.pretty)?,
    }

    report.into_result()
}
