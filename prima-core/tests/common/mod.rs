//! Fixtures shared by the integration tests.

use std::{
    fs, io,
    path::PathBuf,
};

use prima_core::{Engine, EngineBuilder, MstVariant, RunError};
use tempfile::TempDir;

/// A triangle whose tree is the edges 0–1 and 1–2.
pub const TRIANGLE: &str = "0,1,4\n1,0,2\n4,2,0\n";

/// Result matrix expected for [`TRIANGLE`].
pub const TRIANGLE_TREE: &str = "9999,1,9999\n1,9999,2\n9999,2,9999\n";

/// Scratch directory holding an input graph and the run's outputs.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Creates a workspace whose `input.csv` holds `contents`.
    pub fn with_input(contents: &str) -> io::Result<Self> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("input.csv"), contents)?;
        Ok(Self { dir })
    }

    pub fn input(&self) -> PathBuf {
        self.dir.path().join("input.csv")
    }

    pub fn output(&self, variant: MstVariant) -> PathBuf {
        self.dir.path().join(format!("{variant}_output.csv"))
    }

    pub fn log(&self) -> PathBuf {
        self.dir.path().join("log_time.txt")
    }

    /// Engine reading and writing inside the workspace.
    pub fn engine(
        &self,
        variant: MstVariant,
        threads: usize,
        processes: usize,
    ) -> Result<Engine, RunError> {
        EngineBuilder::new()
            .with_variant(variant)
            .with_threads(threads)
            .with_processes(processes)
            .with_input(self.input())
            .with_output(self.output(variant))
            .with_log(self.log())
            .build()
    }
}
