//! Benchmark parameter types.
//!
//! Groups related benchmark parameters into structs so that Criterion IDs
//! render consistently across groups.

use std::fmt;

use prima_core::MstVariant;

/// Parameters for an MST benchmark run.
#[derive(Clone, Debug)]
pub struct MstBenchParams {
    /// Variant being measured.
    pub variant: MstVariant,
    /// Number of vertices in the graph.
    pub vertices: usize,
    /// Total workers across processes and threads.
    pub workers: usize,
}

impl fmt::Display for MstBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},n={},workers={}",
            self.variant, self.vertices, self.workers
        )
    }
}

/// Parameters for a matrix codec benchmark run.
#[derive(Clone, Debug)]
pub struct CodecBenchParams {
    /// Number of vertices in the matrix.
    pub vertices: usize,
}

impl fmt::Display for CodecBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}", self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_name_the_variant_and_size() {
        let params = MstBenchParams {
            variant: MstVariant::Hybrid,
            vertices: 500,
            workers: 8,
        };
        assert_eq!(params.to_string(), "hybrid,n=500,workers=8");
        assert_eq!(CodecBenchParams { vertices: 10 }.to_string(), "n=10");
    }
}
