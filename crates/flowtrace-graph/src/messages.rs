//! Input/output message types for graph kernels.

use crate::isomorphism::StructuralCloneSearch;
use crate::types::{AccountGraph, CloneSearchResult};
use async_trait::async_trait;
use flowtrace_core::error::{EngineError, Result};
use flowtrace_core::traits::BatchKernel;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Input for the structural clone search kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneSearchInput {
    /// Graph to search.
    pub graph: AccountGraph,
    /// Account whose ego network is the reference shape.
    pub target_node: String,
    /// Hop radius of the ego network (must be at least 1).
    pub hops: usize,
}

/// Output of the structural clone search kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneSearchOutput {
    /// Search result.
    pub result: CloneSearchResult,
    /// Compute time in microseconds.
    pub compute_time_us: u64,
}

#[async_trait]
impl BatchKernel<CloneSearchInput, CloneSearchOutput> for StructuralCloneSearch {
    async fn execute(&self, input: CloneSearchInput) -> Result<CloneSearchOutput> {
        self.validate_input(&input)?;
        let start = Instant::now();
        let result = self.compute(&input.graph, &input.target_node, input.hops);
        Ok(CloneSearchOutput {
            result,
            compute_time_us: start.elapsed().as_micros() as u64,
        })
    }

    fn validate_input(&self, input: &CloneSearchInput) -> Result<()> {
        if input.hops < 1 {
            return Err(EngineError::validation("hops must be at least 1"));
        }
        Ok(())
    }
}
