//! Input/output message types for forensics kernels.

use crate::pipeline::AnalysisPipeline;
use crate::types::{AnalysisReport, Transaction};
use async_trait::async_trait;
use flowtrace_core::error::Result;
use flowtrace_core::traits::BatchKernel;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Input for the analysis pipeline kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeLedgerInput {
    /// Transactions of one dataset, in ledger order.
    pub transactions: Vec<Transaction>,
}

/// Output of the analysis pipeline kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeLedgerOutput {
    /// The full analysis report.
    pub report: AnalysisReport,
    /// Compute time in microseconds.
    pub compute_time_us: u64,
}

#[async_trait]
impl BatchKernel<AnalyzeLedgerInput, AnalyzeLedgerOutput> for AnalysisPipeline {
    async fn execute(&self, input: AnalyzeLedgerInput) -> Result<AnalyzeLedgerOutput> {
        let start = Instant::now();
        let report = self.run(&input.transactions);
        Ok(AnalyzeLedgerOutput {
            report,
            compute_time_us: start.elapsed().as_micros() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_execute_empty_ledger() {
        let kernel = AnalysisPipeline::new();
        let output = kernel
            .execute(AnalyzeLedgerInput {
                transactions: Vec::new(),
            })
            .await
            .unwrap();

        assert_eq!(output.report.summary.total_accounts_analyzed, 0);
    }

    #[tokio::test]
    async fn test_output_serializes_to_plain_json() {
        let kernel = AnalysisPipeline::new();
        let output = kernel
            .execute(AnalyzeLedgerInput {
                transactions: Vec::new(),
            })
            .await
            .unwrap();

        let json = serde_json::to_value(&output.report).unwrap();
        assert!(json.get("summary").is_some());
        assert!(json.get("suspicious_accounts").is_some());
        assert!(json.get("fraud_rings").is_some());
    }
}
