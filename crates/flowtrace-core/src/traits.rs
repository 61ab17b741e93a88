//! Core kernel traits.
//!
//! This module defines the traits that all kernels implement:
//! - `AnalyticKernel`: base trait for all kernels
//! - `BatchKernel`: typed execution with validation and timeout support
//!
//! The engine itself is pure and synchronous; `BatchKernel` is the
//! invocation boundary. `execute_with_timeout` is the cancellation hook for
//! kernels with unbounded worst-case cost (the structural clone search).

use crate::error::{EngineError, Result};
use crate::kernel::KernelMetadata;
use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;

/// Base trait for all analytical kernels.
///
/// Provides access to kernel metadata and configuration validation.
pub trait AnalyticKernel: Send + Sync + Debug {
    /// Returns the kernel metadata.
    fn metadata(&self) -> &KernelMetadata;

    /// Validate kernel configuration.
    ///
    /// Called before kernel execution to ensure configuration is valid.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Returns the kernel ID.
    fn id(&self) -> &str {
        &self.metadata().id
    }
}

/// Trait for typed kernel execution.
///
/// # Type Parameters
///
/// - `I`: Input type
/// - `O`: Output type
#[async_trait]
pub trait BatchKernel<I, O>: AnalyticKernel
where
    I: Send + Sync,
    O: Send + Sync,
{
    /// Execute the kernel with the given input.
    async fn execute(&self, input: I) -> Result<O>;

    /// Validate the input before execution.
    ///
    /// Override to provide custom input validation.
    fn validate_input(&self, _input: &I) -> Result<()> {
        Ok(())
    }

    /// Execute the kernel with a deadline.
    ///
    /// # Arguments
    ///
    /// * `input` - The input data for the kernel
    /// * `timeout` - Maximum execution time
    ///
    /// # Returns
    ///
    /// The kernel output, or `EngineError::Timeout` if the deadline passed.
    async fn execute_with_timeout(&self, input: I, timeout: Duration) -> Result<O>
    where
        I: 'async_trait,
    {
        match tokio::time::timeout(timeout, self.execute(input)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(EngineError::Timeout(timeout)),
        }
    }
}
