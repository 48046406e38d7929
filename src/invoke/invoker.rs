// Invoker trait

use crate::invoke::{ExecutionRequest, RawResult};
use crate::locator::ExecutorKind;
use async_trait::async_trait;

/// Performs one call against an executor.
///
/// `invoke` is total: resolution failures, spawn errors, timeouts and
/// transport errors all come back as a `RawResult`.
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Executor kind served by this invoker
    fn kind(&self) -> ExecutorKind;

    /// Run the request and collect the raw result
    async fn invoke(&self, request: &ExecutionRequest) -> RawResult;
}
