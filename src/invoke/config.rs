// Invocation configuration

/// Default wall-clock cap for a local tool run
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default per-stream capture ceiling (10 MiB)
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;
/// Default playground request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Default ceiling for a playground response body (1 MiB)
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Limits for a single local execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionConstraints {
    /// Maximum execution time in seconds
    pub timeout_secs: u64,
    /// Maximum bytes captured from each of stdout and stderr
    pub max_output_bytes: usize,
}

impl Default for ExecutionConstraints {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

/// Invocation configuration for both executor kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeConfig {
    /// Local execution limits
    pub constraints: ExecutionConstraints,
    /// Playground request timeout in seconds
    pub request_timeout_secs: u64,
    /// Maximum playground response body size in bytes
    pub max_response_bytes: usize,
}

impl Default for InvokeConfig {
    fn default() -> Self {
        Self {
            constraints: ExecutionConstraints::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}
