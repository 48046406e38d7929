// Invoke module - carries a request to an executor and collects the raw result
// One Invoker implementation per executor kind
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod config;
pub mod error;
pub mod invoker;
pub mod local;
pub mod remote;
pub mod types;

pub use config::{ExecutionConstraints, InvokeConfig};
pub use error::InvokeError;
pub use invoker::Invoker;
pub use local::LocalInvoker;
pub use remote::RemoteInvoker;
pub use types::{ExecutionRequest, Operation, RawResult, RawStatus, RunResponse, Source};
