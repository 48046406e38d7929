// Locator module - decides which executor serves a request
// Local targets come from an ordered filesystem search, remote targets from config
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod config;
pub mod error;
pub mod search;
pub mod types;

pub use config::{LocalSettings, RemoteSettings};
pub use error::LocateError;
pub use search::{
    Candidate, CandidateOrigin, SEARCH_ORDER, candidates, configured_candidate, resolve_local,
    resolve_remote,
};
pub use types::{ExecutorKind, ExecutorTarget, SourceFile};
