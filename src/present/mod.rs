// Present module - UI state, rendering and the persisted credential
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod console;
pub mod controller;
pub mod credential;
pub mod error;
pub mod render;
pub mod samples;

pub use console::{ConsoleStyle, ConsoleSurface};
pub use controller::{Controller, ControllerState, Surface, Trigger};
pub use credential::{
    CREDENTIAL_STORAGE_KEY, Credential, CredentialStore, FileCredentialStore,
    MemoryCredentialStore,
};
pub use error::CredentialError;
pub use render::{Status, StatusKind, View};
