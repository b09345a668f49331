//! Upload-service supervision subsystem.
//!
//! The resumable-upload protocol itself is opaque to the gateway: the
//! external service is spawned once at startup, its output is streamed into
//! the gateway log, and it is terminated when the gateway shuts down. It is
//! never restarted within a gateway lifetime.

pub mod supervisor;

pub use supervisor::{UploadState, UploadSupervisor};
