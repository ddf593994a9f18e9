//! Remote dialogue service layer for SAGE.
//!
//! Talks to the dialogue runtime over HTTP, decodes its loosely-structured
//! replies into plain text, and offers an offline mock agent implementing
//! the same seam.

pub mod client;
pub mod config;
pub mod decode;
pub mod mock;

pub use client::{DialogueAgent, DialogueClient};
pub use config::DialogueConfig;
pub use decode::decode_response;
pub use mock::MockDialogueAgent;
