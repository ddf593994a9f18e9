//! Use-case layer for SAGE.
//!
//! Wires one conversational turn end-to-end: send, decode, derive the
//! intent, drive the highlight, and keep the transcript.

pub mod assistant_usecase;
pub mod transcript;

pub use assistant_usecase::AssistantUsecase;
pub use transcript::{TranscriptEntry, TranscriptLog, TranscriptRole};
