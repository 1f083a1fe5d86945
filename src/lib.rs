//! Vidlingo - Video Subtitle Transcription and Translation
//!
//! Turns a video into SRT subtitles and translates them into any number of
//! languages: ffmpeg extracts the audio, an OpenAI-compatible service
//! transcribes it, and a chat model translates the transcript.

pub mod cli;
pub mod config;
pub mod error;
pub mod language;
pub mod media;
pub mod pipeline;
pub mod scratch;
pub mod store;
pub mod subtitle;
pub mod transcribe;
pub mod translate;
pub mod workflow;
