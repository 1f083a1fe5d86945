// Audio extraction
//
// The pipeline only needs one media operation: turn an uploaded video into a
// fixed-format audio file for speech-to-text. The transcoding itself is done
// by an external ffmpeg binary.
// - Processor: ffmpeg-backed extractor
// - Commands: command builders and execution

pub mod commands;
pub mod processor;

use async_trait::async_trait;
use std::path::Path;

pub use commands::*;
pub use processor::*;

use crate::config::MediaConfig;
use crate::error::Result;

/// Video containers accepted for upload
pub const SUPPORTED_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv"];

/// Output constraints handed to the transcoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub codec: &'static str,
    pub sample_rate: u32,
    pub channels: u32,
    pub bitrate: &'static str,
    /// File suffix including the dot
    pub suffix: &'static str,
}

impl AudioFormat {
    /// 44.1 kHz stereo MP3 at 192 kbit/s
    pub const MP3_STEREO: AudioFormat = AudioFormat {
        codec: "libmp3lame",
        sample_rate: 44_100,
        channels: 2,
        bitrate: "192k",
        suffix: ".mp3",
    };
}

/// Main trait for audio extraction
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    /// Transcode `video_path` into `audio_path`, overwriting it.
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()>;

    /// Format written by [`AudioExtractor::extract_audio`]
    fn output_format(&self) -> AudioFormat {
        AudioFormat::MP3_STEREO
    }

    /// Check if the transcoder is available
    fn check_availability(&self) -> Result<()>;
}

/// Factory for creating audio extractor instances
pub struct MediaProcessorFactory;

impl MediaProcessorFactory {
    /// Create the default audio extractor (ffmpeg-based)
    pub fn create_processor(config: MediaConfig) -> Box<dyn AudioExtractor> {
        Box::new(processor::FfmpegExtractor::new(config))
    }
}
