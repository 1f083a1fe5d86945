#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use vidlingo::error::{Result, VidlingoError};
use vidlingo::media::AudioExtractor;
use vidlingo::pipeline::{PipelineState, ProgressObserver};
use vidlingo::subtitle::SubtitleDocument;
use vidlingo::transcribe::Transcriber;
use vidlingo::translate::Translator;

pub const TRANSCRIPT: &str = "1\n00:00:00,000 --> 00:00:02,500\nHello there.\n\n2\n00:00:02,500 --> 00:00:05,000\nWelcome to the show.\n";

mock! {
    pub Extractor {}

    #[async_trait]
    impl AudioExtractor for Extractor {
        async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()>;
        fn check_availability(&self) -> Result<()>;
    }
}

mock! {
    pub TranscriptionApi {}

    #[async_trait]
    impl Transcriber for TranscriptionApi {
        async fn transcribe(&self, audio_path: &Path) -> Result<SubtitleDocument>;
    }
}

mock! {
    pub TranslationApi {}

    #[async_trait]
    impl Translator for TranslationApi {
        async fn translate(&self, document: &SubtitleDocument, target_language: &str) -> Result<SubtitleDocument>;
    }
}

/// Extractor that checks the saved video and touches the audio file
pub fn working_extractor() -> MockExtractor {
    let mut extractor = MockExtractor::new();
    extractor.expect_extract_audio().returning(|video, audio| {
        assert!(video.exists(), "video scratch file should exist during extraction");
        std::fs::write(audio, b"ID3")?;
        Ok(())
    });
    extractor.expect_check_availability().returning(|| Ok(()));
    extractor
}

pub fn working_transcriber() -> MockTranscriptionApi {
    let mut transcriber = MockTranscriptionApi::new();
    transcriber
        .expect_transcribe()
        .returning(|_| Ok(SubtitleDocument::new(TRANSCRIPT)));
    transcriber
}

/// Translator that fails for one language and tags every other one
pub fn translator_failing_for(failing: &'static str) -> MockTranslationApi {
    let mut translator = MockTranslationApi::new();
    translator.expect_translate().returning(move |document, language| {
        if language == failing {
            Err(VidlingoError::Translation {
                language: language.to_string(),
                message: "API error 500 Internal Server Error: upstream overloaded".to_string(),
            })
        } else {
            Ok(tag_cues(document, language))
        }
    });
    translator
}

/// Rewrites cue text as `[language] ...` and leaves structure alone
pub fn tag_cues(document: &SubtitleDocument, language: &str) -> SubtitleDocument {
    let text = document
        .as_str()
        .lines()
        .map(|line| {
            if line.is_empty() || line.contains("-->") || line.chars().all(|c| c.is_ascii_digit()) {
                line.to_string()
            } else {
                format!("[{}] {}", language, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    SubtitleDocument::new(text)
}

/// Follows the translation instructions literally: text already in the
/// target language comes back unchanged.
pub struct ContractTranslator {
    pub source_language: &'static str,
}

#[async_trait]
impl Translator for ContractTranslator {
    async fn translate(&self, document: &SubtitleDocument, target_language: &str) -> Result<SubtitleDocument> {
        if target_language == self.source_language {
            Ok(document.clone())
        } else {
            Ok(tag_cues(document, target_language))
        }
    }
}

/// Translator whose first languages answer last
pub struct SlowFirstTranslator {
    pub delays_ms: Vec<(&'static str, u64)>,
}

#[async_trait]
impl Translator for SlowFirstTranslator {
    async fn translate(&self, document: &SubtitleDocument, target_language: &str) -> Result<SubtitleDocument> {
        let delay = self
            .delays_ms
            .iter()
            .find(|(language, _)| *language == target_language)
            .map(|(_, ms)| *ms)
            .unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(tag_cues(document, target_language))
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    states: Mutex<Vec<PipelineState>>,
}

impl RecordingObserver {
    pub fn states(&self) -> Vec<PipelineState> {
        self.states.lock().unwrap().clone()
    }
}

impl ProgressObserver for RecordingObserver {
    fn on_transition(&self, state: &PipelineState) {
        self.states.lock().unwrap().push(state.clone());
    }
}

pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// A single-request HTTP server standing in for the API.
pub struct FakeServer {
    pub base_url: String,
    request: JoinHandle<String>,
}

impl FakeServer {
    pub async fn respond_once(status: u16, content_type: &'static str, body: String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/v1", listener.local_addr().unwrap());

        let request = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let raw = read_request(&mut socket).await;

            let response = format!(
                "HTTP/1.1 {} Fake\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                content_type,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&raw).to_string()
        });

        Self { base_url, request }
    }

    /// The raw request the server received
    pub async fn request(self) -> String {
        self.request.await.unwrap()
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Vec<u8> {
    let mut raw = Vec::new();
    let mut buf = [0u8; 8192];

    let header_end = loop {
        let n = socket.read(&mut buf).await.unwrap();
        assert!(n > 0, "connection closed before headers were complete");
        raw.extend_from_slice(&buf[..n]);
        if let Some(pos) = find(&raw, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&raw[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok());

    match content_length {
        Some(length) => {
            while raw.len() < header_end + length {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
            }
        }
        None => {
            while find(&raw[header_end..], b"\r\n0\r\n\r\n").is_none() {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
            }
        }
    }

    raw
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}
