mod support;

use vidlingo::config::{ApiConfig, TranscriberConfig, TranslateConfig};
use vidlingo::error::VidlingoError;
use vidlingo::subtitle::SubtitleDocument;
use vidlingo::transcribe::Transcriber;
use vidlingo::transcribe::openai::OpenAiTranscriber;
use vidlingo::translate::Translator;
use vidlingo::translate::openai::OpenAiTranslator;
use vidlingo::translate::prompt::SYSTEM_PROMPT;

use support::{FakeServer, TRANSCRIPT};

fn api(server: &FakeServer) -> ApiConfig {
    ApiConfig {
        base_url: server.base_url.clone(),
        ..ApiConfig::default()
    }
}

fn audio_file() -> tempfile::NamedTempFile {
    let file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
    std::fs::write(file.path(), b"ID3\x03\x00fake-mp3-frames").unwrap();
    file
}

#[tokio::test]
async fn transcriber_posts_multipart_and_returns_srt() {
    let server = FakeServer::respond_once(200, "text/plain", TRANSCRIPT.to_string()).await;
    let transcriber =
        OpenAiTranscriber::with_api_key(&api(&server), TranscriberConfig::default(), "sk-test".to_string()).unwrap();
    let audio = audio_file();

    let transcript = transcriber.transcribe(audio.path()).await.unwrap();
    assert_eq!(transcript.as_str(), TRANSCRIPT);

    let request = server.request().await;
    assert!(request.starts_with("POST /v1/audio/transcriptions "));
    assert!(request.to_lowercase().contains("authorization: bearer sk-test"));
    assert!(request.contains("multipart/form-data"));
    assert!(request.contains("name=\"model\"\r\n\r\nwhisper-1"));
    assert!(request.contains("name=\"response_format\"\r\n\r\nsrt"));
    assert!(request.contains("name=\"file\"; filename=\""));
    assert!(request.contains("fake-mp3-frames"));
}

#[tokio::test]
async fn transcriber_reports_api_errors() {
    let server = FakeServer::respond_once(
        401,
        "application/json",
        r#"{"error":{"message":"Incorrect API key provided"}}"#.to_string(),
    )
    .await;
    let transcriber =
        OpenAiTranscriber::with_api_key(&api(&server), TranscriberConfig::default(), "sk-bad".to_string()).unwrap();
    let audio = audio_file();

    let err = transcriber.transcribe(audio.path()).await.unwrap_err();
    match err {
        VidlingoError::Transcription(message) => {
            assert!(message.contains("401"));
            assert!(message.contains("Incorrect API key provided"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn transcriber_rejects_empty_transcript() {
    let server = FakeServer::respond_once(200, "text/plain", "\n".to_string()).await;
    let transcriber =
        OpenAiTranscriber::with_api_key(&api(&server), TranscriberConfig::default(), "sk-test".to_string()).unwrap();
    let audio = audio_file();

    let err = transcriber.transcribe(audio.path()).await.unwrap_err();
    assert!(matches!(err, VidlingoError::Transcription(ref m) if m.contains("Empty transcript")));
}

#[tokio::test]
async fn translator_sends_prompts_and_trims_reply() {
    let reply = serde_json::json!({
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "\n1\n00:00:00,000 --> 00:00:02,500\nMerhaba.\n\n" },
            "finish_reason": "stop"
        }]
    });
    let server = FakeServer::respond_once(200, "application/json", reply.to_string()).await;
    let translator =
        OpenAiTranslator::with_api_key(&api(&server), TranslateConfig::default(), "sk-test".to_string()).unwrap();

    let translated = translator
        .translate(&SubtitleDocument::new(TRANSCRIPT), "Turkish")
        .await
        .unwrap();
    assert_eq!(translated.as_str(), "1\n00:00:00,000 --> 00:00:02,500\nMerhaba.");

    let request = server.request().await;
    assert!(request.starts_with("POST /v1/chat/completions "));
    assert!(request.to_lowercase().contains("authorization: bearer sk-test"));

    let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(json["model"], "gpt-4o-mini");
    assert_eq!(json["messages"][0]["role"], "system");
    assert_eq!(json["messages"][0]["content"], SYSTEM_PROMPT);
    assert_eq!(json["messages"][1]["role"], "user");

    let user = json["messages"][1]["content"].as_str().unwrap();
    assert!(user.starts_with("Could you please translate the .srt text below to Turkish?"));
    assert!(user.ends_with(&format!("<Transcription>{}</Transcription>", TRANSCRIPT)));
}

#[tokio::test]
async fn translator_failure_names_the_language() {
    let server = FakeServer::respond_once(
        500,
        "application/json",
        r#"{"error":{"message":"The server had an error"}}"#.to_string(),
    )
    .await;
    let translator =
        OpenAiTranslator::with_api_key(&api(&server), TranslateConfig::default(), "sk-test".to_string()).unwrap();

    let err = translator
        .translate(&SubtitleDocument::new(TRANSCRIPT), "German")
        .await
        .unwrap_err();

    match err {
        VidlingoError::Translation { language, message } => {
            assert_eq!(language, "German");
            assert!(message.contains("500"));
            assert!(message.contains("The server had an error"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
