use serde::{Deserialize, Serialize};

/// Persona given to the model as the system message.
pub const SYSTEM_PROMPT: &str =
    "You are a very helpful and talented translator who can translate all languages and srt files.";

/// The instruction is the only thing keeping the model from touching
/// timestamps and block layout, so its wording must stay exactly as is.
pub fn build_user_prompt(text: &str, target_language: &str) -> String {
    format!(
        "Could you please translate the .srt text below to {}? Do not add any comments of yours only the translation. This is crucial, even if the language of the given text and the selected language is same, do not change the given text and return it same as original.\
         Please do not change the timestamps and structure of the file.\n<Transcription>{}</Transcription>",
        target_language, text
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

pub fn build_messages(text: &str, target_language: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_user_prompt(text, target_language)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_prompt_matches_template() {
        let prompt = build_user_prompt("1\n00:00:00,000 --> 00:00:01,000\nHi\n", "French");
        assert_eq!(
            prompt,
            "Could you please translate the .srt text below to French? Do not add any comments of yours only the translation. This is crucial, even if the language of the given text and the selected language is same, do not change the given text and return it same as original.Please do not change the timestamps and structure of the file.\n<Transcription>1\n00:00:00,000 --> 00:00:01,000\nHi\n</Transcription>"
        );
    }

    #[test]
    fn messages_are_system_then_user() {
        let messages = build_messages("text", "German");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::system(SYSTEM_PROMPT));
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.contains("to German?"));
    }
}
