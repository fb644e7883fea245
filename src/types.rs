use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::config::RelayConfig;
use crate::error::RelayError;

/// The validated `prompt` field of an inbound relay request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionPrompt(String);

impl CompletionPrompt {
    /// Pulls `prompt` out of a parsed request body.
    ///
    /// Anything other than a non-empty JSON string (absent, `null`, `""`,
    /// numbers, objects, or a body that is not an object at all) is rejected.
    pub fn from_body(body: &Value) -> Result<Self, RelayError> {
        body.get("prompt")
            .and_then(Value::as_str)
            .filter(|prompt| !prompt.is_empty())
            .map(|prompt| Self(prompt.to_string()))
            .ok_or(RelayError::MissingPrompt)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChatReq {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f64,
}

impl ChatReq {
    /// Builds the fixed upstream template around a user prompt.
    pub fn for_prompt(config: &RelayConfig, prompt: CompletionPrompt) -> Self {
        Self {
            model: config.model.clone(),
            messages: vec![
                Message::system(config.system_prompt.clone()),
                Message::user(prompt.into_inner()),
            ],
            temperature: config.temperature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// The part of an upstream chat completion the relay reads.
///
/// Every level decodes leniently: a segment of `choices[0].message.content`
/// that is missing, `null`, or of the wrong type becomes `None` instead of
/// failing the whole response.
#[derive(Debug, Default, Deserialize)]
pub struct ChatResp {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub choices: Option<Vec<Option<Choice>>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Choice {
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<String>,
}

impl ChatResp {
    /// Reads any JSON document; anything that is not an object yields no choices.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// `choices[0].message.content`, or an empty string if any segment is missing.
    pub fn reply_text(self) -> String {
        self.choices
            .and_then(|choices| choices.into_iter().next())
            .flatten()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default()
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<Option<T>>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

#[derive(Debug, Serialize)]
pub struct ReplyResp {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct ErrResp {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResp {
    pub ok: bool,
    pub service: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_accepts_non_empty_string() {
        let prompt = CompletionPrompt::from_body(&json!({ "prompt": "What is osmosis?" })).unwrap();
        assert_eq!(prompt.as_str(), "What is osmosis?");

        // Whitespace is content, not emptiness.
        let prompt = CompletionPrompt::from_body(&json!({ "prompt": "  " })).unwrap();
        assert_eq!(prompt.as_str(), "  ");
    }

    #[test]
    fn prompt_rejects_missing_null_empty_and_non_string() {
        for body in [
            json!({}),
            json!({ "prompt": null }),
            json!({ "prompt": "" }),
            json!({ "prompt": 42 }),
            json!({ "prompt": ["a"] }),
            json!(null),
            json!([1, 2]),
            json!("prompt"),
        ] {
            assert!(
                matches!(CompletionPrompt::from_body(&body), Err(RelayError::MissingPrompt)),
                "expected rejection for {body}"
            );
        }
    }

    #[test]
    fn upstream_request_follows_fixed_template() {
        let config = RelayConfig::default();
        let prompt = CompletionPrompt::from_body(&json!({ "prompt": "Explain mitosis" })).unwrap();
        let req = ChatReq::for_prompt(&config, prompt);

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    { "role": "system", "content": "You are a helpful study tutor. Be clear and concise." },
                    { "role": "user", "content": "Explain mitosis" }
                ],
                "temperature": 0.7
            })
        );
    }

    #[test]
    fn reply_text_reads_first_choice() {
        let resp: ChatResp = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "first" } },
                { "index": 1, "message": { "role": "assistant", "content": "second" } }
            ]
        }))
        .unwrap();
        assert_eq!(resp.reply_text(), "first");
    }

    #[test]
    fn malformed_later_choices_do_not_hide_the_first() {
        let resp = ChatResp::from_value(json!({
            "choices": [
                { "message": { "content": "kept" } },
                null,
                "garbage"
            ]
        }));
        assert_eq!(resp.reply_text(), "kept");
    }

    #[test]
    fn reply_text_defaults_when_path_is_missing() {
        for value in [
            json!({}),
            json!({ "choices": null }),
            json!({ "choices": [] }),
            json!({ "choices": [{}] }),
            json!({ "choices": [{ "message": null }] }),
            json!({ "choices": [{ "message": { "role": "assistant" } }] }),
            json!({ "choices": [{ "message": { "content": null } }] }),
            json!({ "choices": [null] }),
            json!({ "choices": {} }),
            json!({ "choices": "none" }),
            json!({ "choices": ["text"] }),
            json!({ "choices": [{ "message": "text" }] }),
            json!({ "choices": [{ "message": { "content": ["a", "b"] } }] }),
            json!({ "choices": [{ "message": { "content": 7 } }] }),
            json!([]),
            json!("not an object"),
            json!(null),
        ] {
            let resp = ChatResp::from_value(value.clone());
            assert_eq!(resp.reply_text(), "", "unexpected reply for {value}");
        }
    }
}
