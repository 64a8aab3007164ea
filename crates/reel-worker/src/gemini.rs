//! Gemini script writer.
//!
//! Asks Gemini for a JSON scene script, trying each model in order until
//! one returns a usable script.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use reel_models::{Script, VideoBrief, VideoStyle};

use crate::collaborators::ScriptWriter;
use crate::error::{WorkerError, WorkerResult};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_MODELS: &[&str] = &["gemini-2.5-flash", "gemini-2.5-flash-lite", "gemini-2.5-pro"];

/// Gemini-backed [`ScriptWriter`].
pub struct GeminiScriptWriter {
    api_key: String,
    base_url: String,
    models: Vec<String>,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

impl GeminiScriptWriter {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            client: Client::new(),
        }
    }

    /// Create from `GEMINI_API_KEY`.
    pub fn from_env() -> WorkerResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| WorkerError::config_error("GEMINI_API_KEY not set"))?;
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the model fallback order.
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    async fn call_model(&self, model: &str, prompt: &str) -> WorkerResult<Script> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| WorkerError::script_failed(format!("Gemini API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(WorkerError::script_failed(format!(
                "Gemini API returned {}: {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            WorkerError::script_failed(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| WorkerError::script_failed("No content in Gemini response"))?;

        parse_script(text)
    }
}

#[async_trait]
impl ScriptWriter for GeminiScriptWriter {
    async fn write_script(&self, brief: &VideoBrief) -> WorkerResult<Script> {
        let prompt = build_prompt(brief);
        let mut last_error = None;

        for model in &self.models {
            info!("Requesting {} script from {}", brief.style, model);
            match self.call_model(model, &prompt).await {
                Ok(script) => {
                    info!(scenes = script.scenes.len(), "Got script from {}", model);
                    return Ok(script);
                }
                Err(e) => {
                    warn!("Failed with model {}: {}", model, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| WorkerError::script_failed("No Gemini models configured")))
    }
}

/// Parse a script from model output, tolerating a markdown code fence.
pub fn parse_script(text: &str) -> WorkerResult<Script> {
    let text = strip_code_fence(text);
    let script: Script = serde_json::from_str(text)
        .map_err(|e| WorkerError::script_failed(format!("Failed to parse script JSON: {}", e)))?;
    if script.scenes.is_empty() {
        return Err(WorkerError::script_failed("Script has no scenes"));
    }
    Ok(script)
}

fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

fn build_prompt(brief: &VideoBrief) -> String {
    let (format, pacing) = match brief.style {
        VideoStyle::Promo => (
            "a polished 16:9 promotional video of about 25 seconds",
            "5 to 6 scenes of 3 to 5 seconds each",
        ),
        VideoStyle::SocialClip => (
            "a fast vertical 9:16 social clip of about 10 seconds",
            "3 to 4 scenes of 1.5 to 3 seconds each; the first scene is a short, punchy hook",
        ),
    };

    let talking_points = if brief.talking_points.is_empty() {
        "- (none provided)".to_string()
    } else {
        brief
            .talking_points
            .iter()
            .map(|p| format!("- {}", p))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"Write the script for {format} for the business "{name}".

Topic: {topic}
Talking points:
{talking_points}

Return ONLY a single JSON object with this schema:
{{
  "scenes": [
    {{
      "text": "On-screen headline, at most 8 words",
      "narration": "One or two spoken sentences for the voiceover",
      "duration_s": 3.0,
      "visual": "Short description of the background visual"
    }}
  ]
}}

Additional instructions:
- Use {pacing}.
- duration_s is a number of seconds greater than zero.
- End with a scene that invites the viewer to act.
- Return ONLY the JSON object and nothing else.
"#,
        name = brief.business_name,
        topic = brief.topic,
    )
}
