use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::Config;
use crate::error::ModelError;

/// Modelo generativo: recibe un prompt y devuelve el texto generado
pub trait ModelClient {
    fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Cliente de la API REST de Gemini (`generateContent`)
pub struct GeminiClient {
    http: Client,
    config: Config,
}

impl GeminiClient {
    pub fn new(config: Config) -> Result<Self, ModelError> {
        // Sin límite de tiempo: una respuesta lenta solo retrasa la ejecución
        let http = Client::builder().timeout(None::<Duration>).build()?;
        Ok(GeminiClient { http, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        )
    }
}

impl ModelClient for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        // Crear el cuerpo de la solicitud para la API de Gemini
        let request_body = serde_json::json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ]
        });

        tracing::debug!(model = %self.config.model, prompt_len = prompt.len(), "calling Gemini");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request_body)
            .send()?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Gemini responded");

        if !status.is_success() {
            let message = response
                .json::<Value>()
                .ok()
                .as_ref()
                .and_then(api_error_message)
                .unwrap_or_else(|| status.to_string());
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json = response.json::<Value>()?;
        extract_text(&json)
    }
}

/// Extrae el mensaje de error del cuerpo de una respuesta fallida
fn api_error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(|error| error.get("message"))
        .and_then(|message| message.as_str())
        .map(str::to_string)
}

/// Concatena el texto de las partes del primer candidato
pub fn extract_text(json: &Value) -> Result<String, ModelError> {
    let candidate = json
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|candidates| candidates.first());

    let Some(candidate) = candidate else {
        let reason = json
            .get("promptFeedback")
            .and_then(|feedback| feedback.get("blockReason"))
            .and_then(|reason| reason.as_str())
            .unwrap_or("sin candidatos");
        return Err(ModelError::UnexpectedShape(reason.to_string()));
    };

    let parts = candidate
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array())
        .ok_or_else(|| ModelError::UnexpectedShape("candidato sin contenido".to_string()))?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.trim().is_empty() {
        return Err(ModelError::EmptyResponse);
    }

    Ok(text)
}
