// src/services/ai.rs
//
// Integração opcional com a API de geração de texto (Gemini).
// Tudo aqui é best-effort: qualquer falha vira um texto de fallback e um
// warn no log; nenhum erro chega ao usuário.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::instruction::{Instruction, InstructionStatus};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const SUMMARY_ALL_CLEAR: &str = "All instructions are cleared. Excellent work!";
const SUMMARY_FALLBACK: &str =
    "The AI assistant is temporarily unavailable, but your pending instructions are safe.";

#[derive(Debug, Error)]
pub enum AiError {
    #[error("chave de API não configurada")]
    NotConfigured,

    #[error("falha de rede: {0}")]
    Network(String),

    #[error("API retornou status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("resposta sem texto utilizável")]
    EmptyResponse,
}

// --- Formato de requisição/resposta do generateContent ---

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Clone)]
pub struct AiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    api_url: String,
}

impl AiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            api_url: GEMINI_API_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    // URL customizada para os testes com servidor mock
    #[cfg(test)]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    // Resumo executivo das instruções pendentes visíveis no dashboard
    pub async fn dashboard_summary(&self, instructions: &[Instruction]) -> String {
        let pending: Vec<&Instruction> = instructions
            .iter()
            .filter(|i| i.status == InstructionStatus::Pending)
            .collect();
        if pending.is_empty() {
            return SUMMARY_ALL_CLEAR.to_string();
        }

        let data_subset: Vec<serde_json::Value> = pending
            .iter()
            .map(|i| {
                serde_json::json!({
                    "ref": i.reference_number,
                    "cust": i.customer_code,
                    "loc": i.location,
                    "so": i.sales_order,
                    "update": i.current_update,
                    "comments": i.comments_sales,
                })
            })
            .collect();

        let prompt = format!(
            "Analyze these pending special delivery instructions and provide a concise, \
             professional executive summary (max 150 words). Group them by urgency or common \
             locations. Mention if any look particularly complex based on comments.\n\nData: {}",
            serde_json::Value::Array(data_subset)
        );

        match self
            .generate(
                "You are a senior logistics coordinator assistant. Be professional, direct, and helpful.",
                &prompt,
            )
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Resumo de IA indisponível: {}", e);
                SUMMARY_FALLBACK.to_string()
            }
        }
    }

    // Reescreve um comentário para ficar mais claro; em caso de falha
    // devolve o texto original intacto.
    pub async fn polish_comment(&self, text: &str) -> String {
        if text.len() < 5 {
            return text.to_string();
        }

        let prompt = format!(
            "Rewrite the following logistics comment to be clearer, more professional, and \
             concise. Keep specific details like IDs or codes exactly as they are.\n\nComment: \"{}\"",
            text
        );

        match self
            .generate(
                "You are an expert in industrial logistics communication. Improve the clarity \
                 of the text provided while maintaining all technical details.",
                &prompt,
            )
            .await
        {
            Ok(polished) => polished,
            Err(e) => {
                tracing::warn!("Revisão de comentário indisponível: {}", e);
                text.to_string()
            }
        }
    }

    async fn generate(&self, system: &str, prompt: &str) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::NotConfigured)?;

        let request = GenerateRequest {
            system_instruction: Content {
                parts: vec![Part {
                    text: system.to_string(),
                }],
            },
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let url = format!("{}/{}:generateContent", self.api_url, self.model);
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|text| !text.is_empty())
            .ok_or(AiError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(api_url: String) -> AiClient {
        AiClient::new(Some("test-api-key".to_string())).with_api_url(api_url)
    }

    fn pending_instruction() -> Instruction {
        Instruction {
            id: Uuid::new_v4(),
            reference_number: "20250101SL10001".to_string(),
            created_at: Utc::now(),
            cre_name: "SL1".to_string(),
            cre_user_id: Uuid::new_v4(),
            customer_code: "CUST001".to_string(),
            location: "New York".to_string(),
            sales_order: "SO-9001".to_string(),
            production_order: "PO-8001".to_string(),
            assigned_commercial_user_id: None,
            status: InstructionStatus::Pending,
            current_update: "Under review".to_string(),
            comments_sales: "Initial request".to_string(),
            comments_commercial: String::new(),
            completed_at: None,
            is_deleted: false,
        }
    }

    fn generate_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }] }
            }]
        })
    }

    #[tokio::test]
    async fn summarizes_pending_instructions() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/{}:generateContent", DEFAULT_MODEL)))
            .and(header("x-goog-api-key", "test-api-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(generate_body("Two urgent batches.")),
            )
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let summary = client.dashboard_summary(&[pending_instruction()]).await;

        assert_eq!(summary, "Two urgent batches.");
    }

    #[tokio::test]
    async fn no_pending_rows_skip_the_network_entirely() {
        // Sem servidor: se chamasse a rede, falharia e cairia no fallback
        let client = AiClient::new(Some("test-api-key".to_string()));
        let mut completed = pending_instruction();
        completed.status = InstructionStatus::Completed;

        let summary = client.dashboard_summary(&[completed]).await;
        assert_eq!(summary, SUMMARY_ALL_CLEAR);
    }

    #[tokio::test]
    async fn api_failure_falls_back_to_static_summary() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let summary = client.dashboard_summary(&[pending_instruction()]).await;

        assert_eq!(summary, SUMMARY_FALLBACK);
    }

    #[tokio::test]
    async fn missing_api_key_falls_back_without_calling_out() {
        let client = AiClient::new(None);
        let summary = client.dashboard_summary(&[pending_instruction()]).await;
        assert_eq!(summary, SUMMARY_FALLBACK);
    }

    #[tokio::test]
    async fn polishes_a_comment() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(generate_body("Shipment SO-9001 is awaiting approval.")),
            )
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let polished = client.polish_comment("so-9001 waiting appr").await;

        assert_eq!(polished, "Shipment SO-9001 is awaiting approval.");
    }

    #[tokio::test]
    async fn short_text_is_returned_unchanged() {
        let client = AiClient::new(Some("test-api-key".to_string()));
        assert_eq!(client.polish_comment("ok").await, "ok");
    }

    #[tokio::test]
    async fn polish_failure_keeps_the_original_text() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let original = "please check pallet 7";
        assert_eq!(client.polish_comment(original).await, original);
    }

    #[tokio::test]
    async fn empty_candidates_count_as_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let summary = client.dashboard_summary(&[pending_instruction()]).await;
        assert_eq!(summary, SUMMARY_FALLBACK);
    }
}
