use super::SdkError;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LLM_API_URL: &str = "https://llm-api.rise-consulting.net";

/// LLM provider selection, routed server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmName {
    Claude,
    Openai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadBalanceStrategy {
    RoundRobin,
    Random,
}

/// Conversation-memory backend hosted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    Redis,
    InMemory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryStrategy {
    FullSummarize,
    Window,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub text: String,
    pub sensitive_info: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rag_content: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    pub llm_name: LlmName,
    pub llm_group_name: String,
    pub conversation_state_key: String,
    pub load_balancer_strategy_name: LoadBalanceStrategy,
    pub memory_type: MemoryType,
    pub memory_strategy_name: MemoryStrategy,
    pub user_id: String,
    pub prompt: Prompt,
    pub language: String,
    pub system_message: String,
}

/// Answer plus the conversation/LLM metadata the service echoes back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictAnswer {
    pub answer: String,
    pub conversation_state_key: Option<String>,
    pub user_id: Option<String>,
    pub llm_name: Option<String>,
    pub llm_group_name: Option<String>,
    pub memory_type: Option<String>,
    pub system_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub response: PredictAnswer,
}

/// Client for the hosted LLM prediction endpoint. Conversation memory lives
/// on the service side, keyed by `conversation_state_key`.
#[derive(Debug, Clone)]
pub struct LlmClient {
    base_url: String,
    client: Client,
}

impl LlmClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    pub async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, SdkError> {
        let resp = self
            .client
            .post(format!("{}/predict", self.base_url))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(SdkError::Api {
                status,
                message: text,
            });
        }

        let data: PredictResponse = resp
            .json()
            .await
            .map_err(|e| SdkError::Parse(e.to_string()))?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_request(text: &str) -> PredictRequest {
        PredictRequest {
            llm_name: LlmName::Claude,
            llm_group_name: "claude-3-5-sonnet".into(),
            conversation_state_key: "test_key".into(),
            load_balancer_strategy_name: LoadBalanceStrategy::RoundRobin,
            memory_type: MemoryType::Redis,
            memory_strategy_name: MemoryStrategy::FullSummarize,
            user_id: "test_user".into(),
            prompt: Prompt {
                text: text.into(),
                sensitive_info: false,
                rag_content: None,
            },
            language: "english".into(),
            system_message: String::new(),
        }
    }

    #[tokio::test]
    async fn predict_posts_expected_shape_and_parses_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(body_partial_json(serde_json::json!({
                "llm_name": "claude",
                "llm_group_name": "claude-3-5-sonnet",
                "load_balancer_strategy_name": "round_robin",
                "memory_type": "redis",
                "memory_strategy_name": "full_summarize",
                "prompt": { "text": "hello", "sensitive_info": false },
                "language": "english",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": {
                    "answer": "hi",
                    "conversation_state_key": "test_key",
                    "user_id": "test_user",
                    "llm_name": "claude",
                    "llm_group_name": "claude-3-5-sonnet",
                    "memory_type": "redis",
                    "system_message": ""
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::new(server.uri());
        let resp = client.predict(&sample_request("hello")).await.unwrap();
        assert_eq!(resp.response.answer, "hi");
        assert_eq!(resp.response.conversation_state_key.as_deref(), Some("test_key"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = LlmClient::new(server.uri());
        let err = client.predict(&sample_request("hello")).await.unwrap_err();
        assert!(matches!(err, SdkError::Parse(_)));
    }

    #[tokio::test]
    async fn predict_maps_non_2xx_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = LlmClient::new(server.uri());
        let err = client.predict(&sample_request("hello")).await.unwrap_err();
        match err {
            SdkError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "bad gateway");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
