use super::SdkError;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_RAG_API_URL: &str = "https://rag.rise-consulting.net";

/// One document source for an ingestion job. `parameters` and `metadata`
/// are free-form and interpreted by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub target: String,
    pub parameters: serde_json::Value,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestRequest {
    pub data_sources: Vec<DataSource>,
    pub embedder_name: String,
    pub indexer_name: String,
    pub vectorstore_name: String,
    pub collection_name: String,
    pub embed_documents: bool,
    pub index_documents: bool,
    pub user_id: String,
    pub preferred_splitter_type: String,
    pub chunk_size: u32,
    pub chunk_overlap: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RetrieveRequest {
    pub query: String,
    pub k: u32,
    pub collection_name: String,
    pub search_in_vectorstore: bool,
    pub search_in_indexstore: bool,
    pub search_result_count_for_vectorstore: u32,
    pub search_result_count_for_indexstore: u32,
    pub user_id: String,
}

/// Client for the RAG service. Ingestion and retrieval responses are opaque
/// to this app and passed through as raw JSON.
#[derive(Debug, Clone)]
pub struct RagClient {
    base_url: String,
    client: Client,
}

impl RagClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    /// Client that skips TLS certificate verification. The relaxation is
    /// scoped to this one client instance, never the whole process.
    pub fn accept_invalid_certs(base_url: impl Into<String>) -> Result<Self, SdkError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Submit an ingestion job. The service processes documents
    /// asynchronously; a success here means the job was accepted, not that
    /// indexing finished.
    pub async fn ingest(&self, request: &IngestRequest) -> Result<serde_json::Value, SdkError> {
        self.post("/ingest", request).await
    }

    pub async fn retrieve(&self, request: &RetrieveRequest) -> Result<serde_json::Value, SdkError> {
        self.post("/retrieve", request).await
    }

    async fn post<B: Serialize>(&self, route: &str, body: &B) -> Result<serde_json::Value, SdkError> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, route))
            .header("Content-Type", "application/json")
            .json(body)
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

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| SdkError::Parse(e.to_string()))?;
        Ok(data)
    }
}
