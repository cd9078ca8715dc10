use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tauri::State;

use crate::action::{ActionHook, ActionPayload, ActionResult};
use crate::sdk::rag::{
    DataSource, IngestRequest, RagClient, RetrieveRequest, DEFAULT_RAG_API_URL,
};

const COLLECTION_NAME: &str = "vorion_sdk_youtube_transcripts";
const RAG_USER_ID: &str = "vorion_sdk_test_user_1";
const INGEST_TARGET: &str = "https://www.youtube.com/watch?v=gJmz31JywM0";

fn youtube_ingest_request() -> IngestRequest {
    IngestRequest {
        data_sources: vec![DataSource {
            source_type: "youtube".into(),
            target: INGEST_TARGET.into(),
            parameters: serde_json::json!({}),
            metadata: serde_json::json!({}),
        }],
        embedder_name: "azure".into(),
        indexer_name: "elasticsearch".into(),
        vectorstore_name: "chroma".into(),
        collection_name: COLLECTION_NAME.into(),
        embed_documents: true,
        index_documents: true,
        user_id: RAG_USER_ID.into(),
        preferred_splitter_type: "recursive".into(),
        chunk_size: 1000,
        chunk_overlap: 200,
    }
}

fn collection_sample_request() -> RetrieveRequest {
    RetrieveRequest {
        query: String::new(),
        k: 10,
        collection_name: COLLECTION_NAME.into(),
        search_in_vectorstore: true,
        search_in_indexstore: true,
        search_result_count_for_vectorstore: 10,
        search_result_count_for_indexstore: 10,
        user_id: RAG_USER_ID.into(),
    }
}

/// Submit the fixed YouTube ingestion job. The service indexes
/// asynchronously; success means the job was accepted. The SDK result is
/// carried through as the envelope payload, untouched.
pub async fn ingest_sources(rag: &RagClient) -> ActionResult<Value, String> {
    match rag.ingest(&youtube_ingest_request()).await {
        Ok(value) => {
            log::info!("ingest job accepted for collection {COLLECTION_NAME}");
            ActionResult::success(200, ActionPayload::Bare(value))
        }
        Err(e) => ActionResult::failure(e.status(), e.to_string()),
    }
}

/// Sample up to 10 documents from the fixed collection with an empty query,
/// searching both stores.
pub async fn sample_collection(rag: &RagClient) -> ActionResult<Value, String> {
    match rag.retrieve(&collection_sample_request()).await {
        Ok(value) => ActionResult::success(200, ActionPayload::Bare(value)),
        Err(e) => ActionResult::failure(e.status(), e.to_string()),
    }
}

/// Hook shared with the frontend so ingest pending/result state can be
/// polled while the job request is in flight.
pub struct IngestState(pub Arc<ActionHook<Value, String>>);

impl Default for IngestState {
    fn default() -> Self {
        Self(Arc::new(ActionHook::new()))
    }
}

#[derive(Debug, Serialize)]
pub struct IngestStatus {
    pub pending: bool,
    pub code: Option<u16>,
    pub data: Option<Value>,
    pub errors: Option<String>,
}

#[tauri::command]
pub async fn run_ingest(
    state: State<'_, IngestState>,
) -> Result<ActionResult<Value, String>, String> {
    let rag = RagClient::new(DEFAULT_RAG_API_URL);
    Ok(state.0.run(ingest_sources(&rag)).await)
}

#[tauri::command]
pub fn ingest_status(state: State<'_, IngestState>) -> IngestStatus {
    IngestStatus {
        pending: state.0.is_pending(),
        code: state.0.code(),
        data: state.0.data(),
        errors: state.0.errors(),
    }
}

#[tauri::command]
pub async fn get_collection_names() -> Result<ActionResult<Value, String>, String> {
    // Certificate verification is relaxed for this one client only.
    let rag = RagClient::accept_invalid_certs(DEFAULT_RAG_API_URL).map_err(|e| e.to_string())?;
    Ok(sample_collection(&rag).await)
}
