use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::sdk::llm::{
    LlmClient, LlmName, LoadBalanceStrategy, MemoryStrategy, MemoryType, PredictAnswer,
    PredictRequest, Prompt,
};

// Fixed prediction configuration; the service owns all conversation memory
// under this key.
const CONVERSATION_STATE_KEY: &str = "vorion_sdk_test_15";
const CHAT_USER_ID: &str = "vorion_sdk_user_01";
const LLM_GROUP_NAME: &str = "claude-3-5-sonnet";
const LANGUAGE: &str = "english";

/// One transcript entry, tagged at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ChatTurn {
    User {
        id: String,
        text: String,
        sensitive_info: bool,
        rag_content: Option<serde_json::Value>,
        created_at: String,
    },
    Assistant {
        id: String,
        answer: String,
        conversation_state_key: Option<String>,
        user_id: Option<String>,
        llm_name: Option<String>,
        llm_group_name: Option<String>,
        memory_type: Option<String>,
        system_message: Option<String>,
        created_at: String,
    },
}

impl ChatTurn {
    fn user(text: &str) -> Self {
        ChatTurn::User {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.to_string(),
            sensitive_info: false,
            rag_content: None,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    fn assistant(answer: PredictAnswer) -> Self {
        ChatTurn::Assistant {
            id: uuid::Uuid::new_v4().to_string(),
            answer: answer.answer,
            conversation_state_key: answer.conversation_state_key,
            user_id: answer.user_id,
            llm_name: answer.llm_name,
            llm_group_name: answer.llm_group_name,
            memory_type: answer.memory_type,
            system_message: answer.system_message,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Outcome of one submission attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SendOutcome {
    /// Empty input, or a request was already in flight. Nothing was sent.
    Rejected,
    Replied { turn: ChatTurn },
    /// The call failed; the optimistic user turn stays on the transcript.
    Failed,
}

/// In-memory conversation for the lifetime of the app. Append-only in
/// insertion order; cleared only on explicit user action; never persisted.
pub struct ChatSession {
    turns: Mutex<Vec<ChatTurn>>,
    in_flight: AtomicBool,
    menu_open: AtomicBool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            turns: Mutex::new(Vec::new()),
            in_flight: AtomicBool::new(false),
            menu_open: AtomicBool::new(false),
        }
    }

    pub fn transcript(&self) -> Vec<ChatTurn> {
        self.turns.lock().unwrap().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open.load(Ordering::SeqCst)
    }

    pub fn set_menu_open(&self, open: bool) {
        self.menu_open.store(open, Ordering::SeqCst);
    }

    /// Empty the transcript and close the menu. The service-side
    /// conversation record is untouched.
    pub fn clear(&self) {
        self.turns.lock().unwrap().clear();
        self.menu_open.store(false, Ordering::SeqCst);
    }

    /// Submit one prompt. The user turn is appended before the network call
    /// resolves; at most one prediction is in flight at a time.
    pub async fn send(&self, llm: &LlmClient, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Rejected;
        }
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return SendOutcome::Rejected;
        }

        self.turns.lock().unwrap().push(ChatTurn::user(text));

        let request = PredictRequest {
            llm_name: LlmName::Claude,
            llm_group_name: LLM_GROUP_NAME.to_string(),
            conversation_state_key: CONVERSATION_STATE_KEY.to_string(),
            load_balancer_strategy_name: LoadBalanceStrategy::RoundRobin,
            memory_type: MemoryType::Redis,
            memory_strategy_name: MemoryStrategy::FullSummarize,
            user_id: CHAT_USER_ID.to_string(),
            prompt: Prompt {
                text: text.to_string(),
                sensitive_info: false,
                rag_content: None,
            },
            language: LANGUAGE.to_string(),
            system_message: String::new(),
        };

        let outcome = match llm.predict(&request).await {
            Ok(response) => {
                let turn = ChatTurn::assistant(response.response);
                self.turns.lock().unwrap().push(turn.clone());
                SendOutcome::Replied { turn }
            }
            Err(e) => {
                log::error!("prediction request failed: {e}");
                SendOutcome::Failed
            }
        };

        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
