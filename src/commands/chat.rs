use tauri::State;

use crate::sdk::llm::LlmClient;
use crate::session::{ChatSession, ChatTurn, SendOutcome};

#[tauri::command]
pub async fn send_message(
    llm: State<'_, LlmClient>,
    session: State<'_, ChatSession>,
    text: String,
) -> Result<SendOutcome, String> {
    Ok(session.send(&llm, &text).await)
}

#[tauri::command]
pub fn get_transcript(session: State<'_, ChatSession>) -> Vec<ChatTurn> {
    session.transcript()
}

#[tauri::command]
pub fn clear_conversation(session: State<'_, ChatSession>) {
    session.clear();
}

#[tauri::command]
pub fn set_menu_open(session: State<'_, ChatSession>, open: bool) {
    session.set_menu_open(open);
}
