mod action;
mod commands;
mod sdk;
mod session;

use commands::knowledge::IngestState;
use sdk::llm::{LlmClient, DEFAULT_LLM_API_URL};
use session::ChatSession;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(
            tauri_plugin_log::Builder::new()
                .level(log::LevelFilter::Info)
                .build(),
        )
        .manage(LlmClient::new(DEFAULT_LLM_API_URL))
        .manage(ChatSession::new())
        .manage(IngestState::default())
        .invoke_handler(tauri::generate_handler![
            commands::chat::send_message,
            commands::chat::get_transcript,
            commands::chat::clear_conversation,
            commands::chat::set_menu_open,
            commands::knowledge::run_ingest,
            commands::knowledge::ingest_status,
            commands::knowledge::get_collection_names,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
