pub mod chatbot;
pub mod dispatch;
pub mod normalizer;
pub mod payload;
pub mod runtime_client;
pub mod session_log;
