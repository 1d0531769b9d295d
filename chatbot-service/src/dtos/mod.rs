pub mod chat;

pub use chat::{
    ChatRequest, ChatResponse, HistoryResponse, MessageResponse, MultimodalChatResponse,
    SessionListResponse,
};
