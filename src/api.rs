//! HTTP API for the chat assistant

mod handlers;
mod types;

pub use handlers::create_router;

use crate::dispatcher::Dispatcher;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    /// Name of the cookie carrying the conversation id
    pub session_cookie: Arc<str>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, session_cookie: &str) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            session_cookie: Arc::from(session_cookie),
        }
    }
}
