use super::session::{ContentSession, SessionFactory};
use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub(crate) enum Scripted {
    Respond(serde_json::Value),
    FailOpen(String),
    FailRequest(String),
    Hang,
}

/// Session factory that replays a scripted outcome and counts
/// opened/released sessions.
#[derive(Clone)]
pub(crate) struct CountingSessionFactory {
    script: Scripted,
    opened: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl CountingSessionFactory {
    pub(crate) fn new(script: Scripted) -> Self {
        Self {
            script,
            opened: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn responding(body: serde_json::Value) -> Self {
        Self::new(Scripted::Respond(body))
    }

    pub(crate) fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub(crate) fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl SessionFactory for CountingSessionFactory {
    fn open(&self, _api_key: &str) -> Result<Box<dyn ContentSession>> {
        if let Scripted::FailOpen(reason) = &self.script {
            return Err(Error::AiProvider(reason.clone()));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingSession {
            script: self.script.clone(),
            released: Arc::clone(&self.released),
        }))
    }
}

struct CountingSession {
    script: Scripted,
    released: Arc<AtomicUsize>,
}

#[async_trait]
impl ContentSession for CountingSession {
    async fn generate_content(
        &self,
        _model: &str,
        _request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        match &self.script {
            Scripted::Respond(body) => Ok(serde_json::from_value(body.clone())?),
            Scripted::FailRequest(reason) => Err(Error::AiProvider(reason.clone())),
            Scripted::Hang => std::future::pending().await,
            Scripted::FailOpen(_) => unreachable!("open already failed"),
        }
    }
}

impl Drop for CountingSession {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// `generateContent` body whose first candidate carries `parts`.
pub(crate) fn response_with_parts(parts: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{ "content": { "role": "model", "parts": parts } }]
    })
}
