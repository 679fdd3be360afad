//! Test doubles shared by unit tests.

use crate::error::ProviderError;
use crate::pipeline::llm::{ChatMessage, Completion, CompletionOptions, CompletionProvider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Provider that replays canned results and records every call.
pub(crate) struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<Completion, ProviderError>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn reply(self, content: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(Completion {
            content: Some(content.to_string()),
            ..Default::default()
        }));
        self
    }

    pub(crate) fn fail(self, err: ProviderError) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(
        &self,
        _api_key: &str,
        messages: &[ChatMessage],
        _options: &CompletionOptions,
    ) -> Result<Completion, ProviderError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Decode("no scripted reply left".into())))
    }
}
