//! LLM-call analytics: the dedicated channel's names and a typed call summary.

use crate::channel::Channel;
use crate::fmt::Fields;
use crate::level::Level;
use std::fmt::Write;

/// Channel configured by `Registry::configure_llm_channel`.
pub const LLM_CHANNEL: &str = "llm_logger";
/// File under the log directory that receives LLM analytics.
pub const LLM_LOG_FILE: &str = "llm_analytics.log";

/// One model invocation as recorded on the LLM channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmCall {
    pub model: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    /// Estimated cost in the caller's currency unit.
    pub cost: Option<f64>,
    pub latency_ms: Option<u64>,
    /// Provider status or error string, if any.
    pub status: Option<String>,
}

impl LlmCall {
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn tokens(mut self, prompt: u64, completion: u64) -> Self {
        self.prompt_tokens = prompt;
        self.completion_tokens = completion;
        self
    }

    #[must_use]
    pub const fn cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    #[must_use]
    pub const fn latency_ms(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub const fn total_tokens(&self) -> u64 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }

    /// Human-readable line body, so the default layout still carries the numbers.
    #[must_use]
    pub fn message(&self) -> String {
        let mut msg = format!("LLM Call model={} tokens={}", self.model, self.total_tokens());
        if let Some(cost) = self.cost {
            let _ = write!(msg, " cost={cost}");
        }
        if let Some(ms) = self.latency_ms {
            let _ = write!(msg, " latency_ms={ms}");
        }
        if let Some(status) = &self.status {
            let _ = write!(msg, " status={status}");
        }
        msg
    }

    /// Unset optionals are left out rather than written as placeholders.
    #[must_use]
    pub fn fields(&self) -> Fields {
        let mut fields = Fields::new()
            .with("model", self.model.as_str())
            .with("prompt_tokens", self.prompt_tokens)
            .with("completion_tokens", self.completion_tokens)
            .with("tokens", self.total_tokens());
        if let Some(cost) = self.cost {
            fields.insert("cost", cost);
        }
        if let Some(ms) = self.latency_ms {
            fields.insert("latency_ms", ms);
        }
        if let Some(status) = &self.status {
            fields.insert("status", status.as_str());
        }
        fields
    }
}

impl Channel {
    /// Emits `call` at INFO with its summary as the message and its numbers as fields.
    pub fn llm_call(&self, call: &LlmCall) {
        self.log_with(Level::Info, &call.message(), call.fields());
    }
}
