//! Request pipeline: classify, parse, reconcile
//!
//! `Brain` wires the classifier collaborator to the deterministic core.
//! It holds only immutable state, so one instance can serve concurrent
//! requests.

use crate::core::config::BotConfig;
use crate::core::error::{BotError, Result};
use crate::core::types::IntentResult;
use crate::llm::client::LlmClient;
use crate::llm::context::BrainContext;
use crate::llm::parser::parse_reply;
use crate::reconcile::ResponseReconciler;

pub struct Brain {
    context: BrainContext,
    reconciler: ResponseReconciler,
    client: Option<LlmClient>,
}

impl Brain {
    pub fn new(config: &BotConfig, context: BrainContext, client: Option<LlmClient>) -> Self {
        Self {
            context,
            reconciler: ResponseReconciler::new(config.evaluator),
            client,
        }
    }

    /// Build from config, loading context files and the API key from the environment
    ///
    /// A missing key is not an error: the brain runs offline and only
    /// `respond_to_reply` is usable.
    pub fn from_config(config: &BotConfig) -> Self {
        let context = BrainContext::load(&config.brain);
        let client = match LlmClient::from_env(&config.llm) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("Classifier unavailable: {}", e);
                None
            }
        };
        Self::new(config, context, client)
    }

    pub fn has_classifier(&self) -> bool {
        self.client.is_some()
    }

    pub fn context(&self) -> &BrainContext {
        &self.context
    }

    /// Classify an utterance and return the reconciled reply
    pub async fn respond(&self, user_text: &str) -> Result<IntentResult> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return Err(BotError::EmptyInput);
        }

        let client = self
            .client
            .as_ref()
            .ok_or_else(|| BotError::LlmError("No classifier configured".into()))?;

        let raw = client
            .complete(&self.context.system_messages(), user_text)
            .await?;

        Ok(self.respond_to_reply(&raw, user_text))
    }

    /// Reconcile an already-obtained classifier reply
    pub fn respond_to_reply(&self, raw_reply: &str, user_text: &str) -> IntentResult {
        self.reconcile(parse_reply(raw_reply), user_text)
    }

    /// Reconcile a structured result and attach the utterance it answers
    pub fn reconcile(&self, result: IntentResult, user_text: &str) -> IntentResult {
        let user_text = user_text.trim();
        let mut result = self.reconciler.reconcile(result, user_text);
        result.user_text = Some(user_text.to_string());
        result
    }
}
