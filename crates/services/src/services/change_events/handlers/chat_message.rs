use async_trait::async_trait;

use crate::services::change_events::{
    ChangeEvent, DispatchOutcome, EventHandler, HandlerContext, HandlerError, SkipReason,
};

/// Handler for notifying the receiver when a chat message arrives for them.
pub struct ChatMessageNotifier;

#[async_trait]
impl EventHandler for ChatMessageNotifier {
    fn name(&self) -> &'static str {
        "chat_message"
    }

    fn handles(&self, event: &ChangeEvent) -> bool {
        matches!(event, ChangeEvent::ChatMessageCreated { .. })
    }

    async fn handle(
        &self,
        event: ChangeEvent,
        ctx: &HandlerContext,
    ) -> Result<DispatchOutcome, HandlerError> {
        let ChangeEvent::ChatMessageCreated { message } = event else {
            return Ok(DispatchOutcome::Skipped(SkipReason::NotApplicable));
        };

        let Some(receiver_id) = message.receiver_id.clone() else {
            tracing::debug!(message = %message.id, "Message has no receiver, nothing to notify");
            return Ok(DispatchOutcome::Skipped(SkipReason::MissingReference));
        };

        let title = format!("New message from {}", message.display_sender());
        let body = message.display_text().to_string();
        super::notify_user(ctx, &receiver_id, title, body).await
    }
}
