use async_trait::async_trait;
use models::documents::task::TaskStatus;

use crate::services::change_events::{
    ChangeEvent, DispatchOutcome, EventHandler, HandlerContext, HandlerError, SkipReason,
};

/// Handler for notifying the assigner when a task they handed out is
/// marked completed.
pub struct TaskCompletedNotifier;

#[async_trait]
impl EventHandler for TaskCompletedNotifier {
    fn name(&self) -> &'static str {
        "task_completed"
    }

    fn handles(&self, event: &ChangeEvent) -> bool {
        matches!(event, ChangeEvent::TaskUpdated { .. })
    }

    async fn handle(
        &self,
        event: ChangeEvent,
        ctx: &HandlerContext,
    ) -> Result<DispatchOutcome, HandlerError> {
        let ChangeEvent::TaskUpdated { before, after } = event else {
            return Ok(DispatchOutcome::Skipped(SkipReason::NotApplicable));
        };

        // Only the transition into completed counts; a task that was already
        // completed (or still isn't) never notifies.
        if before.status == TaskStatus::Completed || after.status != TaskStatus::Completed {
            return Ok(DispatchOutcome::Skipped(SkipReason::NotApplicable));
        }

        let Some(assigned_by) = after.assigned_by.clone() else {
            tracing::debug!(task = %after.id, "Completed task has no assigner, nothing to notify");
            return Ok(DispatchOutcome::Skipped(SkipReason::MissingReference));
        };

        let body = format!("Task: {} has been completed.", after.display_title());
        super::notify_user(ctx, &assigned_by, "Task Completed".to_string(), body).await
    }
}
