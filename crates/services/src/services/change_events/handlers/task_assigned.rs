use async_trait::async_trait;

use crate::services::change_events::{
    ChangeEvent, DispatchOutcome, EventHandler, HandlerContext, HandlerError, SkipReason,
};

/// Handler for notifying the assignee when a task is created for them.
pub struct TaskAssignedNotifier;

#[async_trait]
impl EventHandler for TaskAssignedNotifier {
    fn name(&self) -> &'static str {
        "task_assigned"
    }

    fn handles(&self, event: &ChangeEvent) -> bool {
        matches!(event, ChangeEvent::TaskCreated { .. })
    }

    async fn handle(
        &self,
        event: ChangeEvent,
        ctx: &HandlerContext,
    ) -> Result<DispatchOutcome, HandlerError> {
        let ChangeEvent::TaskCreated { task } = event else {
            return Ok(DispatchOutcome::Skipped(SkipReason::NotApplicable));
        };

        let Some(assigned_to) = task.assigned_to.clone() else {
            tracing::debug!(task = %task.id, "Task created without assignee, nothing to notify");
            return Ok(DispatchOutcome::Skipped(SkipReason::MissingReference));
        };

        let body = format!("Task: {} has been assigned to you.", task.display_title());
        super::notify_user(ctx, &assigned_to, "New Task Assigned".to_string(), body).await
    }
}
