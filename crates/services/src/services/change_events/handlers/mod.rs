//! Document-change handlers.
//!
//! This module contains the notifiers that react to task and chat message
//! changes by sending push notifications to the affected user.

mod chat_message;
mod task_assigned;
mod task_completed;

pub use chat_message::ChatMessageNotifier;
pub use task_assigned::TaskAssignedNotifier;
pub use task_completed::TaskCompletedNotifier;

use models::documents::notification::NotificationRequest;

use super::{DispatchOutcome, HandlerContext, HandlerError, SkipReason};

/// Shared tail of every notifier: resolve the user, require a device token,
/// send exactly one notification.
pub(crate) async fn notify_user(
    ctx: &HandlerContext,
    user_id: &str,
    title: String,
    body: String,
) -> Result<DispatchOutcome, HandlerError> {
    let Some(user) = ctx.directory.get_user(user_id).await? else {
        tracing::debug!(user = %user_id, "Target user not found in directory");
        return Ok(DispatchOutcome::Skipped(SkipReason::UnknownUser));
    };

    let Some(token) = user.device_token else {
        tracing::debug!(user = %user_id, "Target user has no registered device token");
        return Ok(DispatchOutcome::Skipped(SkipReason::MissingToken));
    };

    let request = NotificationRequest::new(token, title, body);
    ctx.push.send(&request).await?;

    Ok(DispatchOutcome::Sent {
        user_id: user_id.to_string(),
    })
}
