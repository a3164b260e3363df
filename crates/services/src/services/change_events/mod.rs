mod dispatcher;
mod envelope;
mod handler;
pub mod handlers;

pub use dispatcher::{ChangeEventDispatcher, DispatcherBuilder, HandlerRun};
pub use envelope::{ChangeOperation, DocumentChange, EnvelopeError};
pub use handler::{DispatchOutcome, EventHandler, HandlerContext, HandlerError, SkipReason};
pub use handlers::{ChatMessageNotifier, TaskAssignedNotifier, TaskCompletedNotifier};

use models::documents::{chat_message::ChatMessage, task::Task};

/// Document-change events that can trigger handler execution.
///
/// Each event carries the full document state the hosting platform supplied
/// with the change; updates carry both sides of the transition.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    /// A task document was created.
    TaskCreated { task: Task },

    /// A task document was updated.
    TaskUpdated { before: Task, after: Task },

    /// A chat message document was created.
    ChatMessageCreated { message: ChatMessage },
}

impl ChangeEvent {
    /// Logical collection the change originated from (for logging).
    pub fn collection(&self) -> &'static str {
        match self {
            ChangeEvent::TaskCreated { .. } | ChangeEvent::TaskUpdated { .. } => "tasks",
            ChangeEvent::ChatMessageCreated { .. } => "messages",
        }
    }
}

/// Builds a dispatcher wired up with the three production notifiers.
pub fn default_dispatcher(ctx: HandlerContext) -> ChangeEventDispatcher {
    DispatcherBuilder::new()
        .with_handler(TaskAssignedNotifier)
        .with_handler(TaskCompletedNotifier)
        .with_handler(ChatMessageNotifier)
        .with_context(ctx)
        .build()
}
