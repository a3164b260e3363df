use serde::Serialize;

/// Payload handed to the push gateway.
///
/// Built per invocation from a resolved device token and the message copy;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationRequest {
    pub token: String,
    pub title: String,
    pub body: String,
}

impl NotificationRequest {
    pub fn new(
        token: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            title: title.into(),
            body: body.into(),
        }
    }
}
