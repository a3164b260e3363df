use serde::{Deserialize, Serialize};

/// A chat message document from the `messages` collection.
///
/// Created by the mobile app; this subsystem only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// User the message was sent to.
    #[serde(default)]
    pub receiver_id: Option<String>,
}

impl ChatMessage {
    /// Sender name as shown in notification titles.
    pub fn display_sender(&self) -> &str {
        self.sender_name.as_deref().unwrap_or("Unknown")
    }

    /// Message text as shown in notification bodies.
    pub fn display_text(&self) -> &str {
        self.text.as_deref().unwrap_or("You received a new message")
    }
}
