pub mod chat_message;
pub mod notification;
pub mod task;
pub mod user;
