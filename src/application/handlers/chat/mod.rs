//! Chat message handling.

mod handle_message;

pub use handle_message::{
    ChatInput, ChatReply, DialogueManager, HandleChatMessageCommand, DEFAULT_SLOT_HINTS,
};
