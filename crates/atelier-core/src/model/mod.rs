mod chat;
mod product;

pub use chat::{ChatLog, ChatMessage, Sender};
pub use product::{ArtTool, Feedback, RawArtTool, RawFeedback};

#[cfg(test)]
mod tests;
