//! Typing indicator storage.

mod typing_store;

pub use typing_store::TypingStore;
