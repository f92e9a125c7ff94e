#![deny(unsafe_code)]

/// Single-screen chat application.
///
/// The window shows one conversation: a header, the bubble list and the composer.
/// Conversation state lives in `chatroom-conversation`; this crate wires it to gpui.
pub mod app;
/// Conversation view, bubble list, composer and scroll handling.
pub mod chat;
/// Layered appearance and composer settings.
pub mod settings;
