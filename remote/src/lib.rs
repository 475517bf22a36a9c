//! Remote I/O adapter for the sketchpad.
//!
//! | Module | Role |
//! |--------|------|
//! | [`client`] | [`RemoteClient`]: upload, key/value save/get/delete, image save |
//! | [`chat`] | [`chat::ChatChannel`]: the single WebSocket chat connection |
//! | [`config`] | [`RemoteConfig`] and its environment parsing |
//! | [`error`] | [`RemoteError`] |

pub mod chat;
pub mod client;
pub mod config;
pub mod error;

pub use chat::{ChatChannel, ChatMessage};
pub use client::RemoteClient;
pub use config::RemoteConfig;
pub use error::RemoteError;
