//! Resource wrappers: one module per API surface area
//!
//! Each wrapper is a thin, typed veneer over the shared
//! [`Transport`](crate::http::Transport). Wrappers own no connection
//! state, so cloning a client clones cheap handles.

pub mod audio;
pub mod batches;
pub mod chat;
pub mod embeddings;
pub mod files;
pub mod models;

pub use audio::Audio;
pub use batches::Batches;
pub use chat::Chat;
pub use embeddings::Embeddings;
pub use files::Files;
pub use models::Models;
