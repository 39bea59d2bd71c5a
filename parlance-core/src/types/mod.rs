//! Wire types for the API surface
//!
//! Request structs use [`Optional`](crate::optional::Optional) for fields
//! where the service distinguishes "omitted" from "explicitly null"; such
//! fields carry `skip_serializing_if = "Optional::is_absent"` so unset
//! values never reach the wire.

pub mod audio;
pub mod batches;
pub mod chat;
pub mod embeddings;
pub mod files;
pub mod models;
pub mod shared;

pub use audio::*;
pub use batches::*;
pub use chat::*;
pub use embeddings::*;
pub use files::*;
pub use models::*;
pub use shared::*;
