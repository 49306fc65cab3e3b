//! SynKro Assist Vector - Embeddings and nearest-neighbor search
//!
//! Wraps the two opaque vector capabilities the chat pipeline relies on:
//! - An HTTP embedding client (text to fixed-length `Vec<f32>`)
//! - An exact in-memory nearest-neighbor index over the knowledge base
//!   question embeddings

pub mod embedding;
pub mod index;

pub use embedding::{EmbeddingClient, HttpEmbedding};
pub use index::FlatIndex;
