//! Generation Module
//!
//! Quota-limited proxy to the image-generation model and the image host.
//!
//! # Module Structure
//!
//! ```text
//! generation/
//! ├── db.rs          - Generation history storage
//! ├── huggingface.rs - Inference client
//! ├── imgbb.rs       - Image hosting client
//! ├── pipeline.rs    - Quota reservation, calls and compensation
//! └── handlers.rs    - HTTP handlers
//! ```

pub mod db;
pub mod handlers;
pub mod huggingface;
pub mod imgbb;
pub mod pipeline;

pub use handlers::{generate, list_generations};
