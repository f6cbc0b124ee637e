//! picboard - a browser image gallery.
//!
//! Images are uploaded by click or drag-and-drop, stored with editable
//! captions in `localStorage`, and shown as a card grid with a full-size
//! viewer. The core (store, persistence, rendering, ingestion) is platform
//! independent; the browser surface and event wiring are WASM only.

pub mod codec;
pub mod config;
pub mod error;
pub mod gallery;
pub mod ingest;
pub mod keybindings;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod size_format;
pub mod storage;
pub mod store;
pub mod view;

pub use config::GalleryConfig;
pub use error::GalleryError;
pub use gallery::Gallery;
pub use ingest::{FileHandle, IngestionPipeline, MemoryFile, Spawner};
pub use model::{ImageId, ImageRecord};
pub use persistence::PersistenceAdapter;
pub use size_format::format_size;
pub use storage::{KeyValueStorage, MemoryStorage};
pub use store::ImageStore;
pub use view::{HeadlessSurface, Surface, ViewRenderer};

#[cfg(target_arch = "wasm32")]
pub mod dom;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;

#[cfg(test)]
mod tests;
