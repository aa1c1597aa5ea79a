//! Core library for assembling images into a single atlas.
//!
//! - Packer: binary-tree subdivision, largest area first, one greedy pass per attempt
//! - Orchestrator: estimates a canvas, then doubles width/height alternately until everything fits
//! - Margins: uniform, or normalized so every image sits centered in an equal cell
//! - Pipeline: `pack_images` composites in-memory images; `pack_layout` computes positions only
//! - Exporters render CSS/JSON/XML/CSV metadata from the resulting `Atlas`.
//!
//! Quick example:
//! ```ignore
//! use atlas_gen_core::{AtlasConfig, pack_layout};
//! # fn main() -> anyhow::Result<()> {
//! let cfg = AtlasConfig::builder().margin(2).build();
//! let atlas = pack_layout(vec![("a", 32, 32), ("b", 16, 48)], cfg)?;
//! for p in &atlas.placements {
//!     println!("{} at {},{}", p.key, p.x, p.y);
//! }
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod margin;
pub mod model;
pub mod orchestrator;
pub mod packer;
pub mod pipeline;
pub mod registry;

pub use config::*;
pub use error::*;
pub use export::*;
pub use margin::*;
pub use model::*;
pub use orchestrator::*;
pub use packer::*;
pub use pipeline::*;
pub use registry::*;

/// Convenience prelude for common types and functions.
/// Importing `atlas_gen_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{AtlasConfig, AtlasConfigBuilder};
    pub use crate::error::AtlasGenError;
    pub use crate::export::ExportFormat;
    pub use crate::margin::MarginPolicy;
    pub use crate::model::{Atlas, AttemptRecord, Margin, Meta, PackStats, Placement, Rect};
    pub use crate::orchestrator::{Layout, Orchestrator};
    pub use crate::packer::{BinPacker, Node};
    pub use crate::registry::{RectRegistry, RectRequest};
    pub use crate::{InputImage, PackOutput, pack_images, pack_layout};
}
