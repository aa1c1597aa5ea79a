use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use tracing::{instrument, warn};

use crate::compositing::{compose, new_canvas};
use crate::config::AtlasConfig;
use crate::error::{AtlasGenError, Result};
use crate::model::{Atlas, Meta};
use crate::orchestrator::{Layout, Orchestrator};

/// In-memory image to pack (key + decoded image).
pub struct InputImage {
    pub key: String,
    pub image: DynamicImage,
}

/// Output of a packing run: atlas metadata and the composited RGBA canvas.
pub struct PackOutput {
    pub atlas: Atlas,
    pub rgba: RgbaImage,
}

impl PackOutput {
    /// Computes packing statistics for this output.
    /// This is a convenience method that delegates to `atlas.stats()`.
    pub fn stats(&self) -> crate::model::PackStats {
        self.atlas.stats()
    }
}

#[instrument(skip_all)]
/// Packs `inputs` into one atlas canvas and composites their pixels.
///
/// Notes:
/// - With `resize` set, every image is scaled to `size x size` before layout.
/// - Images with a zero side are skipped; the run fails with `Empty` if nothing is left.
/// - On `PackingExhausted` no canvas is produced.
pub fn pack_images(inputs: Vec<InputImage>, cfg: AtlasConfig) -> Result<PackOutput> {
    cfg.validate()?;

    if inputs.is_empty() {
        return Err(AtlasGenError::Empty);
    }

    let prepared = prepare_inputs(inputs, &cfg);
    let items: Vec<(String, u32, u32)> = prepared
        .iter()
        .map(|(key, rgba)| (key.clone(), rgba.width(), rgba.height()))
        .collect();
    let atlas = layout_atlas(items, &cfg)?;

    let by_key: HashMap<&str, &RgbaImage> =
        prepared.iter().map(|(k, img)| (k.as_str(), img)).collect();
    let mut rgba = new_canvas(atlas.width, atlas.height, cfg.background);
    compose(&atlas.placements, &mut rgba, cfg.outlines, |key: &String| {
        by_key.get(key.as_str()).copied()
    });
    Ok(PackOutput { atlas, rgba })
}

/// Computes placements for `(key, width, height)` inputs without touching pixel data.
#[instrument(skip_all)]
pub fn pack_layout<K>(inputs: Vec<(K, u32, u32)>, cfg: AtlasConfig) -> Result<Atlas<K>>
where
    K: Eq + Hash + Clone + Debug,
{
    cfg.validate()?;

    if inputs.is_empty() {
        return Err(AtlasGenError::Empty);
    }
    layout_atlas(inputs, &cfg)
}

fn layout_atlas<K>(inputs: Vec<(K, u32, u32)>, cfg: &AtlasConfig) -> Result<Atlas<K>>
where
    K: Eq + Hash + Clone + Debug,
{
    let mut orchestrator = Orchestrator::from_items(inputs, cfg)?;
    let Layout {
        width,
        height,
        placements,
        attempts,
    } = orchestrator.run()?;
    Ok(Atlas {
        width,
        height,
        placements,
        attempts,
        meta: meta_for(cfg),
    })
}

fn prepare_inputs(inputs: Vec<InputImage>, cfg: &AtlasConfig) -> Vec<(String, RgbaImage)> {
    let mut out = Vec::with_capacity(inputs.len());
    for inp in inputs {
        let image = match cfg.resize {
            Some(size) => inp.image.resize_exact(size, size, FilterType::Triangle),
            None => inp.image,
        };
        let rgba = image.to_rgba8();
        if rgba.width() == 0 || rgba.height() == 0 {
            warn!(key = %inp.key, "skipping empty image");
            continue;
        }
        out.push((inp.key, rgba));
    }
    out
}

fn meta_for(cfg: &AtlasConfig) -> Meta {
    Meta {
        app: "atlas-gen".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        format: "RGBA8888".into(),
        margin: cfg.margin(),
        normalize: cfg.normalize,
        resize: cfg.resize,
    }
}
