use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, info, warn};

use crate::config::AtlasConfig;
use crate::error::{AtlasGenError, Result};
use crate::margin::MarginPolicy;
use crate::model::{AttemptRecord, Placement, Rect};
use crate::packer::BinPacker;
use crate::registry::RectRegistry;

/// Successful layout: final canvas, placements in registration order and every attempt made.
#[derive(Debug, Clone)]
pub struct Layout<K> {
    pub width: u32,
    pub height: u32,
    pub placements: Vec<Placement<K>>,
    pub attempts: Vec<AttemptRecord>,
}

/// Drives repeated [`BinPacker`] attempts, growing the canvas until everything fits.
///
/// Each failed attempt doubles one side of the canvas: width after even attempt indices, height
/// after odd ones. The attempt budget is fixed up front so the loop always terminates.
pub struct Orchestrator<K> {
    registry: RectRegistry<K>,
    max_attempts: usize,
}

impl<K: Eq + Hash + Clone + Debug> Orchestrator<K> {
    pub fn new(registry: RectRegistry<K>, max_attempts: usize) -> Self {
        Self {
            registry,
            max_attempts,
        }
    }

    /// Builds the registry from `(key, width, height)` items and applies the margin policy of `cfg`.
    ///
    /// Items with a zero side are skipped with a warning; duplicate keys and conflicting margin
    /// settings are errors.
    pub fn from_items<I>(items: I, cfg: &AtlasConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (K, u32, u32)>,
    {
        let policy = MarginPolicy::from_config(cfg)?;
        let mut registry = RectRegistry::new();
        for (key, w, h) in items {
            match registry.insert(key.clone(), w, h) {
                Ok(()) => {}
                Err(AtlasGenError::InvalidDimension { width, height }) => {
                    warn!(?key, width, height, "skipping rectangle with invalid dimensions");
                }
                Err(e) => return Err(e),
            }
        }
        registry.apply_margins(policy);
        Ok(Self::new(registry, cfg.max_attempts))
    }

    pub fn registry(&self) -> &RectRegistry<K> {
        &self.registry
    }

    /// Starting canvas: average padded size times `ceil(sqrt(count))` on each axis.
    pub fn initial_canvas(&self) -> (u32, u32) {
        let n = self.registry.len();
        if n == 0 {
            return (0, 0);
        }
        let (sum_w, sum_h) = self.registry.iter().fold((0u64, 0u64), |(sw, sh), r| {
            let (w, h) = r.padded();
            (sw + w as u64, sh + h as u64)
        });
        let side = ceil_sqrt(n as u64);
        let width = (sum_w / n as u64) * side;
        let height = (sum_h / n as u64) * side;
        (
            u32::try_from(width).unwrap_or(u32::MAX),
            u32::try_from(height).unwrap_or(u32::MAX),
        )
    }

    /// Packs starting from the heuristic canvas estimate.
    pub fn run(&mut self) -> Result<Layout<K>> {
        let (width, height) = self.initial_canvas();
        self.run_from(width, height)
    }

    /// Packs starting from an explicit `width x height` canvas.
    pub fn run_from(&mut self, width: u32, height: u32) -> Result<Layout<K>> {
        if self.registry.is_empty() {
            return Err(AtlasGenError::Empty);
        }
        let (mut width, mut height) = (width, height);
        let mut attempts = Vec::with_capacity(self.max_attempts);
        let mut unplaced = self.registry.len();

        for index in 0..self.max_attempts {
            self.registry.reset_placements();
            let mut packer = BinPacker::new();
            for req in self.registry.iter() {
                let (pw, ph) = req.padded();
                packer.add_rect(pw, ph, req.key.clone())?;
            }
            unplaced = packer.pack(0, 0, width, height);
            attempts.push(AttemptRecord {
                index,
                width,
                height,
                unplaced,
            });
            debug!(attempt = index, width, height, unplaced, "packing attempt");

            if unplaced == 0 {
                self.record_slots(&packer)?;
                let placements = self
                    .registry
                    .placements()
                    .ok_or(AtlasGenError::KeyNotPlaced)?;
                info!(
                    width,
                    height,
                    count = placements.len(),
                    attempts = attempts.len(),
                    "packing succeeded"
                );
                return Ok(Layout {
                    width,
                    height,
                    placements,
                    attempts,
                });
            }

            if index + 1 < self.max_attempts {
                if index % 2 == 0 {
                    width = width.saturating_mul(2);
                } else {
                    height = height.saturating_mul(2);
                }
            }
        }

        warn!(
            unplaced,
            attempts = attempts.len(),
            width,
            height,
            "packing exhausted"
        );
        Err(AtlasGenError::PackingExhausted {
            unplaced,
            attempts: attempts.len(),
            width,
            height,
        })
    }

    fn record_slots(&mut self, packer: &BinPacker<K>) -> Result<()> {
        let slots = self
            .registry
            .iter()
            .map(|req| {
                let (x, y) = packer.get_rect(&req.key)?;
                let (w, h) = req.padded();
                Ok((req.key.clone(), Rect::new(x, y, w, h)))
            })
            .collect::<Result<Vec<_>>>()?;
        for (key, slot) in slots {
            self.registry.place(&key, slot);
        }
        Ok(())
    }
}

fn ceil_sqrt(n: u64) -> u64 {
    let mut side = 0u64;
    while side * side < n {
        side += 1;
    }
    side
}
