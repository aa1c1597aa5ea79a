use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Inclusive right edge coordinate (`x + w - 1`).
    pub fn right(&self) -> u32 {
        self.x + self.w.saturating_sub(1)
    }
    /// Inclusive bottom edge coordinate (`y + h - 1`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h.saturating_sub(1)
    }
    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
    /// Returns true if `r` is fully inside `self` (inclusive edges).
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
    /// Returns true if the half-open regions of `self` and `r` share at least one pixel.
    pub fn intersects(&self, r: &Rect) -> bool {
        if self.w == 0 || self.h == 0 || r.w == 0 || r.h == 0 {
            return false;
        }
        self.x < r.x + r.w && r.x < self.x + self.w && self.y < r.y + r.h && r.y < self.y + self.h
    }
}

/// Padding applied on each side of a rectangle before packing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Margin {
    pub x: u32,
    pub y: u32,
}

impl Margin {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
    pub fn uniform(v: u32) -> Self {
        Self { x: v, y: v }
    }
}

/// Final position of one source image within the atlas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement<K = String> {
    /// User-specified key (e.g., file path).
    pub key: K,
    /// Top-left of the visible content (slot origin + margin).
    pub x: u32,
    pub y: u32,
    /// Raw content size.
    pub w: u32,
    pub h: u32,
    pub margin: Margin,
    /// Padded region reserved in the packer.
    pub slot: Rect,
}

impl<K> Placement<K> {
    /// Content rectangle (`slot` minus margin).
    pub fn content(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// One packing attempt of the orchestrator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttemptRecord {
    pub index: usize,
    pub width: u32,
    pub height: u32,
    /// Rectangles still pending when the attempt ended (0 on success).
    pub unplaced: usize,
}

/// Atlas-level metadata (common fields used by exporters).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub app: String,
    pub version: String,
    pub format: String,
    pub margin: Margin,
    pub normalize: bool,
    pub resize: Option<u32>,
}

/// Result of a successful layout: canvas size, placements in input order and the attempt history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atlas<K = String> {
    pub width: u32,
    pub height: u32,
    pub placements: Vec<Placement<K>>,
    pub attempts: Vec<AttemptRecord>,
    pub meta: Meta,
}

/// Statistics about atlas packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    /// Number of placed images.
    pub num_placements: usize,
    /// Canvas area (width * height).
    pub canvas_area: u64,
    /// Area covered by visible content.
    pub used_area: u64,
    /// Area covered by padded slots (content + margins).
    pub slot_area: u64,
    /// Occupancy ratio: used_area / canvas_area (0.0 to 1.0).
    pub occupancy: f64,
    /// Packing attempts needed, including the successful one.
    pub attempts: usize,
}

impl<K: PartialEq> Atlas<K> {
    /// Looks up the placement recorded for `key` with a linear scan.
    ///
    /// For repeated lookups build the map once with [`Atlas::by_key`].
    pub fn get(&self, key: &K) -> Option<&Placement<K>> {
        self.placements.iter().find(|p| &p.key == key)
    }
}

impl<K: Eq + Hash> Atlas<K> {
    /// Key -> placement map over all placements.
    pub fn by_key(&self) -> HashMap<&K, &Placement<K>> {
        self.placements.iter().map(|p| (&p.key, p)).collect()
    }
}

impl<K> Atlas<K> {
    /// Computes packing statistics for this atlas.
    pub fn stats(&self) -> PackStats {
        let canvas_area = (self.width as u64) * (self.height as u64);
        let used_area: u64 = self.placements.iter().map(|p| p.content().area()).sum();
        let slot_area: u64 = self.placements.iter().map(|p| p.slot.area()).sum();
        let occupancy = if canvas_area > 0 {
            used_area as f64 / canvas_area as f64
        } else {
            0.0
        };
        PackStats {
            num_placements: self.placements.len(),
            canvas_area,
            used_area,
            slot_area,
            occupancy,
            attempts: self.attempts.len(),
        }
    }
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Images: {}, Occupancy: {:.2}%, Canvas Area: {} px², Used Area: {} px², Attempts: {}",
            self.num_placements,
            self.occupancy * 100.0,
            self.canvas_area,
            self.used_area,
            self.attempts,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.canvas_area.saturating_sub(self.used_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.canvas_area > 0 {
            (self.wasted_area() as f64 / self.canvas_area as f64) * 100.0
        } else {
            0.0
        }
    }
}
