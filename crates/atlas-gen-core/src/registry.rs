use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{AtlasGenError, Result};
use crate::margin::{MarginPolicy, compute_margins, padded_size};
use crate::model::{Margin, Placement, Rect};

/// One image waiting to be laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RectRequest<K> {
    pub key: K,
    /// Raw content size.
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
    /// Padded slot once placed; `None` while pending.
    pub slot: Option<Rect>,
}

impl<K> RectRequest<K> {
    /// Size including the margin on both sides of each axis.
    pub fn padded(&self) -> (u32, u32) {
        padded_size(self.width, self.height, self.margin)
    }

    pub fn is_placed(&self) -> bool {
        self.slot.is_some()
    }
}

/// Ordered set of rectangle requests with unique keys.
///
/// Registration order is preserved and drives every iteration, so layouts are reproducible; the
/// key index is only used for lookups.
#[derive(Debug, Clone)]
pub struct RectRegistry<K> {
    requests: Vec<RectRequest<K>>,
    index: HashMap<K, usize>,
}

impl<K> Default for RectRegistry<K> {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone + Debug> RectRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pending request with a zero margin.
    pub fn insert(&mut self, key: K, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(AtlasGenError::InvalidDimension { width, height });
        }
        if self.index.contains_key(&key) {
            return Err(AtlasGenError::DuplicateKey(format!("{:?}", key)));
        }
        self.index.insert(key.clone(), self.requests.len());
        self.requests.push(RectRequest {
            key,
            width,
            height,
            margin: Margin::default(),
            slot: None,
        });
        Ok(())
    }

    /// Recomputes every margin under `policy`.
    pub fn apply_margins(&mut self, policy: MarginPolicy) {
        let sizes: Vec<(u32, u32)> = self.requests.iter().map(|r| (r.width, r.height)).collect();
        for (req, margin) in self
            .requests
            .iter_mut()
            .zip(compute_margins(&sizes, policy))
        {
            req.margin = margin;
        }
    }

    pub fn get(&self, key: &K) -> Option<&RectRequest<K>> {
        self.index.get(key).map(|&i| &self.requests[i])
    }

    /// Records the padded slot of `key`. Returns false for unknown keys.
    pub fn place(&mut self, key: &K, slot: Rect) -> bool {
        match self.index.get(key) {
            Some(&i) => {
                self.requests[i].slot = Some(slot);
                true
            }
            None => false,
        }
    }

    /// Marks every request pending again.
    pub fn reset_placements(&mut self) {
        for req in &mut self.requests {
            req.slot = None;
        }
    }

    pub fn pending(&self) -> usize {
        self.requests.iter().filter(|r| !r.is_placed()).count()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RectRequest<K>> {
        self.requests.iter()
    }

    /// Placements in registration order; `None` while any request is still pending.
    pub fn placements(&self) -> Option<Vec<Placement<K>>> {
        self.requests
            .iter()
            .map(|r| {
                r.slot.map(|slot| Placement {
                    key: r.key.clone(),
                    x: slot.x.saturating_add(r.margin.x),
                    y: slot.y.saturating_add(r.margin.y),
                    w: r.width,
                    h: r.height,
                    margin: r.margin,
                    slot,
                })
            })
            .collect()
    }
}
