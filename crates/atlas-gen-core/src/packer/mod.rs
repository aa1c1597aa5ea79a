use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::trace;

use crate::error::{AtlasGenError, Result};
use crate::model::Rect;

pub mod tree;

pub use tree::Node;

struct PackerRect<K> {
    key: K,
    w: u32,
    h: u32,
    slot: Option<Rect>,
}

impl<K> PackerRect<K> {
    fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
}

/// Binary-tree rectangle packer.
///
/// Rectangles are registered with [`BinPacker::add_rect`] and placed by [`BinPacker::pack`], one
/// greedy pass per call: largest area first (ties in registration order), stopping at the first
/// rectangle that does not fit. Keys are matched by equality; duplicates are not rejected and
/// lookups resolve to the first registration.
pub struct BinPacker<K> {
    rects: Vec<PackerRect<K>>,
    index: HashMap<K, usize>,
    root: Option<Node>,
    complete: bool,
}

impl<K> Default for BinPacker<K> {
    fn default() -> Self {
        Self {
            rects: Vec::new(),
            index: HashMap::new(),
            root: None,
            complete: false,
        }
    }
}

impl<K: Eq + Hash + Clone + Debug> BinPacker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pending `width x height` rectangle.
    pub fn add_rect(&mut self, width: u32, height: u32, key: K) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(AtlasGenError::InvalidDimension { width, height });
        }
        self.index.entry(key.clone()).or_insert(self.rects.len());
        self.rects.push(PackerRect {
            key,
            w: width,
            h: height,
            slot: None,
        });
        self.complete = false;
        Ok(())
    }

    /// Removes the first rectangle registered under `key`.
    pub fn remove_rect(&mut self, key: &K) -> bool {
        let Some(idx) = self.index.get(key).copied() else {
            return false;
        };
        self.rects.remove(idx);
        self.rebuild_index();
        self.root = None;
        self.complete = false;
        true
    }

    /// Drops every rectangle and the current tree.
    pub fn clear(&mut self) {
        self.rects.clear();
        self.index.clear();
        self.root = None;
        self.complete = false;
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Tree built by the most recent [`BinPacker::pack`] call.
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Keys in the order `pack` tries them: descending area, ties in registration order.
    pub fn placement_order(&self) -> Vec<&K> {
        self.order().into_iter().map(|i| &self.rects[i].key).collect()
    }

    /// Runs one packing attempt inside `[min_x, max_x) x [min_y, max_y)`.
    ///
    /// Returns the number of rectangles left pending: 0 when everything fits, otherwise the count
    /// remaining when the first rectangle failed to fit (that rectangle included).
    pub fn pack(&mut self, min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> usize {
        for r in &mut self.rects {
            r.slot = None;
        }
        self.complete = false;

        let mut root = Node::new(Rect::new(
            min_x,
            min_y,
            max_x.saturating_sub(min_x),
            max_y.saturating_sub(min_y),
        ));
        let order = self.order();
        let mut pending = order.len();
        for idx in order {
            let r = &mut self.rects[idx];
            match root.insert(idx, r.w, r.h) {
                Some(slot) => {
                    trace!(key = ?r.key, x = slot.x, y = slot.y, w = slot.w, h = slot.h, "placed");
                    r.slot = Some(slot);
                    pending -= 1;
                }
                None => {
                    trace!(key = ?r.key, w = r.w, h = r.h, pending, "does not fit");
                    self.root = Some(root);
                    return pending;
                }
            }
        }
        self.root = Some(root);
        self.complete = true;
        0
    }

    /// Top-left of the slot assigned to `key` by the last attempt.
    ///
    /// Only a fully successful attempt yields positions; after a failed attempt every key reports
    /// [`AtlasGenError::KeyNotPlaced`].
    pub fn get_rect(&self, key: &K) -> Result<(u32, u32)> {
        if !self.complete {
            return Err(AtlasGenError::KeyNotPlaced);
        }
        self.index
            .get(key)
            .and_then(|&i| self.rects[i].slot)
            .map(|slot| (slot.x, slot.y))
            .ok_or(AtlasGenError::KeyNotPlaced)
    }

    fn order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.rects.len()).collect();
        // stable: equal areas keep registration order
        order.sort_by(|&a, &b| self.rects[b].area().cmp(&self.rects[a].area()));
        order
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, r) in self.rects.iter().enumerate() {
            self.index.entry(r.key.clone()).or_insert(i);
        }
    }
}
