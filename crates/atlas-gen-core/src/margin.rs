use crate::config::AtlasConfig;
use crate::error::{AtlasGenError, Result};
use crate::model::Margin;

/// How per-image margins are derived from the global margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginPolicy {
    /// Every image gets the global margin.
    Uniform(Margin),
    /// Every image is centered in a square cell as large as the biggest dimension of the set,
    /// plus the global margin.
    Normalized(Margin),
}

impl MarginPolicy {
    /// Picks the policy requested by `cfg`.
    ///
    /// Normalizing pads differently sized images into equal cells, while resizing scales them all
    /// to one size up front; asking for both is rejected here, before any packing work.
    pub fn from_config(cfg: &AtlasConfig) -> Result<Self> {
        if cfg.normalize && cfg.resize.is_some() {
            return Err(AtlasGenError::ConfigurationConflict(
                "normalize and resize are mutually exclusive".into(),
            ));
        }
        Ok(if cfg.normalize {
            Self::Normalized(cfg.margin())
        } else {
            Self::Uniform(cfg.margin())
        })
    }

    pub fn global(&self) -> Margin {
        match *self {
            Self::Uniform(m) | Self::Normalized(m) => m,
        }
    }
}

/// Computes one margin per `(width, height)` entry, in input order.
pub fn compute_margins(sizes: &[(u32, u32)], policy: MarginPolicy) -> Vec<Margin> {
    match policy {
        MarginPolicy::Uniform(global) => vec![global; sizes.len()],
        MarginPolicy::Normalized(global) => {
            let max_dim = sizes.iter().map(|&(w, h)| w.max(h)).max().unwrap_or(0);
            sizes
                .iter()
                .map(|&(w, h)| Margin {
                    x: ((max_dim - w) / 2).saturating_add(global.x),
                    y: ((max_dim - h) / 2).saturating_add(global.y),
                })
                .collect()
        }
    }
}

/// Size of the region an image occupies in the packer.
pub fn padded_size(w: u32, h: u32, margin: Margin) -> (u32, u32) {
    (
        w.saturating_add(margin.x.saturating_mul(2)),
        h.saturating_add(margin.y.saturating_mul(2)),
    )
}
