use serde::{Deserialize, Serialize};

use crate::model::Margin;

/// Layout and compositing settings.
/// Key notes:
///   - `normalize` pads every image into an equal square cell; it cannot be combined with `resize`
///   - `max_attempts` bounds the grow-and-retry loop (each failed attempt doubles one canvas side)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AtlasConfig {
    /// Horizontal margin added on the left and right of every image.
    #[serde(default)]
    pub margin_x: u32,
    /// Vertical margin added above and below every image.
    #[serde(default)]
    pub margin_y: u32,
    /// Center each image in a cell sized by the largest dimension of the whole set.
    #[serde(default)]
    pub normalize: bool,
    /// Resize every source image to `size x size` before packing.
    #[serde(default)]
    pub resize: Option<u32>,
    /// Total packing attempts before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Draw red outlines around composited images (debug).
    #[serde(default)]
    pub outlines: bool,
    /// Canvas fill colour; transparent when unset.
    #[serde(default)]
    pub background: Option<[u8; 4]>,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            margin_x: 0,
            margin_y: 0,
            normalize: false,
            resize: None,
            max_attempts: default_max_attempts(),
            outlines: false,
            background: None,
        }
    }
}

impl AtlasConfig {
    /// Global margin as a pair.
    pub fn margin(&self) -> Margin {
        Margin::new(self.margin_x, self.margin_y)
    }

    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - `normalize` and `resize` are both requested
    /// - `resize` is zero
    /// - `max_attempts` is zero
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::AtlasGenError;

        if self.normalize && self.resize.is_some() {
            return Err(AtlasGenError::ConfigurationConflict(
                "normalize and resize are mutually exclusive".into(),
            ));
        }
        if self.resize == Some(0) {
            return Err(AtlasGenError::InvalidConfig(
                "resize must be a positive size".into(),
            ));
        }
        if self.margin_x > MAX_MARGIN || self.margin_y > MAX_MARGIN {
            return Err(AtlasGenError::InvalidConfig(format!(
                "margin must be at most {} (got {}x{})",
                MAX_MARGIN, self.margin_x, self.margin_y
            )));
        }
        if self.max_attempts == 0 {
            return Err(AtlasGenError::InvalidConfig(
                "max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Create a fluent builder for `AtlasConfig`.
    pub fn builder() -> AtlasConfigBuilder {
        AtlasConfigBuilder::new()
    }
}

/// Largest global margin accepted by [`AtlasConfig::validate`]; keeps padded sizes within `u32`.
pub const MAX_MARGIN: u32 = u32::MAX / 4;

fn default_max_attempts() -> usize {
    6
}

/// Builder for `AtlasConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct AtlasConfigBuilder {
    cfg: AtlasConfig,
}

impl AtlasConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: AtlasConfig::default(),
        }
    }
    /// Sets both margins to `v`.
    pub fn margin(mut self, v: u32) -> Self {
        self.cfg.margin_x = v;
        self.cfg.margin_y = v;
        self
    }
    pub fn margin_x(mut self, v: u32) -> Self {
        self.cfg.margin_x = v;
        self
    }
    pub fn margin_y(mut self, v: u32) -> Self {
        self.cfg.margin_y = v;
        self
    }
    pub fn normalize(mut self, v: bool) -> Self {
        self.cfg.normalize = v;
        self
    }
    pub fn resize(mut self, v: Option<u32>) -> Self {
        self.cfg.resize = v;
        self
    }
    pub fn max_attempts(mut self, v: usize) -> Self {
        self.cfg.max_attempts = v;
        self
    }
    pub fn outlines(mut self, v: bool) -> Self {
        self.cfg.outlines = v;
        self
    }
    pub fn background(mut self, v: Option<[u8; 4]>) -> Self {
        self.cfg.background = v;
        self
    }
    pub fn build(self) -> AtlasConfig {
        self.cfg
    }
}
