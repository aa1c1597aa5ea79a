use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasGenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid rectangle dimensions: {width}x{height} (both sides must be positive)")]
    InvalidDimension { width: u32, height: u32 },
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Conflicting configuration: {0}")]
    ConfigurationConflict(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(
        "Packing exhausted after {attempts} attempts: {unplaced} rectangles left unplaced (last canvas {width}x{height})"
    )]
    PackingExhausted {
        unplaced: usize,
        attempts: usize,
        width: u32,
        height: u32,
    },
    #[error("Key was not placed by the last packing attempt")]
    KeyNotPlaced,
    #[error("Nothing to pack")]
    Empty,
}

pub type Result<T> = std::result::Result<T, AtlasGenError>;
