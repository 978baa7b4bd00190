//! Error types
//!
//! The simulation itself never fails: degenerate contacts and shapeless
//! objects are filtered out. Errors only surface when configuration or
//! construction input is rejected.

use thiserror::Error;

use crate::sim::ObjectId;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("mass must be finite and greater than zero, got {0}")]
    InvalidMass(f32),

    #[error("invalid bounding shape: {0}")]
    InvalidShape(String),

    #[error("invalid effect: {0}")]
    InvalidEffect(String),

    #[error("object {0} is not registered in the scene")]
    UnknownObject(ObjectId),

    #[error("configuration parse failed: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
