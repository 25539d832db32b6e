//! Error Types
//!
//! This module defines the error types used throughout the showcase core.
//!
//! # Overview
//!
//! The main error type [`VitrineError`] covers:
//! - Framebuffer allocation and render failures reported by a backend
//! - Asset decoding and I/O errors raised on loader threads
//! - Configuration parsing errors
//! - Invalid product selections
//!
//! Only framebuffer allocation failures on a valid size are meant to reach the
//! host. Render failures are absorbed by the compositor (the frame is skipped)
//! and asset failures are logged by the loaders.

use thiserror::Error;

use crate::render::RendererId;

/// The main error type for the showcase core.
#[derive(Error, Debug)]
pub enum VitrineError {
    // ========================================================================
    // GPU & Rendering Errors
    // ========================================================================
    /// A render target could not be (re)allocated at the requested size.
    #[error("Framebuffer allocation failed for '{label}': {width}x{height} exceeds limit {limit}")]
    FramebufferAllocation {
        /// Target label (e.g. `"hero.color"`)
        label: String,
        width: u32,
        height: u32,
        /// Largest dimension the backend accepts
        limit: u32,
    },

    /// The backend lost its device or drawing context.
    #[error("Render context lost on {0}")]
    ContextLost(RendererId),

    /// A draw or pass could not be issued.
    #[error("Render failed: {0}")]
    RenderFailed(String),

    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// Image decoding error.
    #[error("Image decode error: {0}")]
    ImageDecodeError(String),

    /// The worker producing an asset went away without delivering a result.
    #[error("Asset loader disconnected: {0}")]
    LoaderDisconnected(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ========================================================================
    // Configuration & Input Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A selection named a product without a camera preset.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),
}

impl From<image::ImageError> for VitrineError {
    fn from(err: image::ImageError) -> Self {
        VitrineError::ImageDecodeError(err.to_string())
    }
}

/// Alias for `Result<T, VitrineError>`.
pub type Result<T> = std::result::Result<T, VitrineError>;
