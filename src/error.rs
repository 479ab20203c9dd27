//! Error types for the editor
//!
//! Startup failures (window, GPU, configuration) are reported through [`EditorError`].
//! Interaction paths never fail: picking misses, absent UI and keyboard input while
//! typing fall back to "no selection" or "no-op" instead of surfacing an error.

use thiserror::Error;

/// Errors raised while creating or running the editor
#[derive(Error, Debug)]
pub enum EditorError {
    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A color string was not a `#rrggbb` hex value
    #[error("invalid color `{0}`, expected #rrggbb")]
    InvalidColor(String),

    /// The winit event loop could not be created or failed while running
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The operating system refused to create the window
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    /// wgpu could not create a surface for the window
    #[error("surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    /// No adapter compatible with the surface was found
    #[error("no compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    /// The adapter refused to open a device
    #[error("GPU device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
