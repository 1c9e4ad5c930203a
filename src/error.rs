//! Error types for fluid-canvas.
//!
//! The simulation core (update, draw, emission, frame driver) is total and
//! never fails. Errors only come from the edges: GPU setup, configuration
//! loading, control commands and image export.

use std::fmt;

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// A hex color string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid hex color {:?}, expected the form #rrggbb", self.input)
    }
}

impl std::error::Error for ColorError {}

/// Errors that can occur while loading or validating a [`FluidConfig`](crate::FluidConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    Io(std::io::Error),
    /// The file is not valid JSON for the config schema.
    Parse(serde_json::Error),
    /// A value parsed fine but makes no sense.
    Invalid {
        /// Dotted path of the offending field, e.g. `ambient.probability`.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid { field, reason } => write!(f, "Invalid config value for `{}`: {}", field, reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Errors returned when applying a [`Command`](crate::Command).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// Palette index outside the palette.
    NoSuchColor {
        /// Requested index.
        index: usize,
        /// Number of swatches in the palette.
        len: usize,
    },
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::NoSuchColor { index, len } => {
                write!(f, "Palette has {} colors, index {} is out of range", len, index)
            }
        }
    }
}

impl std::error::Error for ControlError {}

/// Errors that can occur when writing a canvas snapshot.
#[derive(Debug)]
pub enum ExportError {
    /// Failed to encode or write the image.
    Image(image::ImageError),
    /// The canvas has no pixels.
    EmptyCanvas,
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Image(e) => write!(f, "Failed to write image: {}", e),
            ExportError::EmptyCanvas => write!(f, "Cannot export a canvas with zero width or height"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Image(e) => Some(e),
            ExportError::EmptyCanvas => None,
        }
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::Image(e)
    }
}

/// Errors that can occur when running the canvas.
#[derive(Debug)]
pub enum SimulationError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// The configuration was rejected.
    Config(ConfigError),
    /// A scripted control command was rejected.
    Control(ControlError),
    /// Writing the headless snapshot failed.
    Export(ExportError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            SimulationError::Window(e) => write!(f, "Failed to create window: {}", e),
            SimulationError::Gpu(e) => write!(f, "GPU error: {}", e),
            SimulationError::Config(e) => write!(f, "Config error: {}", e),
            SimulationError::Control(e) => write!(f, "Control error: {}", e),
            SimulationError::Export(e) => write!(f, "Export error: {}", e),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::EventLoop(e) => Some(e),
            SimulationError::Window(e) => Some(e),
            SimulationError::Gpu(e) => Some(e),
            SimulationError::Config(e) => Some(e),
            SimulationError::Control(e) => Some(e),
            SimulationError::Export(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for SimulationError {
    fn from(e: winit::error::EventLoopError) -> Self {
        SimulationError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for SimulationError {
    fn from(e: winit::error::OsError) -> Self {
        SimulationError::Window(e)
    }
}

impl From<GpuError> for SimulationError {
    fn from(e: GpuError) -> Self {
        SimulationError::Gpu(e)
    }
}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        SimulationError::Config(e)
    }
}

impl From<ControlError> for SimulationError {
    fn from(e: ControlError) -> Self {
        SimulationError::Control(e)
    }
}

impl From<ExportError> for SimulationError {
    fn from(e: ExportError) -> Self {
        SimulationError::Export(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_display_names_field() {
        let err = ConfigError::invalid("ambient.probability", "must be within [0, 1]");
        let msg = err.to_string();
        assert!(msg.contains("ambient.probability"));
        assert!(msg.contains("[0, 1]"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_simulation_error_keeps_source() {
        let err: SimulationError = ConfigError::invalid("physics.damping", "too large").into();
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Config error"));
    }

    #[test]
    fn test_control_error_display() {
        let err = ControlError::NoSuchColor { index: 9, len: 8 };
        assert_eq!(err.to_string(), "Palette has 8 colors, index 9 is out of range");
    }
}
