//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load one external asset. Carried by the failed-load
/// notification; the dependent construction never happens.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{} is not a usable font", path.display())]
    Font { path: PathBuf },
}

impl AssetError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            AssetError::Read { path, .. }
            | AssetError::Decode { path, .. }
            | AssetError::Font { path } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum VitrineError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable graphics adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to open graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface does not support the adapter")]
    UnsupportedSurface,
    #[error("failed to acquire frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("overlay rendering failed: {0}")]
    Overlay(String),
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_names_the_file() {
        let err = AssetError::Font {
            path: PathBuf::from("fonts/missing.ttf"),
        };
        assert_eq!(err.path(), std::path::Path::new("fonts/missing.ttf"));
        assert!(err.to_string().contains("fonts/missing.ttf"));

        let err: VitrineError = err.into();
        assert!(matches!(err, VitrineError::Asset(_)));
    }
}
