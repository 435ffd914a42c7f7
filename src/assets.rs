//! Background loading of matcap images and fonts.
//!
//! Files are read and decoded on worker threads; results come back to the
//! event loop as [`AssetEvent`]s so every scene mutation stays on the UI
//! thread. There is no retry and no cancellation.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::{mpsc, Arc},
    thread,
};

use winit::event_loop::EventLoopProxy;

use crate::{
    error::AssetError,
    gfx::{
        geometry::{Contour, OutlineSource},
        resources::{TextureAsset, TextureId},
    },
};

/// A parsed font, shared by every text rebuild.
#[derive(Clone)]
pub struct FontHandle {
    path: PathBuf,
    outlines: Arc<dyn OutlineSource + Send + Sync>,
}

impl FontHandle {
    pub fn new(path: impl Into<PathBuf>, outlines: Arc<dyn OutlineSource + Send + Sync>) -> Self {
        Self {
            path: path.into(),
            outlines,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutlineSource for FontHandle {
    fn outline(&self, text: &str, size: f32, curve_segments: u32) -> Vec<Contour> {
        self.outlines.outline(text, size, curve_segments)
    }
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle").field("path", &self.path).finish()
    }
}

#[derive(Debug)]
pub enum AssetEvent {
    TextureLoaded { id: TextureId, asset: TextureAsset },
    FontLoaded(FontHandle),
    Failed(AssetError),
}

/// Where finished loads are delivered.
pub trait AssetSink: Send + 'static {
    fn deliver(&self, event: AssetEvent);
}

impl AssetSink for EventLoopProxy<AssetEvent> {
    fn deliver(&self, event: AssetEvent) {
        if self.send_event(event).is_err() {
            log::debug!("Event loop closed before an asset arrived");
        }
    }
}

impl AssetSink for mpsc::Sender<AssetEvent> {
    fn deliver(&self, event: AssetEvent) {
        let _ = self.send(event);
    }
}

pub fn read_texture(path: &Path) -> Result<TextureAsset, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory(&bytes)
        .map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    Ok(TextureAsset {
        label: path.display().to_string(),
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

pub fn read_font(path: &Path) -> Result<FontHandle, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let font = rusttype::Font::try_from_vec(bytes).ok_or_else(|| AssetError::Font {
        path: path.to_path_buf(),
    })?;
    Ok(FontHandle::new(path, Arc::new(font)))
}

/// Starts loads relative to an asset root directory.
pub struct AssetLoader<S> {
    root: PathBuf,
    sink: S,
}

impl<S: AssetSink + Clone> AssetLoader<S> {
    pub fn new(root: impl Into<PathBuf>, sink: S) -> Self {
        Self {
            root: root.into(),
            sink,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decodes every slot on one worker thread, delivering each as it finishes.
    pub fn load_textures(&self, slots: Vec<(TextureId, PathBuf)>) {
        if slots.is_empty() {
            return;
        }
        let root = self.root.clone();
        let sink = self.sink.clone();
        thread::spawn(move || {
            for (id, relative) in slots {
                let event = match read_texture(&root.join(&relative)) {
                    Ok(asset) => {
                        log::info!("Loaded texture {} ({}x{})", asset.label, asset.width, asset.height);
                        AssetEvent::TextureLoaded { id, asset }
                    }
                    Err(e) => AssetEvent::Failed(e),
                };
                sink.deliver(event);
            }
        });
    }

    pub fn load_font(&self, relative: impl AsRef<Path>) {
        let path = self.root.join(relative);
        let sink = self.sink.clone();
        thread::spawn(move || {
            let event = match read_font(&path) {
                Ok(font) => {
                    log::info!("Loaded font {}", path.display());
                    AssetEvent::FontLoaded(font)
                }
                Err(e) => AssetEvent::Failed(e),
            };
            sink.deliver(event);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::TextureLibrary;
    use std::time::Duration;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("vitrine-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(dir.join("matcaps")).unwrap();
        dir
    }

    #[test]
    fn test_texture_loads_through_sink() {
        let root = scratch_dir("texture");
        let mut pixels = image::RgbaImage::new(4, 2);
        pixels.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        pixels.save(root.join("matcaps/1.png")).unwrap();

        let mut library = TextureLibrary::default();
        let id = library.reserve("matcaps/1.png");

        let (tx, rx) = mpsc::channel();
        let loader = AssetLoader::new(&root, tx);
        loader.load_textures(library.pending());

        match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
            AssetEvent::TextureLoaded { id: loaded, asset } => {
                assert_eq!(loaded, id);
                assert_eq!((asset.width, asset.height), (4, 2));
                assert_eq!(&asset.rgba[..4], &[255, 0, 0, 255]);
            }
            other => panic!("unexpected event {other:?}"),
        }
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_missing_font_reports_failure() {
        let root = scratch_dir("font");
        let (tx, rx) = mpsc::channel();
        let loader = AssetLoader::new(&root, tx);
        loader.load_font("fonts/missing.ttf");

        match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
            AssetEvent::Failed(AssetError::Read { path, .. }) => {
                assert!(path.ends_with("fonts/missing.ttf"));
            }
            other => panic!("unexpected event {other:?}"),
        }
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_garbage_is_not_a_font() {
        let root = scratch_dir("garbage");
        let path = root.join("not-a-font.ttf");
        std::fs::write(&path, b"definitely not truetype").unwrap();
        assert!(matches!(read_font(&path), Err(AssetError::Font { .. })));
        let _ = std::fs::remove_dir_all(root);
    }
}
