//! CPU-side texture slots.
//!
//! A slot is reserved when a demo decides it needs an image, before the file
//! has been read. Materials can reference the id right away; the renderer
//! samples a white fallback until the slot is fulfilled.

use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(usize);

/// Decoded RGBA8 pixels, immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureAsset {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug)]
enum Slot {
    Pending,
    Loaded(Arc<TextureAsset>),
}

#[derive(Debug)]
struct Entry {
    path: PathBuf,
    slot: Slot,
}

#[derive(Debug, Default)]
pub struct TextureLibrary {
    entries: Vec<Entry>,
    fresh: Vec<TextureId>,
}

impl TextureLibrary {
    /// Reserves a pending slot for the image at `path` (relative to the asset root).
    pub fn reserve(&mut self, path: impl Into<PathBuf>) -> TextureId {
        self.entries.push(Entry {
            path: path.into(),
            slot: Slot::Pending,
        });
        TextureId(self.entries.len() - 1)
    }

    /// Stores decoded pixels for a slot. Unknown ids are ignored.
    pub fn fulfil(&mut self, id: TextureId, asset: TextureAsset) {
        if let Some(entry) = self.entries.get_mut(id.0) {
            entry.slot = Slot::Loaded(Arc::new(asset));
            self.fresh.push(id);
        }
    }

    pub fn get(&self, id: TextureId) -> Option<&Arc<TextureAsset>> {
        match &self.entries.get(id.0)?.slot {
            Slot::Loaded(asset) => Some(asset),
            Slot::Pending => None,
        }
    }

    pub fn path(&self, id: TextureId) -> Option<&Path> {
        self.entries.get(id.0).map(|e| e.path.as_path())
    }

    pub fn is_loaded(&self, id: TextureId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slots still waiting for their image, with their paths.
    pub fn pending(&self) -> Vec<(TextureId, PathBuf)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e.slot, Slot::Pending))
            .map(|(i, e)| (TextureId(i), e.path.clone()))
            .collect()
    }

    /// Newly loaded slots since the last call, each reported once.
    pub fn drain_loaded(&mut self) -> Vec<(TextureId, Arc<TextureAsset>)> {
        let fresh = std::mem::take(&mut self.fresh);
        fresh
            .into_iter()
            .filter_map(|id| self.get(id).map(|asset| (id, Arc::clone(asset))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(label: &str) -> TextureAsset {
        TextureAsset {
            label: label.to_string(),
            width: 1,
            height: 1,
            rgba: vec![255, 0, 0, 255],
        }
    }

    #[test]
    fn test_reserve_then_fulfil() {
        let mut library = TextureLibrary::default();
        let a = library.reserve("matcaps/1.png");
        let b = library.reserve("matcaps/2.png");
        assert_eq!(library.pending().len(), 2);
        assert!(!library.is_loaded(a));

        library.fulfil(b, pixel("2"));
        assert!(library.is_loaded(b));
        assert_eq!(library.pending(), vec![(a, PathBuf::from("matcaps/1.png"))]);

        let loaded = library.drain_loaded();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].0, b);
        assert!(library.drain_loaded().is_empty());
    }
}
