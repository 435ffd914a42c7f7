use std::collections::HashMap;
use std::sync::Arc;

use super::{build_text_geometry, GeometryData, GeometryDescriptor, OutlineSource, Primitive, TextDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u64);

/// An immutable generated mesh plus the parameters it came from.
#[derive(Debug, Clone)]
pub struct GeometryResource {
    pub descriptor: GeometryDescriptor,
    pub data: Arc<GeometryData>,
}

/// Owns every live geometry. Objects refer to entries by id, so one
/// resource can back many meshes.
#[derive(Debug, Default)]
pub struct GeometryStore {
    resources: HashMap<GeometryId, GeometryResource>,
    next_id: u64,
    disposed: Vec<GeometryId>,
}

impl GeometryStore {
    pub fn insert(&mut self, descriptor: GeometryDescriptor, data: GeometryData) -> GeometryId {
        let id = GeometryId(self.next_id);
        self.next_id += 1;
        self.resources.insert(
            id,
            GeometryResource {
                descriptor,
                data: Arc::new(data),
            },
        );
        id
    }

    pub fn insert_primitive(&mut self, primitive: Primitive) -> GeometryId {
        let data = primitive.generate();
        self.insert(GeometryDescriptor::Primitive(primitive), data)
    }

    pub fn insert_text(&mut self, descriptor: TextDescriptor, source: &dyn OutlineSource) -> GeometryId {
        let data = build_text_geometry(source, &descriptor);
        log::debug!(
            "Built text geometry {:?}: {} vertices",
            descriptor.content,
            data.vertex_count()
        );
        self.insert(GeometryDescriptor::Text(descriptor), data)
    }

    pub fn get(&self, id: GeometryId) -> Option<&GeometryResource> {
        self.resources.get(&id)
    }

    /// Releases a geometry. The id is queued for the renderer so it can drop
    /// the matching GPU buffers. Returns false if the id was not live.
    pub fn dispose(&mut self, id: GeometryId) -> bool {
        if self.resources.remove(&id).is_some() {
            self.disposed.push(id);
            true
        } else {
            false
        }
    }

    pub fn live_count(&self) -> usize {
        self.resources.len()
    }

    pub fn drain_disposed(&mut self) -> Vec<GeometryId> {
        std::mem::take(&mut self.disposed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispose_queues_id_once() {
        let mut store = GeometryStore::default();
        let a = store.insert_primitive(Primitive::cube(1.0, 1.0, 1.0, 1));
        let b = store.insert_primitive(Primitive::sphere(1.0, 8, 8));
        assert_ne!(a, b);
        assert_eq!(store.live_count(), 2);

        assert!(store.dispose(a));
        assert!(!store.dispose(a));
        assert_eq!(store.live_count(), 1);
        assert!(store.get(a).is_none());
        assert_eq!(store.drain_disposed(), vec![a]);
        assert!(store.drain_disposed().is_empty());
    }

    #[test]
    fn test_descriptor_is_kept() {
        let mut store = GeometryStore::default();
        let primitive = Primitive::cone(0.9, 2.4, 32);
        let id = store.insert_primitive(primitive);
        assert_eq!(
            store.get(id).map(|r| &r.descriptor),
            Some(&GeometryDescriptor::Primitive(primitive))
        );
    }
}
