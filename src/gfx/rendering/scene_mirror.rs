//! Bookkeeping between the CPU scene and its GPU counterparts
//!
//! [`SceneMirror`] keys per-geometry and per-object entries by the scene's
//! ids. It never creates GPU objects itself: the render engine passes
//! constructors, so the release and creation rules are testable without a
//! device.

use std::collections::HashMap;

use crate::gfx::{
    geometry::{GeometryData, GeometryId},
    scene::{ObjectId, Scene, SceneObject},
};

/// Entries dropped by one [`SceneMirror::release`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Released {
    pub geometries: usize,
    pub objects: usize,
}

/// GPU-side entries of a scene: `G` per geometry, `O` per object.
pub struct SceneMirror<G, O> {
    geometries: HashMap<GeometryId, G>,
    objects: HashMap<ObjectId, O>,
}

impl<G, O> Default for SceneMirror<G, O> {
    fn default() -> Self {
        Self {
            geometries: HashMap::new(),
            objects: HashMap::new(),
        }
    }
}

impl<G, O> SceneMirror<G, O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the entries of every geometry the store disposed and every
    /// object the scene removed since the last call.
    pub fn release(&mut self, scene: &mut Scene) -> Released {
        let mut released = Released::default();
        for id in scene.geometries.drain_disposed() {
            if self.geometries.remove(&id).is_some() {
                log::debug!("Released buffers of {:?}", id);
                released.geometries += 1;
            }
        }
        for id in scene.drain_removed() {
            if self.objects.remove(&id).is_some() {
                released.objects += 1;
            }
        }
        released
    }

    /// Creates missing entries for every visible object and refreshes the
    /// object entries with `update_object`.
    ///
    /// # Arguments
    /// * `create_geometry` - Builds the entry of a geometry drawn for the first time
    /// * `create_object` - Builds the entry of an object drawn for the first time
    /// * `update_object` - Copies the object's current state into its entry
    pub fn prepare(
        &mut self,
        scene: &Scene,
        mut create_geometry: impl FnMut(GeometryId, &GeometryData) -> G,
        mut create_object: impl FnMut(ObjectId) -> O,
        mut update_object: impl FnMut(&mut O, &SceneObject),
    ) {
        for (id, object) in scene.objects() {
            if !object.visible {
                continue;
            }
            if !self.geometries.contains_key(&object.geometry) {
                match scene.geometries.get(object.geometry) {
                    Some(resource) if !resource.data.is_empty() => {
                        let entry = create_geometry(object.geometry, &resource.data);
                        self.geometries.insert(object.geometry, entry);
                    }
                    Some(_) => {}
                    None => {
                        log::warn!("{:?} ({}) uses a disposed geometry", id, object.name);
                        continue;
                    }
                }
            }

            let entry = self.objects.entry(id).or_insert_with(|| create_object(id));
            update_object(entry, object);
        }
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&G> {
        self.geometries.get(&id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&O> {
        self.objects.get(&id)
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    use rand::{rngs::StdRng, SeedableRng};

    use crate::{
        assets::FontHandle,
        context::DemoContext,
        demos::{text_figures::TextParam, TextFigures},
        gfx::{
            geometry::{text::tests::BlockFont, GeometryDescriptor, Primitive},
            resources::material::Material,
        },
        ui::{EditPhase, ParamValue},
        viewport::ViewportState,
    };

    /// Vertex count stands in for the buffers, the update count for the uniforms.
    type CountingMirror = SceneMirror<usize, u32>;

    fn sync(mirror: &mut CountingMirror, scene: &mut Scene) -> Released {
        let released = mirror.release(scene);
        mirror.prepare(
            scene,
            |_, data| data.vertex_count(),
            |_| 0,
            |updates, _| *updates += 1,
        );
        released
    }

    fn used_geometries(scene: &Scene) -> HashSet<GeometryId> {
        scene.objects().map(|(_, object)| object.geometry).collect()
    }

    #[test]
    fn test_text_rebuilds_leave_one_live_text_entry() {
        let demo = TextFigures::new(StdRng::seed_from_u64(7));
        let mut context = DemoContext::new(demo, ViewportState::new(1000, 800, 1.0));
        context.font_loaded(FontHandle::new("block", Arc::new(BlockFont)));

        let mut mirror = CountingMirror::new();
        sync(&mut mirror, &mut context.scene);
        let first_text = context.demo.text().unwrap();
        let first_geometry = context.scene.get(first_text).unwrap().geometry;
        assert!(mirror.geometry(first_geometry).is_some());

        for content in ["a", "ab", "abc", "abcd", "abcde"] {
            let value = ParamValue::Text(content.into());
            if let Some(change) = context.panel.edit(TextParam::Content, value, EditPhase::Finished) {
                context.apply_change(&change);
            }
        }

        let released = sync(&mut mirror, &mut context.scene);
        assert_eq!(released.geometries, 1);
        assert_eq!(released.objects, 1);

        let text = context.demo.text().unwrap();
        let text_geometry = context.scene.get(text).unwrap().geometry;
        assert_ne!(text_geometry, first_geometry);
        assert!(mirror.geometry(first_geometry).is_none());
        assert!(mirror.object(first_text).is_none());
        assert_eq!(mirror.object(text), Some(&1));

        assert_eq!(mirror.geometry_count(), used_geometries(&context.scene).len());
        assert_eq!(mirror.object_count(), context.scene.mesh_count());
    }

    #[test]
    fn test_removed_object_keeps_shared_geometry() {
        let mut scene = Scene::new();
        let cube = scene.geometries.insert_primitive(Primitive::cube(1.0, 1.0, 1.0, 2));
        let a = scene.add(SceneObject::new("a", cube, Material::default()));
        let b = scene.add(SceneObject::new("b", cube, Material::default()));

        let mut mirror = CountingMirror::new();
        sync(&mut mirror, &mut scene);
        assert_eq!(mirror.object_count(), 2);

        scene.remove(a);
        let released = sync(&mut mirror, &mut scene);

        assert_eq!(released, Released { geometries: 0, objects: 1 });
        assert!(mirror.geometry(cube).is_some());
        assert_eq!(mirror.object(b), Some(&2));
    }

    #[test]
    fn test_hidden_objects_and_empty_geometry_get_no_buffers() {
        let mut scene = Scene::new();
        let cube = scene.geometries.insert_primitive(Primitive::cube(1.0, 1.0, 1.0, 1));
        let descriptor = GeometryDescriptor::Primitive(Primitive::cube(1.0, 1.0, 1.0, 1));
        let empty = scene.geometries.insert(descriptor, GeometryData::new());
        let mut hidden = SceneObject::new("hidden", cube, Material::default());
        hidden.visible = false;
        let hidden = scene.add(hidden);
        let blank = scene.add(SceneObject::new("blank", empty, Material::default()));

        let mut mirror = CountingMirror::new();
        sync(&mut mirror, &mut scene);

        assert_eq!(mirror.geometry_count(), 0);
        assert!(mirror.object(hidden).is_none());
        assert!(mirror.object(blank).is_some());
    }
}
