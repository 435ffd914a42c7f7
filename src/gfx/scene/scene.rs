use std::collections::BTreeMap;

use crate::gfx::{
    color::Color,
    geometry::GeometryStore,
    resources::texture_library::TextureLibrary,
};

use super::{
    light::Light,
    object::{ObjectId, SceneObject},
};

/// Main scene containing objects, lights, geometries and texture slots
///
/// Objects are keyed by [`ObjectId`] and iterate in insertion order. The
/// renderer learns about removals and disposals through the drain methods.
#[derive(Debug)]
pub struct Scene {
    objects: BTreeMap<ObjectId, SceneObject>,
    next_object_id: u64,
    removed: Vec<ObjectId>,
    pub lights: Vec<Light>,
    pub background: Color,
    pub geometries: GeometryStore,
    pub textures: TextureLibrary,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            next_object_id: 0,
            removed: Vec::new(),
            lights: Vec::new(),
            background: Color::BLACK,
            geometries: GeometryStore::default(),
            textures: TextureLibrary::default(),
        }
    }

    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        log::debug!("Adding object {:?} ({})", id, object.name);
        self.objects.insert(id, object);
        id
    }

    /// Detaches an object. Its geometry stays in the store because other
    /// objects may share it.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let object = self.objects.remove(&id)?;
        self.removed.push(id);
        Some(object)
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    pub fn mesh_count(&self) -> usize {
        self.objects.len()
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn drain_removed(&mut self) -> Vec<ObjectId> {
        std::mem::take(&mut self.removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{geometry::Primitive, resources::material::Material};

    #[test]
    fn test_add_remove_keeps_shared_geometry() {
        let mut scene = Scene::new();
        let cube = scene.geometries.insert_primitive(Primitive::cube(1.0, 1.0, 1.0, 1));
        let a = scene.add(SceneObject::new("a", cube, Material::default()));
        let b = scene.add(SceneObject::new("b", cube, Material::default()));
        assert_eq!(scene.mesh_count(), 2);

        let removed = scene.remove(a).unwrap();
        assert_eq!(removed.name, "a");
        assert!(scene.remove(a).is_none());
        assert_eq!(scene.mesh_count(), 1);
        assert_eq!(scene.geometries.live_count(), 1);
        assert_eq!(scene.drain_removed(), vec![a]);
        assert!(scene.get(b).is_some());
    }

    #[test]
    fn test_objects_iterate_in_insertion_order() {
        let mut scene = Scene::new();
        let cube = scene.geometries.insert_primitive(Primitive::cube(1.0, 1.0, 1.0, 1));
        let ids: Vec<_> = (0..5)
            .map(|i| scene.add(SceneObject::new(format!("{i}"), cube, Material::default())))
            .collect();
        let iterated: Vec<_> = scene.objects().map(|(id, _)| id).collect();
        assert_eq!(ids, iterated);
    }
}
