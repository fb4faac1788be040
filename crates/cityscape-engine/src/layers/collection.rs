use crate::math::Vec3;
use crate::scene::SceneFile;

/// Shading variant of a layer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LayerKind {
    /// Uniform color, no lighting (water, parks, surface).
    Flat,
    /// Per-vertex diffuse lighting against a fixed light (buildings).
    Lit,
}

/// One named drawable group: geometry triangles sharing a color and a
/// shading kind.
#[derive(Debug, Clone)]
pub struct Layer {
    kind: LayerKind,
    vertices: Vec<f32>,
    indices: Vec<u16>,
    normals: Option<Vec<f32>>,
    color: [f32; 4],
}

impl Layer {
    #[inline]
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Flat `x, y, z` triples.
    #[inline]
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Normal triples; present iff the layer is [`LayerKind::Lit`].
    #[inline]
    pub fn normals(&self) -> Option<&[f32]> {
        self.normals.as_deref()
    }

    #[inline]
    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

/// Insertion-ordered collection of named layers with a cached centroid.
///
/// The centroid is the arithmetic mean of every vertex triple across all
/// layers and is recomputed on each add/remove; the empty collection reports
/// the origin. Draw order is insertion order; re-adding an existing name
/// replaces the layer in place.
#[derive(Debug, Default)]
pub struct Layers {
    entries: Vec<(String, Layer)>,
    centroid: Vec3,
    revision: u64,
}

impl Layers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a flat-shaded layer.
    pub fn add_flat(&mut self, name: &str, vertices: Vec<f32>, indices: Vec<u16>, color: [f32; 4]) {
        self.insert(
            name,
            Layer {
                kind: LayerKind::Flat,
                vertices,
                indices,
                normals: None,
                color,
            },
        );
    }

    /// Adds (or replaces) a lit layer with per-vertex normals.
    pub fn add_lit(
        &mut self,
        name: &str,
        vertices: Vec<f32>,
        indices: Vec<u16>,
        normals: Vec<f32>,
        color: [f32; 4],
    ) {
        self.insert(
            name,
            Layer {
                kind: LayerKind::Lit,
                vertices,
                indices,
                normals: Some(normals),
                color,
            },
        );
    }

    /// Removes a layer by name. No-op when absent.
    pub fn remove(&mut self, name: &str) {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| n != name);
        if self.entries.len() != before {
            self.touch();
        }
    }

    /// Merges every recognized layer of a decoded scene document.
    ///
    /// The document is already validated, so this cannot fail; existing
    /// layers with the same names are replaced.
    pub fn apply_scene(&mut self, scene: SceneFile) {
        if let Some(b) = scene.buildings {
            self.add_lit("buildings", b.vertices, b.indices, b.normals, b.color);
        }
        if let Some(w) = scene.water {
            self.add_flat("water", w.vertices, w.indices, w.color);
        }
        if let Some(p) = scene.parks {
            self.add_flat("parks", p.vertices, p.indices, p.color);
        }
        if let Some(s) = scene.surface {
            self.add_flat("surface", s.vertices, s.indices, s.color);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.entries
            .iter()
            .find_map(|(n, l)| (n == name).then_some(l))
    }

    /// Iterates layers in draw (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Layer)> {
        self.entries.iter().map(|(n, l)| (n.as_str(), l))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached mean of all vertex positions; the camera's orbit pivot.
    #[inline]
    pub fn centroid(&self) -> Vec3 {
        self.centroid
    }

    /// Monotonic counter bumped on every mutation; renderers use it to
    /// detect when their GPU-side mirror is stale.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn insert(&mut self, name: &str, layer: Layer) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = layer,
            None => self.entries.push((name.to_owned(), layer)),
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.centroid = self.compute_centroid();
        self.revision += 1;
    }

    fn compute_centroid(&self) -> Vec3 {
        let mut sum = Vec3::zero();
        let mut count = 0usize;
        for (_, layer) in &self.entries {
            for triple in layer.vertices.chunks_exact(3) {
                sum = sum + Vec3::new(triple[0], triple[1], triple[2]);
                count += 1;
            }
        }
        if count == 0 {
            Vec3::zero()
        } else {
            sum / count as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneFile;

    fn triangle() -> (Vec<f32>, Vec<u16>) {
        (vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0], vec![0, 1, 2])
    }

    #[test]
    fn empty_collection_centroid_is_origin() {
        assert_eq!(Layers::new().centroid(), Vec3::zero());
    }

    #[test]
    fn centroid_is_mean_of_all_vertices() {
        let mut layers = Layers::new();
        let (verts, idx) = triangle();
        layers.add_flat("water", verts, idx, [0.0, 0.0, 1.0, 1.0]);

        let c = layers.centroid();
        assert!((c.x - 1.0 / 3.0).abs() < 1e-6);
        assert!(c.y.abs() < 1e-6);
        assert!((c.z - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn centroid_spans_multiple_layers() {
        let mut layers = Layers::new();
        layers.add_flat(
            "surface",
            vec![0.0, 0.0, 0.0, 2.0, 0.0, 0.0],
            vec![0, 1, 1],
            [0.5, 0.5, 0.5, 1.0],
        );
        layers.add_flat(
            "parks",
            vec![4.0, 4.0, 4.0, 6.0, 4.0, 4.0],
            vec![0, 1, 1],
            [0.0, 1.0, 0.0, 1.0],
        );

        // Mean of (0,0,0), (2,0,0), (4,4,4), (6,4,4).
        let c = layers.centroid();
        assert!((c.x - 3.0).abs() < 1e-6);
        assert!((c.y - 2.0).abs() < 1e-6);
        assert!((c.z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn add_then_remove_restores_key_set_and_centroid() {
        let mut layers = Layers::new();
        let (verts, idx) = triangle();
        layers.add_flat("water", verts, idx, [0.0, 0.0, 1.0, 1.0]);

        let keys_before: Vec<String> = layers.iter().map(|(n, _)| n.to_owned()).collect();
        let centroid_before = layers.centroid();

        layers.add_flat(
            "parks",
            vec![9.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0],
            vec![0, 1, 2],
            [0.0, 1.0, 0.0, 1.0],
        );
        layers.remove("parks");

        let keys_after: Vec<String> = layers.iter().map(|(n, _)| n.to_owned()).collect();
        assert_eq!(keys_before, keys_after);
        assert!((layers.centroid() - centroid_before).length() < 1e-6);
    }

    #[test]
    fn remove_missing_layer_is_a_noop() {
        let mut layers = Layers::new();
        let (verts, idx) = triangle();
        layers.add_flat("water", verts, idx, [0.0, 0.0, 1.0, 1.0]);
        let rev = layers.revision();

        layers.remove("no-such-layer");
        assert_eq!(layers.len(), 1);
        assert_eq!(layers.revision(), rev);
    }

    #[test]
    fn reinsert_replaces_in_place_and_keeps_order() {
        let mut layers = Layers::new();
        let (verts, idx) = triangle();
        layers.add_flat("surface", verts.clone(), idx.clone(), [0.5; 4]);
        layers.add_flat("water", verts.clone(), idx.clone(), [0.0, 0.0, 1.0, 1.0]);
        layers.add_flat("surface", verts, idx, [0.6, 0.6, 0.6, 1.0]);

        let keys: Vec<&str> = layers.iter().map(|(n, _)| n).collect();
        assert_eq!(keys, ["surface", "water"]);
        assert_eq!(layers.get("surface").unwrap().color(), [0.6, 0.6, 0.6, 1.0]);
    }

    #[test]
    fn apply_scene_creates_recognized_layers_only() {
        let scene = SceneFile::parse(
            r#"{
                "water": {"vertices": [0,0,0, 1,0,0, 0,0,1], "indices": [0,1,2], "color": [0,0,1,1]},
                "buildings": {
                    "vertices": [0,0,0, 1,0,0, 0,1,0],
                    "indices": [0,1,2],
                    "normals": [0,0,1, 0,0,1, 0,0,1],
                    "color": [0.8, 0.8, 0.8, 1.0]
                },
                "unknownKey": 42
            }"#,
        )
        .unwrap();

        let mut layers = Layers::new();
        layers.apply_scene(scene);

        assert_eq!(layers.len(), 2);
        assert_eq!(layers.get("buildings").unwrap().kind(), LayerKind::Lit);
        assert_eq!(layers.get("water").unwrap().kind(), LayerKind::Flat);
        assert!(layers.get("unknownKey").is_none());
    }

    #[test]
    fn water_scenario_matches_expected_layer_and_centroid() {
        let scene = SceneFile::parse(
            r#"{"water": {"vertices": [0,0,0, 1,0,0, 0,0,1], "indices": [0,1,2], "color": [0,0,1,1]}}"#,
        )
        .unwrap();

        let mut layers = Layers::new();
        layers.apply_scene(scene);

        assert_eq!(layers.len(), 1);
        let water = layers.get("water").unwrap();
        assert_eq!(water.kind(), LayerKind::Flat);
        assert_eq!(water.indices().len(), 3);
        assert_eq!(water.color(), [0.0, 0.0, 1.0, 1.0]);

        let c = layers.centroid();
        assert!((c.x - 1.0 / 3.0).abs() < 1e-6);
        assert!(c.y.abs() < 1e-6);
        assert!((c.z - 1.0 / 3.0).abs() < 1e-6);
    }
}
