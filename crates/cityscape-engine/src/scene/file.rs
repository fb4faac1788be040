use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use serde::Deserialize;

/// Geometry for a flat-shaded layer (water, parks, surface).
#[derive(Debug, Clone, Deserialize)]
pub struct FlatGeometry {
    /// Flat `x, y, z` triples.
    pub vertices: Vec<f32>,
    /// Triangle-list indices into the vertex triples.
    pub indices: Vec<u16>,
    /// RGBA in `[0, 1]`.
    pub color: [f32; 4],
}

/// Geometry for the lit buildings layer: flat geometry plus per-vertex
/// normals.
#[derive(Debug, Clone, Deserialize)]
pub struct LitGeometry {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
    /// One normal triple per vertex triple.
    pub normals: Vec<f32>,
    pub color: [f32; 4],
}

/// Decoded scene document.
///
/// serde's default tolerant decoding drops unrecognized top-level keys,
/// matching the file format contract.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneFile {
    pub buildings: Option<LitGeometry>,
    pub water: Option<FlatGeometry>,
    pub parks: Option<FlatGeometry>,
    pub surface: Option<FlatGeometry>,
}

impl SceneFile {
    /// Decodes and validates a scene document from JSON text.
    pub fn parse(text: &str) -> Result<SceneFile> {
        let scene: SceneFile =
            serde_json::from_str(text).context("scene file is not valid JSON")?;
        scene.validate()?;
        Ok(scene)
    }

    /// Returns true when no recognized layer key is present.
    pub fn is_empty(&self) -> bool {
        self.buildings.is_none()
            && self.water.is_none()
            && self.parks.is_none()
            && self.surface.is_none()
    }

    fn validate(&self) -> Result<()> {
        if let Some(b) = &self.buildings {
            validate_geometry("buildings", &b.vertices, &b.indices, &b.color)?;
            ensure!(
                b.normals.len() == b.vertices.len(),
                "layer \"buildings\": {} normal components for {} vertex components",
                b.normals.len(),
                b.vertices.len()
            );
        }
        for (name, geom) in [
            ("water", &self.water),
            ("parks", &self.parks),
            ("surface", &self.surface),
        ] {
            if let Some(g) = geom {
                validate_geometry(name, &g.vertices, &g.indices, &g.color)?;
            }
        }
        Ok(())
    }
}

fn validate_geometry(name: &str, vertices: &[f32], indices: &[u16], color: &[f32; 4]) -> Result<()> {
    ensure!(
        vertices.len() % 3 == 0,
        "layer \"{name}\": vertex array length {} is not a multiple of 3",
        vertices.len()
    );

    let vertex_count = vertices.len() / 3;
    for (i, &index) in indices.iter().enumerate() {
        if usize::from(index) >= vertex_count {
            bail!(
                "layer \"{name}\": index {index} at position {i} out of range \
                 ({vertex_count} vertices)"
            );
        }
    }

    for (channel, &value) in ["r", "g", "b", "a"].iter().zip(color) {
        ensure!(
            (0.0..=1.0).contains(&value),
            "layer \"{name}\": color channel {channel} = {value} outside [0, 1]"
        );
    }

    Ok(())
}

/// Reads and parses a scene file from disk.
///
/// IO and parse failures both surface as one error chain; the caller decides
/// whether that is fatal (startup) or a logged notice (drag-and-drop).
pub fn load_scene_file(path: &Path) -> Result<SceneFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scene file {}", path.display()))?;
    SceneFile::parse(&text).with_context(|| format!("failed to load {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_top_level_keys_are_ignored() {
        let scene = SceneFile::parse(
            r#"{
                "buildings": {
                    "vertices": [0,0,0, 1,0,0, 0,1,0],
                    "indices": [0,1,2],
                    "normals": [0,0,1, 0,0,1, 0,0,1],
                    "color": [0.8, 0.8, 0.8, 1.0]
                },
                "water": {
                    "vertices": [0,0,0, 1,0,0, 0,0,1],
                    "indices": [0,1,2],
                    "color": [0, 0, 1, 1]
                },
                "unknownKey": { "anything": [1, 2, 3] }
            }"#,
        )
        .unwrap();

        assert!(scene.buildings.is_some());
        assert!(scene.water.is_some());
        assert!(scene.parks.is_none());
        assert!(scene.surface.is_none());
    }

    #[test]
    fn malformed_json_fails_the_whole_load() {
        let err = SceneFile::parse("{ not json").unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn out_of_range_index_is_a_descriptive_error() {
        let err = SceneFile::parse(
            r#"{"water": {"vertices": [0,0,0, 1,0,0, 0,0,1], "indices": [0,1,3], "color": [0,0,1,1]}}"#,
        )
        .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("water"), "{msg}");
        assert!(msg.contains("out of range"), "{msg}");
    }

    #[test]
    fn ragged_vertex_array_is_rejected() {
        let err = SceneFile::parse(
            r#"{"parks": {"vertices": [0,0,0, 1], "indices": [0], "color": [0,1,0,1]}}"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("multiple of 3"));
    }

    #[test]
    fn normals_must_match_vertices() {
        let err = SceneFile::parse(
            r#"{"buildings": {
                "vertices": [0,0,0, 1,0,0, 0,1,0],
                "indices": [0,1,2],
                "normals": [0,0,1],
                "color": [1,1,1,1]
            }}"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("normal components"));
    }

    #[test]
    fn out_of_range_color_is_rejected() {
        let err = SceneFile::parse(
            r#"{"surface": {"vertices": [0,0,0, 1,0,0, 0,0,1], "indices": [0,1,2], "color": [0,0,2.5,1]}}"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("outside [0, 1]"));
    }

    #[test]
    fn empty_object_is_an_empty_scene() {
        let scene = SceneFile::parse("{}").unwrap();
        assert!(scene.is_empty());
    }
}
