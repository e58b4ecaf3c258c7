use brickyard_common::Aabb;
use glam::{Mat4, Vec3};
use gltf::{Gltf, Node, Semantic};
use std::collections::BTreeSet;
use std::path::Path;

use crate::AssetError;

/// A parsed glTF 2.0 document, `.gltf` or `.glb`. Buffers are not loaded.
pub struct Document {
    gltf: Gltf,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.node_count())
            .field("meshes", &self.mesh_count())
            .finish()
    }
}

/// Read a `.gltf` or `.glb` file.
pub fn load_document(path: impl AsRef<Path>) -> Result<Document, AssetError> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_document(&bytes)
}

/// Parse document bytes; the binary container is detected by the library.
pub fn parse_document(bytes: &[u8]) -> Result<Document, AssetError> {
    let gltf = Gltf::from_slice(bytes).map_err(|e| AssetError::Gltf(e.to_string()))?;
    Ok(Document { gltf })
}

impl Document {
    pub fn node_count(&self) -> usize {
        self.gltf.nodes().len()
    }

    pub fn mesh_count(&self) -> usize {
        self.gltf.meshes().len()
    }

    /// Local bounds of one mesh from its POSITION accessors.
    fn mesh_bounds(mesh: &gltf::Mesh<'_>) -> Result<Aabb, AssetError> {
        let mut bounds = Aabb::empty();
        for prim in mesh.primitives() {
            let Some(acc) = prim.get(&Semantic::Positions) else {
                continue;
            };
            let (Some(min), Some(max)) = (acc.min(), acc.max()) else {
                return Err(AssetError::Gltf(format!(
                    "POSITION accessor {} has no min/max",
                    acc.index()
                )));
            };
            let min: [f32; 3] = serde_json::from_value(min)?;
            let max: [f32; 3] = serde_json::from_value(max)?;
            bounds = bounds.union(&Aabb::new(Vec3::from_array(min), Vec3::from_array(max)));
        }
        Ok(bounds)
    }

    /// Root nodes of the default scene, else the first scene, else every
    /// node that is nobody's child.
    fn roots(&self) -> Vec<Node<'_>> {
        if let Some(scene) = self.gltf.default_scene().or_else(|| self.gltf.scenes().next()) {
            return scene.nodes().collect();
        }
        let children: BTreeSet<usize> = self
            .gltf
            .nodes()
            .flat_map(|n| n.children().map(|c| c.index()))
            .collect();
        self.gltf
            .nodes()
            .filter(|n| !children.contains(&n.index()))
            .collect()
    }

    /// Combined bounds of every mesh in the hierarchy, in model space.
    pub fn bounds(&self) -> Result<Aabb, AssetError> {
        let mut total = Aabb::empty();
        if self.node_count() == 0 {
            for mesh in self.gltf.meshes() {
                total = total.union(&Self::mesh_bounds(&mesh)?);
            }
        } else {
            let mut visited = BTreeSet::new();
            let mut stack: Vec<(Node<'_>, Mat4)> =
                self.roots().into_iter().map(|n| (n, Mat4::IDENTITY)).collect();
            while let Some((node, parent)) = stack.pop() {
                if !visited.insert(node.index()) {
                    return Err(AssetError::Gltf(format!(
                        "node {} visited twice",
                        node.index()
                    )));
                }
                let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
                if let Some(mesh) = node.mesh() {
                    let local = Self::mesh_bounds(&mesh)?;
                    if local.is_valid() {
                        total = total.union(&local.transformed(&world));
                    }
                }
                stack.extend(node.children().map(|c| (c, world)));
            }
        }
        if total.is_valid() {
            tracing::debug!(min = ?total.min, max = ?total.max, "model bounds");
            Ok(total)
        } else {
            Err(AssetError::NoGeometry)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_NODES: &str = r#"{
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [
            {"name": "root", "translation": [0, 1, 0], "children": [1], "mesh": 0},
            {"name": "arm", "translation": [3, 0, 0], "scale": [2, 2, 2], "mesh": 0}
        ],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
        "accessors": [{
            "componentType": 5126, "count": 3, "type": "VEC3",
            "min": [-0.5, 0, -0.5], "max": [0.5, 1, 0.5]
        }]
    }"#;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn bounds_follow_node_hierarchy() {
        let doc = parse_document(TWO_NODES.as_bytes()).unwrap();
        assert_eq!(doc.node_count(), 2);
        assert_eq!(doc.mesh_count(), 1);
        let b = doc.bounds().unwrap();
        assert!(approx(b.min, Vec3::new(-0.5, 1.0, -1.0)));
        assert!(approx(b.max, Vec3::new(4.0, 3.0, 1.0)));
    }

    #[test]
    fn matrix_overrides_identity() {
        let json = r#"{
            "asset": {"version": "2.0"},
            "nodes": [{"mesh": 0, "matrix": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,2,0,1]}],
            "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
            "accessors": [{
                "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [0, 0, 0], "max": [1, 1, 1]
            }]
        }"#;
        let b = parse_document(json.as_bytes()).unwrap().bounds().unwrap();
        assert!(approx(b.min, Vec3::new(0.0, 2.0, 0.0)));
        assert!(approx(b.max, Vec3::new(1.0, 3.0, 1.0)));
    }

    #[test]
    fn meshes_without_nodes_use_model_space() {
        let json = r#"{
            "asset": {"version": "2.0"},
            "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
            "accessors": [{
                "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [0, 0, 0], "max": [1, 2, 3]
            }]
        }"#;
        let b = parse_document(json.as_bytes()).unwrap().bounds().unwrap();
        assert_eq!(b.size(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn empty_document_has_no_geometry() {
        let doc = parse_document(br#"{"asset": {"version": "2.0"}}"#).unwrap();
        assert!(matches!(doc.bounds(), Err(AssetError::NoGeometry)));
    }

    #[test]
    fn malformed_json_is_a_gltf_error() {
        assert!(matches!(parse_document(b"not json"), Err(AssetError::Gltf(_))));
    }

    #[test]
    fn cyclic_hierarchy_is_rejected() {
        let json = r#"{
            "asset": {"version": "2.0"},
            "scenes": [{"nodes": [0]}],
            "nodes": [{"children": [1]}, {"children": [0]}]
        }"#;
        let result = parse_document(json.as_bytes()).and_then(|d| d.bounds());
        assert!(matches!(result, Err(AssetError::Gltf(_))));
    }

    #[test]
    fn glb_container_is_unwrapped() {
        let mut json = TWO_NODES.as_bytes().to_vec();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }
        let mut glb = Vec::new();
        glb.extend_from_slice(b"glTF");
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&((20 + json.len()) as u32).to_le_bytes());
        glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"JSON");
        glb.extend_from_slice(&json);
        let doc = parse_document(&glb).unwrap();
        assert_eq!(doc.node_count(), 2);
        assert!(doc.bounds().is_ok());

        glb.truncate(24);
        assert!(matches!(parse_document(&glb), Err(AssetError::Gltf(_))));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.gltf");
        std::fs::write(&path, TWO_NODES).unwrap();
        let doc = load_document(&path).unwrap();
        assert_eq!(doc.node_count(), 2);
        assert!(matches!(
            load_document(dir.path().join("missing.gltf")),
            Err(AssetError::Io(_))
        ));
    }
}
