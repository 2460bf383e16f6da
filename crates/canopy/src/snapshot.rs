//! Read-only view of the scene for render collaborators.
//!
//! Positions change in place after every layout pass; renderers should take a fresh snapshot
//! (or re-read the tree) after any operation that lays out.

use crate::camera::OrbitCamera;
use canopy_tree::{NodeId, Tree};
use nalgebra::{Point3, Vector3};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    pub name: Option<String>,
    pub root: String,
    /// Largest children count in the whole tree, for colour scaling.
    pub max_fan_out: usize,
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    pub camera: CameraPose,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub id: String,
    pub position: [f64; 3],
    pub children: usize,
    pub subtree_size: usize,
}

/// One renderable edge, keyed by its child.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeView {
    pub parent: String,
    pub child: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraPose {
    pub position: [f64; 3],
    pub look_direction: [f64; 3],
    pub up_direction: [f64; 3],
}

impl From<&OrbitCamera> for CameraPose {
    fn from(camera: &OrbitCamera) -> Self {
        Self {
            position: point(camera.position()),
            look_direction: vector(camera.look_direction()),
            up_direction: vector(camera.up_direction()),
        }
    }
}

impl SceneSnapshot {
    pub(crate) fn capture(tree: &Tree, root: NodeId, camera: &OrbitCamera) -> Self {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();

        // Visibility is granted top-down, so walking visible children from the root reaches
        // every visible node.
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let children = tree.children(id);
            nodes.push(NodeView {
                id: tree.id(id).to_string(),
                position: point(tree.position(id)),
                children: children.len(),
                subtree_size: tree.subtree_size(id),
            });
            for &child in children.iter().rev() {
                if !tree.is_visible(child) {
                    continue;
                }
                stack.push(child);
            }
            for &child in children {
                if tree.is_visible(child) {
                    edges.push(EdgeView {
                        parent: tree.id(id).to_string(),
                        child: tree.id(child).to_string(),
                    });
                }
            }
        }

        Self {
            name: tree.name().map(str::to_string),
            root: tree.id(root).to_string(),
            max_fan_out: tree.max_fan_out(),
            nodes,
            edges,
            camera: CameraPose::from(camera),
        }
    }
}

fn point(p: Point3<f64>) -> [f64; 3] {
    [p.x, p.y, p.z]
}

fn vector(v: Vector3<f64>) -> [f64; 3] {
    [v.x, v.y, v.z]
}
