#![forbid(unsafe_code)]

//! Rooted tree model used by `canopy`.
//!
//! Nodes live in an arena keyed by their textual id, in order of first mention. Topology is
//! fixed once parsing finishes; only positions and visibility flags change afterwards.

mod error;
mod parse;

pub use error::{Error, Result};

use indexmap::IndexMap;
use nalgebra::Point3;
use rustc_hash::{FxBuildHasher, FxHashMap};
use std::cell::RefCell;
use std::str::FromStr;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Depth used for subtree weights when callers have no better idea.
pub const DEFAULT_WEIGHT_DEPTH: u32 = 5;

/// Stable handle to a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    position: Point3<f64>,
    visible: bool,
    subtree_size: usize,
}

impl Node {
    fn new() -> Self {
        Self {
            children: Vec::new(),
            parent: None,
            position: Point3::origin(),
            visible: false,
            subtree_size: 1,
        }
    }

    /// Children in order of first appearance in the source text.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent recorded at load time. Re-rooting does not rewrite this link.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Exact count of this node plus all of its descendants.
    pub fn subtree_size(&self) -> usize {
        self.subtree_size
    }
}

#[derive(Debug, Clone)]
pub struct Tree {
    name: Option<String>,
    nodes: IndexMap<String, Node, FxBuildHasher>,
    root: NodeId,
    max_fan_out: usize,

    // Depth-bounded weights are requested repeatedly by layout passes. Keyed by the depth
    // actually used so a shallow query never answers a deeper one.
    weight_cache: RefCell<FxHashMap<(NodeId, u32), usize>>,
}

impl Tree {
    /// Parses adjacency-list text. See the crate docs of `canopy` for the format.
    pub fn parse(text: &str) -> Result<Self> {
        parse::parse_adjacency(text)
    }

    pub(crate) fn from_parts(nodes: IndexMap<String, Node, FxBuildHasher>, root: NodeId) -> Self {
        let mut tree = Self {
            name: None,
            nodes,
            root,
            max_fan_out: 0,
            weight_cache: RefCell::new(FxHashMap::default()),
        };
        tree.link_parents();
        tree.compute_subtree_sizes();
        tree.nodes[root.0].visible = true;
        tree
    }

    fn link_parents(&mut self) {
        let links: Vec<(NodeId, NodeId)> = self
            .nodes
            .values()
            .enumerate()
            .flat_map(|(idx, n)| n.children.iter().map(move |&c| (NodeId(idx), c)))
            .collect();
        for (parent, child) in links {
            self.nodes[child.0].parent = Some(parent);
        }
    }

    // Children are always interned after their parent, so a reverse index sweep is a
    // post-order traversal.
    fn compute_subtree_sizes(&mut self) {
        let mut max_fan_out = 0;
        for idx in (0..self.nodes.len()).rev() {
            let size = 1 + self.nodes[idx]
                .children
                .iter()
                .map(|c| {
                    debug_assert!(c.0 > idx, "child interned before its parent");
                    self.nodes[c.0].subtree_size
                })
                .sum::<usize>();
            let node = &mut self.nodes[idx];
            node.subtree_size = size;
            max_fan_out = max_fan_out.max(node.children.len());
        }
        self.max_fan_out = max_fan_out;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node named by the first token of the first line.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.nodes.get_index_of(id).map(NodeId)
    }

    pub fn id(&self, id: NodeId) -> &str {
        self.nodes
            .get_index(id.0)
            .map(|(k, _)| k.as_str())
            .unwrap_or_default()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get_index(id.0).map(|(_, n)| n)
    }

    /// Iterates `(handle, id, node)` in first-mention order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &str, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, (k, n))| (NodeId(idx), k.as_str(), n))
    }

    // The accessors below index the arena directly: handles from another tree panic, like
    // slice indexing would.

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn position(&self, id: NodeId) -> Point3<f64> {
        self.nodes[id.0].position
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.nodes[id.0].visible
    }

    pub fn subtree_size(&self, id: NodeId) -> usize {
        self.nodes[id.0].subtree_size
    }

    /// Largest number of children any node has.
    pub fn max_fan_out(&self) -> usize {
        self.max_fan_out
    }

    /// Written by layout passes; last write wins.
    pub fn set_position(&mut self, id: NodeId, position: Point3<f64>) {
        self.nodes[id.0].position = position;
    }

    /// Written by visibility control. Callers keep `visible(child) => visible(parent)`.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.nodes[id.0].visible = visible;
    }

    pub fn hide_all(&mut self) {
        for node in self.nodes.values_mut() {
            node.visible = false;
        }
    }

    /// Depth-bounded leaf weight of `id`.
    ///
    /// Returns 1 for a leaf or when `max_depth` is 0, otherwise the sum of the children's weights
    /// at `max_depth - 1`. This equals the number of leaves only when the subtree is no deeper than
    /// `max_depth`; layout uses it as a bounded-cost weight, not as an exact count.
    pub fn total_children(&self, id: NodeId, max_depth: u32) -> usize {
        if let Some(&w) = self.weight_cache.borrow().get(&(id, max_depth)) {
            return w;
        }

        let mut cache = self.weight_cache.borrow_mut();
        let mut stack: Vec<(NodeId, u32, bool)> = vec![(id, max_depth, false)];
        while let Some((n, depth, expanded)) = stack.pop() {
            if cache.contains_key(&(n, depth)) {
                continue;
            }
            let children = &self.nodes[n.0].children;
            if children.is_empty() || depth == 0 {
                cache.insert((n, depth), 1);
                continue;
            }
            if expanded {
                let sum = children.iter().map(|c| cache[&(*c, depth - 1)]).sum();
                cache.insert((n, depth), sum);
            } else {
                stack.push((n, depth, true));
                for &c in children {
                    if !cache.contains_key(&(c, depth - 1)) {
                        stack.push((c, depth - 1, false));
                    }
                }
            }
        }
        cache[&(id, max_depth)]
    }

    /// Pre-order walk over every descendant of `id` (excluding `id`).
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// Whether `ancestor` lies on the parent chain of `id` (a node is not its own ancestor).
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.parent(p);
        }
        false
    }

    /// Number of edges between `id` and the load-time root (`None` for unreachable nodes).
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        let mut depth = 0;
        let mut cur = id;
        while cur != self.root {
            cur = self.parent(cur)?;
            depth += 1;
        }
        Some(depth)
    }
}

impl FromStr for Tree {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[derive(Debug)]
pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let next = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(next).iter().rev().copied());
        Some(next)
    }
}
