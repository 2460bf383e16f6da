//! Visibility state machine: re-rooting, expand and collapse, and the re-layout each one
//! triggers.
//!
//! Visibility is only ever granted top-down from a visible node, which keeps
//! `visible(child) => visible(parent)` for the whole tree.

use crate::camera::OrbitCamera;
use crate::config::CanopyConfig;
use crate::error::{Error, Result};
use crate::snapshot::SceneSnapshot;
use canopy_layout::{LayoutOptions, LayoutStats};
use canopy_tree::{NodeId, Tree};
use nalgebra::Point3;

/// Camera distance as a multiple of the laid-out extent when framing.
const FRAMING_MARGIN: f64 = 2.5;

#[derive(Debug, Clone)]
pub struct Viewer {
    tree: Tree,
    root: NodeId,
    default_root: NodeId,
    // Options from config; re-rooting returns to these.
    base_layout: LayoutOptions,
    layout: LayoutOptions,
    camera: OrbitCamera,
    pending_factors: Option<(f64, f64)>,
    last_stats: LayoutStats,
}

impl Viewer {
    /// Shows the whole tree from its load-time root, lays it out and frames the camera.
    pub fn new(tree: Tree, config: &CanopyConfig) -> Result<Self> {
        let root = tree.root();
        let mut viewer = Self {
            tree,
            root,
            default_root: root,
            base_layout: config.layout.clone(),
            layout: config.layout.clone(),
            camera: OrbitCamera::new(config.camera.clone()),
            pending_factors: None,
            last_stats: LayoutStats::default(),
        };
        viewer.set_root(root)?;
        viewer.frame_camera();
        Ok(viewer)
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// Current view root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn default_root(&self) -> NodeId {
        self.default_root
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn layout_options(&self) -> &LayoutOptions {
        &self.layout
    }

    pub fn last_layout(&self) -> &LayoutStats {
        &self.last_stats
    }

    pub fn resolve(&self, id: &str) -> Result<NodeId> {
        self.tree.node_id(id).ok_or_else(|| Error::UnknownNode { id: id.to_string() })
    }

    /// Parent of `id` as seen from the current view root: `None` for the root itself and for
    /// nodes outside the view.
    pub fn view_parent(&self, id: NodeId) -> Option<NodeId> {
        if id == self.root || !self.tree.is_ancestor(self.root, id) {
            return None;
        }
        self.tree.parent(id)
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.tree
            .nodes()
            .filter(|(_, _, n)| n.is_visible())
            .map(|(id, _, _)| id)
    }

    fn check(&self, id: NodeId) -> Result<()> {
        if self.tree.contains(id) {
            Ok(())
        } else {
            Err(Error::UnknownNode {
                id: format!("#{}", id.index()),
            })
        }
    }

    fn check_visible(&self, id: NodeId) -> Result<()> {
        self.check(id)?;
        if self.tree.is_visible(id) {
            Ok(())
        } else {
            Err(Error::HiddenNode {
                id: self.tree.id(id).to_string(),
            })
        }
    }

    /// Hides everything, then shows `node` and all of its descendants and lays them out with
    /// `node` at the origin, using the configured layout options (factor adjustments are
    /// dropped).
    pub fn set_root(&mut self, node: NodeId) -> Result<LayoutStats> {
        self.check(node)?;
        self.tree.hide_all();
        self.root = node;
        self.layout = self.base_layout.clone();
        self.pending_factors = None;
        self.tree.set_visible(node, true);
        self.show_descendants(node);
        tracing::debug!(root = self.tree.id(node), "set view root");
        self.relayout_all()
    }

    pub fn set_root_by_id(&mut self, id: &str) -> Result<LayoutStats> {
        let node = self.resolve(id)?;
        self.set_root(node)
    }

    pub fn reset_root(&mut self) -> Result<LayoutStats> {
        self.set_root(self.default_root)
    }

    /// Hides every descendant of `node`; `node` itself keeps its state.
    pub fn collapse_descendants(&mut self, node: NodeId) -> Result<()> {
        self.check(node)?;
        let hidden: Vec<NodeId> = self.tree.descendants(node).collect();
        for &id in &hidden {
            self.tree.set_visible(id, false);
        }
        tracing::debug!(node = self.tree.id(node), hidden = hidden.len(), "collapsed");
        Ok(())
    }

    /// Collapses `node`, shows its whole subtree again and re-lays that subtree out.
    pub fn expand_descendants(&mut self, node: NodeId) -> Result<LayoutStats> {
        self.check_visible(node)?;
        self.collapse_descendants(node)?;
        self.show_descendants(node);
        self.relayout_subtree(node)
    }

    /// Shows the direct children of `node` only and re-lays out `node`'s subtree.
    pub fn expand_children(&mut self, node: NodeId) -> Result<LayoutStats> {
        self.check_visible(node)?;
        let children = self.tree.children(node).to_vec();
        for child in children {
            self.tree.set_visible(child, true);
        }
        self.relayout_subtree(node)
    }

    fn show_descendants(&mut self, node: NodeId) {
        let shown: Vec<NodeId> = self.tree.descendants(node).collect();
        for id in shown {
            self.tree.set_visible(id, true);
        }
    }

    /// Re-lays out the current view with new factors.
    pub fn adjust(&mut self, radius_factor: f64, angle_factor: f64) -> Result<LayoutStats> {
        self.pending_factors = None;
        self.layout = self.layout.clone().with_factors(radius_factor, angle_factor);
        self.relayout_all()
    }

    /// Replaces the layout options, including the ones re-rooting returns to.
    pub fn set_layout_options(&mut self, options: LayoutOptions) -> Result<LayoutStats> {
        self.pending_factors = None;
        self.base_layout = options.clone();
        self.layout = options;
        self.relayout_all()
    }

    /// Records new factors without laying out. Repeated requests overwrite each other; the
    /// latest one is applied by [`Viewer::flush_layout`].
    pub fn request_adjust(&mut self, radius_factor: f64, angle_factor: f64) {
        self.pending_factors = Some((radius_factor, angle_factor));
    }

    pub fn has_pending_layout(&self) -> bool {
        self.pending_factors.is_some()
    }

    /// Applies the latest requested factors, if any.
    pub fn flush_layout(&mut self) -> Result<Option<LayoutStats>> {
        match self.pending_factors.take() {
            Some((radius_factor, angle_factor)) => {
                self.adjust(radius_factor, angle_factor).map(Some)
            }
            None => Ok(None),
        }
    }

    fn relayout_all(&mut self) -> Result<LayoutStats> {
        let stats = canopy_layout::layout(&mut self.tree, self.root, &self.layout)?;
        self.last_stats = stats;
        Ok(stats)
    }

    fn relayout_subtree(&mut self, node: NodeId) -> Result<LayoutStats> {
        let stats = canopy_layout::layout_subtree(&mut self.tree, self.root, node, &self.layout)?;
        if node == self.root {
            self.last_stats = stats;
        } else {
            self.last_stats.max_radius = self.last_stats.max_radius.max(stats.max_radius);
        }
        Ok(stats)
    }

    /// Aims the camera at the view root and backs it off far enough to see the last layout.
    pub fn frame_camera(&mut self) {
        let options = self.camera.options();
        let distance = if self.last_stats.max_radius > 0.0 {
            (self.last_stats.max_radius * FRAMING_MARGIN).max(options.min_distance)
        } else {
            options.initial_distance
        };
        self.camera.look_at(Point3::origin());
        self.camera.place_on_diagonal(distance);
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot::capture(&self.tree, self.root, &self.camera)
    }
}
