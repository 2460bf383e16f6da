//! Recursive spherical layout, run as an explicit worklist.
//!
//! The view root sits at the origin and its children are spread around the XY great circle,
//! each tilted by a growing polar offset. Every other parent fans its children out in shells
//! around its central axis (the direction from its own parent to itself). Placement radius grows
//! with `sqrt(subtree weight)` and with the number of visible siblings.

use crate::error::{Error, Result};
use crate::geometry;
use crate::options::LayoutOptions;
use crate::shells::plan_shells;
use canopy_tree::{NodeId, Tree};
use nalgebra::{Point3, Vector3};
use std::cmp::Reverse;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutStats {
    /// Nodes whose position was written (the start node excluded).
    pub placed: usize,
    /// Largest distance from the view root to any placed node.
    pub max_radius: f64,
    pub elapsed: Duration,
}

/// Lays out every visible node below `root`, with `root` at the origin.
pub fn layout(tree: &mut Tree, root: NodeId, options: &LayoutOptions) -> Result<LayoutStats> {
    ensure_node(tree, root)?;
    tree.set_position(root, Point3::origin());
    run(tree, root, root, options)
}

/// Re-places the visible descendants of `node`, leaving `node` and everything outside its
/// subtree where they are. `node` must be `root` or one of its descendants.
pub fn layout_subtree(
    tree: &mut Tree,
    root: NodeId,
    node: NodeId,
    options: &LayoutOptions,
) -> Result<LayoutStats> {
    ensure_node(tree, root)?;
    ensure_node(tree, node)?;
    if node == root {
        return layout(tree, root, options);
    }
    if !tree.is_ancestor(root, node) {
        return Err(Error::OutsideView {
            id: tree.id(node).to_string(),
            root: tree.id(root).to_string(),
        });
    }
    run(tree, root, node, options)
}

fn ensure_node(tree: &Tree, id: NodeId) -> Result<()> {
    if tree.contains(id) {
        Ok(())
    } else {
        Err(Error::UnknownNode { index: id.index() })
    }
}

fn run(tree: &mut Tree, root: NodeId, start: NodeId, options: &LayoutOptions) -> Result<LayoutStats> {
    let timing_enabled = std::env::var("CANOPY_LAYOUT_TIMING").ok().as_deref() == Some("1");
    let started = Instant::now();

    let opts = options.sanitized();
    if opts.radius_factor != options.radius_factor || opts.angle_factor != options.angle_factor {
        tracing::warn!(
            radius_factor = options.radius_factor,
            angle_factor = options.angle_factor,
            "layout factors out of range; using {} and {}",
            opts.radius_factor,
            opts.angle_factor
        );
    }
    let origin = tree.position(root);
    let mut stats = LayoutStats::default();
    let mut stack = vec![start];
    let mut siblings: Vec<NodeId> = Vec::new();

    while let Some(parent) = stack.pop() {
        siblings.clear();
        siblings.extend(
            tree.children(parent)
                .iter()
                .copied()
                .filter(|&c| tree.is_visible(c)),
        );
        if siblings.is_empty() {
            continue;
        }
        if opts.sort_children_by_weight {
            siblings.sort_by_key(|&c| Reverse(tree.total_children(c, opts.weight_depth)));
        }

        match tree.parent(parent) {
            Some(grandparent) if parent != root => {
                place_in_shells(tree, grandparent, parent, &siblings, &opts)
            }
            _ => place_around_root(tree, parent, &siblings, &opts),
        }

        for &child in &siblings {
            let r = geometry::distance(&origin, &tree.position(child));
            stats.max_radius = stats.max_radius.max(r);
        }
        stats.placed += siblings.len();
        stack.extend(siblings.iter().rev());
    }

    stats.elapsed = started.elapsed();
    if timing_enabled {
        tracing::info!(
            target: "canopy_layout::timing",
            root = tree.id(root),
            start = tree.id(start),
            placed = stats.placed,
            elapsed = ?stats.elapsed,
            "layout pass finished"
        );
    }
    tracing::debug!(
        placed = stats.placed,
        max_radius = stats.max_radius,
        "spherical layout"
    );
    Ok(stats)
}

fn child_radius(tree: &Tree, child: NodeId, siblings: usize, opts: &LayoutOptions) -> f64 {
    let weight = tree.total_children(child, opts.weight_depth) as f64;
    opts.radius_factor.powf(1.5) * weight.sqrt() * opts.radius_scale
        + siblings as f64 * opts.sibling_spacing
}

fn place_around_root(tree: &mut Tree, parent: NodeId, children: &[NodeId], opts: &LayoutOptions) {
    let center = tree.position(parent);
    let reference = Vector3::z();
    let count = children.len() as f64;

    let mut theta = 0.0;
    let mut phi = 0.0;
    for &child in children {
        let radius = child_radius(tree, child, children.len(), opts);
        let p = geometry::rotate(Point3::new(radius, 0.0, 0.0), &reference, theta);
        let tilt_axis = reference.cross(&Vector3::new(p.x, p.y, 0.0));
        let p = geometry::rotate(p, &tilt_axis, phi);
        tree.set_position(child, center + p.coords);

        theta += 360.0 / count;
        phi += 90.0 / count + 270.0;
    }
}

fn place_in_shells(
    tree: &mut Tree,
    grandparent: NodeId,
    parent: NodeId,
    children: &[NodeId],
    opts: &LayoutOptions,
) {
    let center = tree.position(parent);
    let central = (center - tree.position(grandparent))
        .try_normalize(1e-12)
        .unwrap_or_else(Vector3::z);
    let perpendicular = geometry::perpendicular(&central);

    let mut pending = children.iter().copied();
    for (layer, capacity) in plan_shells(children.len()).into_iter().enumerate() {
        for done in 0..capacity {
            let Some(child) = pending.next() else {
                return;
            };
            let radius = child_radius(tree, child, children.len(), opts);
            let mut p = center + central * radius;
            if layer != 0 && radius > 0.0 {
                let phi = layer as f64 * opts.shell_spread / radius * opts.angle_factor;
                let theta = done as f64 / capacity as f64 * 360.0;
                p = geometry::rotate_about_center(p, center, &perpendicular, phi);
                p = geometry::rotate_about_center(p, center, &central, theta);
            }
            tree.set_position(child, p);
        }
    }
}
