use canopy_layout::geometry::distance;
use canopy_layout::{Error, LayoutOptions, layout, layout_subtree};
use canopy_tree::{NodeId, Tree};
use nalgebra::Point3;

const EPS: f64 = 1e-9;

fn show_all(tree: &mut Tree, root: NodeId) {
    let ids: Vec<NodeId> = tree.descendants(root).collect();
    tree.set_visible(root, true);
    for id in ids {
        tree.set_visible(id, true);
    }
}

fn positions(tree: &Tree) -> Vec<Point3<f64>> {
    tree.nodes().map(|(_, _, n)| n.position()).collect()
}

/// Root with `fan` children, each with `fan` children, two levels deep.
fn bushy(fan: usize) -> Tree {
    let mut text = String::from("root");
    for i in 0..fan {
        text.push_str(&format!("\tc{i}"));
    }
    text.push('\n');
    for i in 0..fan {
        text.push_str(&format!("c{i}"));
        for j in 0..fan {
            text.push_str(&format!("\tc{i}_{j}"));
        }
        text.push('\n');
        for j in 0..fan {
            text.push_str(&format!("c{i}_{j}"));
            for k in 0..3 {
                text.push_str(&format!("\tc{i}_{j}_{k}"));
            }
            text.push('\n');
        }
    }
    Tree::parse(&text).unwrap()
}

fn id(tree: &Tree, name: &str) -> NodeId {
    tree.node_id(name).unwrap()
}

#[test]
fn layout_puts_root_at_origin() {
    let mut tree = bushy(3);
    let root = tree.root();
    show_all(&mut tree, root);
    tree.set_position(root, Point3::new(5.0, 5.0, 5.0));
    layout(&mut tree, root, &LayoutOptions::default()).unwrap();
    assert_eq!(tree.position(root), Point3::origin());
}

#[test]
fn layout_is_deterministic_and_idempotent() {
    let mut tree = bushy(6);
    let root = tree.root();
    show_all(&mut tree, root);
    let opts = LayoutOptions::default().with_factors(1.3, 0.7);

    layout(&mut tree, root, &opts).unwrap();
    let first = positions(&tree);
    layout(&mut tree, root, &opts).unwrap();
    assert_eq!(positions(&tree), first);

    let mut fresh = bushy(6);
    show_all(&mut fresh, root);
    layout(&mut fresh, root, &opts).unwrap();
    assert_eq!(positions(&fresh), first);
}

#[test]
fn layout_root_children_sit_at_their_radius() {
    // c0 carries four leaves, c1 is a leaf.
    let mut tree = Tree::parse("r c0 c1\nc0 a b c d\n").unwrap();
    let root = tree.root();
    show_all(&mut tree, root);
    let opts = LayoutOptions::default();
    layout(&mut tree, root, &opts).unwrap();

    let r0 = distance(&Point3::origin(), &tree.position(id(&tree, "c0")));
    let r1 = distance(&Point3::origin(), &tree.position(id(&tree, "c1")));
    assert!((r0 - (4f64.sqrt() * 7.0 + 2.0 * 7.0)).abs() < EPS);
    assert!((r1 - (1.0 * 7.0 + 2.0 * 7.0)).abs() < EPS);
    assert!(r0 > r1, "larger subtrees are placed farther out");
}

#[test]
fn layout_first_root_child_lies_on_x_axis() {
    let mut tree = Tree::parse("r a b c\n").unwrap();
    let root = tree.root();
    show_all(&mut tree, root);
    layout(&mut tree, root, &LayoutOptions::default()).unwrap();
    let a = tree.position(id(&tree, "a"));
    assert!((a.x - 28.0).abs() < EPS);
    assert!(a.y.abs() < EPS && a.z.abs() < EPS);
}

#[test]
fn layout_places_first_shell_on_the_central_axis() {
    let mut tree = Tree::parse("r a\na b c d\n").unwrap();
    let root = tree.root();
    show_all(&mut tree, root);
    layout(&mut tree, root, &LayoutOptions::default()).unwrap();

    let a = tree.position(id(&tree, "a"));
    let b = tree.position(id(&tree, "b"));
    let central = (a - tree.position(root)).normalize();
    let radius = 7.0 + 3.0 * 7.0;
    assert!(distance(&b, &(a + central * radius)) < EPS);

    // Outer shell members keep their radius from the parent and leave the axis.
    for name in ["c", "d"] {
        let p = tree.position(id(&tree, name));
        assert!((distance(&p, &a) - radius).abs() < EPS);
        assert!(distance(&p, &b) > 1.0);
    }
}

#[test]
fn layout_keeps_visible_nodes_apart() {
    let mut tree = bushy(7);
    let root = tree.root();
    show_all(&mut tree, root);
    layout(&mut tree, root, &LayoutOptions::default()).unwrap();

    let pts = positions(&tree);
    for i in 0..pts.len() {
        assert!(pts[i].iter().all(|v| v.is_finite()));
        for j in (i + 1)..pts.len() {
            assert!(distance(&pts[i], &pts[j]) > 1e-3, "nodes {i} and {j} overlap");
        }
    }
}

#[test]
fn layout_skips_hidden_children() {
    let mut tree = Tree::parse("r a b\na x\n").unwrap();
    let root = tree.root();
    let a = id(&tree, "a");
    tree.set_visible(a, true);
    let stats = layout(&mut tree, root, &LayoutOptions::default()).unwrap();
    assert_eq!(stats.placed, 1);
    assert_eq!(tree.position(id(&tree, "b")), Point3::origin());
    assert_eq!(tree.position(id(&tree, "x")), Point3::origin());
    // With one visible sibling, the radius only counts that sibling.
    assert!((distance(&Point3::origin(), &tree.position(a)) - 14.0).abs() < EPS);
}

#[test]
fn layout_subtree_matches_full_layout() {
    let mut tree = bushy(4);
    let root = tree.root();
    show_all(&mut tree, root);
    let opts = LayoutOptions::default();
    layout(&mut tree, root, &opts).unwrap();
    let expected = positions(&tree);

    let c1 = id(&tree, "c1");
    let scrambled: Vec<NodeId> = tree.descendants(c1).collect();
    for n in &scrambled {
        tree.set_position(*n, Point3::new(-1.0, -1.0, -1.0));
    }
    let stats = layout_subtree(&mut tree, root, c1, &opts).unwrap();
    assert_eq!(stats.placed, scrambled.len());
    assert_eq!(positions(&tree), expected);
}

#[test]
fn layout_subtree_rejects_nodes_outside_the_view() {
    let mut tree = Tree::parse("r a b\na x\nb y\n").unwrap();
    let a = id(&tree, "a");
    let y = id(&tree, "y");
    let err = layout_subtree(&mut tree, a, y, &LayoutOptions::default()).unwrap_err();
    assert!(matches!(err, Error::OutsideView { .. }));

    let err = layout(&mut tree, NodeId::from_index(99), &LayoutOptions::default()).unwrap_err();
    assert!(matches!(err, Error::UnknownNode { index: 99 }));
}

#[test]
fn layout_from_a_non_default_root_uses_the_full_circle() {
    let mut tree = Tree::parse("r a\na b c\n").unwrap();
    let a = id(&tree, "a");
    show_all(&mut tree, a);
    layout(&mut tree, a, &LayoutOptions::default()).unwrap();
    assert_eq!(tree.position(a), Point3::origin());
    let b = tree.position(id(&tree, "b"));
    assert!((b.x - 21.0).abs() < EPS, "{b:?}");
}

#[test]
fn layout_radius_factor_scales_radius() {
    let mut tree = Tree::parse("r a\n").unwrap();
    let root = tree.root();
    show_all(&mut tree, root);
    let a = id(&tree, "a");

    layout(&mut tree, root, &LayoutOptions::default().with_factors(4.0, 1.0)).unwrap();
    let r = distance(&Point3::origin(), &tree.position(a));
    assert!((r - (8.0 * 7.0 + 7.0)).abs() < EPS);

    // Non-finite factors fall back to 1.
    layout(&mut tree, root, &LayoutOptions::default().with_factors(f64::NAN, 1.0)).unwrap();
    let r = distance(&Point3::origin(), &tree.position(a));
    assert!((r - 14.0).abs() < EPS);
}

#[test]
fn layout_can_order_siblings_by_weight() {
    let mut tree = Tree::parse("r light heavy\nheavy a b c\n").unwrap();
    let root = tree.root();
    show_all(&mut tree, root);
    let opts = LayoutOptions {
        sort_children_by_weight: true,
        ..Default::default()
    };
    layout(&mut tree, root, &opts).unwrap();
    let heavy = tree.position(id(&tree, "heavy"));
    assert!(heavy.y.abs() < EPS && heavy.z.abs() < EPS && heavy.x > 0.0);
}

#[test]
fn layout_options_deserialize_with_defaults() {
    let opts: LayoutOptions = serde_json::from_str(r#"{ "radiusFactor": 2.0 }"#).unwrap();
    assert_eq!(opts.radius_factor, 2.0);
    assert_eq!(opts.angle_factor, 1.0);
    assert_eq!(opts.weight_depth, canopy_tree::DEFAULT_WEIGHT_DEPTH);
    assert!(serde_json::from_str::<LayoutOptions>(r#"{ "bogus": 1 }"#).is_err());
}
