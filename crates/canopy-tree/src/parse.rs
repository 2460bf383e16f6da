//! Adjacency-list parser.
//!
//! Each line is `parent child child ...`, tab separated (space separated when the line has no
//! tab). A child token `0` ends the line. The first line's first token names the root. A child
//! is attached only on its first mention anywhere in the text, so every node has at most one
//! parent and edges always point at newer nodes.

use crate::error::{Error, Result};
use crate::{Node, NodeId, Tree};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

const END_OF_CHILDREN: &str = "0";

pub(crate) fn parse_adjacency(text: &str) -> Result<Tree> {
    let mut nodes: IndexMap<String, Node, FxBuildHasher> = IndexMap::default();
    let mut root: Option<NodeId> = None;

    for (line_no, line) in text.split('\n').enumerate() {
        let mut tokens = tokenize(line);
        let Some(parent_id) = tokens.next() else {
            if line_no == 0 {
                return Err(Error::InvalidInput {
                    message: "first line does not name a root node".to_string(),
                });
            }
            continue;
        };

        let parent = intern(&mut nodes, parent_id);
        if line_no == 0 {
            root = Some(parent);
        }

        for child_id in tokens {
            if child_id == END_OF_CHILDREN {
                break;
            }
            if child_id == parent_id {
                tracing::trace!(line = line_no + 1, id = child_id, "skipping self-referencing child");
                continue;
            }
            if nodes.contains_key(child_id) {
                continue;
            }
            let child = intern(&mut nodes, child_id);
            nodes[parent.index()].children.push(child);
        }
    }

    let Some(root) = root else {
        return Err(Error::InvalidInput {
            message: "input is empty".to_string(),
        });
    };

    let tree = Tree::from_parts(nodes, root);
    tracing::debug!(
        nodes = tree.len(),
        root = tree.id(root),
        max_fan_out = tree.max_fan_out(),
        "parsed adjacency list"
    );
    Ok(tree)
}

fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    let sep = if line.contains('\t') { '\t' } else { ' ' };
    line.split(sep).map(str::trim).filter(|t| !t.is_empty())
}

fn intern(nodes: &mut IndexMap<String, Node, FxBuildHasher>, id: &str) -> NodeId {
    if let Some(idx) = nodes.get_index_of(id) {
        return NodeId::from_index(idx);
    }
    let (idx, _) = nodes.insert_full(id.to_string(), Node::new());
    NodeId::from_index(idx)
}
