//! Generic tree traversal
//!
//! Both analysis passes are expressed as a [`Visitor`] driven by the same
//! engine: `pre` runs before a node's children (preorder), `post` after
//! them (postorder), and sibling chains are walked left to right after
//! the node itself is complete.

use crate::Node;

/// Visitor callbacks for [`traverse`].
///
/// Both hooks default to no-ops, so a pass that only needs one of the two
/// orders implements just that one.
pub trait Visitor {
    /// Called before the node's children are visited
    fn pre(&mut self, _node: &mut Node) {}

    /// Called after all of the node's children have been visited
    fn post(&mut self, _node: &mut Node) {}
}

/// Apply `visitor` over the tree rooted at `node`.
///
/// Visits the node in preorder, recurses into every child slot in fixed
/// left-to-right order, visits the node in postorder, then continues down
/// the sibling chain.
pub fn traverse<V: Visitor>(node: &mut Node, visitor: &mut V) {
    visitor.pre(node);
    for child in node.children_mut() {
        if let Some(child) = child {
            traverse(child, visitor);
        }
    }
    visitor.post(node);
    if let Some(sibling) = node.sibling.as_deref_mut() {
        traverse(sibling, visitor);
    }
}
