use std::ptr;
use std::fmt;

use crate::slab::{Ptr, Slab};

use super::InnerNode;

/// A single node of the binary search tree
pub struct Node<'a, T> {
    nodes: &'a Slab<InnerNode<T>>,
    node: &'a InnerNode<T>,
}

impl<'a, T> fmt::Debug for Node<'a, T>
    where T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only one level deep, a full subtree could be arbitrarily deep
        f.debug_struct("Node")
            .field("key", self.key())
            .field("left", &self.left().map(|node| node.key()))
            .field("right", &self.right().map(|node| node.key()))
            .finish()
    }
}

impl<'a, T> Clone for Node<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Node<'a, T> {}

impl<'a, T: PartialEq> PartialEq for Node<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        // Keys are unique within a tree, so comparing keys is enough. If the pointers are the
        // same, the keys are guaranteed to be equal.
        let ptr_eq = ptr::eq(self.nodes, other.nodes) && ptr::eq(self.node, other.node);
        ptr_eq || self.key().eq(other.key())
    }
}

impl<'a, T: Eq> Eq for Node<'a, T> {}

impl<'a, T> Node<'a, T> {
    pub(super) fn new(nodes: &'a Slab<InnerNode<T>>, ptr: Ptr) -> Self {
        let node = &nodes[ptr];
        Self {nodes, node}
    }

    /// Returns the key of this node
    pub fn key(&self) -> &'a T {
        &self.node.key
    }

    /// Returns true if this node has a left subtree
    pub fn has_left(&self) -> bool {
        self.node.left.is_some()
    }

    /// Returns true if this node has a right subtree
    pub fn has_right(&self) -> bool {
        self.node.right.is_some()
    }

    /// Returns the left child node (subtree) of this node, if any
    pub fn left(&self) -> Option<Self> {
        self.node.left.map(|ptr| Self::new(self.nodes, ptr))
    }

    /// Returns the right child node (subtree) of this node, if any
    pub fn right(&self) -> Option<Self> {
        self.node.right.map(|ptr| Self::new(self.nodes, ptr))
    }
}
