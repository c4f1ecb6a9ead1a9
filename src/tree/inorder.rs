use std::iter::FusedIterator;

use crate::slab::{Ptr, Slab};

use super::InnerNode;

pub struct IterInorder<'a, T> {
    nodes: &'a Slab<InnerNode<T>>,
    stack: Vec<Ptr>,
}

// See: https://www.geeksforgeeks.org/inorder-tree-traversal-without-recursion/
impl<'a, T> IterInorder<'a, T> {
    pub(super) fn new(nodes: &'a Slab<InnerNode<T>>, root: Option<Ptr>) -> Self {
        let mut iter = Self {nodes, stack: Vec::new()};
        iter.push_left_path(root);
        iter
    }

    /// Pushes `current` and every node along its chain of left children
    fn push_left_path(&mut self, mut current: Option<Ptr>) {
        while let Some(ptr) = current {
            self.stack.push(ptr);
            current = self.nodes[ptr].left;
        }
    }
}

impl<'a, T> Iterator for IterInorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let top_ptr = self.stack.pop()?;
        let node = &nodes[top_ptr];
        self.push_left_path(node.right);

        Some(&node.key)
    }
}

impl<'a, T> FusedIterator for IterInorder<'a, T> {}
