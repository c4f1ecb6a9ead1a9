use std::iter::FusedIterator;

use crate::slab::{Ptr, Slab};

use super::InnerNode;

pub struct IterPostorder<'a, T> {
    nodes: &'a Slab<InnerNode<T>>,
    stack: Vec<Ptr>,
}

// See: https://www.geeksforgeeks.org/iterative-postorder-traversal-using-stack/
impl<'a, T> IterPostorder<'a, T> {
    pub(super) fn new(nodes: &'a Slab<InnerNode<T>>, root: Option<Ptr>) -> Self {
        let mut iter = Self {nodes, stack: Vec::new()};
        if let Some(root) = root {
            iter.descend(root);
        }
        iter
    }

    /// Walks down the left spine from `ptr`, pushing each node's right child below the node
    /// itself so the right subtree is visited before its parent is yielded
    fn descend(&mut self, mut ptr: Ptr) {
        let nodes = self.nodes;
        loop {
            let node = &nodes[ptr];
            self.stack.extend(node.right);
            self.stack.push(ptr);

            match node.left {
                Some(left) => ptr = left,
                None => break,
            }
        }
    }
}

impl<'a, T> Iterator for IterPostorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        while let Some(ptr) = self.stack.pop() {
            let node = &nodes[ptr];

            // If the top of the stack is the current node's right child, that subtree has not
            // been visited yet
            match node.right {
                Some(right) if self.stack.last().copied() == Some(right) => {
                    // Swap the right child with the current node on the stack
                    self.stack.pop();
                    self.stack.push(ptr);

                    self.descend(right);
                },

                _ => return Some(&node.key),
            }
        }

        None
    }
}

impl<'a, T> FusedIterator for IterPostorder<'a, T> {}
