mod node;
mod preorder;
mod inorder;
mod postorder;

pub use node::*;
pub use preorder::*;
pub use inorder::*;
pub use postorder::*;

use std::fmt;
use std::mem;
use std::cmp::Ordering;
use std::borrow::Borrow;

use tracing::debug;

use crate::slab::{Ptr, Slab};

#[derive(Debug, Clone)]
struct InnerNode<T> {
    key: T,
    left: Option<Ptr>,
    right: Option<Ptr>,
}

impl<T> InnerNode<T> {
    fn new(key: T) -> Self {
        Self {
            key,
            left: None,
            right: None,
        }
    }
}

/// The link that owns a node: either the root of the tree or a child slot of its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Root,
    Left(Ptr),
    Right(Ptr),
}

/// An unbalanced binary search tree (BST)
///
/// BST properties: For each node with key `k`:
/// - The key of each node in the left subtree is less than `k`
/// - The key of each node in the right subtree is greater than `k`
///
/// Duplicate keys are not allowed. Inserting a key that already exists in the tree does not
/// modify the tree.
///
/// The tree is never rebalanced, so its shape depends entirely on insertion order. Inserting keys
/// in sorted order produces a tree that is a single long path. None of the operations recurse, so
/// even such degenerate trees can be searched, cloned and dropped.
///
/// Nodes are stored in an arena and refer to their children by index. Each node is referred to by
/// exactly one link, its parent's or the root.
#[derive(Clone)]
pub struct OrderedTree<T> {
    nodes: Slab<InnerNode<T>>,
    root: Option<Ptr>,
}

impl<T> Default for OrderedTree<T> {
    fn default() -> Self {
        Self {
            nodes: Default::default(),
            root: None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter_inorder()).finish()
    }
}

/// Writes the keys in ascending order, separated by spaces
impl<T: fmt::Display> fmt::Display for OrderedTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.iter_inorder().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", key)?;
        }

        Ok(())
    }
}

impl<T: Ord + PartialEq> PartialEq for OrderedTree<T> {
    fn eq(&self, other: &Self) -> bool {
        // We can't just compare the binary trees structurally, since they may be structured
        // differently while still having all the same keys (e.g. if insertion order is
        // different). In-order traversal is guaranteed to produce the keys in sorted order, so if
        // the sorted orders are equal, the trees are equal.

        if self.len() != other.len() {
            return false;
        }

        self.iter_inorder().zip(other.iter_inorder()).all(|(k1, k2)| k1.eq(k2))
    }
}

impl<T: Ord + Eq> Eq for OrderedTree<T> {}

impl<T> OrderedTree<T> {
    /// Performs a pre-order traversal of the tree
    pub fn iter_preorder(&self) -> IterPreorder<T> {
        IterPreorder::new(&self.nodes, self.root)
    }

    /// Performs an in-order traversal of the tree, yielding keys in ascending order
    pub fn iter_inorder(&self) -> IterInorder<T> {
        IterInorder::new(&self.nodes, self.root)
    }

    /// Performs a post-order traversal of the tree
    pub fn iter_postorder(&self) -> IterPostorder<T> {
        IterPostorder::new(&self.nodes, self.root)
    }
}

impl<T: Ord> OrderedTree<T> {
    /// Creates an empty `OrderedTree`
    ///
    /// The tree is initially created with a capacity of 0, so it will not allocate until it is
    /// first inserted into.
    ///
    /// # Examples
    ///
    /// ```
    /// use lab_collections::OrderedTree;
    /// let mut tree: OrderedTree<i32> = OrderedTree::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty tree with room for at least `capacity` nodes before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            root: None,
        }
    }

    /// Returns the number of keys in the tree (i.e. the number of nodes)
    ///
    /// Time complexity: `O(1)`
    ///
    /// # Examples
    ///
    /// ```
    /// use lab_collections::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// assert_eq!(tree.len(), 0);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree is empty
    ///
    /// Time complexity: `O(1)`
    pub fn is_empty(&self) -> bool {
        debug_assert!(self.nodes.is_empty() == self.root.is_none());
        self.nodes.is_empty()
    }

    /// Returns the number of nodes the tree can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Reserves capacity for at least `additional` more nodes
    ///
    /// # Panics
    ///
    /// Panics if the new allocation size overflows `usize`.
    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional)
    }

    /// Shrinks the capacity of the tree as much as possible
    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit()
    }

    /// Returns the number of nodes on the longest path from the root to a leaf
    ///
    /// An empty tree has height 0. A tree built from sorted keys has height `len()`.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(Ptr, usize)> = self.root.map(|root| (root, 1)).into_iter().collect();
        while let Some((ptr, depth)) = stack.pop() {
            height = height.max(depth);

            let node = &self.nodes[ptr];
            stack.extend(node.left.map(|left| (left, depth + 1)));
            stack.extend(node.right.map(|right| (right, depth + 1)));
        }

        height
    }

    /// Descends from the root towards `key`
    ///
    /// Returns the node holding `key` (if any) along with the link that owns it. If the key is not
    /// present, the link is where a node with that key would be attached.
    fn find<Q>(&self, key: &Q) -> (Link, Option<Ptr>)
        where T: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        let mut link = Link::Root;
        let mut current = self.root;
        while let Some(ptr) = current {
            let node = &self.nodes[ptr];
            match key.cmp(node.key.borrow()) {
                Ordering::Less => {
                    link = Link::Left(ptr);
                    current = node.left;
                },
                Ordering::Greater => {
                    link = Link::Right(ptr);
                    current = node.right;
                },
                Ordering::Equal => break,
            }
        }

        (link, current)
    }

    /// Points `link` at `child`. Whatever the link pointed at before is no longer reachable.
    fn set_link(&mut self, link: Link, child: Option<Ptr>) {
        match link {
            Link::Root => self.root = child,
            Link::Left(parent) => self.nodes[parent].left = child,
            Link::Right(parent) => self.nodes[parent].right = child,
        }
    }

    /// Returns `true` if the tree contains the specified key.
    ///
    /// The key may be any borrowed form of the tree's key type, but the ordering on the borrowed
    /// form must match the ordering on the key type.
    ///
    /// Time complexity: `O(height)`
    ///
    /// # Examples
    ///
    /// ```
    /// use lab_collections::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert(1);
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&2));
    /// ```
    pub fn contains<Q>(&self, key: &Q) -> bool
        where T: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        self.find(key).1.is_some()
    }

    /// Returns a reference to the key stored in the tree that is equal to `key`, or `None`
    ///
    /// Time complexity: `O(height)`
    ///
    /// # Examples
    ///
    /// ```
    /// use lab_collections::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert(String::from("abc"));
    /// assert_eq!(tree.get("abc").map(String::as_str), Some("abc"));
    /// assert_eq!(tree.get("def"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&T>
        where T: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        let (_, ptr) = self.find(key);
        ptr.map(|ptr| &self.nodes[ptr].key)
    }

    /// Inserts a key into the tree
    ///
    /// If the tree did not have this key present, a new leaf is attached at the first empty child
    /// slot on the comparison path and `true` is returned.
    ///
    /// If the tree did have this key present, `false` is returned and the tree is not modified.
    ///
    /// # Examples
    ///
    /// ```
    /// use lab_collections::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// assert!(tree.insert(37));
    /// assert!(!tree.insert(37));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: T) -> bool {
        let (link, found) = self.find(&key);
        if found.is_some() {
            return false;
        }

        let ptr = self.nodes.push(InnerNode::new(key));
        self.set_link(link, Some(ptr));

        true
    }

    /// Removes a key from the tree. Returns whether the key was present in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use lab_collections::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert(String::from("abc"));
    /// assert!(tree.erase("abc"));
    /// assert!(!tree.erase("def"));
    /// ```
    pub fn erase<Q>(&mut self, key: &Q) -> bool
        where T: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        self.take(key).is_some()
    }

    /// Removes and returns the key in the tree, if any, that is equal to the given one.
    ///
    /// A node with at most one child is replaced by that child. A node with two children takes
    /// the key of its in-order successor (the minimum of its right subtree), and the successor's
    /// node, which never has a left child, is replaced by its right child.
    ///
    /// # Examples
    ///
    /// ```
    /// use lab_collections::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert(String::from("abc"));
    /// assert_eq!(tree.take("abc"), Some(String::from("abc")));
    /// assert_eq!(tree.take("def"), None);
    /// ```
    pub fn take<Q>(&mut self, key: &Q) -> Option<T>
        where T: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        let (link, ptr) = self.find(key);
        let ptr = ptr?;

        let node = &self.nodes[ptr];
        let removed = match (node.left, node.right) {
            (None, None) => {
                self.set_link(link, None);
                self.nodes.remove(ptr).key
            },

            (Some(child), None) | (None, Some(child)) => {
                self.set_link(link, Some(child));
                self.nodes.remove(ptr).key
            },

            (Some(_), Some(right)) => {
                let mut successor_link = Link::Right(ptr);
                let mut successor = right;
                while let Some(left) = self.nodes[successor].left {
                    successor_link = Link::Left(successor);
                    successor = left;
                }

                let successor_right = self.nodes[successor].right;
                self.set_link(successor_link, successor_right);
                let successor = self.nodes.remove(successor);

                mem::replace(&mut self.nodes[ptr].key, successor.key)
            },
        };

        Some(removed)
    }

    /// Clears the tree, removing all keys
    ///
    /// Note that this method has no effect on the allocated capacity of the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use lab_collections::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert("abc");
    /// assert!(!tree.is_empty());
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) {
        debug!(nodes = self.len(), "clearing ordered tree");
        self.nodes.clear();
        self.root = None;
    }

    /// Returns the root node of the tree, or `None` if the tree is empty
    ///
    /// This is a low-level API meant to be used for implementing custom traversals. The shape of
    /// the tree is determined entirely by the order of insertions and removals.
    pub fn root(&self) -> Option<Node<T>> {
        self.root.map(|ptr| Node::new(&self.nodes, ptr))
    }
}

impl<T: Ord + Clone> OrderedTree<T> {
    /// Returns every key of the tree in ascending order, without duplicates
    ///
    /// # Examples
    ///
    /// ```
    /// use lab_collections::OrderedTree;
    ///
    /// let tree: OrderedTree<_> = vec![3, 1, 2, 3].into_iter().collect();
    /// assert_eq!(tree.to_ordered_set(), vec![1, 2, 3]);
    /// ```
    pub fn to_ordered_set(&self) -> Vec<T> {
        self.iter_inorder().cloned().collect()
    }
}

impl<T: Ord + fmt::Display> OrderedTree<T> {
    /// Prints the keys to stdout in ascending order, separated by spaces
    pub fn print(&self) {
        println!("{}", self);
    }
}

impl<'a, T> IntoIterator for &'a OrderedTree<T> {
    type Item = &'a T;
    type IntoIter = IterInorder<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_inorder()
    }
}

impl<T: Ord> Extend<T> for OrderedTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T: Ord> FromIterator<T> for OrderedTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
