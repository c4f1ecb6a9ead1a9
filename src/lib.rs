//! Hand-rolled collections for benchmarking: an unbalanced binary search tree with set algebra
//! helpers, and a fixed-capacity open-addressing hash table (from the `fixed_table` crate).

pub mod tree;
pub mod set_ops;
pub mod keygen;

mod slab;

pub use tree::OrderedTree;
pub use set_ops::{symmetric_difference, union};
pub use keygen::{KeyGen, KeySource, Lcg, LcgParams};
pub use fixed_table::{self, FixedHashMap};

#[macro_export(local_inner_macros)]
macro_rules! ordtree {
    (@single $($x:tt)*) => (());
    (@count $($rest:expr),*) => (<[()]>::len(&[$(ordtree!(@single $rest)),*]));

    ($($key:expr,)+) => { ordtree!($($key),+) };
    ($($key:expr),*) => {
        {
            let _cap = ordtree!(@count $($key),*);
            let mut _tree = $crate::OrderedTree::with_capacity(_cap);
            $(
                let _ = _tree.insert($key);
            )*
            _tree
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn ordtree_macro() {
        let tree = ordtree! {
            1,
            3,
            2, // trailing comma
        };

        let keys: Vec<_> = tree.iter_inorder().copied().collect();
        assert_eq!(&keys, &[1, 2, 3]);
        // Inserted in the order given, so 1 is the root
        let keys: Vec<_> = tree.iter_preorder().copied().collect();
        assert_eq!(&keys, &[1, 3, 2]);

        // No trailing comma
        let tree = ordtree![99];

        let keys: Vec<_> = tree.iter_inorder().copied().collect();
        assert_eq!(&keys, &[99]);

        // Duplicates are ignored
        let tree = ordtree![5, 5, 5];
        assert_eq!(tree.len(), 1);

        // Zero items
        let tree = ordtree!();

        let keys: Vec<i32> = tree.iter_inorder().copied().collect();
        assert_eq!(&keys, &[]);
    }
}
