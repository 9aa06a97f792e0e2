//! An ordered map implemented with an AVL tree that tracks a balance factor
//! per node, plus a leaf depth check for plain binary trees.
//!
//! ```
//! use avl_bst::AvlTreeMap;
//! let mut map = AvlTreeMap::new();
//! for key in [10, 20, 30] {
//!     map.insert(key, key.to_string());
//! }
//! assert_eq!(map.height(), 2);
//! assert_eq!(map.remove(&20), Some(String::from("20")));
//! assert!(map.is_balanced());
//! ```

mod error;
mod map;
mod node;

pub mod equal_paths;

pub use equal_paths::{equal_paths, TreeNode};
pub use error::KeyError;
pub use map::AvlTreeMap;
