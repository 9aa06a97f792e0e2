//! Leaf depth check for plain binary trees.
//!
//! The trees here carry no ordering or balance information; they are built
//! by the caller in any shape.

use std::cmp;

/// A node of an owned, unordered binary tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode<T> {
    pub value: T,
    pub left: Option<Box<TreeNode<T>>>,
    pub right: Option<Box<TreeNode<T>>>,
}

impl<T> TreeNode<T> {
    /// Creates a leaf.
    pub fn new(value: T) -> Self {
        Self {
            value,
            left: None,
            right: None,
        }
    }

    /// Sets the left child.
    pub fn with_left(mut self, left: TreeNode<T>) -> Self {
        self.left = Some(Box::new(left));
        self
    }

    /// Sets the right child.
    pub fn with_right(mut self, right: TreeNode<T>) -> Self {
        self.right = Some(Box::new(right));
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Number of levels below and including `root`; 0 for an empty tree.
pub fn height<T>(root: Option<&TreeNode<T>>) -> usize {
    match root {
        None => 0,
        Some(node) => cmp::max(height(node.left.as_deref()), height(node.right.as_deref())) + 1,
    }
}

/// Returns true if every leaf of the tree lies at the same depth.
///
/// A node with a single child only passes the question on to that child; a
/// node with two children additionally needs both subtrees to be equally tall.
///
/// ```
/// use avl_bst::{equal_paths, TreeNode};
/// let tree = TreeNode::new('a')
///     .with_left(TreeNode::new('b'))
///     .with_right(TreeNode::new('c').with_left(TreeNode::new('d')));
/// assert!(!equal_paths(Some(&tree)));
/// ```
pub fn equal_paths<T>(root: Option<&TreeNode<T>>) -> bool {
    let node = match root {
        None => return true,
        Some(node) => node,
    };
    match (node.left.as_deref(), node.right.as_deref()) {
        (None, None) => true,
        (Some(child), None) | (None, Some(child)) => equal_paths(Some(child)),
        (Some(left), Some(right)) => {
            equal_paths(Some(left))
                && equal_paths(Some(right))
                && height(Some(left)) == height(Some(right))
        }
    }
}
