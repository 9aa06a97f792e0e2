use std::cmp::Ordering;
#[cfg(any(test, feature = "consistency_check"))]
use std::cmp;
use std::mem;

use log::debug;

use crate::error::KeyError;
use crate::node::{Link, NodeArena, NodeId};

mod balance;

/// An ordered map implemented with an AVL tree.
///
/// Every node stores the height difference between its right and left
/// subtree. Inserts and removals walk back up from the changed position and
/// rotate wherever that difference leaves the range `-1..=1`.
///
/// ```
/// use avl_bst::AvlTreeMap;
/// let mut map = AvlTreeMap::new();
/// map.insert(0, "zero");
/// map.insert(1, "one");
/// map.insert(2, "two");
/// assert_eq!(map.get(&1), Some(&"one"));
/// map.remove(&1);
/// assert!(map.get(&1).is_none());
/// ```
#[derive(Clone)]
pub struct AvlTreeMap<K, V> {
    nodes: NodeArena<K, V>,
    root: Link,
}

enum InsertPos {
    Occupied(NodeId),
    Vacant { parent: Link, left: bool },
}

#[cfg(any(test, feature = "consistency_check"))]
#[allow(clippy::enum_variant_names)]
enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Creates an empty map.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            nodes: NodeArena::new(),
            root: None,
        }
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of levels on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        // The taller side of every node is recorded in its balance
        let mut height = 0;
        let mut current = self.root;
        while let Some(node_id) = current {
            height += 1;
            let node = &self.nodes[node_id];
            current = if node.balance > 0 { node.right } else { node.left };
        }
        height
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Returns true if the map contains a value for the key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|node_id| &self.nodes[node_id].value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let node_id = self.find(key)?;
        Some(&mut self.nodes[node_id].value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).map(|node_id| {
            let node = &self.nodes[node_id];
            (&node.key, &node.value)
        })
    }

    /// Returns a reference to the value corresponding to the key, or
    /// [`KeyError`] if the key is not in the map.
    ///
    /// ```
    /// use avl_bst::{AvlTreeMap, KeyError};
    /// let mut map = AvlTreeMap::new();
    /// map.insert("a", 1);
    /// assert_eq!(map.at(&"a"), Ok(&1));
    /// assert_eq!(map.at(&"b"), Err(KeyError));
    /// ```
    pub fn at(&self, key: &K) -> Result<&V, KeyError> {
        self.get(key).ok_or(KeyError)
    }

    /// Mutable counterpart of [`at`](Self::at).
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V, KeyError> {
        self.get_mut(key).ok_or(KeyError)
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut node_id = self.root?;
        while let Some(left_id) = self.nodes[node_id].left {
            node_id = left_id;
        }
        let node = &self.nodes[node_id];
        Some((&node.key, &node.value))
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut node_id = self.root?;
        while let Some(right_id) = self.nodes[node_id].right {
            node_id = right_id;
        }
        let node = &self.nodes[node_id];
        Some((&node.key, &node.value))
    }

    /// Inserts a key-value pair into the map.
    /// If the key is already present only its value is replaced, and the old
    /// value is returned. The shape of the tree does not change in that case.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.find_insert_pos(&key) {
            InsertPos::Occupied(node_id) => {
                Some(mem::replace(&mut self.nodes[node_id].value, value))
            }
            InsertPos::Vacant { parent: None, .. } => {
                self.root = Some(self.nodes.alloc(key, value, None));
                None
            }
            InsertPos::Vacant {
                parent: Some(parent_id),
                left,
            } => {
                let node_id = self.nodes.alloc(key, value, Some(parent_id));
                if left {
                    self.nodes[parent_id].left = Some(node_id);
                } else {
                    self.nodes[parent_id].right = Some(node_id);
                }
                self.rebalance_after_insert(parent_id, node_id);
                None
            }
        }
    }

    /// Removes a key from the map.
    /// Returns the value at the key if the key was previously in the map.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let mut node_id = self.find(key)?;

        // Node with two children trades places with its in-order predecessor,
        // which has at most one child
        if self.nodes[node_id].left.is_some() && self.nodes[node_id].right.is_some() {
            let pred_id = self.predecessor(node_id).unwrap();
            debug!("removing inner node through its in-order predecessor");
            self.node_swap(node_id, pred_id);
            node_id = pred_id;
        }

        let parent = self.nodes[node_id].parent;
        let child = self.nodes[node_id].right.or(self.nodes[node_id].left);
        if let Some(child_id) = child {
            self.nodes[child_id].parent = parent;
        }

        let (_, value) = match parent {
            None => {
                self.root = child;
                let entry = self.nodes.release(node_id);
                self.rebalance_after_remove(child, 0);
                entry
            }
            Some(parent_id) => {
                let diff = if self.nodes.is_left_child(parent_id, node_id) {
                    self.nodes[parent_id].left = child;
                    1
                } else {
                    self.nodes[parent_id].right = child;
                    -1
                };
                let entry = self.nodes.release(node_id);
                self.rebalance_after_remove(parent, diff);
                entry
            }
        };
        Some(value)
    }

    /// Recomputes all subtree heights and reports whether they differ by at
    /// most one at every node. Does not consult the stored balance factors.
    pub fn is_balanced(&self) -> bool {
        self.balanced_height(self.root).is_some()
    }

    /// Panics unless links, key order, balance factors and node count agree
    /// with the actual shape of the tree.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        // Check root link
        if let Some(root_id) = self.root {
            assert!(self.nodes[root_id].parent.is_none());
        }

        // Check tree nodes
        let mut num_nodes = 0;
        let mut prev_key: Option<&K> = None;
        self.traverse(
            |node_id| {
                let node = &self.nodes[node_id];

                // Check link for left child node
                if let Some(left_id) = node.left {
                    assert!(self.nodes[left_id].parent == Some(node_id));
                    assert!(self.nodes[left_id].key < node.key);
                }

                // Check link for right child node
                if let Some(right_id) = node.right {
                    assert!(self.nodes[right_id].parent == Some(node_id));
                    assert!(self.nodes[right_id].key > node.key);
                }

                // Check balance factor against real heights
                let left_height = self.subtree_height(node.left) as isize;
                let right_height = self.subtree_height(node.right) as isize;
                assert_eq!(node.balance as isize, right_height - left_height);

                // Check AVL condition (nearly balance)
                assert!((-1..=1).contains(&node.balance));

                num_nodes += 1;
            },
            |node_id| {
                // Check global key order
                let key = &self.nodes[node_id].key;
                if let Some(prev_key) = prev_key {
                    assert!(prev_key < key);
                }
                prev_key = Some(key);
            },
            |_| {},
        );

        // Check number of nodes
        assert_eq!(num_nodes, self.len());
    }

    /// Keys and balance factors in preorder, which pins down the tree shape.
    #[cfg(test)]
    pub(crate) fn preorder_balances(&self) -> Vec<(&K, i8)> {
        let mut out = Vec::new();
        self.traverse(
            |node_id| {
                let node = &self.nodes[node_id];
                out.push((&node.key, node.balance));
            },
            |_| {},
            |_| {},
        );
        out
    }

    fn find(&self, key: &K) -> Link {
        let mut current = self.root;
        while let Some(node_id) = current {
            let node = &self.nodes[node_id];
            current = match key.cmp(&node.key) {
                Ordering::Equal => break,
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            }
        }
        current
    }

    fn find_insert_pos(&self, key: &K) -> InsertPos {
        let mut parent = None;
        let mut left = false;
        let mut current = self.root;
        while let Some(node_id) = current {
            parent = current;
            let node = &self.nodes[node_id];
            match key.cmp(&node.key) {
                Ordering::Equal => return InsertPos::Occupied(node_id),
                Ordering::Less => {
                    left = true;
                    current = node.left;
                }
                Ordering::Greater => {
                    left = false;
                    current = node.right;
                }
            }
        }
        InsertPos::Vacant { parent, left }
    }

    /// Returns the node holding the next smaller key.
    fn predecessor(&self, node_id: NodeId) -> Link {
        if let Some(mut current) = self.nodes[node_id].left {
            while let Some(right_id) = self.nodes[current].right {
                current = right_id;
            }
            return Some(current);
        }
        let mut current = node_id;
        while let Some(parent_id) = self.nodes[current].parent {
            if self.nodes[parent_id].right == Some(current) {
                return Some(parent_id);
            }
            current = parent_id;
        }
        None
    }

    /// Exchanges the entries of two nodes without relinking them. Balance
    /// factors describe the positions, so they stay in place.
    fn node_swap(&mut self, a: NodeId, b: NodeId) {
        self.nodes.swap_entries(a, b);
    }

    fn balanced_height(&self, link: Link) -> Option<usize> {
        match link {
            None => Some(0),
            Some(node_id) => {
                let left_height = self.balanced_height(self.nodes[node_id].left)?;
                let right_height = self.balanced_height(self.nodes[node_id].right)?;
                if left_height.abs_diff(right_height) > 1 {
                    return None;
                }
                Some(left_height.max(right_height) + 1)
            }
        }
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn subtree_height(&self, link: Link) -> usize {
        match link {
            None => 0,
            Some(node_id) => {
                let node = &self.nodes[node_id];
                cmp::max(self.subtree_height(node.left), self.subtree_height(node.right)) + 1
            }
        }
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn traverse<Pre, In, Post>(&self, mut preorder: Pre, mut inorder: In, mut postorder: Post)
    where
        Pre: FnMut(NodeId),
        In: FnMut(NodeId),
        Post: FnMut(NodeId),
    {
        if let Some(mut node_id) = self.root {
            let mut dir = Direction::FromParent;
            loop {
                match dir {
                    Direction::FromParent => {
                        preorder(node_id);
                        if let Some(left_id) = self.nodes[node_id].left {
                            node_id = left_id;
                        } else {
                            dir = Direction::FromLeft;
                        }
                    }
                    Direction::FromLeft => {
                        inorder(node_id);
                        if let Some(right_id) = self.nodes[node_id].right {
                            node_id = right_id;
                            dir = Direction::FromParent;
                        } else {
                            dir = Direction::FromRight;
                        }
                    }
                    Direction::FromRight => {
                        postorder(node_id);
                        match self.nodes[node_id].parent {
                            Some(parent_id) => {
                                if self.nodes.is_left_child(parent_id, node_id) {
                                    dir = Direction::FromLeft;
                                } else {
                                    dir = Direction::FromRight;
                                }
                                node_id = parent_id;
                            }
                            None => break,
                        }
                    }
                }
            }
        }
    }
}

impl<K: Ord, V> Default for AvlTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
