//! Balance factor maintenance for [`AvlTreeMap`].
//!
//! Rotations only rewire links. The fix-up walks set every balance factor
//! they touch explicitly, so after a completed insert or remove each node
//! holds `height(right) - height(left)` again.

use log::trace;

use super::AvlTreeMap;
use crate::node::{Link, NodeId};

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Accounts for a new leaf `node_id` below `parent_id` and walks up while
    /// the subtree keeps growing taller.
    /// Stops after at most one single or double rotation, since that already
    /// brings the subtree back to its height from before the insert.
    pub(super) fn rebalance_after_insert(&mut self, parent_id: NodeId, node_id: NodeId) {
        if self.nodes[parent_id].balance != 0 {
            // Leaf filled up the shorter side, parent height unchanged
            self.nodes[parent_id].balance = 0;
            return;
        }
        self.nodes[parent_id].balance = if self.nodes.is_left_child(parent_id, node_id) {
            -1
        } else {
            1
        };

        let mut parent_id = parent_id;
        let mut node_id = node_id;
        while let Some(grandparent_id) = self.nodes[parent_id].parent {
            if self.nodes.is_left_child(grandparent_id, parent_id) {
                self.nodes[grandparent_id].balance -= 1;
            } else {
                self.nodes[grandparent_id].balance += 1;
            }
            match self.nodes[grandparent_id].balance {
                0 => return,
                -1 | 1 => {
                    node_id = parent_id;
                    parent_id = grandparent_id;
                }
                _ => {
                    self.rotate_after_insert(grandparent_id, parent_id, node_id);
                    return;
                }
            }
        }
    }

    fn rotate_after_insert(&mut self, grandparent_id: NodeId, parent_id: NodeId, node_id: NodeId) {
        let parent_is_left = self.nodes.is_left_child(grandparent_id, parent_id);
        let node_is_left = self.nodes.is_left_child(parent_id, node_id);
        match (parent_is_left, node_is_left) {
            (true, true) => {
                trace!("insert: single rotation, left-left");
                self.rotate_right(grandparent_id);
                self.nodes[parent_id].balance = 0;
                self.nodes[grandparent_id].balance = 0;
            }
            (false, false) => {
                trace!("insert: single rotation, right-right");
                self.rotate_left(grandparent_id);
                self.nodes[parent_id].balance = 0;
                self.nodes[grandparent_id].balance = 0;
            }
            (true, false) => {
                trace!("insert: double rotation, left-right");
                self.rotate_left(parent_id);
                self.rotate_right(grandparent_id);
                self.settle_double_rotation(node_id, parent_id, grandparent_id);
            }
            (false, true) => {
                trace!("insert: double rotation, right-left");
                self.rotate_right(parent_id);
                self.rotate_left(grandparent_id);
                self.settle_double_rotation(node_id, grandparent_id, parent_id);
            }
        }
    }

    /// Walks up from `start` after a node below it has been spliced out.
    /// `diff` is the balance change at `start`: +1 if its left subtree got
    /// shorter, -1 for the right one and 0 if the removed node was the root.
    ///
    /// Unlike insertion, a rotation can leave the subtree one level shorter,
    /// in which case the walk continues with the parent.
    pub(super) fn rebalance_after_remove(&mut self, start: Link, diff: i8) {
        let mut current = start;
        let mut diff = diff;
        while let Some(node_id) = current {
            let parent = self.nodes[node_id].parent;
            // Balance change for the parent if this subtree ends up shorter
            let parent_diff = match parent {
                Some(parent_id) if self.nodes.is_left_child(parent_id, node_id) => 1,
                _ => -1,
            };
            let balance = self.nodes[node_id].balance;

            // Overflow must be checked before the absorbing cases
            if balance + diff == -2 {
                let left_id = self.nodes[node_id].left.unwrap();
                match self.nodes[left_id].balance {
                    -1 => {
                        trace!("remove: single rotation, left-left");
                        self.rotate_right(node_id);
                        self.nodes[node_id].balance = 0;
                        self.nodes[left_id].balance = 0;
                    }
                    0 => {
                        trace!("remove: single rotation, height unchanged");
                        self.rotate_right(node_id);
                        self.nodes[node_id].balance = -1;
                        self.nodes[left_id].balance = 1;
                        return;
                    }
                    _ => {
                        trace!("remove: double rotation, left-right");
                        let pivot_id = self.nodes[left_id].right.unwrap();
                        self.rotate_left(left_id);
                        self.rotate_right(node_id);
                        self.settle_double_rotation(pivot_id, left_id, node_id);
                    }
                }
            } else if balance + diff == 2 {
                let right_id = self.nodes[node_id].right.unwrap();
                match self.nodes[right_id].balance {
                    1 => {
                        trace!("remove: single rotation, right-right");
                        self.rotate_left(node_id);
                        self.nodes[node_id].balance = 0;
                        self.nodes[right_id].balance = 0;
                    }
                    0 => {
                        trace!("remove: single rotation, height unchanged");
                        self.rotate_left(node_id);
                        self.nodes[node_id].balance = 1;
                        self.nodes[right_id].balance = -1;
                        return;
                    }
                    _ => {
                        trace!("remove: double rotation, right-left");
                        let pivot_id = self.nodes[right_id].left.unwrap();
                        self.rotate_right(right_id);
                        self.rotate_left(node_id);
                        self.settle_double_rotation(pivot_id, node_id, right_id);
                    }
                }
            } else if balance == 0 {
                // Was balanced, one side got shorter, height unchanged
                self.nodes[node_id].balance += diff;
                return;
            } else if balance + diff == 0 {
                self.nodes[node_id].balance = 0;
            } else {
                return;
            }

            current = parent;
            diff = parent_diff;
        }
    }

    /// `pivot_id` has just been lifted two levels and now has `left_id` and
    /// `right_id` as children. Their balances follow from the balance the
    /// pivot had before, the pivot itself ends up at 0.
    fn settle_double_rotation(&mut self, pivot_id: NodeId, left_id: NodeId, right_id: NodeId) {
        let (left_balance, right_balance) = match self.nodes[pivot_id].balance {
            -1 => (0, 1),
            0 => (0, 0),
            _ => (-1, 0),
        };
        self.nodes[left_id].balance = left_balance;
        self.nodes[right_id].balance = right_balance;
        self.nodes[pivot_id].balance = 0;
    }

    /// Lifts the right child of `node_id` into its place.
    fn rotate_left(&mut self, node_id: NodeId) {
        let right_id = self.nodes[node_id].right.unwrap();

        let right_left = self.nodes[right_id].left;
        self.nodes[node_id].right = right_left;
        if let Some(right_left_id) = right_left {
            self.nodes[right_left_id].parent = Some(node_id);
        }

        let parent = self.nodes[node_id].parent;
        self.nodes[right_id].parent = parent;
        self.replace_child(parent, node_id, right_id);

        self.nodes[right_id].left = Some(node_id);
        self.nodes[node_id].parent = Some(right_id);
    }

    /// Lifts the left child of `node_id` into its place.
    fn rotate_right(&mut self, node_id: NodeId) {
        let left_id = self.nodes[node_id].left.unwrap();

        let left_right = self.nodes[left_id].right;
        self.nodes[node_id].left = left_right;
        if let Some(left_right_id) = left_right {
            self.nodes[left_right_id].parent = Some(node_id);
        }

        let parent = self.nodes[node_id].parent;
        self.nodes[left_id].parent = parent;
        self.replace_child(parent, node_id, left_id);

        self.nodes[left_id].right = Some(node_id);
        self.nodes[node_id].parent = Some(left_id);
    }

    fn replace_child(&mut self, parent: Link, old_id: NodeId, new_id: NodeId) {
        match parent {
            None => self.root = Some(new_id),
            Some(parent_id) => {
                if self.nodes.is_left_child(parent_id, old_id) {
                    self.nodes[parent_id].left = Some(new_id);
                } else {
                    self.nodes[parent_id].right = Some(new_id);
                }
            }
        }
    }
}
