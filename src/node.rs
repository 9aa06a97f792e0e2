use std::mem;
use std::ops::{Index, IndexMut};

/// Handle of a node slot inside a [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

pub(crate) type Link = Option<NodeId>;

#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Height of the right subtree minus height of the left subtree.
    /// Steady state is -1, 0 or 1; +2/-2 only while a fix-up is running.
    pub(crate) balance: i8,
    pub(crate) parent: Link,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

/// Owns every node of a tree. Links between nodes are plain handles, so the
/// parent back-references never take part in ownership.
#[derive(Clone)]
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<NodeId>,
    len: usize,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }

    /// Stores a fresh leaf with balance 0 and returns its handle.
    pub(crate) fn alloc(&mut self, key: K, value: V, parent: Link) -> NodeId {
        let node = Node {
            key,
            value,
            balance: 0,
            parent,
            left: None,
            right: None,
        };
        self.len += 1;
        match self.free.pop() {
            Some(id) => {
                debug_assert!(self.slots[id.0].is_none());
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Destroys a node that has already been spliced out of the tree.
    pub(crate) fn release(&mut self, id: NodeId) -> (K, V) {
        let node = self.slots[id.0].take().unwrap();
        self.free.push(id);
        self.len -= 1;
        (node.key, node.value)
    }

    /// Exchanges key and value of two nodes. Links and balances stay with
    /// their structural positions.
    pub(crate) fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let (low, high) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let (head, tail) = self.slots.split_at_mut(high);
        let first = head[low].as_mut().unwrap();
        let second = tail[0].as_mut().unwrap();
        mem::swap(&mut first.key, &mut second.key);
        mem::swap(&mut first.value, &mut second.value);
    }

    pub(crate) fn is_left_child(&self, parent: NodeId, child: NodeId) -> bool {
        self[parent].left == Some(child)
    }
}

impl<K, V> Index<NodeId> for NodeArena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, id: NodeId) -> &Node<K, V> {
        match self.slots[id.0] {
            Some(ref node) => node,
            None => panic!("access to released node {:?}", id),
        }
    }
}

impl<K, V> IndexMut<NodeId> for NodeArena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match self.slots[id.0] {
            Some(ref mut node) => node,
            None => panic!("access to released node {:?}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NodeArena;

    #[test]
    fn test_release_recycles_slot() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(1, "a", None);
        let b = arena.alloc(2, "b", Some(a));
        assert_eq!(arena.len(), 2);

        assert_eq!(arena.release(b), (2, "b"));
        assert_eq!(arena.len(), 1);

        let c = arena.alloc(3, "c", Some(a));
        assert_eq!(c, b);
        assert_eq!(arena[c].key, 3);
        assert_eq!(arena[c].balance, 0);
        assert_eq!(arena[c].parent, Some(a));
    }

    #[test]
    fn test_swap_entries_keeps_links() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(1, "a", None);
        let b = arena.alloc(2, "b", Some(a));
        arena[a].right = Some(b);
        arena[a].balance = 1;

        arena.swap_entries(b, a);
        assert_eq!((arena[a].key, arena[a].value), (2, "b"));
        assert_eq!((arena[b].key, arena[b].value), (1, "a"));
        assert_eq!(arena[a].right, Some(b));
        assert_eq!(arena[b].parent, Some(a));
        assert_eq!(arena[a].balance, 1);
        assert_eq!(arena[b].balance, 0);
        assert!(!arena.is_left_child(a, b));
    }
}
