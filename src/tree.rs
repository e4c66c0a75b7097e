use std::cmp::{self, Ordering};

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::node::NodeRef;

mod traverse;

pub use traverse::{Iter, Order};

/// Height of an empty subtree. A leaf has height 0.
pub const EMPTY_HEIGHT: i32 = -1;

pub(crate) type NodeId = usize;
type Link = Option<NodeId>;

/// An ordered set of unique, non-empty strings kept balanced as an AVL tree.
///
/// Nodes live in an arena owned by the tree. Child links are arena indices
/// owned by the tree, the parent link is a plain back reference used to walk
/// upwards after a mutation.
///
/// Strings are ordered by `Ord for str`: lexicographic by byte, case-sensitive.
#[derive(Clone, Default)]
pub struct AvlTree {
    nodes: Vec<Node>,
    root: Link,
    rotations: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) value: String,
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) parent: Link,
    pub(crate) height: i32,
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug)]
enum Rotation {
    LeftLeft,
    LeftRight,
    RightRight,
    RightLeft,
}

impl AvlTree {
    /// Creates an empty tree.
    /// No memory is allocated until the first value is inserted.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            rotations: 0,
        }
    }

    /// Returns true if the tree contains no values.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of values in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the height of the tree, `-1` if it is empty.
    pub fn height(&self) -> i32 {
        self.height_of(self.root)
    }

    /// Returns the balance factor of the root node.
    pub fn balance_factor(&self) -> Result<i32> {
        self.root
            .map(|root_ptr| self.balance_factor_of(root_ptr))
            .ok_or(Error::EmptyTree)
    }

    /// Returns the number of single rotations performed since the tree was
    /// created or last cleared. A double rotation counts as two.
    pub fn rotations(&self) -> usize {
        self.rotations
    }

    /// Returns the root node.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.map(|root_ptr| NodeRef::new(self, root_ptr))
    }

    /// Removes all values, deallocating the nodes.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.rotations = 0;
    }

    /// Returns the node holding `value`, or `None` if it is not stored.
    pub fn search(&self, value: &str) -> Option<NodeRef<'_>> {
        self.find(value).map(|node_ptr| NodeRef::new(self, node_ptr))
    }

    /// Returns true if the tree contains `value`.
    pub fn contains(&self, value: &str) -> bool {
        self.find(value).is_some()
    }

    /// Inserts a value, restoring AVL balance on the path back to the root.
    ///
    /// Returns `Ok(false)` if the value was already present, in which case the
    /// tree is left untouched. Empty strings are rejected with
    /// [`Error::EmptyValue`].
    pub fn insert(&mut self, value: impl Into<String>) -> Result<bool> {
        match self.attach(value.into())? {
            Some(node_ptr) => {
                let parent = self.nodes[node_ptr].parent;
                self.rebalance_path(parent);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Inserts a value as into a plain binary search tree, without rotations.
    ///
    /// Heights stay accurate, but the tree may degrade into a chain. A tree
    /// touched by this method is no longer guaranteed to satisfy the AVL
    /// condition, and later calls to [`insert`](Self::insert) only repair
    /// imbalances a single insert can cause.
    pub fn insert_unbalanced(&mut self, value: impl Into<String>) -> Result<bool> {
        match self.attach(value.into())? {
            Some(node_ptr) => {
                let mut current = self.nodes[node_ptr].parent;
                while let Some(parent_ptr) = current {
                    self.adjust_height(parent_ptr);
                    current = self.nodes[parent_ptr].parent;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes a value from the tree.
    /// Returns whether the value was previously in the tree.
    pub fn remove(&mut self, value: &str) -> bool {
        if let Some(node_ptr) = self.find(value) {
            debug_assert!(!self.nodes.is_empty());
            let rebalance_from = self.unlink_node(node_ptr);
            self.rebalance_path(rebalance_from);
            self.release(node_ptr);
            debug!(value, "removed");
            debug_assert!(self.find(value).is_none());
            return true;
        }
        false
    }

    /// Asserts that links, ordering and cached heights are consistent and that
    /// every node satisfies the AVL condition.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        self.check_links(true);
    }

    /// Like [`check_consistency`](Self::check_consistency), but without the
    /// AVL condition. Meant for trees built with `insert_unbalanced`.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_search_tree(&self) {
        self.check_links(false);
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn check_links(&self, balanced: bool) {
        // Check root link
        if let Some(root_ptr) = self.root {
            assert!(self.nodes[root_ptr].parent.is_none());
        }

        // Check tree nodes
        let mut num_nodes = 0;
        let mut previous: Option<&str> = None;
        self.walk(self.root, Order::InOrder, |node_ptr, _| {
            let node = &self.nodes[node_ptr];
            let mut left_height = EMPTY_HEIGHT;
            let mut right_height = EMPTY_HEIGHT;

            assert!(!node.value.is_empty());
            if let Some(previous) = previous {
                assert!(previous < node.value.as_str());
            }
            previous = Some(node.value.as_str());

            // Check link for left child node
            if let Some(left_ptr) = node.left {
                assert_eq!(self.nodes[left_ptr].parent, Some(node_ptr));
                left_height = self.nodes[left_ptr].height;
            }

            // Check link for right child node
            if let Some(right_ptr) = node.right {
                assert_eq!(self.nodes[right_ptr].parent, Some(node_ptr));
                right_height = self.nodes[right_ptr].height;
            }

            // Check height
            assert_eq!(node.height, 1 + cmp::max(left_height, right_height));

            // Check AVL condition (nearly balance)
            if balanced {
                assert!((right_height - left_height).abs() <= 1);
            }

            num_nodes += 1;
        });

        // Check number of nodes
        assert_eq!(num_nodes, self.nodes.len());
        assert_eq!(self.height(), self.recompute_height(self.root));
    }

    pub(crate) fn node(&self, node_ptr: NodeId) -> &Node {
        &self.nodes[node_ptr]
    }

    /// Cached height of a subtree.
    pub(crate) fn height_of(&self, link: Link) -> i32 {
        link.map_or(EMPTY_HEIGHT, |node_ptr| self.nodes[node_ptr].height)
    }

    /// Height of a subtree derived from its shape, ignoring cached heights.
    pub(crate) fn recompute_height(&self, link: Link) -> i32 {
        let mut heights = vec![EMPTY_HEIGHT; self.nodes.len()];
        self.walk(link, Order::PostOrder, |node_ptr, _| {
            let node = &self.nodes[node_ptr];
            let left = node.left.map_or(EMPTY_HEIGHT, |left_ptr| heights[left_ptr]);
            let right = node.right.map_or(EMPTY_HEIGHT, |right_ptr| heights[right_ptr]);
            heights[node_ptr] = 1 + cmp::max(left, right);
        });
        link.map_or(EMPTY_HEIGHT, |node_ptr| heights[node_ptr])
    }

    pub(crate) fn balance_factor_of(&self, node_ptr: NodeId) -> i32 {
        let node = &self.nodes[node_ptr];
        self.height_of(node.right) - self.height_of(node.left)
    }

    fn find(&self, value: &str) -> Link {
        let mut current = self.root;
        while let Some(node_ptr) = current {
            let node = &self.nodes[node_ptr];
            current = match value.cmp(node.value.as_str()) {
                Ordering::Equal => break,
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        current
    }

    fn find_insert_pos(&self, value: &str) -> Option<(Link, Side)> {
        let mut parent: Link = None;
        let mut side = Side::Left;
        let mut current = self.root;
        while let Some(node_ptr) = current {
            let node = &self.nodes[node_ptr];
            parent = current;
            current = match value.cmp(node.value.as_str()) {
                Ordering::Equal => return None,
                Ordering::Less => {
                    side = Side::Left;
                    node.left
                }
                Ordering::Greater => {
                    side = Side::Right;
                    node.right
                }
            };
        }
        Some((parent, side))
    }

    /// Places a new leaf holding `value`. Returns `None` for duplicates.
    fn attach(&mut self, value: String) -> Result<Link> {
        if value.is_empty() {
            debug!("rejected empty value");
            return Err(Error::EmptyValue);
        }
        let Some((parent, side)) = self.find_insert_pos(&value) else {
            debug!(value = %value, "already present");
            return Ok(None);
        };

        let node_ptr = self.nodes.len();
        debug!(value = %value, "inserted");
        self.nodes.push(Node::new(parent, value));
        match (parent, side) {
            (None, _) => self.root = Some(node_ptr),
            (Some(parent_ptr), Side::Left) => self.nodes[parent_ptr].left = Some(node_ptr),
            (Some(parent_ptr), Side::Right) => self.nodes[parent_ptr].right = Some(node_ptr),
        }
        Ok(Some(node_ptr))
    }

    /// Points the link that held `old` (a child of `parent`, or the root) at `new`.
    fn replace_child(&mut self, parent: Link, old: NodeId, new: Link) {
        match parent {
            None => self.root = new,
            Some(parent_ptr) => {
                let parent_node = &mut self.nodes[parent_ptr];
                if parent_node.left == Some(old) {
                    parent_node.left = new;
                } else {
                    debug_assert_eq!(parent_node.right, Some(old));
                    parent_node.right = new;
                }
            }
        }
    }

    /// Detaches a node from the tree, replacing it by its in-order successor
    /// if it has two children.
    /// Returns the lowest node whose subtree changed.
    fn unlink_node(&mut self, node_ptr: NodeId) -> Link {
        let parent = self.nodes[node_ptr].parent;

        // Check if node to-unlink has right sub tree
        if let Some(mut min_child_ptr) = self.nodes[node_ptr].right {
            // Find smallest child node in right sub tree
            let mut min_child_parent_ptr = node_ptr;
            while let Some(left_ptr) = self.nodes[min_child_ptr].left {
                min_child_parent_ptr = min_child_ptr;
                min_child_ptr = left_ptr;
            }

            // Smallest child node is stem or leaf, unlink from tree
            let min_child_right = self.nodes[min_child_ptr].right;
            self.replace_child(Some(min_child_parent_ptr), min_child_ptr, min_child_right);
            if let Some(right_ptr) = min_child_right {
                self.nodes[right_ptr].parent = Some(min_child_parent_ptr);
            }

            // Replace node to-unlink by smallest child node
            let (left, right) = (self.nodes[node_ptr].left, self.nodes[node_ptr].right);
            self.nodes[min_child_ptr].left = left;
            if let Some(left_ptr) = left {
                self.nodes[left_ptr].parent = Some(min_child_ptr);
            }
            self.nodes[min_child_ptr].right = right;
            if let Some(right_ptr) = right {
                self.nodes[right_ptr].parent = Some(min_child_ptr);
            }
            self.nodes[min_child_ptr].parent = parent;
            self.replace_child(parent, node_ptr, Some(min_child_ptr));

            // Parent of smallest child node might be out of balance now
            if min_child_parent_ptr == node_ptr {
                // Parent is node to-unlink and has been replaced by smallest child
                Some(min_child_ptr)
            } else {
                Some(min_child_parent_ptr)
            }
        } else {
            // Node to-unlink is stem or leaf
            let left = self.nodes[node_ptr].left;
            if let Some(left_ptr) = left {
                self.nodes[left_ptr].parent = parent;
            }
            self.replace_child(parent, node_ptr, left);
            parent
        }
    }

    /// Frees the arena slot of an unlinked node. The last node of the arena
    /// moves into the freed slot and the links pointing at it are updated.
    fn release(&mut self, node_ptr: NodeId) -> Node {
        let last_ptr = self.nodes.len() - 1;
        if node_ptr != last_ptr {
            let last = &self.nodes[last_ptr];
            let (parent, left, right) = (last.parent, last.left, last.right);
            self.replace_child(parent, last_ptr, Some(node_ptr));
            for child_ptr in [left, right].into_iter().flatten() {
                self.nodes[child_ptr].parent = Some(node_ptr);
            }
        }
        self.nodes.swap_remove(node_ptr)
    }

    fn adjust_height(&mut self, node_ptr: NodeId) {
        let node = &self.nodes[node_ptr];
        let height = 1 + cmp::max(self.height_of(node.left), self.height_of(node.right));
        self.nodes[node_ptr].height = height;
    }

    /// Rotates on the edge from a node to its right child.
    /// Returns the new root of the subtree, the former right child.
    fn rotate_left(&mut self, node_ptr: NodeId) -> NodeId {
        debug_assert!(self.nodes[node_ptr].right.is_some());
        let Some(right_ptr) = self.nodes[node_ptr].right else {
            return node_ptr;
        };

        let right_left = self.nodes[right_ptr].left;
        self.nodes[node_ptr].right = right_left;
        if let Some(right_left_ptr) = right_left {
            self.nodes[right_left_ptr].parent = Some(node_ptr);
        }

        let parent = self.nodes[node_ptr].parent;
        self.nodes[right_ptr].parent = parent;
        self.replace_child(parent, node_ptr, Some(right_ptr));

        self.nodes[right_ptr].left = Some(node_ptr);
        self.nodes[node_ptr].parent = Some(right_ptr);

        self.adjust_height(node_ptr);
        self.adjust_height(right_ptr);
        self.rotations += 1;
        trace!(
            pivot = %self.nodes[node_ptr].value,
            root = %self.nodes[right_ptr].value,
            "rotated left"
        );
        right_ptr
    }

    /// Rotates on the edge from a node to its left child.
    /// Returns the new root of the subtree, the former left child.
    fn rotate_right(&mut self, node_ptr: NodeId) -> NodeId {
        debug_assert!(self.nodes[node_ptr].left.is_some());
        let Some(left_ptr) = self.nodes[node_ptr].left else {
            return node_ptr;
        };

        let left_right = self.nodes[left_ptr].right;
        self.nodes[node_ptr].left = left_right;
        if let Some(left_right_ptr) = left_right {
            self.nodes[left_right_ptr].parent = Some(node_ptr);
        }

        let parent = self.nodes[node_ptr].parent;
        self.nodes[left_ptr].parent = parent;
        self.replace_child(parent, node_ptr, Some(left_ptr));

        self.nodes[left_ptr].right = Some(node_ptr);
        self.nodes[node_ptr].parent = Some(left_ptr);

        self.adjust_height(node_ptr);
        self.adjust_height(left_ptr);
        self.rotations += 1;
        trace!(
            pivot = %self.nodes[node_ptr].value,
            root = %self.nodes[left_ptr].value,
            "rotated right"
        );
        left_ptr
    }

    /// Restores the AVL condition at a node whose subtrees are balanced and
    /// whose own balance factor lies within -2..=2, which holds after a single
    /// insert or remove. Returns the root of the subtree afterwards.
    fn rebalance(&mut self, node_ptr: NodeId) -> NodeId {
        let node = &self.nodes[node_ptr];
        let (left, right) = (node.left, node.right);
        let (subtree_ptr, rotation) = match (self.balance_factor_of(node_ptr), left, right) {
            (balance, Some(left_ptr), _) if balance < -1 => {
                if self.balance_factor_of(left_ptr) <= 0 {
                    (self.rotate_right(node_ptr), Rotation::LeftLeft)
                } else {
                    self.rotate_left(left_ptr);
                    (self.rotate_right(node_ptr), Rotation::LeftRight)
                }
            }
            (balance, _, Some(right_ptr)) if balance > 1 => {
                if self.balance_factor_of(right_ptr) >= 0 {
                    (self.rotate_left(node_ptr), Rotation::RightRight)
                } else {
                    self.rotate_right(right_ptr);
                    (self.rotate_left(node_ptr), Rotation::RightLeft)
                }
            }
            _ => return node_ptr,
        };
        trace!(case = ?rotation, root = %self.nodes[subtree_ptr].value, "rebalanced");
        subtree_ptr
    }

    /// Recomputes heights and rebalances nodes starting from given position up
    /// to the root node. Every ancestor is visited, the walk continues from the
    /// parent of whatever node roots the subtree after rebalancing.
    fn rebalance_path(&mut self, start_from: Link) {
        let mut current = start_from;
        while let Some(node_ptr) = current {
            self.adjust_height(node_ptr);
            let subtree_ptr = self.rebalance(node_ptr);
            current = self.nodes[subtree_ptr].parent;
        }
    }
}

impl Node {
    fn new(parent: Link, value: String) -> Self {
        Node {
            value,
            parent,
            left: None,
            right: None,
            height: 0,
        }
    }
}
