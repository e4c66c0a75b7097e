#![allow(dead_code)]

use avl_strings::{AvlTree, NodeRef, Order, EMPTY_HEIGHT};

/// Preorder listing of `(value, height, depth)`, enough to compare shapes.
pub fn shape(tree: &AvlTree) -> Vec<(String, i32, usize)> {
    let mut nodes = Vec::new();
    tree.traverse(Order::PreOrder, |node, depth| {
        nodes.push((node.value().to_owned(), node.height(), depth))
    });
    nodes
}

fn child_height(child: Option<NodeRef<'_>>) -> i32 {
    child.map_or(EMPTY_HEIGHT, |node| node.height())
}

/// Checks ordering, parent links, cached heights and size through the public
/// interface; the AVL condition only if `balanced`.
pub fn assert_invariants(tree: &AvlTree, balanced: bool) {
    if let Some(root) = tree.root() {
        assert!(root.parent().is_none());
    }

    let values: Vec<&str> = tree.iter().collect();
    assert!(values.windows(2).all(|pair| pair[0] < pair[1]));

    let mut num_nodes = 0;
    tree.traverse(Order::PostOrder, |node, _| {
        for child in [node.left(), node.right()].into_iter().flatten() {
            assert_eq!(child.parent(), Some(node));
        }
        let left = child_height(node.left());
        let right = child_height(node.right());
        assert_eq!(node.height(), 1 + left.max(right));
        assert_eq!(node.balance_factor(), right - left);
        if balanced {
            assert!(node.balance_factor().abs() <= 1, "unbalanced at {node}");
        }
        num_nodes += 1;
    });
    assert_eq!(num_nodes, tree.len());
    assert_eq!(values.len(), tree.len());
}
