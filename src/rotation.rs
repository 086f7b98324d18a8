use crate::node::{Link, Node, link_balance_factor};
use tracing::trace;

pub(crate) fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    trace!(key = node.key, pivot = pivot.key, "rotate left");

    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

pub(crate) fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    trace!(key = node.key, pivot = pivot.key, "rotate right");

    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

pub(crate) fn rotate_left_right(mut node: Box<Node>) -> Box<Node> {
    node.left = node.left.take().map(rotate_left);
    rotate_right(node)
}

pub(crate) fn rotate_right_left(mut node: Box<Node>) -> Box<Node> {
    node.right = node.right.take().map(rotate_right);
    rotate_left(node)
}

/// Restores the height balance of `node`, whose height must already be current.
/// Returns the root of the repaired subtree.
pub(crate) fn repair(node: Box<Node>) -> Box<Node> {
    let balance_factor = node.balance_factor();
    if balance_factor > 1 {
        if link_balance_factor(&node.left) >= 0 {
            rotate_right(node)
        } else {
            rotate_left_right(node)
        }
    } else if balance_factor < -1 {
        if link_balance_factor(&node.right) <= 0 {
            rotate_left(node)
        } else {
            rotate_right_left(node)
        }
    } else {
        node
    }
}

/// Recomputes the height of the node in `link` and repairs it in place.
pub(crate) fn rebalance(link: &mut Link) {
    if let Some(mut node) = link.take() {
        node.update_height();
        *link = Some(repair(node));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::link_height;

    fn leaf(key: u64) -> Box<Node> {
        Box::new(Node::new(key, key.to_string()))
    }

    fn with_children(key: u64, left: Link, right: Link) -> Box<Node> {
        let mut node = leaf(key);
        node.left = left;
        node.right = right;
        node.update_height();
        node
    }

    fn keys_in_order(link: &Link, out: &mut Vec<u64>) {
        if let Some(node) = link {
            keys_in_order(&node.left, out);
            out.push(node.key);
            keys_in_order(&node.right, out);
        }
    }

    #[test]
    fn rotate_left_promotes_right_child() {
        let chain = with_children(1, None, Some(with_children(2, None, Some(leaf(3)))));
        let root = rotate_left(chain);
        assert_eq!(root.key, 2);
        assert_eq!(root.height, 2);
        assert_eq!(root.left.as_ref().map(|n| n.key), Some(1));
        assert_eq!(root.right.as_ref().map(|n| n.key), Some(3));
        assert_eq!(link_height(&root.left), 1);
    }

    #[test]
    fn rotate_right_promotes_left_child() {
        let chain = with_children(3, Some(with_children(2, Some(leaf(1)), None)), None);
        let root = rotate_right(chain);
        assert_eq!(root.key, 2);
        assert_eq!(root.height, 2);
        assert_eq!(root.left.as_ref().map(|n| n.key), Some(1));
        assert_eq!(root.right.as_ref().map(|n| n.key), Some(3));
    }

    #[test]
    fn rotate_moves_inner_grandchild_across() {
        // 2 has an inner child 3 which must end up as 4's left child.
        let node = with_children(
            4,
            Some(with_children(2, Some(leaf(1)), Some(leaf(3)))),
            Some(leaf(5)),
        );
        let root = rotate_right(node);
        assert_eq!(root.key, 2);
        let right = root.right.as_ref().map(|n| (n.key, n.left.as_ref().map(|l| l.key)));
        assert_eq!(right, Some((4, Some(3))));

        let mut keys = Vec::new();
        keys_in_order(&Some(root), &mut keys);
        assert_eq!(keys, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn rotation_without_pivot_is_identity() {
        let root = rotate_left(leaf(1));
        assert_eq!(root.key, 1);
        let root = rotate_right(root);
        assert_eq!(root.key, 1);
    }

    #[test]
    fn repair_left_right_case() {
        let node = with_children(3, Some(with_children(1, None, Some(leaf(2)))), None);
        assert_eq!(node.balance_factor(), 2);
        let root = repair(node);
        assert_eq!(root.key, 2);
        assert_eq!(root.balance_factor(), 0);
        assert_eq!(root.height, 2);
    }

    #[test]
    fn repair_right_left_case() {
        let node = with_children(1, None, Some(with_children(3, Some(leaf(2)), None)));
        assert_eq!(node.balance_factor(), -2);
        let root = repair(node);
        assert_eq!(root.key, 2);
        assert_eq!(root.left.as_ref().map(|n| n.key), Some(1));
        assert_eq!(root.right.as_ref().map(|n| n.key), Some(3));
    }

    #[test]
    fn repair_leaves_balanced_node_alone() {
        let node = with_children(2, Some(leaf(1)), None);
        let root = repair(node);
        assert_eq!(root.key, 2);
        assert_eq!(root.height, 2);
    }

    #[test]
    fn rebalance_updates_height_before_repair() {
        let mut stale = with_children(1, None, Some(with_children(2, None, Some(leaf(3)))));
        stale.height = 1;
        let mut link = Some(stale);
        rebalance(&mut link);
        assert_eq!(link.as_ref().map(|n| (n.key, n.height)), Some((2, 2)));

        let mut empty: Link = None;
        rebalance(&mut empty);
        assert!(empty.is_none());
    }
}
