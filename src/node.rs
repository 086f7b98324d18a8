pub(crate) type Link = Option<Box<Node>>;

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) key: u64,
    pub(crate) label: String,
    pub(crate) height: i32,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl Node {
    pub(crate) fn new(key: u64, label: String) -> Self {
        Node {
            key,
            label,
            height: 1,
            left: None,
            right: None,
        }
    }

    pub(crate) fn update_height(&mut self) {
        let left_height = link_height(&self.left);
        let right_height = link_height(&self.right);
        self.height = 1 + left_height.max(right_height);
    }

    pub(crate) fn balance_factor(&self) -> i32 {
        link_height(&self.left) - link_height(&self.right)
    }

    /// Leftmost node of this subtree, i.e. its smallest key.
    pub(crate) fn leftmost(&self) -> &Node {
        let mut cur = self;
        while let Some(left) = cur.left.as_deref() {
            cur = left;
        }
        cur
    }
}

pub(crate) fn link_height(link: &Link) -> i32 {
    match link {
        Some(node) => node.height,
        None => 0,
    }
}

pub(crate) fn link_balance_factor(link: &Link) -> i32 {
    link.as_deref().map_or(0, Node::balance_factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(key: u64) -> Link {
        Some(Box::new(Node::new(key, format!("n{key}"))))
    }

    #[test]
    fn absent_link_has_zero_height_and_balance() {
        assert_eq!(link_height(&None), 0);
        assert_eq!(link_balance_factor(&None), 0);
    }

    #[test]
    fn new_node_is_a_leaf_of_height_one() {
        let node = Node::new(7, "seven".to_string());
        assert_eq!(node.height, 1);
        assert_eq!(node.balance_factor(), 0);
    }

    #[test]
    fn update_height_uses_taller_child() {
        let mut child = Node::new(2, "b".to_string());
        child.right = leaf(3);
        child.update_height();
        assert_eq!(child.height, 2);
        assert_eq!(child.balance_factor(), -1);

        let mut root = Node::new(5, "e".to_string());
        root.left = Some(Box::new(child));
        root.update_height();
        assert_eq!(root.height, 3);
        assert_eq!(root.balance_factor(), 2);
    }

    #[test]
    fn leftmost_follows_left_children() {
        let mut mid = Node::new(4, "d".to_string());
        mid.left = leaf(1);
        let mut root = Node::new(8, "h".to_string());
        root.left = Some(Box::new(mid));
        root.right = leaf(9);
        assert_eq!(root.leftmost().key, 1);
        assert_eq!(Node::new(3, "c".to_string()).leftmost().key, 3);
    }
}
