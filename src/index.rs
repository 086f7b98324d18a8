use crate::error::{IndexError, Result};
use crate::node::{Link, Node, link_balance_factor, link_height};
use crate::rotation::rebalance;
use crate::tree::TreeOps;
use std::cmp::Ordering;
use std::mem;
use tracing::debug;

/// An AVL tree mapping unique `u64` keys to text labels.
///
/// Every mutation leaves all nodes with a balance factor in `-1..=1` and
/// keeps each node's cached height equal to one more than its taller child.
#[derive(Debug, Default)]
pub struct BalancedIndex {
    root: Link,
    len: usize,
}

/// Depth-first traversal orders accepted by [`BalancedIndex::traverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Node, left, right.
    PreOrder,
    /// Left, node, right.
    InOrder,
    /// Left, right, node.
    PostOrder,
}

pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl BalancedIndex {
    pub fn new() -> Self {
        BalancedIndex { root: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree; 0 when empty.
    pub fn height(&self) -> usize {
        link_height(&self.root) as usize
    }

    pub fn balance_factor(&self) -> i32 {
        link_balance_factor(&self.root)
    }

    pub fn insert(&mut self, key: u64, label: impl Into<String>) -> Result<()> {
        let result = insert(&mut self.root, key, label.into());
        match &result {
            Ok(()) => {
                self.len += 1;
                debug!(key, "inserted");
            }
            Err(err) => debug!(%err, "insert rejected"),
        }
        result
    }

    /// Removes `key` and returns its label.
    pub fn remove(&mut self, key: u64) -> Result<String> {
        let result = remove(&mut self.root, key);
        match &result {
            Ok(_) => {
                self.len -= 1;
                debug!(key, "removed");
            }
            Err(err) => debug!(%err, "remove rejected"),
        }
        result
    }

    /// Removes the entry at zero-based in-order position `rank`.
    ///
    /// This collects every key before delegating to [`BalancedIndex::remove`],
    /// so it costs O(n) rather than O(log n).
    pub fn remove_nth(&mut self, rank: usize) -> Result<(u64, String)> {
        let keys: Vec<u64> = self.keys().collect();
        let Some(&key) = keys.get(rank) else {
            debug!(rank, len = keys.len(), "rank out of range");
            return Err(IndexError::RankOutOfRange {
                rank,
                len: keys.len(),
            });
        };
        let label = self.remove(key)?;
        Ok((key, label))
    }

    pub fn get(&self, key: u64) -> Result<&str> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            match key.cmp(&node.key) {
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => cur = node.right.as_deref(),
                Ordering::Equal => return Ok(&node.label),
            }
        }
        Err(IndexError::KeyNotFound(key))
    }

    pub fn contains(&self, key: u64) -> bool {
        self.get(key).is_ok()
    }

    /// Every key whose label equals `label`, in ascending order.
    pub fn find_by_label(&self, label: &str) -> Result<Vec<u64>> {
        let keys: Vec<u64> = self
            .iter()
            .filter(|(_, candidate)| *candidate == label)
            .map(|(key, _)| key)
            .collect();
        if keys.is_empty() {
            return Err(IndexError::LabelNotFound(label.to_string()));
        }
        Ok(keys)
    }

    /// Labels in the requested depth-first order. An empty tree yields an empty list.
    pub fn traverse(&self, order: Order) -> Vec<&str> {
        let mut labels = Vec::with_capacity(self.len);
        traverse(&self.root, order, &mut labels);
        labels
    }

    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left(self.root.as_deref());
        iter
    }

    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.iter().map(|(key, _)| key)
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }
}

fn insert(link: &mut Link, key: u64, label: String) -> Result<()> {
    let Some(node) = link else {
        *link = Some(Box::new(Node::new(key, label)));
        return Ok(());
    };
    match key.cmp(&node.key) {
        Ordering::Less => insert(&mut node.left, key, label)?,
        Ordering::Greater => insert(&mut node.right, key, label)?,
        Ordering::Equal => return Err(IndexError::DuplicateKey(key)),
    }
    rebalance(link);
    Ok(())
}

fn remove(link: &mut Link, key: u64) -> Result<String> {
    let Some(node) = link else {
        return Err(IndexError::KeyNotFound(key));
    };
    let label = match key.cmp(&node.key) {
        Ordering::Less => remove(&mut node.left, key)?,
        Ordering::Greater => remove(&mut node.right, key)?,
        Ordering::Equal => {
            let successor = match (&node.left, node.right.as_deref()) {
                (Some(_), Some(right)) => {
                    let successor = right.leftmost();
                    Some((successor.key, successor.label.clone()))
                }
                _ => None,
            };
            match successor {
                Some((successor_key, successor_label)) => {
                    // The successor is copied up before it is unlinked below.
                    node.key = successor_key;
                    let label = mem::replace(&mut node.label, successor_label);
                    remove(&mut node.right, successor_key)?;
                    label
                }
                None => {
                    let label = mem::take(&mut node.label);
                    let child = node.left.take().or_else(|| node.right.take());
                    *link = child;
                    return Ok(label);
                }
            }
        }
    };
    rebalance(link);
    Ok(label)
}

fn traverse<'a>(link: &'a Link, order: Order, out: &mut Vec<&'a str>) {
    let Some(node) = link else {
        return;
    };
    match order {
        Order::PreOrder => {
            out.push(&node.label);
            traverse(&node.left, order, out);
            traverse(&node.right, order, out);
        }
        Order::InOrder => {
            traverse(&node.left, order, out);
            out.push(&node.label);
            traverse(&node.right, order, out);
        }
        Order::PostOrder => {
            traverse(&node.left, order, out);
            traverse(&node.right, order, out);
            out.push(&node.label);
        }
    }
}

impl<'a> Iter<'a> {
    fn push_left(&mut self, mut link: Option<&'a Node>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (u64, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some((node.key, &node.label))
    }
}

impl<'a> IntoIterator for &'a BalancedIndex {
    type Item = (u64, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TreeOps for BalancedIndex {
    fn insert(&mut self, key: u64, label: String) -> Result<()> {
        BalancedIndex::insert(self, key, label)
    }

    fn contains(&self, key: u64) -> bool {
        BalancedIndex::contains(self, key)
    }

    fn remove(&mut self, key: u64) -> Result<String> {
        BalancedIndex::remove(self, key)
    }

    fn len(&self) -> usize {
        self.len
    }
}
