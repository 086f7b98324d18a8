use crate::error::{IndexError, Result};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

pub trait TreeOps {
    fn insert(&mut self, key: u64, label: String) -> Result<()>;
    fn contains(&self, key: u64) -> bool;
    fn remove(&mut self, key: u64) -> Result<String>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TreeOps for BTreeMap<u64, String> {
    fn insert(&mut self, key: u64, label: String) -> Result<()> {
        match self.entry(key) {
            Entry::Occupied(_) => Err(IndexError::DuplicateKey(key)),
            Entry::Vacant(slot) => {
                slot.insert(label);
                Ok(())
            }
        }
    }

    fn contains(&self, key: u64) -> bool {
        self.contains_key(&key)
    }

    fn remove(&mut self, key: u64) -> Result<String> {
        BTreeMap::remove(self, &key).ok_or(IndexError::KeyNotFound(key))
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}
