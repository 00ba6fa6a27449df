//! Order-preserving grouping.
//!
//! A FIFO queue only orders messages *within* a message group, so anything that
//! regroups a batch must keep each group's members in their delivered order and
//! must never merge two groups. [`group_by`] is the one place that does this.

use std::collections::HashMap;

/// One key and the items that produced it, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<T> {
    pub key: String,
    pub items: Vec<T>,
}

/// Groups in the order their key first appeared in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Groups<T> {
    groups: Vec<Group<T>>,
}

impl<T> Groups<T> {
    /// Items for `key`, if any item produced it.
    pub fn get(&self, key: &str) -> Option<&[T]> {
        self.groups
            .iter()
            .find(|g| g.key == key)
            .map(|g| g.items.as_slice())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group<T>> {
        self.groups.iter()
    }
}

impl<T> IntoIterator for Groups<T> {
    type Item = Group<T>;
    type IntoIter = std::vec::IntoIter<Group<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Partitions `items` by the key `key_fn` derives from each of them.
///
/// Within a group, items keep their relative input order. No item is dropped;
/// an empty key is an ordinary group.
pub fn group_by<T, I, F>(items: I, mut key_fn: F) -> Groups<T>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group<T>> = Vec::new();

    for item in items {
        let key = key_fn(&item);
        match index.get(&key) {
            Some(&slot) => groups[slot].items.push(item),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group { key, items: vec![item] });
            }
        }
    }

    Groups { groups }
}
