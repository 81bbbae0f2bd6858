#![forbid(unsafe_code)]

//! Height-balanced ordered map keyed through a pluggable comparator.
//!
//! The tree is an AVL tree with owned child links. Empty subtrees are plain
//! `None` links; there is no shared sentinel node. Duplicate keys are
//! rejected on insert and never overwrite the stored entry.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

/// Total order used by [`OrderedMap`] to place keys.
///
/// `Q` is the type being compared; lookups may use a borrowed form of the
/// stored key (for example `str` for `String` keys).
pub trait Comparator<Q: ?Sized> {
    /// Compares two keys.
    fn compare(&self, left: &Q, right: &Q) -> Ordering;
}

/// Comparator delegating to the key's [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<Q: Ord + ?Sized> Comparator<Q> for NaturalOrder {
    #[inline]
    fn compare(&self, left: &Q, right: &Q) -> Ordering {
        left.cmp(right)
    }
}

type Link<K, V> = Option<Box<Node<K, V>>>;

struct Node<K, V> {
    key: K,
    value: V,
    height: u32,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }
}

fn height<K, V>(link: &Link<K, V>) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

/// Restores the AVL height bound at `link`, assuming both subtrees are valid.
fn rebalance<K, V>(link: &mut Link<K, V>) {
    let Some(mut node) = link.take() else {
        return;
    };
    node.update_height();
    let balance = node.balance();
    if balance > 1 {
        if node.left.as_ref().map_or(0, |left| left.balance()) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        node = rotate_right(node);
    } else if balance < -1 {
        if node.right.as_ref().map_or(0, |right| right.balance()) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        node = rotate_left(node);
    }
    *link = Some(node);
}

/// Detaches the minimum node of a non-empty subtree, rebalancing on the way up.
fn take_min<K, V>(link: &mut Link<K, V>) -> Option<Box<Node<K, V>>> {
    if link.as_ref()?.left.is_some() {
        let min = take_min(&mut link.as_mut()?.left);
        rebalance(link);
        min
    } else {
        let mut node = link.take()?;
        *link = node.right.take();
        Some(node)
    }
}

fn try_for_each_mut<K, V, E, F>(link: &mut Link<K, V>, f: &mut F) -> Result<(), E>
where
    F: FnMut(&K, &mut V) -> Result<(), E>,
{
    if let Some(node) = link.as_deref_mut() {
        try_for_each_mut(&mut node.left, f)?;
        f(&node.key, &mut node.value)?;
        try_for_each_mut(&mut node.right, f)?;
    }
    Ok(())
}

/// Ordered map with O(log n) insert, lookup and removal.
pub struct OrderedMap<K, V, C = NaturalOrder> {
    root: Link<K, V>,
    len: usize,
    cmp: C,
}

impl<K, V> OrderedMap<K, V, NaturalOrder> {
    /// Creates an empty map ordered by `K: Ord`.
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K, V> Default for OrderedMap<K, V, NaturalOrder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> OrderedMap<K, V, C> {
    /// Creates an empty map ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            root: None,
            len: 0,
            cmp,
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// In-order iterator over `(key, value)` pairs.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: self.len,
        };
        iter.descend_left(&self.root);
        iter
    }

    /// In-order iterator over keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// In-order iterator over values.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Smallest entry, if any.
    pub fn first(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// Visits every entry in key order with mutable access to the value,
    /// stopping at the first error.
    pub fn try_for_each_mut<E, F>(&mut self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&K, &mut V) -> Result<(), E>,
    {
        try_for_each_mut(&mut self.root, &mut f)
    }

    #[cfg(test)]
    pub(crate) fn height(&self) -> u32 {
        height(&self.root)
    }
}

impl<K, V, C: Comparator<K>> OrderedMap<K, V, C> {
    /// Inserts `key -> value`.
    ///
    /// Returns `false` and leaves the map untouched when `key` is already
    /// present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let inserted = Self::insert_at(&mut self.root, key, value, &self.cmp);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    fn insert_at(link: &mut Link<K, V>, key: K, value: V, cmp: &C) -> bool {
        let Some(node) = link.as_mut() else {
            *link = Some(Node::leaf(key, value));
            return true;
        };
        let inserted = match cmp.compare(&key, &node.key) {
            Ordering::Less => Self::insert_at(&mut node.left, key, value, cmp),
            Ordering::Greater => Self::insert_at(&mut node.right, key, value, cmp),
            Ordering::Equal => return false,
        };
        if inserted {
            rebalance(link);
        }
        inserted
    }

    /// Looks up the entry stored under `key`.
    pub fn find<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut link = &self.root;
        while let Some(node) = link.as_deref() {
            match self.cmp.compare(key, node.key.borrow()) {
                Ordering::Less => link = &node.left,
                Ordering::Greater => link = &node.right,
                Ordering::Equal => return Some((&node.key, &node.value)),
            }
        }
        None
    }

    /// Value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.find(key).map(|(_, value)| value)
    }

    /// Mutable value stored under `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Self::get_mut_at(&mut self.root, key, &self.cmp)
    }

    fn get_mut_at<'a, Q>(link: &'a mut Link<K, V>, key: &Q, cmp: &C) -> Option<&'a mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let node = link.as_deref_mut()?;
        match cmp.compare(key, node.key.borrow()) {
            Ordering::Less => Self::get_mut_at(&mut node.left, key, cmp),
            Ordering::Greater => Self::get_mut_at(&mut node.right, key, cmp),
            Ordering::Equal => Some(&mut node.value),
        }
    }

    /// Returns `true` when `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.find(key).is_some()
    }

    /// Removes and returns the entry stored under `key`. Absent keys are a
    /// no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let removed = Self::remove_at(&mut self.root, key, &self.cmp);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    fn remove_at<Q>(link: &mut Link<K, V>, key: &Q, cmp: &C) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let node = link.as_mut()?;
        let removed = match cmp.compare(key, node.key.borrow()) {
            Ordering::Less => Self::remove_at(&mut node.left, key, cmp),
            Ordering::Greater => Self::remove_at(&mut node.right, key, cmp),
            Ordering::Equal => {
                let mut target = link.take()?;
                *link = match (target.left.take(), target.right.take()) {
                    (None, None) => None,
                    (Some(child), None) | (None, Some(child)) => Some(child),
                    (Some(left), Some(right)) => {
                        let mut right = Some(right);
                        let mut successor = take_min(&mut right)?;
                        successor.left = Some(left);
                        successor.right = right;
                        Some(successor)
                    }
                };
                Some((target.key, target.value))
            }
        };
        if removed.is_some() {
            rebalance(link);
        }
        removed
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for OrderedMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, C> IntoIterator for &'a OrderedMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over an [`OrderedMap`].
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn descend_left(&mut self, mut link: &'a Link<K, V>) {
        while let Some(node) = link.as_deref() {
            self.stack.push(node);
            link = &node.left;
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend_left(&node.right);
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Ordered set built on [`OrderedMap`].
pub struct OrderedSet<K, C = NaturalOrder> {
    map: OrderedMap<K, (), C>,
}

impl<K> OrderedSet<K, NaturalOrder> {
    /// Creates an empty set ordered by `K: Ord`.
    pub fn new() -> Self {
        Self {
            map: OrderedMap::new(),
        }
    }
}

impl<K> Default for OrderedSet<K, NaturalOrder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> OrderedSet<K, C> {
    /// Creates an empty set ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            map: OrderedMap::with_comparator(cmp),
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` when the set has no members.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drops every member.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &K> + '_ {
        self.map.iter().map(|(key, _)| key)
    }
}

impl<K, C: Comparator<K>> OrderedSet<K, C> {
    /// Adds `key`; returns `false` if it was already a member.
    pub fn insert(&mut self, key: K) -> bool {
        self.map.insert(key, ())
    }

    /// Returns `true` when `key` is a member.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.contains_key(key)
    }

    /// Removes `key`; returns `false` if it was not a member.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.remove(key).is_some()
    }
}

impl<K: fmt::Debug, C> fmt::Debug for OrderedSet<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
