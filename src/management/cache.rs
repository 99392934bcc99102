use std::{
    collections::HashMap,
    hash::Hash,
    num::NonZeroUsize,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{info, types::Lyrics, utils};

struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Bounded map that evicts the least recently used entry.
///
/// Entries live in a slot vector and are chained into a doubly linked list
/// ordered oldest to newest; a side index maps each key to its slot. Both
/// `get` and `put` are O(1). The structure is not synchronized; see
/// [`LyricsCache`] for the shared version.
pub struct RecencyCache<K, V> {
    capacity: NonZeroUsize,
    index: HashMap<K, usize>,
    slots: Vec<Option<Node<K, V>>>,
    vacant: Vec<usize>,
    oldest: Option<usize>,
    newest: Option<usize>,
}

impl<K, V> RecencyCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            index: HashMap::with_capacity(capacity.get() + 1),
            slots: Vec::with_capacity(capacity.get() + 1),
            vacant: Vec::new(),
            oldest: None,
            newest: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the value for `key` and makes it the most recently used entry.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let slot = *self.index.get(key)?;
        self.promote(slot);
        self.slots[slot].as_ref().map(|node| &node.value)
    }

    /// Returns the value for `key` without touching its recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let slot = *self.index.get(key)?;
        self.slots[slot].as_ref().map(|node| &node.value)
    }

    /// Inserts or overwrites `key` as the most recently used entry.
    ///
    /// When the insert takes the cache over capacity the least recently used
    /// entry is dropped and its key returned. At most one entry is evicted
    /// per call.
    pub fn put(&mut self, key: K, value: V) -> Option<K> {
        if let Some(&slot) = self.index.get(&key) {
            if let Some(node) = self.slots[slot].as_mut() {
                node.value = value;
            }
            self.promote(slot);
            return None;
        }

        let slot = self.allocate(Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.push_newest(slot);
        self.index.insert(key, slot);

        if self.index.len() > self.capacity.get() {
            return self.evict_oldest();
        }
        None
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.oldest;
        while let Some(slot) = cursor {
            let Some(node) = self.slots[slot].as_ref() else {
                break;
            };
            keys.push(node.key.clone());
            cursor = node.next;
        }
        keys
    }

    fn allocate(&mut self, node: Node<K, V>) -> usize {
        match self.vacant.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn promote(&mut self, slot: usize) {
        if self.newest == Some(slot) {
            return;
        }
        self.unlink(slot);
        self.push_newest(slot);
    }

    fn push_newest(&mut self, slot: usize) {
        let previous = self.newest;
        if let Some(node) = self.slots[slot].as_mut() {
            node.prev = previous;
            node.next = None;
        }
        match previous {
            Some(prev) => {
                if let Some(node) = self.slots[prev].as_mut() {
                    node.next = Some(slot);
                }
            }
            None => self.oldest = Some(slot),
        }
        self.newest = Some(slot);
    }

    fn unlink(&mut self, slot: usize) {
        let Some((prev, next)) = self.slots[slot].as_ref().map(|node| (node.prev, node.next))
        else {
            return;
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.slots[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.oldest = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.slots[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.newest = prev,
        }

        if let Some(node) = self.slots[slot].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }

    fn evict_oldest(&mut self) -> Option<K> {
        let slot = self.oldest?;
        self.unlink(slot);
        let node = self.slots[slot].take()?;
        self.index.remove(&node.key);
        self.vacant.push(slot);
        Some(node.key)
    }
}

/// Normalized `(artist, title)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackKey {
    pub artist: String,
    pub title: String,
}

impl TrackKey {
    pub fn new(artist: &str, title: &str) -> Self {
        Self {
            artist: utils::normalize(artist),
            title: utils::normalize(title),
        }
    }
}

/// Lyrics cache shared by all requests.
///
/// One mutex guards the index and the recency list; `get` and `put` each
/// hold it for their whole duration.
pub struct LyricsCache {
    inner: Mutex<RecencyCache<TrackKey, Lyrics>>,
}

impl LyricsCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(RecencyCache::new(capacity)),
        }
    }

    pub fn get(&self, artist: &str, title: &str) -> Option<Lyrics> {
        self.lock().get(&TrackKey::new(artist, title)).cloned()
    }

    pub fn put(&self, artist: &str, title: &str, lyrics: Lyrics) {
        let evicted = self.lock().put(TrackKey::new(artist, title), lyrics);
        if let Some(oldest) = evicted {
            info!("Removed oldest lyrics: {} - {}", oldest.artist, oldest.title);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    fn lock(&self) -> MutexGuard<'_, RecencyCache<TrackKey, Lyrics>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
