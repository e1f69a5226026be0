multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use core::marker::PhantomData;

use common_errors::{ERROR_CAPACITY_EXCEEDED, ERROR_DUPLICATE_KEY, ERROR_LEAF_NOT_FOUND};
use multiversx_sc::{
    api::{ErrorApiImpl, StorageMapperApi},
    storage::{
        mappers::{StorageClearable, StorageMapper},
        StorageKey,
    },
};

/// Child pointers at or below this value are internal node indices, above it encoded leaves.
pub const PARTITION_INDEX: u64 = 1 << 63;
/// Sentinel leaf index returned when there is no such leaf.
pub const NONE: u64 = PARTITION_INDEX;
const MAX_LEAF_INDEX: u64 = PARTITION_INDEX - 1;

const ROOT_SUFFIX: &[u8] = b".root";
const LEN_SUFFIX: &[u8] = b".len";
const MIN_LEAF_SUFFIX: &[u8] = b".min";
const MAX_LEAF_SUFFIX: &[u8] = b".max";
const NEXT_LEAF_SUFFIX: &[u8] = b".next_leaf";
const NEXT_NODE_SUFFIX: &[u8] = b".next_node";
const LEAF_SUFFIX: &[u8] = b".leaf";
const VALUE_SUFFIX: &[u8] = b".value";
const NODE_SUFFIX: &[u8] = b".node";

#[derive(TopEncode, TopDecode, Clone, Copy, PartialEq, Debug)]
pub struct InternalNode {
    pub mask: u64,
    pub left: u64,
    pub right: u64,
    pub parent: u64,
}

#[derive(TopEncode, TopDecode, Clone, Copy, PartialEq, Debug)]
pub struct LeafNode {
    pub key: u64,
    pub parent: u64,
}

/// Ordered map from `u64` keys to `V`, stored as a crit-bit trie.
///
/// Leaves are addressed by a stable index handed out on insert. Internal nodes branch on the
/// highest bit in which the keys of their two subtrees differ, so an in-order walk yields keys
/// in ascending order and depth never exceeds 64.
pub struct CritbitTree<SA, V>
where
    SA: StorageMapperApi,
    V: TopEncode + TopDecode + 'static,
{
    base_key: StorageKey<SA>,
    _phantom_value: PhantomData<V>,
}

impl<SA, V> StorageMapper<SA> for CritbitTree<SA, V>
where
    SA: StorageMapperApi,
    V: TopEncode + TopDecode + 'static,
{
    fn new(base_key: StorageKey<SA>) -> Self {
        CritbitTree {
            base_key,
            _phantom_value: PhantomData,
        }
    }
}

impl<SA, V> StorageClearable for CritbitTree<SA, V>
where
    SA: StorageMapperApi,
    V: TopEncode + TopDecode + 'static,
{
    fn clear(&mut self) {
        while !self.is_empty() {
            let (_, index) = self.min();
            self.remove_by_index(index);
        }

        self.header(ROOT_SUFFIX).clear();
        self.header(LEN_SUFFIX).clear();
        self.header(MIN_LEAF_SUFFIX).clear();
        self.header(MAX_LEAF_SUFFIX).clear();
        self.header(NEXT_LEAF_SUFFIX).clear();
        self.header(NEXT_NODE_SUFFIX).clear();
    }
}

impl<SA, V> CritbitTree<SA, V>
where
    SA: StorageMapperApi,
    V: TopEncode + TopDecode + 'static,
{
    fn header(&self, suffix: &[u8]) -> SingleValueMapper<SA, u64> {
        let mut key = self.base_key.clone();
        key.append_bytes(suffix);
        SingleValueMapper::new(key)
    }

    fn leaf(&self, index: u64) -> SingleValueMapper<SA, LeafNode> {
        let mut key = self.base_key.clone();
        key.append_bytes(LEAF_SUFFIX);
        key.append_item(&index);
        SingleValueMapper::new(key)
    }

    fn value(&self, index: u64) -> SingleValueMapper<SA, V> {
        let mut key = self.base_key.clone();
        key.append_bytes(VALUE_SUFFIX);
        key.append_item(&index);
        SingleValueMapper::new(key)
    }

    fn node(&self, index: u64) -> SingleValueMapper<SA, InternalNode> {
        let mut key = self.base_key.clone();
        key.append_bytes(NODE_SUFFIX);
        key.append_item(&index);
        SingleValueMapper::new(key)
    }

    // Pointer headers are stored XOR `NONE`, so an absent header reads as `NONE`.
    fn pointer(&self, suffix: &[u8]) -> u64 {
        self.header(suffix).get() ^ NONE
    }

    fn set_pointer(&self, suffix: &[u8], pointer: u64) {
        self.header(suffix).set(pointer ^ NONE);
    }

    fn root(&self) -> u64 {
        self.pointer(ROOT_SUFFIX)
    }

    fn min_leaf(&self) -> u64 {
        self.pointer(MIN_LEAF_SUFFIX)
    }

    fn max_leaf(&self) -> u64 {
        self.pointer(MAX_LEAF_SUFFIX)
    }

    pub fn len(&self) -> u64 {
        self.header(LEN_SUFFIX).get()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds `key` and returns the index of its leaf.
    pub fn insert(&mut self, key: u64, value: V) -> u64 {
        if self.find(key).is_some() {
            SA::error_api_impl().signal_error(ERROR_DUPLICATE_KEY);
        }

        let next_leaf = self.header(NEXT_LEAF_SUFFIX);
        let leaf_index = next_leaf.get();
        if leaf_index >= MAX_LEAF_INDEX {
            SA::error_api_impl().signal_error(ERROR_CAPACITY_EXCEEDED);
        }
        next_leaf.set(leaf_index + 1);
        self.value(leaf_index).set(value);
        self.header(LEN_SUFFIX).update(|len| *len += 1);

        let closest = self.find_closest(key);
        if closest == NONE {
            self.leaf(leaf_index).set(LeafNode {
                key,
                parent: PARTITION_INDEX,
            });
            self.set_pointer(ROOT_SUFFIX, encode_leaf(leaf_index));
            self.set_pointer(MIN_LEAF_SUFFIX, leaf_index);
            self.set_pointer(MAX_LEAF_SUFFIX, leaf_index);
            return leaf_index;
        }

        let closest_key = self.leaf(closest).get().key;
        let mask = critical_bit(key, closest_key);

        let next_node = self.header(NEXT_NODE_SUFFIX);
        let node_index = next_node.get();
        next_node.set(node_index + 1);

        // descend while the existing split bits are more significant than the new one
        let mut parent = PARTITION_INDEX;
        let mut current = self.root();
        while !is_leaf(current) {
            let node = self.node(current).get();
            if node.mask < mask {
                break;
            }
            parent = current;
            current = if key & node.mask == 0 {
                node.left
            } else {
                node.right
            };
        }

        let new_leaf = encode_leaf(leaf_index);
        let (left, right) = if key & mask == 0 {
            (new_leaf, current)
        } else {
            (current, new_leaf)
        };
        self.node(node_index).set(InternalNode {
            mask,
            left,
            right,
            parent,
        });
        self.leaf(leaf_index).set(LeafNode {
            key,
            parent: node_index,
        });
        self.set_parent(current, node_index);

        if parent == PARTITION_INDEX {
            self.set_pointer(ROOT_SUFFIX, node_index);
        } else {
            self.replace_child(parent, current, node_index);
        }

        if key < self.leaf(self.min_leaf()).get().key {
            self.set_pointer(MIN_LEAF_SUFFIX, leaf_index);
        }
        if key > self.leaf(self.max_leaf()).get().key {
            self.set_pointer(MAX_LEAF_SUFFIX, leaf_index);
        }

        leaf_index
    }

    pub fn find(&self, key: u64) -> Option<u64> {
        let closest = self.find_closest(key);
        if closest != NONE && self.leaf(closest).get().key == key {
            Some(closest)
        } else {
            None
        }
    }

    pub fn remove_by_key(&mut self, key: u64) -> V {
        let index = self.require_leaf(key);
        self.remove_by_index(index)
    }

    /// Removes the leaf at `index`, splicing its parent out of the trie. Returns its value.
    pub fn remove_by_index(&mut self, index: u64) -> V {
        let leaf_mapper = self.leaf(index);
        if leaf_mapper.is_empty() {
            SA::error_api_impl().signal_error(ERROR_LEAF_NOT_FOUND);
        }
        let leaf = leaf_mapper.get();

        if leaf.parent == PARTITION_INDEX {
            self.header(ROOT_SUFFIX).clear();
            self.header(MIN_LEAF_SUFFIX).clear();
            self.header(MAX_LEAF_SUFFIX).clear();
        } else {
            // neighbours are resolved before either cached extreme is rewritten
            let new_min = (self.min_leaf() == index).then(|| self.next(leaf.key).1);
            let new_max = (self.max_leaf() == index).then(|| self.previous(leaf.key).1);
            if let Some(next) = new_min {
                self.set_pointer(MIN_LEAF_SUFFIX, next);
            }
            if let Some(previous) = new_max {
                self.set_pointer(MAX_LEAF_SUFFIX, previous);
            }

            let parent = self.node(leaf.parent).get();
            let sibling = if parent.left == encode_leaf(index) {
                parent.right
            } else {
                parent.left
            };

            self.set_parent(sibling, parent.parent);
            if parent.parent == PARTITION_INDEX {
                self.set_pointer(ROOT_SUFFIX, sibling);
            } else {
                self.replace_child(parent.parent, leaf.parent, sibling);
            }
            self.node(leaf.parent).clear();
        }

        self.header(LEN_SUFFIX).update(|len| *len -= 1);
        leaf_mapper.clear();

        let value_mapper = self.value(index);
        let value = value_mapper.get();
        value_mapper.clear();
        value
    }

    /// `(key, index)` of the smallest key, `(0, NONE)` when empty.
    pub fn min(&self) -> (u64, u64) {
        self.leaf_entry(self.min_leaf())
    }

    /// `(key, index)` of the largest key, `(0, NONE)` when empty.
    pub fn max(&self) -> (u64, u64) {
        self.leaf_entry(self.max_leaf())
    }

    /// Predecessor of `key`, which must be present.
    pub fn previous(&self, key: u64) -> (u64, u64) {
        let index = self.require_leaf(key);
        if index == self.min_leaf() {
            return (0, NONE);
        }

        let mut current = encode_leaf(index);
        let mut parent = self.leaf(index).get().parent;
        loop {
            let node = self.node(parent).get();
            if node.left == current {
                current = parent;
                parent = node.parent;
            } else {
                current = node.left;
                break;
            }
        }

        while !is_leaf(current) {
            current = self.node(current).get().right;
        }

        self.leaf_entry(decode_leaf(current))
    }

    /// Successor of `key`, which must be present.
    pub fn next(&self, key: u64) -> (u64, u64) {
        let index = self.require_leaf(key);
        if index == self.max_leaf() {
            return (0, NONE);
        }

        let mut current = encode_leaf(index);
        let mut parent = self.leaf(index).get().parent;
        loop {
            let node = self.node(parent).get();
            if node.right == current {
                current = parent;
                parent = node.parent;
            } else {
                current = node.right;
                break;
            }
        }

        while !is_leaf(current) {
            current = self.node(current).get().left;
        }

        self.leaf_entry(decode_leaf(current))
    }

    pub fn borrow(&self, index: u64) -> V {
        self.require_index(index);
        self.value(index).get()
    }

    pub fn borrow_mut<R, F: FnOnce(&mut V) -> R>(&mut self, index: u64, f: F) -> R {
        self.require_index(index);
        self.value(index).update(f)
    }

    fn leaf_entry(&self, index: u64) -> (u64, u64) {
        if index == NONE {
            return (0, NONE);
        }

        (self.leaf(index).get().key, index)
    }

    /// Leaf whose key shares the longest prefix with `key`, or `NONE` when empty.
    fn find_closest(&self, key: u64) -> u64 {
        let mut current = self.root();
        if current == NONE {
            return NONE;
        }

        while !is_leaf(current) {
            let node = self.node(current).get();
            current = if key & node.mask == 0 {
                node.left
            } else {
                node.right
            };
        }

        decode_leaf(current)
    }

    fn require_leaf(&self, key: u64) -> u64 {
        match self.find(key) {
            Some(index) => index,
            None => SA::error_api_impl().signal_error(ERROR_LEAF_NOT_FOUND),
        }
    }

    fn require_index(&self, index: u64) {
        if self.leaf(index).is_empty() {
            SA::error_api_impl().signal_error(ERROR_LEAF_NOT_FOUND);
        }
    }

    fn set_parent(&self, pointer: u64, parent: u64) {
        if is_leaf(pointer) {
            self.leaf(decode_leaf(pointer))
                .update(|leaf| leaf.parent = parent);
        } else {
            self.node(pointer).update(|node| node.parent = parent);
        }
    }

    fn replace_child(&self, node_index: u64, old_child: u64, new_child: u64) {
        self.node(node_index).update(|node| {
            if node.left == old_child {
                node.left = new_child;
            } else {
                node.right = new_child;
            }
        });
    }
}

fn is_leaf(pointer: u64) -> bool {
    pointer > PARTITION_INDEX
}

fn encode_leaf(index: u64) -> u64 {
    u64::MAX - index
}

fn decode_leaf(pointer: u64) -> u64 {
    u64::MAX - pointer
}

/// Highest bit in which `a` and `b` differ, as a mask. `a` and `b` must be distinct.
fn critical_bit(a: u64, b: u64) -> u64 {
    // widened to u128 for 64 bits of headroom; only the low 64 bits are meaningful
    let diff = (a ^ b) as u128;
    1u64 << (127 - diff.leading_zeros())
}
