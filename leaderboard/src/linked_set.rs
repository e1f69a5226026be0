multiversx_sc::imports!();

use core::marker::PhantomData;

use common_errors::ERROR_SET_NOT_EMPTY;
use multiversx_sc::{
    api::{ErrorApiImpl, StorageMapperApi},
    storage::{mappers::StorageMapper, StorageKey},
};

const LEN_SUFFIX: &[u8] = b".len";
const FRONT_SUFFIX: &[u8] = b".front";
const BACK_SUFFIX: &[u8] = b".back";
const MEMBER_SUFFIX: &[u8] = b".member";
const PREVIOUS_SUFFIX: &[u8] = b".prev";
const NEXT_SUFFIX: &[u8] = b".next";

/// Set that remembers insertion order, with O(1) removal from anywhere in the sequence.
///
/// Links are stored as `Option<K>`, which keeps zero-valued elements distinguishable from an
/// absent link.
///
/// A set holding elements can only be discarded through [`LinkedSet::drop_remaining`];
/// [`LinkedSet::destroy_empty`] refuses to.
pub struct LinkedSet<SA, K>
where
    SA: StorageMapperApi,
    K: TopEncode + TopDecode + NestedEncode + NestedDecode + Clone + 'static,
{
    base_key: StorageKey<SA>,
    _phantom_item: PhantomData<K>,
}

impl<SA, K> StorageMapper<SA> for LinkedSet<SA, K>
where
    SA: StorageMapperApi,
    K: TopEncode + TopDecode + NestedEncode + NestedDecode + Clone + 'static,
{
    fn new(base_key: StorageKey<SA>) -> Self {
        LinkedSet {
            base_key,
            _phantom_item: PhantomData,
        }
    }
}

impl<SA, K> LinkedSet<SA, K>
where
    SA: StorageMapperApi,
    K: TopEncode + TopDecode + NestedEncode + NestedDecode + Clone + 'static,
{
    fn len_mapper(&self) -> SingleValueMapper<SA, usize> {
        let mut key = self.base_key.clone();
        key.append_bytes(LEN_SUFFIX);
        SingleValueMapper::new(key)
    }

    fn end(&self, suffix: &[u8]) -> SingleValueMapper<SA, Option<K>> {
        let mut key = self.base_key.clone();
        key.append_bytes(suffix);
        SingleValueMapper::new(key)
    }

    fn member(&self, item: &K) -> SingleValueMapper<SA, bool> {
        let mut key = self.base_key.clone();
        key.append_bytes(MEMBER_SUFFIX);
        key.append_item(item);
        SingleValueMapper::new(key)
    }

    fn link(&self, suffix: &[u8], item: &K) -> SingleValueMapper<SA, Option<K>> {
        let mut key = self.base_key.clone();
        key.append_bytes(suffix);
        key.append_item(item);
        SingleValueMapper::new(key)
    }

    pub fn len(&self) -> usize {
        self.len_mapper().get()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, item: &K) -> bool {
        !self.member(item).is_empty()
    }

    pub fn front(&self) -> Option<K> {
        self.end(FRONT_SUFFIX).get()
    }

    pub fn back(&self) -> Option<K> {
        self.end(BACK_SUFFIX).get()
    }

    pub fn next(&self, item: &K) -> Option<K> {
        self.link(NEXT_SUFFIX, item).get()
    }

    pub fn previous(&self, item: &K) -> Option<K> {
        self.link(PREVIOUS_SUFFIX, item).get()
    }

    /// Appends `item`. Returns `false` if it was already present.
    pub fn push_back(&mut self, item: K) -> bool {
        if self.contains(&item) {
            return false;
        }

        match self.back() {
            Some(back) => {
                self.link(NEXT_SUFFIX, &back).set(Some(item.clone()));
                self.link(PREVIOUS_SUFFIX, &item).set(Some(back));
            },
            None => self.end(FRONT_SUFFIX).set(Some(item.clone())),
        }
        self.end(BACK_SUFFIX).set(Some(item.clone()));
        self.attach(&item);

        true
    }

    /// Prepends `item`. Returns `false` if it was already present.
    pub fn push_front(&mut self, item: K) -> bool {
        if self.contains(&item) {
            return false;
        }

        match self.front() {
            Some(front) => {
                self.link(PREVIOUS_SUFFIX, &front).set(Some(item.clone()));
                self.link(NEXT_SUFFIX, &item).set(Some(front));
            },
            None => self.end(BACK_SUFFIX).set(Some(item.clone())),
        }
        self.end(FRONT_SUFFIX).set(Some(item.clone()));
        self.attach(&item);

        true
    }

    /// Unlinks `item`. Returns `false` if it was not present.
    pub fn remove(&mut self, item: &K) -> bool {
        if !self.contains(item) {
            return false;
        }

        let previous = self.previous(item);
        let next = self.next(item);

        match &previous {
            Some(previous) => self.link(NEXT_SUFFIX, previous).set(&next),
            None => self.end(FRONT_SUFFIX).set(&next),
        }
        match &next {
            Some(next) => self.link(PREVIOUS_SUFFIX, next).set(&previous),
            None => self.end(BACK_SUFFIX).set(&previous),
        }

        self.link(PREVIOUS_SUFFIX, item).clear();
        self.link(NEXT_SUFFIX, item).clear();
        self.member(item).clear();
        self.len_mapper().update(|len| *len -= 1);

        true
    }

    pub fn pop_front(&mut self) -> Option<K> {
        let front = self.front()?;
        self.remove(&front);
        Some(front)
    }

    pub fn pop_back(&mut self) -> Option<K> {
        let back = self.back()?;
        self.remove(&back);
        Some(back)
    }

    pub fn iter(&self) -> Iter<'_, SA, K> {
        Iter {
            set: self,
            current: self.front(),
        }
    }

    /// Releases an empty set. Fails if elements remain.
    pub fn destroy_empty(self) {
        if !self.is_empty() {
            SA::error_api_impl().signal_error(ERROR_SET_NOT_EMPTY);
        }

        self.len_mapper().clear();
    }

    /// Removes every element, then releases the set.
    pub fn drop_remaining(mut self) {
        while self.pop_front().is_some() {}

        self.len_mapper().clear();
    }

    fn attach(&self, item: &K) {
        self.member(item).set(true);
        self.len_mapper().update(|len| *len += 1);
    }
}

/// Front-to-back iterator over a [`LinkedSet`].
pub struct Iter<'a, SA, K>
where
    SA: StorageMapperApi,
    K: TopEncode + TopDecode + NestedEncode + NestedDecode + Clone + 'static,
{
    set: &'a LinkedSet<SA, K>,
    current: Option<K>,
}

impl<SA, K> Iterator for Iter<'_, SA, K>
where
    SA: StorageMapperApi,
    K: TopEncode + TopDecode + NestedEncode + NestedDecode + Clone + 'static,
{
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let current = self.current.take()?;
        self.current = self.set.next(&current);
        Some(current)
    }
}
