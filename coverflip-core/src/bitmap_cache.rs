use std::collections::{HashMap, VecDeque};

use crate::ItemId;

/// How many covers are kept alive at once.
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

#[derive(Debug, thiserror::Error)]
#[error("failed to release cover image: {0}")]
pub struct ReleaseError(pub String);

/// An image owned by the [`BitmapCache`]. Releasing hands back whatever resource backs
/// it (GPU texture, pixel buffer); the default implementation just drops it.
pub trait CoverImage {
    fn size(&self) -> [u32; 2];

    fn release(self) -> Result<(), ReleaseError>
    where
        Self: Sized,
    {
        Ok(())
    }
}
impl CoverImage for image::RgbaImage {
    fn size(&self) -> [u32; 2] {
        [self.width(), self.height()]
    }
}

/// Bounded id → image cache. Eviction is first-in first-out by insertion order; reads
/// never refresh an entry.
pub struct BitmapCache<T: CoverImage> {
    entries: HashMap<ItemId, T>,
    timeline: VecDeque<ItemId>,
    capacity: usize,
}
impl<T: CoverImage> Default for BitmapCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
impl<T: CoverImage> BitmapCache<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity + 1),
            timeline: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn get(&self, id: ItemId) -> Option<&T> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Live ids, oldest insertion first.
    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.timeline.iter().copied()
    }

    /// Renders and inserts `id` if it isn't cached yet. `render` is only called on a miss;
    /// returning `None` from it leaves the cache untouched.
    pub fn ensure(&mut self, id: ItemId, render: impl FnOnce() -> Option<T>) -> Option<&T> {
        if !self.entries.contains_key(&id) {
            let image = render()?;
            self.insert(id, image);
        }
        self.entries.get(&id)
    }

    /// Takes ownership of `image`. If `id` is already cached the new image is released
    /// instead and `false` is returned.
    pub fn insert(&mut self, id: ItemId, image: T) -> bool {
        if self.entries.contains_key(&id) {
            tracing::debug!("Cover for {id} already cached, discarding duplicate");
            release(id, image);
            return false;
        }

        self.entries.insert(id, image);
        self.timeline.push_back(id);

        while self.timeline.len() > self.capacity {
            let Some(oldest) = self.timeline.pop_front() else {
                break;
            };
            if let Some(image) = self.entries.remove(&oldest) {
                tracing::debug!("Evicting cover for {oldest} (cache full)");
                release(oldest, image);
            }
        }

        true
    }

    /// Drops every cached image. Images are specific to a viewport size and display
    /// mode, so this is called whenever either changes.
    pub fn evict_all(&mut self) {
        self.timeline.clear();
        let count = self.entries.len();
        for (id, image) in self.entries.drain() {
            release(id, image);
        }
        if count > 0 {
            tracing::debug!("Evicted all {count} cached covers");
        }
    }
}
impl<T: CoverImage> Drop for BitmapCache<T> {
    fn drop(&mut self) {
        self.evict_all();
    }
}

fn release<T: CoverImage>(id: ItemId, image: T) {
    if let Err(e) = image.release() {
        tracing::warn!("Failed to release cover for {id}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    struct TestImage {
        id: u64,
        released: Rc<RefCell<Vec<u64>>>,
        fail_release: bool,
    }
    impl CoverImage for TestImage {
        fn size(&self) -> [u32; 2] {
            [4, 4]
        }

        fn release(self) -> Result<(), ReleaseError> {
            self.released.borrow_mut().push(self.id);
            if self.fail_release {
                Err(ReleaseError("texture already gone".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn image(id: u64, released: &Rc<RefCell<Vec<u64>>>) -> TestImage {
        TestImage {
            id,
            released: released.clone(),
            fail_release: false,
        }
    }

    #[test]
    fn test_evicts_first_inserted_not_least_recently_used() {
        let released = Rc::new(RefCell::new(Vec::new()));
        let mut cache = BitmapCache::new(8);
        for id in 1..=8 {
            cache.insert(ItemId(id), image(id, &released));
        }

        // Reading the oldest entry must not protect it.
        assert!(cache.get(ItemId(1)).is_some());

        cache.insert(ItemId(9), image(9, &released));
        assert_eq!(cache.len(), 8);
        assert!(!cache.contains(ItemId(1)));
        assert!((2..=9).all(|id| cache.contains(ItemId(id))));
        assert_eq!(*released.borrow(), vec![1]);
        assert_eq!(cache.ids().next(), Some(ItemId(2)));
    }

    #[test]
    fn test_ensure_renders_only_on_miss() {
        let released = Rc::new(RefCell::new(Vec::new()));
        let mut cache = BitmapCache::default();
        let mut renders = 0;

        cache.ensure(ItemId(3), || {
            renders += 1;
            Some(image(3, &released))
        });
        let cached = cache.ensure(ItemId(3), || {
            renders += 1;
            Some(image(3, &released))
        });

        assert!(cached.is_some());
        assert_eq!(renders, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_render_inserts_nothing() {
        let mut cache: BitmapCache<TestImage> = BitmapCache::default();
        assert!(cache.ensure(ItemId(1), || None).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_duplicate_insert_releases_new_image() {
        let released = Rc::new(RefCell::new(Vec::new()));
        let mut cache = BitmapCache::default();
        assert!(cache.insert(ItemId(5), image(5, &released)));
        assert!(!cache.insert(ItemId(5), image(50, &released)));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(ItemId(5)).map(|i| i.id), Some(5));
        assert_eq!(*released.borrow(), vec![50]);
        assert_eq!(cache.ids().count(), 1);
    }

    #[test]
    fn test_evict_all_releases_everything() {
        let released = Rc::new(RefCell::new(Vec::new()));
        let mut cache = BitmapCache::default();
        for id in 1..=3 {
            cache.insert(ItemId(id), image(id, &released));
        }
        cache.evict_all();

        assert!(cache.is_empty());
        assert_eq!(cache.ids().count(), 0);
        let mut released = released.borrow().clone();
        released.sort();
        assert_eq!(released, vec![1, 2, 3]);
    }

    #[test]
    fn test_release_failure_is_not_fatal() {
        let released = Rc::new(RefCell::new(Vec::new()));
        let mut cache = BitmapCache::new(1);
        cache.insert(
            ItemId(1),
            TestImage {
                id: 1,
                released: released.clone(),
                fail_release: true,
            },
        );
        cache.insert(ItemId(2), image(2, &released));

        assert_eq!(cache.len(), 1);
        assert!(cache.contains(ItemId(2)));
        assert_eq!(*released.borrow(), vec![1]);
    }

    #[test]
    fn test_capacity_is_at_least_one() {
        let cache: BitmapCache<image::RgbaImage> = BitmapCache::new(0);
        assert_eq!(cache.capacity(), 1);
    }
}
