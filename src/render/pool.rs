//! Object pool for short-lived entities
//!
//! Spawn/despawn churn is bursty (a pipe every second or so, coins at
//! random). Retired objects go on a capped free list and are handed back out
//! on the next spawn instead of being rebuilt.

/// Free-list cap per pool
pub const POOL_CAPACITY: usize = 50;

/// Reusable free list for one entity type
#[derive(Debug, Clone)]
pub struct ObjectPool<T> {
    free: Vec<T>,
    capacity: usize,
}

impl<T> Default for ObjectPool<T> {
    fn default() -> Self {
        Self::new(POOL_CAPACITY)
    }
}

impl<T> ObjectPool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Take a pooled object, or build a new one with `make` when the pool is empty
    pub fn acquire(&mut self, make: impl FnOnce() -> T) -> T {
        self.free.pop().unwrap_or_else(make)
    }

    /// Return an object. Dropped when the pool is already full.
    pub fn release(&mut self, object: T) -> bool {
        if self.free.len() < self.capacity {
            self.free.push(object);
            true
        } else {
            false
        }
    }

    /// Move every item matching `retire` out of `items` and into the pool.
    ///
    /// Keeps the relative order of the remaining items. Returns how many were retired.
    pub fn reclaim(&mut self, items: &mut Vec<T>, mut retire: impl FnMut(&T) -> bool) -> usize {
        if !items.iter().any(&mut retire) {
            return 0;
        }
        let (retired, kept): (Vec<T>, Vec<T>) = items.drain(..).partition(|item| retire(item));
        *items = kept;
        let count = retired.len();
        for object in retired {
            self.release(object);
        }
        count
    }

    /// Objects waiting for reuse
    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
