//! Per-engine object pools for the hot-path containers (`MatchGroup`
//! lists, scratch hash sets, bit masks). Pooled containers are never
//! shared across engines or threads; each `Engine` owns its own `Pool`
//! instances.

/// A reusable stack of cleared `Vec<T>` buffers.
#[derive(Debug)]
pub struct Pool<T> {
    free: Vec<Vec<T>>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self { free: Vec::new() }
    }
}

impl<T> Pool<T> {
    /// Builds an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a cleared buffer from the pool, allocating a new one if the
    /// pool is empty.
    pub fn take(&mut self) -> Vec<T> {
        self.free.pop().unwrap_or_default()
    }

    /// Returns a buffer to the pool after clearing it.
    pub fn give_back(&mut self, mut buffer: Vec<T>) {
        buffer.clear();
        self.free.push(buffer);
    }
}

/// A buffer borrowed from a `Pool`, returned to it on drop.
pub struct Pooled<'a, T> {
    pool: &'a mut Pool<T>,
    buffer: Option<Vec<T>>,
}

impl<'a, T> Pooled<'a, T> {
    /// Borrows a cleared buffer from `pool`.
    pub fn new(pool: &'a mut Pool<T>) -> Self {
        let buffer = pool.free.pop().unwrap_or_default();
        Self {
            pool,
            buffer: Some(buffer),
        }
    }
}

impl<T> std::ops::Deref for Pooled<'_, T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> {
        self.buffer.as_ref().expect("buffer taken before drop")
    }
}

impl<T> std::ops::DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        self.buffer.as_mut().expect("buffer taken before drop")
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(mut buffer) = self.buffer.take() {
            buffer.clear();
            self.pool.free.push(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Pool, Pooled};

    #[test]
    fn reuses_capacity_across_checkouts() {
        let mut pool: Pool<u32> = Pool::new();
        {
            let mut buf = Pooled::new(&mut pool);
            buf.extend([1, 2, 3]);
        }
        let buf = Pooled::new(&mut pool);
        assert!(buf.is_empty());
    }
}
