/// A free-list of reusable objects.
///
/// Objects handed back with [`ObjectPool::release`] are returned by later calls to
/// [`ObjectPool::get`] instead of allocating new ones. The pool is an ordinary owned value:
/// each owner (e.g. a manifold set) keeps its own.
#[derive(Clone, Debug)]
pub struct ObjectPool<T> {
    free: Vec<T>,
}

impl<T> Default for ObjectPool<T> {
    fn default() -> Self {
        Self { free: Vec::new() }
    }
}

impl<T: Default> ObjectPool<T> {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes an object out of the pool, or creates a default one if the pool is empty.
    ///
    /// The returned object is in whatever state it was released in: callers are expected
    /// to reset it.
    pub fn get(&mut self) -> T {
        self.free.pop().unwrap_or_default()
    }

    /// Gives an object back to the pool.
    pub fn release(&mut self, obj: T) {
        self.free.push(obj);
    }

    /// The number of objects currently available for reuse.
    pub fn len(&self) -> usize {
        self.free.len()
    }

    /// Is this pool empty?
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }
}
