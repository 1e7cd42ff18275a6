use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};

/// Fixed-shape scratch-buffer free list.
///
/// Every buffer in a pool has the same width; `rent` pops a free buffer or
/// allocates a fresh one when the list is empty, so correct callers never
/// block and always get distinct storage per outstanding rental. The pool
/// is cheap to clone and safe to share across rayon tasks.
#[derive(Clone)]
pub struct ScratchPool<T: Copy + Default> {
    inner: Arc<PoolInner<T>>,
}

struct PoolInner<T> {
    width: usize,
    free: Mutex<Vec<Box<[T]>>>,
}

impl<T: Copy + Default> ScratchPool<T> {
    /// A pool of `depth` pre-allocated buffers, each `width` items wide.
    pub fn new(width: usize, depth: usize) -> Self {
        let free = (0..depth)
            .map(|_| vec![T::default(); width].into_boxed_slice())
            .collect();
        Self {
            inner: Arc::new(PoolInner {
                width,
                free: Mutex::new(free),
            }),
        }
    }

    pub fn width(&self) -> usize {
        self.inner.width
    }

    /// Buffers currently sitting in the free list.
    pub fn available(&self) -> usize {
        self.inner.free.lock().map(|f| f.len()).unwrap_or(0)
    }

    /// Rents a buffer. Contents are unspecified (stale data from a previous
    /// rental is possible); the guard returns it to the pool on drop, on
    /// every exit path.
    pub fn rent(&self) -> Scratch<T> {
        let buf = self
            .inner
            .free
            .lock()
            .ok()
            .and_then(|mut f| f.pop())
            .unwrap_or_else(|| vec![T::default(); self.inner.width].into_boxed_slice());

        Scratch {
            buf: Some(buf),
            pool: Arc::clone(&self.inner),
        }
    }
}

/// RAII rental handle; derefs to the underlying slice.
pub struct Scratch<T: Copy + Default> {
    buf: Option<Box<[T]>>,
    pool: Arc<PoolInner<T>>,
}

impl<T: Copy + Default> Deref for Scratch<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.buf.as_deref().unwrap_or(&[])
    }
}

impl<T: Copy + Default> DerefMut for Scratch<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.buf.as_deref_mut().unwrap_or(&mut [])
    }
}

impl<T: Copy + Default> Drop for Scratch<T> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            if let Ok(mut free) = self.pool.free.lock() {
                free.push(buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rent_and_return_on_drop() {
        let pool: ScratchPool<u8> = ScratchPool::new(8, 2);
        assert_eq!(pool.available(), 2);
        {
            let _a = pool.rent();
            let _b = pool.rent();
            assert_eq!(pool.available(), 0);
        }
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn test_grows_past_depth() {
        let pool: ScratchPool<bool> = ScratchPool::new(4, 1);
        let a = pool.rent();
        let b = pool.rent();
        assert_eq!(a.len(), 4);
        assert_eq!(b.len(), 4);
        drop(a);
        drop(b);
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn test_outstanding_rentals_are_distinct() {
        let pool: ScratchPool<u8> = ScratchPool::new(3, 2);
        let mut a = pool.rent();
        let mut b = pool.rent();
        a[0] = 1;
        b[0] = 2;
        assert_eq!(a[0], 1);
        assert_eq!(b[0], 2);
    }

    #[test]
    fn test_returned_on_panic_path() {
        let pool: ScratchPool<u8> = ScratchPool::new(2, 1);
        let result = std::panic::catch_unwind(|| {
            let _guard = pool.rent();
            panic!("boom");
        });
        assert!(result.is_err());
        assert_eq!(pool.available(), 1);
    }
}
