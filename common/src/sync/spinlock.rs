use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, Ordering};

/// Mutual exclusion for `no_std` code that owns a single shared resource.
///
/// Besides plain spinning, the lock can be acquired with a caller-supplied
/// relax hook ([`SpinLock::lock_relaxed`]) so that a contended caller can
/// sleep between attempts instead of burning the core. Not fair, not
/// reentrant.
pub struct SpinLock<T> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
}

// SAFETY: access to `data` is serialized by `locked`.
unsafe impl<T: Send> Sync for SpinLock<T> {}
unsafe impl<T: Send> Send for SpinLock<T> {}

impl<T> SpinLock<T> {
    pub const fn new(data: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(data),
        }
    }

    /// Make a single acquisition attempt.
    pub fn try_lock(&self) -> Option<SpinLockGuard<'_, T>> {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| SpinLockGuard { lock: self })
    }

    /// Acquire the lock, calling `relax` after every failed attempt.
    ///
    /// ```
    /// use common::sync::SpinLock;
    ///
    /// let lock = SpinLock::new(0u32);
    /// *lock.lock_relaxed(|| core::hint::spin_loop()) += 1;
    /// assert_eq!(*lock.lock(), 1);
    /// ```
    pub fn lock_relaxed(&self, mut relax: impl FnMut()) -> SpinLockGuard<'_, T> {
        loop {
            if let Some(guard) = self.try_lock() {
                return guard;
            }
            // Wait for the holder to release before retrying the CAS.
            while self.locked.load(Ordering::Relaxed) {
                relax();
            }
        }
    }

    /// Acquire the lock, spinning until it is available.
    pub fn lock(&self) -> SpinLockGuard<'_, T> {
        self.lock_relaxed(core::hint::spin_loop)
    }

    /// Consume the lock and return the protected value.
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

/// Exclusive access to the data behind a [`SpinLock`]; released on drop.
pub struct SpinLockGuard<'a, T> {
    lock: &'a SpinLock<T>,
}

impl<T> core::ops::Deref for SpinLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        // SAFETY: the guard proves the lock is held.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> core::ops::DerefMut for SpinLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: the guard proves the lock is held.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for SpinLockGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}
