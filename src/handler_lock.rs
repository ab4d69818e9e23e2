use std::sync::{Mutex, MutexGuard, PoisonError};

/// The lock guarding a [`Notifier`](crate::notify::Notifier)'s handler lists
/// while registration is still open.
///
/// The protected value is `Some` until the configuration is fixed, and `None`
/// afterwards.
#[repr(transparent)]
pub(crate) struct HandlerLock<T: Send>(Mutex<Option<T>>);

#[repr(transparent)]
pub(crate) struct HandlerLockGuard<'a, T: Send>(MutexGuard<'a, Option<T>>);

impl<T: Send> HandlerLock<T> {
    #[must_use]
    pub(crate) const fn new(value: T) -> Self {
        Self(Mutex::new(Some(value)))
    }

    /// Acquires the lock.
    ///
    /// The protected state is only ever replaced as a whole or appended to, so
    /// a panic while holding the lock cannot leave it half-updated and a
    /// poisoned lock is simply taken over.
    #[inline]
    pub(crate) fn lock(&self) -> HandlerLockGuard<'_, T> {
        HandlerLockGuard(self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl<T: Send> HandlerLockGuard<'_, T> {
    /// The protected value, or `None` once it has been taken.
    #[inline]
    pub(crate) fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    #[inline]
    pub(crate) fn get_mut(&mut self) -> Option<&mut T> {
        self.0.as_mut()
    }

    /// Takes the protected value out, leaving the lock permanently empty.
    #[inline]
    pub(crate) fn take(&mut self) -> Option<T> {
        self.0.take()
    }
}
