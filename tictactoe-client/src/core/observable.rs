//! Observable State Containers
//!
//! Process-wide values that many observers read but only one component
//! writes. Built on `tokio::sync::watch`: a write replaces the value and
//! wakes every subscriber in one step, so an observer sees either the old
//! value or the new one, never a half-applied update.
//!
//! The owning component keeps the [`Observable`] private and hands out
//! [`StateReader`]s. Readers can snapshot and await changes but have no
//! write surface.

use tokio::sync::watch;

/// Writable side of a state container.
#[derive(Debug)]
pub struct Observable<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> Observable<T> {
    /// Create a container holding `initial`.
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Replace the value and notify subscribers.
    ///
    /// Succeeds even when nobody is subscribed.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Modify the value in place and notify subscribers.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.tx.send_modify(f);
    }

    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Hand out a read-only view.
    pub fn reader(&self) -> StateReader<T> {
        StateReader {
            rx: self.tx.subscribe(),
        }
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Read-only side of a state container.
#[derive(Debug, Clone)]
pub struct StateReader<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> StateReader<T> {
    /// Clone of the current value.
    pub fn snapshot(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Wait for the next write and return the new value.
    ///
    /// Returns `None` once the owning container has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Raw receiver, for callers that want to drive `watch` directly
    /// (e.g. inside `tokio::select!`).
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.rx.clone()
    }
}

// =============================================================================
// TESTS
// =============================================================================
