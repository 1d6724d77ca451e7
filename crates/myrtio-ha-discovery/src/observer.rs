//! Change notification
//!
//! Entities notify observers after a state change has been published
//! successfully. Any `Fn(&E)` closure is an observer, so callers can pass a
//! plain function, a closure over an atomic, or their own type.

use heapless::Vec;

use crate::config::MAX_OBSERVERS;
use crate::error::HaError;

/// Receives change events of type `E`
pub trait Observer<E> {
    fn notify(&self, event: &E);
}

impl<E, F> Observer<E> for F
where
    F: Fn(&E),
{
    fn notify(&self, event: &E) {
        self(event);
    }
}

/// Bounded list of observers
pub struct Observers<'a, E> {
    list: Vec<&'a dyn Observer<E>, MAX_OBSERVERS>,
}

impl<'a, E> Observers<'a, E> {
    pub const fn new() -> Self {
        Self { list: Vec::new() }
    }

    /// Register an observer
    pub fn add(&mut self, observer: &'a dyn Observer<E>) -> Result<(), HaError> {
        self.list
            .push(observer)
            .map_err(|_| HaError::MaxObserversReached)
    }

    /// Notify every registered observer, in registration order
    pub fn notify(&self, event: &E) {
        for observer in &self.list {
            observer.notify(event);
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<E> Default for Observers<'_, E> {
    fn default() -> Self {
        Self::new()
    }
}
