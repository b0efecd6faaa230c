use std::{ops, thread::ThreadId};

/// Guard a non-send value by recording its originating thread.
///
/// OpenGL object names are only meaningful on the thread owning the context. Wrapping them lets
/// the application state move between the tick and render threads, while any access from a
/// foreign thread panics instead of silently talking to the wrong context.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct ThreadGuard<T> {
    value: T,
    thread_id: ThreadId,
}

// # Safety
// Every access to the inner value goes through `Deref`/`get`, which check the calling thread.
unsafe impl<T> Send for ThreadGuard<T> {}
unsafe impl<T> Sync for ThreadGuard<T> {}

impl<T> ThreadGuard<T> {
    pub fn new(value: T) -> Self {
        let thread_id = std::thread::current().id();
        Self { thread_id, value }
    }

    pub fn is_current_thread(&self) -> bool {
        self.thread_id == std::thread::current().id()
    }

    pub fn get(&self) -> Option<&T> {
        self.is_current_thread().then_some(&self.value)
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.is_current_thread().then_some(&mut self.value)
    }

    #[inline(always)]
    fn assert_current_thread_ok(&self) {
        if !self.is_current_thread() {
            panic!("Tried to access value from the wrong thread");
        }
    }
}

impl<T> ops::Deref for ThreadGuard<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.assert_current_thread_ok();
        &self.value
    }
}

impl<T> ops::DerefMut for ThreadGuard<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.assert_current_thread_ok();
        &mut self.value
    }
}

#[cfg(test)]
mod tests {
    use super::ThreadGuard;

    #[test]
    fn accessible_from_owner_thread() {
        let mut guard = ThreadGuard::new(3);
        assert_eq!(guard.get(), Some(&3));
        *guard += 1;
        assert_eq!(*guard, 4);
    }

    #[test]
    fn foreign_thread_gets_nothing() {
        let guard = ThreadGuard::new(String::from("gl"));
        let seen = std::thread::scope(|s| s.spawn(|| guard.get().is_some()).join().unwrap());
        assert!(!seen);
    }
}
