use std::collections::VecDeque;

/// Fixed-length ring buffer; adding to a full buffer evicts the oldest value.
#[derive(Debug, Clone)]
pub struct CircBuffer<T> {
    storage: VecDeque<T>,
    max_length: usize,
}

impl<T> CircBuffer<T> {
    pub fn new(max_length: usize) -> Self {
        let storage = VecDeque::with_capacity(max_length);
        Self {
            storage,
            max_length,
        }
    }

    pub fn add(&mut self, value: T) -> Option<T> {
        let evicted = if self.storage.len() >= self.max_length {
            self.storage.pop_front()
        } else {
            None
        };
        self.storage.push_back(value);
        evicted
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_length
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.storage.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::CircBuffer;

    #[test]
    fn evicts_oldest() {
        let mut buf = CircBuffer::new(3);
        assert_eq!(buf.add(1), None);
        assert_eq!(buf.add(2), None);
        assert_eq!(buf.add(3), None);
        assert_eq!(buf.add(4), Some(1));
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), [2, 3, 4]);
        assert_eq!(buf.len(), buf.capacity());
    }
}
