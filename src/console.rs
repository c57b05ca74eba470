//! Fixed-size ring buffer of queued diagnostics/output.

const CAPACITY: usize = 16;

/// A queued line of bot output or diagnostic text.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleMessage {
    pub message_type: i32,
    pub text: String,
}

/// A 16-slot ring buffer with FIFO dequeue and oldest-drop on overflow.
///
/// Backed by a fixed array rather than `VecDeque`, matching the bounded
/// ring buffer the original console-message queue uses: a fixed capacity
/// with head/count bookkeeping and shift-based removal rather than an
/// unbounded growable collection.
#[derive(Debug, Clone)]
pub struct ConsoleQueue {
    slots: [Option<ConsoleMessage>; CAPACITY],
    head: usize,
    count: usize,
}

impl Default for ConsoleQueue {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            head: 0,
            count: 0,
        }
    }
}

impl ConsoleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// `BotQueueConsoleMessage`. If full, drops the oldest entry (advancing
    /// `head` and decrementing `count`) before writing the new tail.
    pub fn enqueue(&mut self, message_type: i32, text: impl Into<String>) {
        let mut text = text.into();
        text.truncate(255);

        if self.count == CAPACITY {
            self.head = (self.head + 1) % CAPACITY;
            self.count -= 1;
        }
        let tail = (self.head + self.count) % CAPACITY;
        self.slots[tail] = Some(ConsoleMessage { message_type, text });
        self.count += 1;
    }

    /// `BotNextConsoleMessage`: peeks at the head without removing it.
    pub fn peek(&self) -> Option<&ConsoleMessage> {
        if self.count == 0 {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    /// `BotNextConsoleMessage` combined with removal, used by callers that
    /// want to drain rather than merely observe.
    pub fn dequeue(&mut self) -> Option<ConsoleMessage> {
        if self.count == 0 {
            return None;
        }
        let message = self.slots[self.head].take();
        self.head = (self.head + 1) % CAPACITY;
        self.count -= 1;
        message
    }

    /// `BotRemoveConsoleMessage`: removes the first queued entry whose type
    /// equals `message_type`, shifting subsequent entries one position
    /// earlier in logical (FIFO) order.
    pub fn remove_by_type(&mut self, message_type: i32) -> bool {
        let found = (0..self.count).find(|&offset| {
            let index = (self.head + offset) % CAPACITY;
            self.slots[index]
                .as_ref()
                .map(|m| m.message_type == message_type)
                .unwrap_or(false)
        });

        let Some(found_offset) = found else {
            return false;
        };

        for offset in found_offset..self.count - 1 {
            let from = (self.head + offset + 1) % CAPACITY;
            let to = (self.head + offset) % CAPACITY;
            self.slots[to] = self.slots[from].take();
        }
        let last = (self.head + self.count - 1) % CAPACITY;
        self.slots[last] = None;
        self.count -= 1;
        true
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_is_preserved() {
        let mut queue = ConsoleQueue::new();
        queue.enqueue(1, "a");
        queue.enqueue(2, "b");
        assert_eq!(queue.dequeue().unwrap().text, "a");
        assert_eq!(queue.dequeue().unwrap().text, "b");
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn overflow_drops_oldest_entry() {
        let mut queue = ConsoleQueue::new();
        for i in 0..20 {
            queue.enqueue(i, format!("msg-{i}"));
        }
        assert_eq!(queue.len(), 16);
        assert_eq!(queue.dequeue().unwrap().text, "msg-4");
    }

    #[test]
    fn count_never_exceeds_capacity() {
        let mut queue = ConsoleQueue::new();
        for i in 0..100 {
            queue.enqueue(i, "x");
            assert!(queue.len() <= 16);
        }
    }

    #[test]
    fn remove_by_type_shifts_subsequent_entries() {
        let mut queue = ConsoleQueue::new();
        queue.enqueue(1, "a");
        queue.enqueue(2, "b");
        queue.enqueue(3, "c");
        assert!(queue.remove_by_type(2));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dequeue().unwrap().text, "a");
        assert_eq!(queue.dequeue().unwrap().text, "c");
    }

    #[test]
    fn remove_by_type_returns_false_when_absent() {
        let mut queue = ConsoleQueue::new();
        queue.enqueue(1, "a");
        assert!(!queue.remove_by_type(99));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn remove_works_after_wraparound() {
        let mut queue = ConsoleQueue::new();
        for i in 0..16 {
            queue.enqueue(i, format!("m{i}"));
        }
        queue.dequeue();
        queue.dequeue();
        queue.enqueue(100, "wrapped-a");
        queue.enqueue(101, "wrapped-b");
        assert!(queue.remove_by_type(101));
        let remaining: Vec<i32> = std::iter::from_fn(|| queue.dequeue())
            .map(|m| m.message_type)
            .collect();
        assert!(!remaining.contains(&101));
        assert_eq!(remaining.len(), 13);
    }
}
