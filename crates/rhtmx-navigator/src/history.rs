//! Navigation history surface
//!
//! The router never owns the history it navigates; it talks to it through
//! [`History`]. Host environments plug in their own surface (a browser
//! bridge, a test double), and [`MemoryHistory`] serves hosts without one.
//!
//! Only traversal (`back`, `forward`, `go`) notifies listeners. `push` and
//! `replace` are silent, the caller resolves after mutating.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::path::resolve_url;

/// Callback invoked with the new location after a traversal
pub type Listener = Arc<dyn Fn(&str) + Send + Sync>;

/// Identifies a subscription so that exactly that listener can be removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Shared navigation history
pub trait History: Send + Sync {
    /// Current location (pathname plus optional `?query`)
    fn location(&self) -> String;

    /// Adds a new entry after the current one, dropping any forward entries
    ///
    /// A relative `url` (`?page=2`, `Jane`) is resolved against the current
    /// entry, see [`resolve_url`].
    fn push(&self, url: &str);

    /// Overwrites the current entry, resolving `url` like [`History::push`]
    fn replace(&self, url: &str);

    fn subscribe(&self, listener: Listener) -> ListenerId;

    /// Returns `false` when `id` was not subscribed (or already removed)
    fn unsubscribe(&self, id: ListenerId) -> bool;
}

/// In-memory history stack
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::history::{History, MemoryHistory};
///
/// let history = MemoryHistory::new("/");
/// history.push("/hello/John");
/// history.replace("/hello/Jane");
/// assert_eq!(history.len(), 2);
///
/// history.back();
/// assert_eq!(history.location(), "/");
/// ```
pub struct MemoryHistory {
    state: Mutex<Stack>,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_id: AtomicU64,
}

#[derive(Debug)]
struct Stack {
    entries: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(Stack {
                entries: vec![initial.into()],
                index: 0,
            }),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn back(&self) -> bool {
        self.go(-1)
    }

    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Moves `delta` entries through the stack and notifies listeners
    ///
    /// Out-of-range moves (and `0`) do nothing and return `false`.
    pub fn go(&self, delta: isize) -> bool {
        let location = {
            let mut stack = self.stack();
            let target = match stack.index.checked_add_signed(delta) {
                Some(target) if delta != 0 && target < stack.entries.len() => target,
                _ => return false,
            };
            stack.index = target;
            stack.entries[target].clone()
        };

        tracing::trace!(delta, location = %location, "history traversal");
        self.notify(&location);
        true
    }

    /// Number of entries in the stack
    pub fn len(&self) -> usize {
        self.stack().entries.len()
    }

    /// Always `false`: the stack starts with one entry and never shrinks below it
    pub fn is_empty(&self) -> bool {
        self.stack().entries.is_empty()
    }

    /// Position of the current entry
    pub fn index(&self) -> usize {
        self.stack().index
    }

    pub fn listener_count(&self) -> usize {
        self.listeners().len()
    }

    fn stack(&self) -> std::sync::MutexGuard<'_, Stack> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(&self) -> std::sync::MutexGuard<'_, Vec<(ListenerId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Calls every listener with no lock held, so listeners may navigate
    fn notify(&self, location: &str) {
        let snapshot: Vec<Listener> = self
            .listeners()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(location);
        }
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        let stack = self.stack();
        stack.entries[stack.index].clone()
    }

    fn push(&self, url: &str) {
        let mut stack = self.stack();
        let next = stack.index + 1;
        let resolved = resolve_url(&stack.entries[stack.index], url);
        stack.entries.truncate(next);
        stack.entries.push(resolved);
        stack.index = next;
    }

    fn replace(&self, url: &str) {
        let mut stack = self.stack();
        let index = stack.index;
        stack.entries[index] = resolve_url(&stack.entries[index], url);
    }

    fn subscribe(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stack = self.stack();
        f.debug_struct("MemoryHistory")
            .field("entries", &stack.entries)
            .field("index", &stack.index)
            .field("listeners", &self.listeners().len())
            .finish()
    }
}
