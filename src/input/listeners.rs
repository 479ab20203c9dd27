//! Scoped listener set
//!
//! Components subscribe to the event kinds they handle when they are constructed and
//! keep the returned [`Subscription`] handles. Dispatch only reaches a component while
//! its subscription for that kind is live; releasing the handles (or the whole set)
//! detaches the component without touching any of its other state.

/// Event kinds a component can listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Window resize notification
    Resize,
    /// Pointer pressed on the render surface
    PointerDown,
    /// Key pressed while the window has focus
    KeyDown,
    /// Transform handle started or stopped a drag
    DraggingChanged,
    /// Transform handle modified its attached object
    ObjectChange,
}

/// Handle returned by [`ListenerSet::subscribe`], used to cancel that subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: u64,
    kind: ListenerKind,
}

#[derive(Debug, Default)]
pub struct ListenerSet {
    next_id: u64,
    active: Vec<Subscription>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: ListenerKind) -> Subscription {
        let subscription = Subscription {
            id: self.next_id,
            kind,
        };
        self.next_id += 1;
        self.active.push(subscription);
        subscription
    }

    /// Cancel one subscription. Returns false if it was already released.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.active.len();
        self.active.retain(|s| *s != subscription);
        self.active.len() != before
    }

    /// Whether at least one live subscription exists for `kind`
    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.active.iter().any(|s| s.kind == kind)
    }

    /// Release every subscription at once, returning how many were live
    pub fn release_all(&mut self) -> usize {
        let released = self.active.len();
        self.active.clear();
        released
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsubscribe_only_removes_that_handle() {
        let mut set = ListenerSet::new();
        let first = set.subscribe(ListenerKind::KeyDown);
        let second = set.subscribe(ListenerKind::KeyDown);

        assert!(set.unsubscribe(first));
        assert!(set.is_listening(ListenerKind::KeyDown));
        assert!(!set.unsubscribe(first));

        assert!(set.unsubscribe(second));
        assert!(!set.is_listening(ListenerKind::KeyDown));
    }

    #[test]
    fn test_release_all_is_repeatable() {
        let mut set = ListenerSet::new();
        set.subscribe(ListenerKind::PointerDown);
        set.subscribe(ListenerKind::Resize);

        assert_eq!(set.release_all(), 2);
        assert_eq!(set.release_all(), 0);
        assert!(set.is_empty());
    }
}
