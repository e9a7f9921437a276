use std::fmt;

/// Notifications emitted by the look controls. None carries a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlEvent {
    /// The pointer lock was acquired by the bound element.
    Lock,
    /// The bound element no longer holds the pointer lock.
    Unlock,
    /// The camera orientation changed in response to pointer motion.
    Change,
}

/// Handle returned by [`Notifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type Callback = Box<dyn FnMut(ControlEvent)>;

/// Fan-out of control events to registered callbacks, plus a pending log
/// for consumers that poll once per frame.
#[derive(Default)]
pub struct Notifier {
    subscribers: Vec<(SubscriptionId, Callback)>,
    log: Vec<ControlEvent>,
    next_id: u32,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(ControlEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn emit(&mut self, event: ControlEvent) {
        self.log.push(event);
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }

    /// Read-only access to events not yet drained.
    pub fn events(&self) -> &[ControlEvent] {
        &self.log
    }

    /// Drain and return pending events.
    pub fn drain_events(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.log)
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscribers.len())
            .field("log", &self.log)
            .finish()
    }
}
