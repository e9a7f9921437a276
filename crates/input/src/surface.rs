use std::collections::VecDeque;

/// Identifies an element that can hold the pointer lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// Identifies a registered listener on a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u32);

/// Named event channels scoped to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    PointerMove,
    PointerLockChange,
    PointerLockError,
}

impl Channel {
    pub const ALL: [Channel; 3] = [
        Channel::PointerMove,
        Channel::PointerLockChange,
        Channel::PointerLockError,
    ];
}

/// Raw relative pointer motion, with the vendor-prefixed variants some
/// platforms report instead of the standard fields.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerMove {
    pub movement_x: Option<f32>,
    pub movement_y: Option<f32>,
    pub moz_movement_x: Option<f32>,
    pub moz_movement_y: Option<f32>,
    pub webkit_movement_x: Option<f32>,
    pub webkit_movement_y: Option<f32>,
}

impl PointerMove {
    /// Standard-field motion.
    pub fn new(dx: f32, dy: f32) -> Self {
        Self {
            movement_x: Some(dx),
            movement_y: Some(dy),
            ..Self::default()
        }
    }

    /// Effective `(dx, dy)`. Each axis takes the first present, non-zero
    /// field in standard, moz, webkit order and falls back to 0.
    pub fn delta(&self) -> (f32, f32) {
        (
            first_nonzero([
                self.movement_x,
                self.moz_movement_x,
                self.webkit_movement_x,
            ]),
            first_nonzero([
                self.movement_y,
                self.moz_movement_y,
                self.webkit_movement_y,
            ]),
        )
    }
}

fn first_nonzero(fields: [Option<f32>; 3]) -> f32 {
    fields
        .into_iter()
        .flatten()
        .find(|v| *v != 0.0)
        .unwrap_or(0.0)
}

/// An event dispatched by the input surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    PointerMove(PointerMove),
    /// The lock holder changed; query the document for the new holder.
    PointerLockChange,
    /// The platform rejected a lock request.
    PointerLockError,
}

impl SurfaceEvent {
    pub fn channel(&self) -> Channel {
        match self {
            Self::PointerMove(_) => Channel::PointerMove,
            Self::PointerLockChange => Channel::PointerLockChange,
            Self::PointerLockError => Channel::PointerLockError,
        }
    }
}

/// The document-level input API a look controller binds to.
pub trait InputSurface {
    fn add_listener(&mut self, channel: Channel, listener: ListenerId);

    /// Removing a listener that is not registered is a no-op.
    fn remove_listener(&mut self, channel: Channel, listener: ListenerId);

    fn is_listening(&self, channel: Channel, listener: ListenerId) -> bool;

    /// Ask the platform to lock the pointer to `element`. Resolution arrives
    /// later as a lock-change or lock-error event, or never.
    fn request_pointer_lock(&mut self, element: ElementId);

    /// Ask the platform to release the pointer lock.
    fn exit_pointer_lock(&mut self);

    /// The element currently holding the lock, if any.
    fn pointer_lock_element(&self) -> Option<ElementId>;
}

/// Headless document: a listener table, the current lock holder, and an
/// ordered queue of platform events.
///
/// The host drives the platform side: it resolves lock requests with
/// [`Document::grant_pending_lock`] or [`Document::reject_pending_lock`],
/// releases with [`Document::release_lock`], and feeds raw motion through
/// [`Document::push_event`].
#[derive(Debug, Default)]
pub struct Document {
    listeners: Vec<(Channel, ListenerId)>,
    lock_element: Option<ElementId>,
    pending_request: Option<ElementId>,
    exit_requested: bool,
    queue: VecDeque<SurfaceEvent>,
    next_listener: u32,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh listener identity.
    pub fn allocate_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        id
    }

    /// Number of registrations of `listener` on `channel`.
    pub fn registration_count(&self, channel: Channel, listener: ListenerId) -> usize {
        self.listeners
            .iter()
            .filter(|(c, l)| *c == channel && *l == listener)
            .count()
    }

    /// Total registrations across all channels.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// The element whose lock request is awaiting platform resolution.
    pub fn pending_lock_request(&self) -> Option<ElementId> {
        self.pending_request
    }

    /// Whether an exit was requested and not yet resolved.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Platform grants the pending request and announces the new holder.
    /// Returns false when nothing was pending.
    pub fn grant_pending_lock(&mut self) -> bool {
        let Some(element) = self.pending_request.take() else {
            return false;
        };
        self.lock_element = Some(element);
        self.queue.push_back(SurfaceEvent::PointerLockChange);
        tracing::debug!(element = element.0, "pointer lock granted");
        true
    }

    /// Platform rejects the pending request. Returns false when nothing was
    /// pending.
    pub fn reject_pending_lock(&mut self) -> bool {
        if self.pending_request.take().is_none() {
            return false;
        }
        self.queue.push_back(SurfaceEvent::PointerLockError);
        tracing::debug!("pointer lock rejected");
        true
    }

    /// Platform releases the lock (explicit exit, focus loss, Escape).
    /// Returns false when no element held the lock.
    pub fn release_lock(&mut self) -> bool {
        self.exit_requested = false;
        if self.lock_element.take().is_none() {
            return false;
        }
        self.queue.push_back(SurfaceEvent::PointerLockChange);
        tracing::debug!("pointer lock released");
        true
    }

    /// Queue a raw platform event.
    pub fn push_event(&mut self, event: SurfaceEvent) {
        self.queue.push_back(event);
    }

    /// Next event in platform order.
    pub fn poll_event(&mut self) -> Option<SurfaceEvent> {
        self.queue.pop_front()
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }
}

impl InputSurface for Document {
    fn add_listener(&mut self, channel: Channel, listener: ListenerId) {
        self.listeners.push((channel, listener));
    }

    fn remove_listener(&mut self, channel: Channel, listener: ListenerId) {
        if let Some(pos) = self
            .listeners
            .iter()
            .position(|(c, l)| *c == channel && *l == listener)
        {
            self.listeners.remove(pos);
        }
    }

    fn is_listening(&self, channel: Channel, listener: ListenerId) -> bool {
        self.registration_count(channel, listener) > 0
    }

    fn request_pointer_lock(&mut self, element: ElementId) {
        self.pending_request = Some(element);
    }

    fn exit_pointer_lock(&mut self) {
        if self.lock_element.is_some() {
            self.exit_requested = true;
        }
    }

    fn pointer_lock_element(&self) -> Option<ElementId> {
        self.lock_element
    }
}
