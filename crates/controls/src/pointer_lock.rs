use crate::events::{ControlEvent, Notifier, SubscriptionId};
use crate::object::ControlledObject;
use crate::orientation::Orientation;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};
use storewalk_input::{Channel, ElementId, InputSurface, ListenerId, SurfaceEvent};

/// Radians of rotation per pixel of pointer motion at `pointer_speed == 1`.
pub const POINTER_RADIANS_PER_PIXEL: f32 = 0.002;

/// Whether the bound element holds the pointer lock, as last observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LockState {
    #[default]
    Unlocked,
    Locked,
}

/// Lifecycle of the controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlsState {
    Disconnected,
    Unlocked,
    Locked,
}

/// Look tuning. Polar angles are measured from the zenith, in `[0, PI]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    pub pointer_speed: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            pointer_speed: 1.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
        }
    }
}

/// Pointer-lock first-person controls.
///
/// Listens on an input surface for pointer motion and lock changes, turns
/// motion into yaw/pitch on the controlled object while locked, and offers
/// camera-relative movement. `C` is usually `&mut PerspectiveCamera` or a
/// shared `Rc<RefCell<_>>` handle.
#[derive(Debug)]
pub struct PointerLockControls<C> {
    object: C,
    element: Option<ElementId>,
    listener: ListenerId,
    connected: bool,
    lock_state: LockState,
    pub pointer_speed: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    notifier: Notifier,
}

impl<C: ControlledObject> PointerLockControls<C> {
    /// Bind to `object`. With an element the controls connect immediately.
    pub fn new(object: C, element: Option<ElementId>, listener: ListenerId) -> Self {
        let defaults = LookConfig::default();
        Self {
            object,
            element,
            listener,
            connected: false,
            lock_state: LockState::Unlocked,
            pointer_speed: defaults.pointer_speed,
            min_polar_angle: defaults.min_polar_angle,
            max_polar_angle: defaults.max_polar_angle,
            notifier: Notifier::new(),
        }
    }

    /// Bind to `object` and `element`, registering listeners on `surface`.
    pub fn attach(
        object: C,
        element: ElementId,
        listener: ListenerId,
        surface: &mut impl InputSurface,
    ) -> Self {
        let mut controls = Self::new(object, Some(element), listener);
        controls.connect(surface);
        controls
    }

    pub fn apply_look_config(&mut self, config: &LookConfig) {
        self.pointer_speed = config.pointer_speed;
        self.min_polar_angle = config.min_polar_angle;
        self.max_polar_angle = config.max_polar_angle;
    }

    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    pub fn listener(&self) -> ListenerId {
        self.listener
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_locked(&self) -> bool {
        self.lock_state == LockState::Locked
    }

    pub fn lock_state(&self) -> LockState {
        self.lock_state
    }

    pub fn state(&self) -> ControlsState {
        match (self.connected, self.lock_state) {
            (false, _) => ControlsState::Disconnected,
            (true, LockState::Unlocked) => ControlsState::Unlocked,
            (true, LockState::Locked) => ControlsState::Locked,
        }
    }

    /// Register the pointer-move, lock-change and lock-error listeners.
    /// A second call while connected does nothing.
    pub fn connect(&mut self, surface: &mut impl InputSurface) {
        if self.connected {
            tracing::debug!(listener = self.listener.0, "controls already connected");
            return;
        }
        if self.element.is_none() {
            tracing::warn!("cannot connect look controls without an element");
            return;
        }
        for channel in Channel::ALL {
            surface.add_listener(channel, self.listener);
        }
        self.connected = true;
        tracing::debug!(listener = self.listener.0, "look controls connected");
    }

    /// Remove the listeners. Safe when not connected.
    ///
    /// The lock state is left as last observed; a lock change that lands
    /// after this call is not seen.
    pub fn disconnect(&mut self, surface: &mut impl InputSurface) {
        for channel in Channel::ALL {
            surface.remove_listener(channel, self.listener);
        }
        if self.connected {
            tracing::debug!(listener = self.listener.0, "look controls disconnected");
        }
        self.connected = false;
    }

    /// Terminal teardown. Does not release an active pointer lock.
    pub fn dispose(&mut self, surface: &mut impl InputSurface) {
        self.disconnect(surface);
    }

    /// Ask the surface to lock the pointer to the bound element.
    pub fn lock(&self, surface: &mut impl InputSurface) {
        match self.element {
            Some(element) => surface.request_pointer_lock(element),
            None => tracing::warn!("pointer lock requested without an element"),
        }
    }

    /// Ask the surface to release the pointer lock.
    pub fn unlock(&self, surface: &mut impl InputSurface) {
        surface.exit_pointer_lock();
    }

    /// The controlled object.
    pub fn object(&self) -> &C {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut C {
        &mut self.object
    }

    /// Release the binding and hand the object back.
    pub fn into_object(self) -> C {
        self.object
    }

    /// Write the look direction (local -Z rotated by the object's
    /// orientation) into `out` and return it.
    pub fn direction(&self, out: &mut Vec3) -> Vec3 {
        *out = self.object.quaternion() * Vec3::NEG_Z;
        *out
    }

    /// Move parallel to the ground plane along the facing direction.
    /// Assumes the object's up is +Y.
    pub fn move_forward(&mut self, distance: f32) {
        let forward = self.object.up().cross(self.object.right_axis());
        let position = self.object.position() + forward * distance;
        self.object.set_position(position);
    }

    /// Move along the object's local right axis.
    pub fn move_right(&mut self, distance: f32) {
        let position = self.object.position() + self.object.right_axis() * distance;
        self.object.set_position(position);
    }

    /// Move along world Y regardless of orientation.
    pub fn move_up(&mut self, distance: f32) {
        let mut position = self.object.position();
        position.y += distance;
        self.object.set_position(position);
    }

    pub fn subscribe(&mut self, callback: impl FnMut(ControlEvent) + 'static) -> SubscriptionId {
        self.notifier.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Events emitted since the last drain.
    pub fn events(&self) -> &[ControlEvent] {
        self.notifier.events()
    }

    pub fn drain_events(&mut self) -> Vec<ControlEvent> {
        self.notifier.drain_events()
    }

    /// Deliver one dispatched surface event. Events on channels this
    /// listener is not registered for are dropped.
    pub fn handle_event(&mut self, surface: &impl InputSurface, event: &SurfaceEvent) {
        if !surface.is_listening(event.channel(), self.listener) {
            return;
        }
        match event {
            SurfaceEvent::PointerMove(motion) => {
                let (dx, dy) = motion.delta();
                self.on_pointer_move(dx, dy);
            }
            SurfaceEvent::PointerLockChange => self.on_lock_change(surface.pointer_lock_element()),
            SurfaceEvent::PointerLockError => {
                tracing::error!(
                    element = ?self.element,
                    "unable to use pointer lock"
                );
            }
        }
    }

    fn on_pointer_move(&mut self, dx: f32, dy: f32) {
        if self.lock_state == LockState::Unlocked {
            return;
        }
        let mut look = Orientation::from_quat(self.object.quaternion());
        look.yaw -= dx * POINTER_RADIANS_PER_PIXEL * self.pointer_speed;
        look.pitch -= dy * POINTER_RADIANS_PER_PIXEL * self.pointer_speed;
        look.pitch = clamp_pitch(
            look.pitch,
            FRAC_PI_2 - self.max_polar_angle,
            FRAC_PI_2 - self.min_polar_angle,
        );
        look.roll = 0.0;
        self.object.set_quaternion(look.to_quat());
        self.notifier.emit(ControlEvent::Change);
    }

    fn on_lock_change(&mut self, holder: Option<ElementId>) {
        if self.element.is_some() && holder == self.element {
            self.lock_state = LockState::Locked;
            tracing::debug!("pointer locked");
            self.notifier.emit(ControlEvent::Lock);
        } else {
            self.lock_state = LockState::Unlocked;
            tracing::debug!("pointer unlocked");
            self.notifier.emit(ControlEvent::Unlock);
        }
    }
}

/// `f32::clamp` panics on inverted bounds; the lower bound wins instead.
/// NaN passes through untouched.
fn clamp_pitch(pitch: f32, lower: f32, upper: f32) -> f32 {
    if pitch.is_nan() {
        return pitch;
    }
    lower.max(upper.min(pitch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::PerspectiveCamera;
    use glam::Quat;
    use storewalk_input::{Document, PointerMove};

    const CANVAS: ElementId = ElementId(7);

    fn attached<'a>(
        doc: &mut Document,
        cam: &'a mut PerspectiveCamera,
    ) -> PointerLockControls<&'a mut PerspectiveCamera> {
        let listener = doc.allocate_listener();
        PointerLockControls::attach(cam, CANVAS, listener, doc)
    }

    fn pump<C: ControlledObject>(doc: &mut Document, controls: &mut PointerLockControls<C>) {
        while let Some(event) = doc.poll_event() {
            controls.handle_event(&*doc, &event);
        }
    }

    fn lock(doc: &mut Document, controls: &mut PointerLockControls<impl ControlledObject>) {
        controls.lock(doc);
        doc.grant_pending_lock();
        pump(doc, controls);
    }

    fn mouse(
        doc: &mut Document,
        controls: &mut PointerLockControls<impl ControlledObject>,
        dx: f32,
        dy: f32,
    ) {
        doc.push_event(SurfaceEvent::PointerMove(PointerMove::new(dx, dy)));
        pump(doc, controls);
    }

    fn look(cam: &PerspectiveCamera) -> Orientation {
        Orientation::from_quat(cam.rotation)
    }

    #[test]
    fn attach_registers_three_listeners() {
        let mut doc = Document::new();
        let mut cam = PerspectiveCamera::default();
        let controls = attached(&mut doc, &mut cam);
        assert_eq!(controls.state(), ControlsState::Unlocked);
        assert_eq!(doc.listener_count(), 3);
    }

    #[test]
    fn unbound_controls_start_disconnected() {
        let mut doc = Document::new();
        let mut cam = PerspectiveCamera::default();
        let listener = doc.allocate_listener();
        let mut controls = PointerLockControls::new(&mut cam, None, listener);
        assert_eq!(controls.state(), ControlsState::Disconnected);
        controls.connect(&mut doc);
        assert!(!controls.is_connected());
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn second_connect_does_not_duplicate_listeners() {
        let mut doc = Document::new();
        let mut cam = PerspectiveCamera::default();
        let mut controls = attached(&mut doc, &mut cam);
        controls.connect(&mut doc);
        assert_eq!(doc.listener_count(), 3);
        assert_eq!(doc.registration_count(Channel::PointerMove, controls.listener()), 1);
    }

    #[test]
    fn lock_and_unlock_each_notify_once() {
        let mut doc = Document::new();
        let mut cam = PerspectiveCamera::default();
        let mut controls = attached(&mut doc, &mut cam);

        controls.lock(&mut doc);
        assert!(!controls.is_locked());
        doc.grant_pending_lock();
        pump(&mut doc, &mut controls);
        assert_eq!(controls.state(), ControlsState::Locked);
        assert_eq!(controls.drain_events(), vec![ControlEvent::Lock]);

        controls.unlock(&mut doc);
        doc.release_lock();
        pump(&mut doc, &mut controls);
        assert_eq!(controls.state(), ControlsState::Unlocked);
        assert_eq!(controls.drain_events(), vec![ControlEvent::Unlock]);
    }

    #[test]
    fn lock_taken_by_another_element_reads_as_unlock() {
        let mut doc = Document::new();
        let mut cam = PerspectiveCamera::default();
        let mut controls = attached(&mut doc, &mut cam);
        lock(&mut doc, &mut controls);
        controls.drain_events();

        doc.request_pointer_lock(ElementId(99));
        doc.grant_pending_lock();
        pump(&mut doc, &mut controls);
        assert!(!controls.is_locked());
        assert_eq!(controls.drain_events(), vec![ControlEvent::Unlock]);
    }

    #[test]
    fn lock_error_changes_nothing() {
        let mut doc = Document::new();
        let mut cam = PerspectiveCamera::default();
        let mut controls = attached(&mut doc, &mut cam);
        controls.lock(&mut doc);
        doc.reject_pending_lock();
        pump(&mut doc, &mut controls);
        assert_eq!(controls.state(), ControlsState::Unlocked);
        assert!(controls.events().is_empty());
    }

    #[test]
    fn horizontal_motion_turns_yaw() {
        let mut doc = Document::new();
        let mut cam = PerspectiveCamera::default();
        let mut controls = attached(&mut doc, &mut cam);
        lock(&mut doc, &mut controls);
        controls.drain_events();

        mouse(&mut doc, &mut controls, 100.0, 0.0);
        assert_eq!(controls.drain_events(), vec![ControlEvent::Change]);
        drop(controls);
        let o = look(&cam);
        assert!((o.yaw - (-0.2)).abs() < 1e-6);
        assert!(o.pitch.abs() < 1e-6);
    }

    #[test]
    fn pointer_speed_scales_rotation() {
        let mut doc = Document::new();
        let mut cam = PerspectiveCamera::default();
        let mut controls = attached(&mut doc, &mut cam);
        controls.pointer_speed = 0.5;
        lock(&mut doc, &mut controls);
        mouse(&mut doc, &mut controls, 0.0, -100.0);
        drop(controls);
        assert!((look(&cam).pitch - 0.1).abs() < 1e-6);
    }

    #[test]
    fn motion_while_unlocked_is_ignored() {
        let mut doc = Document::new();
        let mut cam = PerspectiveCamera::default();
        let mut controls = attached(&mut doc, &mut cam);
        mouse(&mut doc, &mut controls, 250.0, -80.0);
        assert!(controls.events().is_empty());
        drop(controls);
        assert_eq!(cam.rotation, Quat::IDENTITY);
    }

    #[test]
    fn pitch_stays_inside_default_limits() {
        let mut doc = Document::new();
        let mut cam = PerspectiveCamera::default();
        let mut controls = attached(&mut doc, &mut cam);
        lock(&mut doc, &mut controls);
        for dy in [-1.0e6, 3.0e5, -42.0, 1.0e7] {
            mouse(&mut doc, &mut controls, 13.0, dy);
            let pitch = Orientation::from_quat(controls.object().rotation).pitch;
            assert!(pitch >= -FRAC_PI_2 - 1e-4 && pitch <= FRAC_PI_2 + 1e-4);
        }
    }

    #[test]
    fn pitch_stays_inside_custom_limits() {
        let mut doc = Document::new();
        let mut cam = PerspectiveCamera::default();
        let mut controls = attached(&mut doc, &mut cam);
        controls.apply_look_config(&LookConfig {
            pointer_speed: 1.0,
            min_polar_angle: FRAC_PI_2 - 0.3,
            max_polar_angle: FRAC_PI_2 + 0.2,
        });
        lock(&mut doc, &mut controls);

        mouse(&mut doc, &mut controls, 0.0, -10_000.0);
        let up = Orientation::from_quat(controls.object().rotation).pitch;
        assert!((up - 0.3).abs() < 1e-5);

        mouse(&mut doc, &mut controls, 0.0, 10_000.0);
        let down = Orientation::from_quat(controls.object().rotation).pitch;
        assert!((down + 0.2).abs() < 1e-5);
    }

    #[test]
    fn disconnect_stops_motion() {
        let mut doc = Document::new();
        let mut cam = PerspectiveCamera::default();
        let mut controls = attached(&mut doc, &mut cam);
        lock(&mut doc, &mut controls);
        let before = controls.object().rotation;

        controls.disconnect(&mut doc);
        assert_eq!(doc.listener_count(), 0);
        mouse(&mut doc, &mut controls, 100.0, 100.0);
        assert_eq!(controls.object().rotation, before);
        // Last observed lock state survives the disconnect.
        assert_eq!(controls.lock_state(), LockState::Locked);
        assert_eq!(controls.state(), ControlsState::Disconnected);
    }

    #[test]
    fn dispose_keeps_platform_lock() {
        let mut doc = Document::new();
        let mut cam = PerspectiveCamera::default();
        let mut controls = attached(&mut doc, &mut cam);
        lock(&mut doc, &mut controls);
        controls.dispose(&mut doc);
        assert_eq!(doc.pointer_lock_element(), Some(CANVAS));
        assert!(!doc.exit_requested());
    }

    #[test]
    fn late_lock_change_after_disconnect_is_missed() {
        let mut doc = Document::new();
        let mut cam = PerspectiveCamera::default();
        let mut controls = attached(&mut doc, &mut cam);
        controls.lock(&mut doc);
        controls.disconnect(&mut doc);
        doc.grant_pending_lock();
        pump(&mut doc, &mut controls);
        assert!(!controls.is_locked());
        assert_eq!(doc.pointer_lock_element(), Some(CANVAS));
    }

    #[test]
    fn direction_is_unit_length() {
        let mut cam = PerspectiveCamera::default();
        cam.rotation = Orientation::new(2.3, -0.9).to_quat();
        let listener = ListenerId(0);
        let controls = PointerLockControls::new(&mut cam, None, listener);
        let mut out = Vec3::ZERO;
        let dir = controls.direction(&mut out);
        assert_eq!(dir, out);
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn default_direction_is_negative_z() {
        let mut cam = PerspectiveCamera::default();
        let controls = PointerLockControls::new(&mut cam, None, ListenerId(0));
        let mut out = Vec3::ZERO;
        let dir = controls.direction(&mut out);
        assert!((dir - Vec3::NEG_Z).length() < 1e-6);
        assert_eq!(out, dir);
    }

    #[test]
    fn forward_stays_horizontal_and_round_trips() {
        let mut cam = PerspectiveCamera::default();
        cam.rotation = Orientation::new(0.8, 0.6).to_quat();
        let start = cam.position;
        let mut controls = PointerLockControls::new(&mut cam, None, ListenerId(0));

        controls.move_forward(5.0);
        let moved = controls.object().position;
        assert!((moved.y - start.y).abs() < 1e-5);
        assert!(((moved - start).length() - 5.0).abs() < 1e-4);

        controls.move_forward(-5.0);
        assert!((controls.object().position - start).length() < 1e-4);
    }

    #[test]
    fn forward_follows_yaw() {
        let mut cam = PerspectiveCamera::default();
        let start = cam.position;
        let mut controls = PointerLockControls::new(&mut cam, None, ListenerId(0));
        controls.move_forward(2.0);
        let delta = controls.object().position - start;
        assert!((delta - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn right_and_up_moves() {
        let mut cam = PerspectiveCamera::default();
        let start = cam.position;
        let mut controls = PointerLockControls::new(&mut cam, None, ListenerId(0));
        controls.move_right(3.0);
        controls.move_up(-1.5);
        let delta = controls.object().position - start;
        assert!((delta - Vec3::new(3.0, -1.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn subscribers_hear_lock_and_change() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut doc = Document::new();
        let mut cam = PerspectiveCamera::default();
        let mut controls = attached(&mut doc, &mut cam);
        let heard = Rc::new(RefCell::new(Vec::new()));
        let sink = heard.clone();
        controls.subscribe(move |e| sink.borrow_mut().push(e));

        lock(&mut doc, &mut controls);
        mouse(&mut doc, &mut controls, 1.0, 1.0);
        assert_eq!(*heard.borrow(), vec![ControlEvent::Lock, ControlEvent::Change]);
    }

    #[test]
    fn inverted_limits_pin_to_lower_bound() {
        assert_eq!(clamp_pitch(0.4, 0.5, -0.5), 0.5);
        assert!(clamp_pitch(f32::NAN, -1.0, 1.0).is_nan());
    }

    #[test]
    fn non_finite_motion_propagates() {
        let mut doc = Document::new();
        let mut cam = PerspectiveCamera::default();
        let mut controls = attached(&mut doc, &mut cam);
        lock(&mut doc, &mut controls);
        mouse(&mut doc, &mut controls, f32::NAN, 0.0);
        assert!(controls.object().rotation.is_nan());
    }
}
