//! A walkthrough session: the store plan, a headless input surface and the
//! first-person controls wired together. Hosts feed platform input in and
//! read the camera out.

use crate::card::ProductCard;
use crate::catalog::Assortment;
use crate::config::StoreConfig;
use crate::layout::{ProductSlot, StorePlan};
use glam::{Vec2, Vec3};
use std::cell::Cell;
use std::rc::Rc;
use storewalk_controls::{
    ControlEvent, ControlledObject, Locomotion, Orientation, PerspectiveCamera,
    PointerLockControls,
};
use storewalk_input::{Document, ElementId, MoveIntent, PointerMove, SurfaceEvent};

/// The canvas the controls lock the pointer to.
pub const STORE_ELEMENT: ElementId = ElementId(1);

pub const INSTRUCTIONS: &str = "Click to enter the store. Use WASD or arrow keys to move, \
mouse to look around. Press Esc to unlock and click a product to inspect.";

#[derive(Debug)]
pub struct Walkthrough {
    config: StoreConfig,
    plan: StorePlan,
    surface: Document,
    controls: PointerLockControls<PerspectiveCamera>,
    locomotion: Locomotion,
    intent: MoveIntent,
    show_instructions: Rc<Cell<bool>>,
}

impl Walkthrough {
    pub fn new(config: StoreConfig, assortment: &Assortment) -> Self {
        let plan = StorePlan::build(&config, assortment);
        let mut surface = Document::new();
        let listener = surface.allocate_listener();
        let mut controls = PointerLockControls::attach(
            PerspectiveCamera::default(),
            STORE_ELEMENT,
            listener,
            &mut surface,
        );
        controls.apply_look_config(&config.look);

        let show_instructions = Rc::new(Cell::new(true));
        let flag = Rc::clone(&show_instructions);
        controls.subscribe(move |event| match event {
            ControlEvent::Lock => flag.set(false),
            ControlEvent::Unlock => flag.set(true),
            ControlEvent::Change => {}
        });

        Self {
            locomotion: Locomotion::new(config.locomotion),
            config,
            plan,
            surface,
            controls,
            intent: MoveIntent::new(),
            show_instructions,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn plan(&self) -> &StorePlan {
        &self.plan
    }

    pub fn controls(&self) -> &PointerLockControls<PerspectiveCamera> {
        &self.controls
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        self.controls.object()
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        self.controls.object_mut()
    }

    /// Platform side of the input surface.
    pub fn surface_mut(&mut self) -> &mut Document {
        &mut self.surface
    }

    pub fn intent(&self) -> &MoveIntent {
        &self.intent
    }

    pub fn is_locked(&self) -> bool {
        self.controls.is_locked()
    }

    pub fn show_instructions(&self) -> bool {
        self.show_instructions.get()
    }

    pub fn pose(&self) -> (Vec3, Orientation) {
        let camera = self.camera();
        (camera.position(), Orientation::from_quat(camera.quaternion()))
    }

    /// Ask for the pointer lock. The host resolves it with
    /// [`Walkthrough::resolve_lock`].
    pub fn request_lock(&mut self) {
        if !self.controls.is_locked() {
            self.controls.lock(&mut self.surface);
        }
    }

    /// Outcome of a pending lock request. Returns false when none was pending.
    pub fn resolve_lock(&mut self, granted: bool) -> bool {
        if granted {
            self.surface.grant_pending_lock()
        } else {
            self.surface.reject_pending_lock()
        }
    }

    /// Ask the controls to give up the lock.
    pub fn request_unlock(&mut self) {
        self.controls.unlock(&mut self.surface);
    }

    /// The platform dropped the lock (Escape, focus loss, an honored exit).
    pub fn lock_released(&mut self) -> bool {
        let released = self.surface.release_lock();
        if released {
            self.intent.clear();
        }
        released
    }

    pub fn pointer_motion(&mut self, dx: f32, dy: f32) {
        self.surface
            .push_event(SurfaceEvent::PointerMove(PointerMove::new(dx, dy)));
    }

    /// Key transition by DOM key code. Returns whether the key moves.
    pub fn key(&mut self, code: &str, pressed: bool) -> bool {
        self.intent.apply_key(code, pressed)
    }

    pub fn zoom(&mut self, delta_y: f32) {
        self.locomotion.zoom(&mut self.controls, delta_y);
    }

    /// Dispatch queued surface events to the controls.
    pub fn pump(&mut self) {
        while let Some(event) = self.surface.poll_event() {
            self.controls.handle_event(&self.surface, &event);
        }
    }

    /// One frame: dispatch input, then move. Returns the notifications
    /// raised since the last step.
    pub fn step(&mut self, dt: f32) -> Vec<ControlEvent> {
        self.pump();
        self.locomotion.update(&mut self.controls, &self.intent, dt);
        self.controls.drain_events()
    }

    /// Stocked slot under a point in normalized device coordinates.
    pub fn pick(&self, ndc: Vec2) -> Option<&ProductSlot> {
        let (origin, dir) = self.camera().screen_ray(ndc);
        self.plan.pick(origin, dir).map(|(slot, _)| slot)
    }

    /// Stocked slot straight ahead of the camera.
    pub fn pick_center(&self) -> Option<&ProductSlot> {
        let mut dir = Vec3::ZERO;
        self.controls.direction(&mut dir);
        self.plan
            .pick(self.camera().position(), dir)
            .map(|(slot, _)| slot)
    }

    pub fn card(&self, slot: &ProductSlot) -> Option<ProductCard> {
        slot.product
            .as_ref()
            .map(|p| ProductCard::from_product(p, &self.config.prices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk() -> Walkthrough {
        Walkthrough::new(StoreConfig::default(), &Assortment::featured())
    }

    fn locked() -> Walkthrough {
        let mut w = walk();
        w.request_lock();
        assert!(w.resolve_lock(true));
        let events = w.step(0.0);
        assert_eq!(events, vec![ControlEvent::Lock]);
        w
    }

    #[test]
    fn lock_cycle_toggles_instructions() {
        let mut w = walk();
        assert!(w.show_instructions());
        w.request_lock();
        assert!(w.show_instructions());
        w.resolve_lock(true);
        w.step(0.0);
        assert!(w.is_locked());
        assert!(!w.show_instructions());

        assert!(w.lock_released());
        assert_eq!(w.step(0.0), vec![ControlEvent::Unlock]);
        assert!(w.show_instructions());
    }

    #[test]
    fn rejected_lock_changes_nothing() {
        let mut w = walk();
        w.request_lock();
        assert!(w.resolve_lock(false));
        assert!(w.step(0.0).is_empty());
        assert!(!w.is_locked());
        assert!(!w.resolve_lock(true));
    }

    #[test]
    fn request_unlock_waits_for_platform() {
        let mut w = locked();
        w.request_unlock();
        assert!(w.surface_mut().exit_requested());
        assert!(w.step(0.0).is_empty());
        assert!(w.is_locked());
        w.lock_released();
        assert_eq!(w.step(0.0), vec![ControlEvent::Unlock]);
    }

    #[test]
    fn motion_turns_camera_when_locked() {
        let mut w = locked();
        w.pointer_motion(100.0, 0.0);
        assert_eq!(w.step(0.0), vec![ControlEvent::Change]);
        let (_, o) = w.pose();
        assert!((o.yaw + 0.2).abs() < 1e-5);
    }

    #[test]
    fn walking_forward_moves_down_negative_z() {
        let mut w = locked();
        assert!(w.key("KeyW", true));
        for _ in 0..10 {
            w.step(0.05);
        }
        let (pos, _) = w.pose();
        assert!(pos.z < 20.0);
        assert!((pos.x).abs() < 1e-4);
        assert!((pos.y - 12.0).abs() < 1e-4);
    }

    #[test]
    fn no_movement_while_unlocked() {
        let mut w = walk();
        w.key("KeyW", true);
        w.step(0.1);
        assert_eq!(w.pose().0, Vec3::new(0.0, 12.0, 20.0));
    }

    #[test]
    fn release_clears_held_keys() {
        let mut w = locked();
        w.key("KeyD", true);
        w.lock_released();
        assert!(w.intent().is_idle());
    }

    #[test]
    fn zoom_is_clamped() {
        let mut w = walk();
        w.zoom(10_000.0);
        assert_eq!(w.pose().0.z, 60.0);
        w.zoom(-10_000.0);
        assert_eq!(w.pose().0.z, 8.0);
    }

    #[test]
    fn pick_center_finds_product_ahead() {
        let mut w = walk();
        let target = w
            .plan()
            .slots
            .iter()
            .find(|s| s.row == 2 && s.level == 1 && s.column == 9)
            .cloned()
            .unwrap();
        let (min, max) = target.bounds();
        let center = (min + max) / 2.0;
        w.camera_mut().position = Vec3::new(center.x, center.y, 40.0);
        let hit = w.pick_center().unwrap();
        assert_eq!(hit.index, target.index);

        // Screen center gives the same answer.
        assert_eq!(w.pick(Vec2::ZERO).unwrap().index, target.index);

        let card = w.card(hit).unwrap();
        assert_eq!(Some(&card.title), target.product.as_ref().map(|p| &p.title));
    }

    #[test]
    fn look_config_is_applied() {
        let mut config = StoreConfig::default();
        config.look.pointer_speed = 2.0;
        let w = Walkthrough::new(config, &Assortment::featured());
        assert_eq!(w.controls().pointer_speed, 2.0);
    }
}
