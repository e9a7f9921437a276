use glam::{Quat, Vec3};
use std::fmt::Write;
use storewalk_common::Transform;
use storewalk_store::{LabelText, StorePlan};

/// Camera pose and lens for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub camera: Transform,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Whether the pointer is captured for looking around.
    pub locked: bool,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            camera: Transform::from_position(Vec3::new(0.0, 12.0, 20.0)),
            fov_degrees: 75.0,
            locked: false,
        }
    }
}

impl RenderView {
    pub fn new(position: Vec3, rotation: Quat, fov_degrees: f32) -> Self {
        Self {
            camera: Transform {
                position,
                rotation,
                ..Transform::default()
            },
            fov_degrees,
            locked: false,
        }
    }

    pub fn with_lock(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn forward(&self) -> Vec3 {
        self.camera.rotation * Vec3::NEG_Z
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
pub trait Renderer {
    type Output;

    fn render(&self, plan: &StorePlan, view: &RenderView) -> Self::Output;
}

/// Text summary of the store and what the camera sees.
///
/// Used by the CLI, in logs and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Also print one line per stocked slot.
    pub list_slots: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slots(mut self) -> Self {
        self.list_slots = true;
        self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, plan: &StorePlan, view: &RenderView) -> String {
        let mut out = String::new();
        let stocked = plan.stocked().count();
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "=== Store (shelves={}, slots={}, stocked={}) ===",
            plan.shelves.len(),
            plan.slots.len(),
            stocked
        );
        let _ = writeln!(
            out,
            "Room: floor={:.0} walls={:.0} lights={}",
            plan.room.floor_size,
            plan.room.wall_height,
            plan.lights.len()
        );
        for sign in &plan.signs {
            let _ = writeln!(
                out,
                "Row {}: {} (z={:.1})",
                sign.row, sign.department, sign.position.z
            );
        }

        let p = view.camera.position;
        let f = view.forward();
        let _ = writeln!(
            out,
            "Camera: pos=({:.2}, {:.2}, {:.2}) dir=({:.2}, {:.2}, {:.2}) fov={:.0} {}",
            p.x,
            p.y,
            p.z,
            f.x,
            f.y,
            f.z,
            view.fov_degrees,
            if view.locked { "locked" } else { "unlocked" }
        );
        match plan.pick(p, f) {
            Some((slot, distance)) => {
                let title = slot.product.as_ref().map_or("", |p| p.title.as_str());
                let _ = writeln!(out, "Looking at: {title} ({distance:.1} away)");
            }
            None => {
                let _ = writeln!(out, "Looking at: nothing");
            }
        }

        if self.list_slots {
            for slot in plan.stocked() {
                let pos = slot.position;
                let tag = match &slot.label.text {
                    LabelText::Priced { title, price } => format!("{title} {price}"),
                    LabelText::Empty(text) => text.clone(),
                };
                let _ = writeln!(
                    out,
                    "  [{:03}] r{} l{} c{:02} pos=({:.1}, {:.1}, {:.1}) {}",
                    slot.index, slot.row, slot.level, slot.column, pos.x, pos.y, pos.z, tag
                );
            }
        }

        tracing::trace!(bytes = out.len(), "rendered debug text");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storewalk_store::{Assortment, StoreConfig};

    fn plan() -> StorePlan {
        StorePlan::build(&StoreConfig::default(), &Assortment::featured())
    }

    #[test]
    fn summary_of_default_store() {
        let output = DebugTextRenderer::new().render(&plan(), &RenderView::default());
        assert!(output.contains("shelves=18, slots=252, stocked=252"));
        assert!(output.contains("lights=7"));
        assert!(output.contains("Row 0: Cosmetics"));
        assert!(output.contains("pos=(0.00, 12.00, 20.00)"));
        assert!(output.contains("dir=(0.00, 0.00, -1.00)"));
        assert!(output.contains("unlocked"));
        assert!(!output.contains("[000]"));
    }

    #[test]
    fn empty_store_has_nothing_to_look_at() {
        let empty = StorePlan::build(&StoreConfig::default(), &Assortment::default());
        let output = DebugTextRenderer::new().render(&empty, &RenderView::default());
        assert!(output.contains("stocked=0"));
        assert!(output.contains("Looking at: nothing"));
    }

    #[test]
    fn reports_product_in_view() {
        let plan = plan();
        let slot = &plan.slots[0];
        let (min, max) = slot.bounds();
        let center = (min + max) / 2.0;
        // Stand in the first aisle facing the back wall.
        let view = RenderView::new(Vec3::new(center.x, center.y, -30.0), Quat::IDENTITY, 75.0)
            .with_lock(true);
        let output = DebugTextRenderer::new().render(&plan, &view);
        let title = &slot.product.as_ref().unwrap().title;
        assert!(output.contains(&format!("Looking at: {title}")), "{output}");
        assert!(output.contains(" locked"));
    }

    #[test]
    fn slot_listing() {
        let output = DebugTextRenderer::new()
            .with_slots()
            .render(&plan(), &RenderView::default());
        assert!(output.contains("[000] r0 l0 c00 pos=(-39.0, 6.8, -40.0) Lipstick Set ₹50915"));
        assert_eq!(output.matches("  [").count(), 252);
    }
}
