use glam::{Mat4, Quat, Vec3};
use storewalk_common::Color;
use storewalk_store::layout::palette;
use storewalk_store::{Category, ProductSlot, StorePlan};

const WALL_THICKNESS: f32 = 0.5;
const HIGHLIGHT: [f32; 4] = [1.0, 0.8, 0.0, 1.0];

/// One box to draw: a unit cube transformed by `model`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxInstance {
    pub model: Mat4,
    pub color: [f32; 4],
}

impl BoxInstance {
    fn new(center: Vec3, size: Vec3, color: Color) -> Self {
        Self {
            model: Mat4::from_scale_rotation_translation(size, Quat::IDENTITY, center),
            color: color.to_rgba(),
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.color[3] >= 1.0
    }
}

/// Stand-in for the product photo on textured parts.
fn swatch(department: Option<Category>) -> Color {
    match department {
        Some(Category::Cosmetics) => Color::hex(0xe8b4c8),
        Some(Category::Electronics) => Color::hex(0x5a6470),
        Some(Category::Books) => Color::hex(0x9c6b4a),
        Some(Category::Fruits) => Color::hex(0x8fc46a),
        Some(Category::Footwear) => Color::hex(0x6b7fa8),
        None => Color::WHITE,
    }
}

fn product_boxes(slot: &ProductSlot, highlighted: bool, out: &mut Vec<BoxInstance>) {
    for part in &slot.shape.parts {
        let size = part.primitive.half_extents() * part.scale * 2.0;
        let tint = if part.finish.textured {
            swatch(slot.department)
        } else {
            part.finish.tint
        };
        let mut color = tint.to_rgba();
        if highlighted {
            color = HIGHLIGHT;
        }
        out.push(BoxInstance {
            model: Mat4::from_scale_rotation_translation(
                size,
                Quat::from_rotation_z(part.tilt),
                slot.position + part.offset,
            ),
            color,
        });
    }
}

/// Boxes for the whole store, opaque first so translucent placeholders
/// blend over them. `highlight` is a slot index.
pub fn store_instances(plan: &StorePlan, highlight: Option<usize>) -> Vec<BoxInstance> {
    let room = &plan.room;
    let half = room.floor_size / 2.0;
    let wall_y = room.wall_height / 2.0;
    let mut out = vec![
        BoxInstance::new(
            Vec3::new(0.0, -0.1, 0.0),
            Vec3::new(room.floor_size, 0.2, room.floor_size),
            room.floor_color,
        ),
        BoxInstance::new(
            Vec3::new(0.0, wall_y, -half),
            Vec3::new(room.floor_size, room.wall_height, WALL_THICKNESS),
            room.wall_color,
        ),
        BoxInstance::new(
            Vec3::new(0.0, wall_y, half),
            Vec3::new(room.floor_size, room.wall_height, WALL_THICKNESS),
            room.wall_color,
        ),
        BoxInstance::new(
            Vec3::new(-half, wall_y, 0.0),
            Vec3::new(WALL_THICKNESS, room.wall_height, room.floor_size),
            room.wall_color,
        ),
        BoxInstance::new(
            Vec3::new(half, wall_y, 0.0),
            Vec3::new(WALL_THICKNESS, room.wall_height, room.floor_size),
            room.wall_color,
        ),
        BoxInstance::new(
            Vec3::new(0.0, wall_y, room.accent_wall_z + WALL_THICKNESS),
            Vec3::new(room.floor_size, room.wall_height, 0.1),
            room.accent_color,
        ),
    ];

    for light in &plan.lights {
        out.push(BoxInstance::new(
            light.position,
            Vec3::new(2.0, 0.3, 2.0),
            Color::WHITE,
        ));
    }
    for shelf in &plan.shelves {
        out.push(BoxInstance::new(shelf.center, shelf.size, palette::SHELF));
        out.push(BoxInstance::new(shelf.edge_center, shelf.edge_size, palette::EDGE));
    }
    for sign in &plan.signs {
        out.push(BoxInstance::new(
            sign.position,
            sign.scale.extend(0.2),
            palette::LABEL,
        ));
    }
    for slot in &plan.slots {
        product_boxes(slot, highlight == Some(slot.index), &mut out);
    }

    out.sort_by_key(|b| !b.is_opaque());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use storewalk_store::{Assortment, StoreConfig};

    #[test]
    fn room_shelves_and_signs_are_drawn() {
        let plan = StorePlan::build(&StoreConfig::default(), &Assortment::default());
        let boxes = store_instances(&plan, None);
        let fixed = 6 + plan.lights.len() + plan.shelves.len() * 2 + plan.signs.len();
        // Every empty slot is one placeholder box.
        assert_eq!(boxes.len(), fixed + plan.slots.len());
    }

    #[test]
    fn translucent_boxes_come_last() {
        let plan = StorePlan::build(&StoreConfig::default(), &Assortment::default());
        let boxes = store_instances(&plan, None);
        let first_translucent = boxes.iter().position(|b| !b.is_opaque()).unwrap();
        assert!(boxes[first_translucent..].iter().all(|b| !b.is_opaque()));
        assert_eq!(boxes.len() - first_translucent, plan.slots.len());
    }

    #[test]
    fn highlight_recolors_one_product() {
        let plan = StorePlan::build(&StoreConfig::default(), &Assortment::featured());
        let parts = plan.slots[5].shape.parts.len();
        let boxes = store_instances(&plan, Some(5));
        let lit = boxes.iter().filter(|b| b.color == HIGHLIGHT).count();
        assert_eq!(lit, parts);
        assert!(store_instances(&plan, None).iter().all(|b| b.color != HIGHLIGHT));
    }

    #[test]
    fn product_box_sits_at_slot() {
        let plan = StorePlan::build(&StoreConfig::default(), &Assortment::featured());
        let slot = &plan.slots[0];
        let mut out = Vec::new();
        product_boxes(slot, false, &mut out);
        let (_, _, translation) = out[0].model.to_scale_rotation_translation();
        assert!(translation.distance(slot.position + slot.shape.parts[0].offset) < 1e-4);
    }
}
