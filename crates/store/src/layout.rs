use crate::catalog::{Assortment, Category, Product};
use crate::config::StoreConfig;
use crate::shape::{ProductShape, shape_for};
use glam::{Vec2, Vec3};
use storewalk_common::Color;

/// Store palette.
pub mod palette {
    use storewalk_common::Color;

    pub const FLOOR: Color = Color::hex(0xf5f5dc);
    pub const WALL: Color = Color::hex(0xfaf9f6);
    pub const ACCENT: Color = Color::hex(0xf5f5dc);
    pub const SHELF: Color = Color::hex(0xd2b48c);
    pub const EDGE: Color = Color::hex(0x8b7b6b);
    pub const LABEL: Color = Color::hex(0xfaf9f6);
    pub const LABEL_TEXT: Color = Color::hex(0x8b7b6b);
    pub const PRICE_TEXT: Color = Color::hex(0xd2b48c);
}

/// Floor, walls and the accent wall behind the last row.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub floor_size: f32,
    pub wall_height: f32,
    pub floor_color: Color,
    pub wall_color: Color,
    pub accent_color: Color,
    pub accent_wall_z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: f32,
    pub range: f32,
}

/// A shelf board with its front edge strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shelf {
    pub row: usize,
    pub level: usize,
    pub center: Vec3,
    pub size: Vec3,
    pub edge_center: Vec3,
    pub edge_size: Vec3,
}

/// Department sign above a row.
#[derive(Debug, Clone, PartialEq)]
pub struct Sign {
    pub row: usize,
    pub department: Category,
    pub position: Vec3,
    pub scale: Vec2,
}

/// Text on a product's price tag.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelText {
    Priced { title: String, price: String },
    Empty(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: LabelText,
    pub position: Vec3,
}

/// One spot on a shelf, stocked or empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSlot {
    /// Position in fill order (row-major, then level, then column).
    pub index: usize,
    pub row: usize,
    pub level: usize,
    pub column: usize,
    pub position: Vec3,
    pub product: Option<Product>,
    pub department: Option<Category>,
    pub shape: ProductShape,
    pub label: Label,
    pub shadow_position: Vec3,
}

impl ProductSlot {
    /// World-space bounds of the product model.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let (min, max) = self.shape.bounds();
        (self.position + min, self.position + max)
    }

    pub fn is_stocked(&self) -> bool {
        self.product.is_some()
    }
}

/// Fully placed store, ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct StorePlan {
    pub room: Room,
    pub lights: Vec<PointLight>,
    pub shelves: Vec<Shelf>,
    pub signs: Vec<Sign>,
    pub slots: Vec<ProductSlot>,
}

impl StorePlan {
    /// Lay out the room, shelves and products.
    ///
    /// Stock is assigned level by level: each level takes a department from
    /// the rotation, and the flat stock list it produces is consumed in
    /// row, level, column order.
    pub fn build(config: &StoreConfig, assortment: &Assortment) -> Self {
        let _span = tracing::debug_span!("store_plan").entered();
        let room_cfg = &config.room;
        let s = &config.shelving;

        let room = Room {
            floor_size: room_cfg.floor_size,
            wall_height: room_cfg.wall_height,
            floor_color: palette::FLOOR,
            wall_color: palette::WALL,
            accent_color: palette::ACCENT,
            accent_wall_z: -room_cfg.floor_size / 2.0 + 0.1,
        };

        let lights = (-room_cfg.lights_per_side..=room_cfg.lights_per_side)
            .map(|i| PointLight {
                position: Vec3::new(i as f32 * room_cfg.light_spacing, room_cfg.light_height, 0.0),
                intensity: room_cfg.light_intensity,
                range: room_cfg.light_range,
            })
            .collect();

        let per_level = s.slots_per_shelf * s.rows;
        let stock: Vec<(Option<Category>, Option<&Product>)> = (0..s.levels)
            .flat_map(|level| {
                let department = cycle(&s.level_departments, level);
                let list = department.map(|d| assortment.products(d)).unwrap_or_default();
                (0..per_level).map(move |i| match department {
                    Some(d) if !list.is_empty() => (Some(d), Some(&list[i % list.len()])),
                    _ => (None, None),
                })
            })
            .collect();

        let mut shelves = Vec::with_capacity(s.rows * s.levels);
        let mut signs = Vec::with_capacity(s.rows);
        let mut slots = Vec::with_capacity(stock.len());

        for row in 0..s.rows {
            let z = s.first_row_z + row as f32 * s.row_spacing;
            for level in 0..s.levels {
                let shelf_y = s.base_y + level as f32 * s.level_spacing;
                shelves.push(Shelf {
                    row,
                    level,
                    center: Vec3::new(0.0, shelf_y, z),
                    size: Vec3::new(s.width, s.thickness, s.depth),
                    edge_center: Vec3::new(0.0, shelf_y + s.edge_offset[0], z + s.edge_offset[1]),
                    edge_size: Vec3::from_array(s.edge_size),
                });
                if level == 0 {
                    if let Some(department) = cycle(&s.row_signs, row) {
                        signs.push(Sign {
                            row,
                            department,
                            position: Vec3::new(0.0, shelf_y + s.sign_offset_y, z),
                            scale: Vec2::new(14.0, 3.0),
                        });
                    }
                }

                for column in 0..s.slots_per_shelf {
                    let index = slots.len();
                    let (department, product) = stock.get(index).copied().unwrap_or((None, None));
                    let position = Vec3::new(
                        s.first_slot_x + column as f32 * s.slot_spacing,
                        shelf_y + s.product_height / 2.0,
                        z,
                    );
                    slots.push(slot(config, index, (row, level, column), position, department, product));
                }
            }
        }

        tracing::debug!(
            shelves = shelves.len(),
            slots = slots.len(),
            stocked = slots.iter().filter(|s| s.is_stocked()).count(),
            "store planned"
        );

        Self {
            room,
            lights,
            shelves,
            signs,
            slots,
        }
    }

    pub fn stocked(&self) -> impl Iterator<Item = &ProductSlot> {
        self.slots.iter().filter(|s| s.is_stocked())
    }

    pub fn slot(&self, index: usize) -> Option<&ProductSlot> {
        self.slots.get(index)
    }
}

/// Entry `i` of a repeating rotation, `None` when the rotation is empty.
fn cycle(rotation: &[Category], i: usize) -> Option<Category> {
    if rotation.is_empty() {
        None
    } else {
        Some(rotation[i % rotation.len()])
    }
}

fn slot(
    config: &StoreConfig,
    index: usize,
    (row, level, column): (usize, usize, usize),
    position: Vec3,
    department: Option<Category>,
    product: Option<&Product>,
) -> ProductSlot {
    let labels = &config.labels;
    let (shape, text) = match product {
        Some(p) => (
            shape_for(p, department),
            LabelText::Priced {
                title: p.title.chars().take(labels.title_chars).collect(),
                price: config.prices.format(p.price),
            },
        ),
        None => (
            ProductShape::placeholder(),
            LabelText::Empty(labels.empty_text.clone()),
        ),
    };
    ProductSlot {
        index,
        row,
        level,
        column,
        position,
        product: product.cloned(),
        department,
        shape,
        label: Label {
            text,
            position: position + Vec3::Y * labels.offset_y,
        },
        shadow_position: position + Vec3::Y * labels.shadow_offset_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn featured_plan() -> StorePlan {
        StorePlan::build(&StoreConfig::default(), &Assortment::featured())
    }

    #[test]
    fn default_store_dimensions() {
        let plan = featured_plan();
        assert_eq!(plan.lights.len(), 7);
        assert_eq!(plan.lights[0].position, Vec3::new(-96.0, 48.0, 0.0));
        assert_eq!(plan.shelves.len(), 18);
        assert_eq!(plan.signs.len(), 3);
        assert_eq!(plan.slots.len(), 3 * 6 * 14);
        assert_eq!(plan.stocked().count(), plan.slots.len());
        assert!((plan.room.accent_wall_z + 79.9).abs() < 1e-4);
    }

    #[test]
    fn shelves_and_edges_follow_grid() {
        let plan = featured_plan();
        let shelf = plan
            .shelves
            .iter()
            .find(|s| s.row == 1 && s.level == 2)
            .unwrap();
        assert_eq!(shelf.center, Vec3::new(0.0, 18.0, -10.0));
        assert_eq!(shelf.edge_center, Vec3::new(0.0, 19.5, -5.5));
    }

    #[test]
    fn signs_cycle_departments() {
        let plan = featured_plan();
        let names: Vec<_> = plan.signs.iter().map(|s| s.department).collect();
        assert_eq!(names, vec![Category::Cosmetics, Category::Electronics, Category::Books]);
        assert_eq!(plan.signs[0].position, Vec3::new(0.0, 10.0, -40.0));
    }

    #[test]
    fn empty_rotations_leave_store_bare() {
        let mut config = StoreConfig::default();
        config.shelving.row_signs.clear();
        config.shelving.level_departments.clear();
        let plan = StorePlan::build(&config, &Assortment::featured());
        assert!(plan.signs.is_empty());
        assert_eq!(plan.shelves.len(), 18);
        assert_eq!(plan.slots.len(), 3 * 6 * 14);
        assert_eq!(plan.stocked().count(), 0);
        assert!(plan.pick(Vec3::new(0.0, 12.0, 60.0), Vec3::NEG_Z).is_none());
    }

    #[test]
    fn products_sit_on_their_shelf() {
        let plan = featured_plan();
        let slot = &plan.slots[0];
        assert_eq!(slot.position, Vec3::new(-39.0, 4.0 + 2.8125, -40.0));
        let last = plan.slots.last().unwrap();
        assert_eq!(last.column, 13);
        assert!((last.position.x - (-39.0 + 13.0 * 6.5)).abs() < 1e-4);
    }

    #[test]
    fn fill_order_rotates_departments_by_level_block() {
        let plan = featured_plan();
        let per_level = 14 * 3;
        // First block of stock is cosmetics, the third is electronics.
        assert_eq!(plan.slots[0].department, Some(Category::Cosmetics));
        assert_eq!(plan.slots[2 * per_level].department, Some(Category::Electronics));
        assert_eq!(plan.slots[4 * per_level].department, Some(Category::Books));
        // Within a block the department list repeats.
        let cosmetics = Assortment::featured().products(Category::Cosmetics).len();
        assert_eq!(plan.slots[cosmetics].product, plan.slots[0].product);
    }

    #[test]
    fn labels_truncate_and_price() {
        let plan = featured_plan();
        let headphones = plan
            .stocked()
            .find(|s| s.product.as_ref().unwrap().title == "Bluetooth Headphones")
            .unwrap();
        match &headphones.label.text {
            LabelText::Priced { title, price } => {
                assert_eq!(title, "Bluetooth Headphon");
                assert_eq!(price, "₹212415");
            }
            other => panic!("unexpected label {other:?}"),
        }
        assert!((headphones.label.position.y - headphones.position.y - 5.5).abs() < 1e-4);
    }

    #[test]
    fn empty_departments_leave_placeholders() {
        let plan = StorePlan::build(&StoreConfig::default(), &Assortment::default());
        assert_eq!(plan.stocked().count(), 0);
        let slot = &plan.slots[0];
        assert_eq!(slot.shape, ProductShape::placeholder());
        assert_eq!(slot.label.text, LabelText::Empty("Coming Soon".into()));
    }

    #[test]
    fn slot_bounds_are_finite_and_nonempty() {
        let plan = featured_plan();
        for slot in plan.stocked() {
            let (min, max) = slot.bounds();
            assert!(min.is_finite() && max.is_finite());
            assert!(min.cmplt(max).all(), "slot {} has empty bounds", slot.index);
        }
    }
}
