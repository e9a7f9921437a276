//! Product shapes as data: a keyword table maps a product to primitive
//! parts and a surface finish, with no renderer involved.

use crate::catalog::{Category, Product};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_4, PI};
use storewalk_common::Color;

/// Geometric primitives, centered on their local origin. Cylinders, cones
/// and tori follow the usual Y-up / XY-plane conventions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Box { size: Vec3 },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32 },
    Sphere { radius: f32 },
    Cone { radius: f32, height: f32 },
    Torus { radius: f32, tube: f32, arc: f32 },
}

impl Primitive {
    /// Half extents of the axis-aligned bounds.
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            Self::Box { size } => size * 0.5,
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => {
                let r = radius_top.max(radius_bottom);
                Vec3::new(r, height * 0.5, r)
            }
            Self::Sphere { radius } => Vec3::splat(radius),
            Self::Cone { radius, height } => Vec3::new(radius, height * 0.5, radius),
            Self::Torus { radius, tube, .. } => Vec3::new(radius + tube, radius + tube, tube),
        }
    }
}

/// Surface finish. `textured` parts carry the product thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Finish {
    pub tint: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub clearcoat: f32,
    pub textured: bool,
}

impl Finish {
    const fn textured(roughness: f32, metalness: f32) -> Self {
        Self {
            tint: Color::WHITE,
            roughness,
            metalness,
            clearcoat: 0.0,
            textured: true,
        }
    }

    const fn plain(rgb: u32, roughness: f32, metalness: f32) -> Self {
        Self {
            tint: Color::hex(rgb),
            roughness,
            metalness,
            clearcoat: 0.0,
            textured: false,
        }
    }

    const fn tinted(self, rgb: u32) -> Self {
        Self {
            tint: Color::hex(rgb),
            ..self
        }
    }

    const fn with_clearcoat(self, clearcoat: f32) -> Self {
        Self { clearcoat, ..self }
    }
}

impl Default for Finish {
    fn default() -> Self {
        Self::textured(1.0, 0.0)
    }
}

/// One primitive placed relative to the product origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub primitive: Primitive,
    pub offset: Vec3,
    pub scale: Vec3,
    /// Rotation about Z in radians.
    pub tilt: f32,
    pub finish: Finish,
}

impl Part {
    pub fn new(primitive: Primitive, finish: Finish) -> Self {
        Self {
            primitive,
            offset: Vec3::ZERO,
            scale: Vec3::ONE,
            tilt: 0.0,
            finish,
        }
    }

    pub fn at(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn scaled(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn tilted(mut self, tilt: f32) -> Self {
        self.tilt = tilt;
        self
    }

    /// Local bounds as `(min, max)`. Tilted parts use a square XY envelope.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut half = self.primitive.half_extents() * self.scale;
        if self.tilt != 0.0 {
            let r = half.x.hypot(half.y);
            half.x = r;
            half.y = r;
        }
        (self.offset - half, self.offset + half)
    }
}

/// The parts that make up one product model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductShape {
    pub parts: Vec<Part>,
}

impl ProductShape {
    fn single(part: Part) -> Self {
        Self { parts: vec![part] }
    }

    /// Union of the part bounds, relative to the product origin.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.parts.iter().map(Part::bounds).fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), (min, max)| (lo.min(min), hi.max(max)),
        )
    }

    /// Fallback model for products no rule matches.
    pub fn default_box() -> Self {
        Self::single(Part::new(
            Primitive::Box {
                size: Vec3::splat(4.5),
            },
            Finish::default(),
        ))
    }

    /// Translucent stand-in for an empty slot.
    pub fn placeholder() -> Self {
        Self::single(Part::new(
            Primitive::Box {
                size: Vec3::splat(5.5),
            },
            Finish {
                tint: Color::hex(0xfff1e6).with_alpha(0.7),
                textured: false,
                ..Finish::default()
            },
        ))
    }
}

/// What a rule matches on.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Any keyword contained in the lowercased title.
    Keywords(&'static [&'static str]),
    /// Membership in a department.
    Department(Category),
}

/// A row of the shape table.
pub struct ShapeRule {
    pub matcher: Matcher,
    pub category: Category,
    pub build: fn() -> ProductShape,
}

const GLOSS: Finish = Finish::textured(0.18, 0.5);

fn lipstick() -> ProductShape {
    let body = Finish::textured(0.25, 0.5).with_clearcoat(0.7);
    ProductShape {
        parts: vec![
            Part::new(cylinder(0.5, 0.5, 3.2), body),
            Part::new(cylinder(0.52, 0.52, 1.1), Finish::plain(0x222222, 0.1, 0.8))
                .at(Vec3::new(0.0, 2.15, 0.0)),
        ],
    }
}

fn perfume() -> ProductShape {
    ProductShape {
        parts: vec![
            Part::new(Primitive::Sphere { radius: 1.3 }, Finish::textured(0.18, 0.6)),
            Part::new(Primitive::Sphere { radius: 0.4 }, Finish::plain(0x888888, 0.2, 0.9))
                .at(Vec3::new(0.0, 1.5, 0.0)),
        ],
    }
}

fn jar() -> ProductShape {
    ProductShape::single(Part::new(cylinder(1.2, 1.2, 2.2), Finish::textured(0.3, 0.2)))
}

fn pouch() -> ProductShape {
    ProductShape::single(Part::new(cuboid(2.2, 1.2, 1.2), Finish::textured(0.4, 0.1)))
}

fn headphones() -> ProductShape {
    let cup = Primitive::Torus {
        radius: 0.7,
        tube: 0.25,
        arc: 2.0 * PI,
    };
    let finish = Finish::textured(0.2, 0.7);
    ProductShape {
        parts: vec![
            Part::new(cup, finish).at(Vec3::new(-0.8, 0.0, 0.0)),
            Part::new(cup, finish).at(Vec3::new(0.8, 0.0, 0.0)),
            Part::new(
                Primitive::Torus {
                    radius: 1.1,
                    tube: 0.09,
                    arc: PI,
                },
                Finish::plain(0x222222, 0.1, 0.8),
            )
            .at(Vec3::new(0.0, 0.7, 0.0)),
        ],
    }
}

fn watch() -> ProductShape {
    ProductShape::single(Part::new(cuboid(1.2, 1.2, 0.3), GLOSS))
}

fn slate() -> ProductShape {
    ProductShape::single(Part::new(cuboid(1.8, 2.8, 0.25), GLOSS))
}

fn mouse() -> ProductShape {
    ProductShape::single(
        Part::new(Primitive::Sphere { radius: 0.7 }, GLOSS).scaled(Vec3::new(1.2, 0.7, 1.7)),
    )
}

fn speaker() -> ProductShape {
    ProductShape::single(Part::new(cylinder(0.8, 0.8, 1.6), GLOSS))
}

fn keyboard() -> ProductShape {
    ProductShape::single(Part::new(cuboid(2.8, 0.3, 1.2), GLOSS))
}

fn charger() -> ProductShape {
    ProductShape::single(Part::new(cuboid(0.7, 0.7, 0.7), GLOSS))
}

fn book() -> ProductShape {
    ProductShape::single(Part::new(cuboid(2.8, 4.2, 0.5), Finish::textured(0.8, 0.05)))
}

const FRUIT: Finish = Finish::textured(0.25, 0.1);

fn grapes() -> ProductShape {
    let mut parts = Vec::with_capacity(9);
    for gx in [-0.5, 0.0, 0.5] {
        for gy in [-0.5, 0.0, 0.5] {
            let grape = Part::new(Primitive::Sphere { radius: 0.35 }, FRUIT);
            parts.push(grape.at(Vec3::new(gx, gy, 0.0)));
        }
    }
    ProductShape { parts }
}

fn watermelon() -> ProductShape {
    ProductShape::single(Part::new(Primitive::Sphere { radius: 1.5 }, FRUIT))
}

fn round_fruit() -> ProductShape {
    ProductShape::single(Part::new(Primitive::Sphere { radius: 1.1 }, FRUIT))
}

fn banana() -> ProductShape {
    ProductShape::single(
        Part::new(cylinder(0.3, 0.25, 2.2), Finish::textured(0.3, 0.1).tinted(0xffff99))
            .tilted(FRAC_PI_4),
    )
}

fn strawberry() -> ProductShape {
    ProductShape::single(Part::new(
        Primitive::Cone {
            radius: 0.7,
            height: 1.2,
        },
        Finish::textured(0.3, 0.1).tinted(0xff4f4f),
    ))
}

fn shoe() -> ProductShape {
    ProductShape::single(
        Part::new(Primitive::Sphere { radius: 0.7 }, Finish::textured(0.35, 0.2))
            .scaled(Vec3::new(2.2, 0.7, 1.1)),
    )
}

fn cylinder(radius_top: f32, radius_bottom: f32, height: f32) -> Primitive {
    Primitive::Cylinder {
        radius_top,
        radius_bottom,
        height,
    }
}

fn cuboid(x: f32, y: f32, z: f32) -> Primitive {
    Primitive::Box {
        size: Vec3::new(x, y, z),
    }
}

/// Rules in priority order; the first match wins.
pub static SHAPE_TABLE: &[ShapeRule] = &[
    rule(&["lipstick"], Category::Cosmetics, lipstick),
    rule(&["perfume"], Category::Cosmetics, perfume),
    rule(&["cream", "makeup", "shampoo"], Category::Cosmetics, jar),
    rule(&["pouch"], Category::Cosmetics, pouch),
    rule(&["headphones"], Category::Electronics, headphones),
    rule(&["watch"], Category::Electronics, watch),
    rule(&["tablet", "mobile"], Category::Electronics, slate),
    rule(&["mouse"], Category::Electronics, mouse),
    rule(&["speaker"], Category::Electronics, speaker),
    rule(&["keyboard"], Category::Electronics, keyboard),
    rule(&["charger"], Category::Electronics, charger),
    ShapeRule {
        matcher: Matcher::Department(Category::Books),
        category: Category::Books,
        build: book,
    },
    rule(&["grapes"], Category::Fruits, grapes),
    rule(&["watermelon"], Category::Fruits, watermelon),
    rule(&["apple", "orange"], Category::Fruits, round_fruit),
    rule(&["banana"], Category::Fruits, banana),
    rule(&["strawberry"], Category::Fruits, strawberry),
    rule(
        &["sneaker", "shoe", "sandals", "flip flops", "formal"],
        Category::Footwear,
        shoe,
    ),
];

const fn rule(
    keywords: &'static [&'static str],
    category: Category,
    build: fn() -> ProductShape,
) -> ShapeRule {
    ShapeRule {
        matcher: Matcher::Keywords(keywords),
        category,
        build,
    }
}

impl ShapeRule {
    fn matches(&self, title: &str, department: Option<Category>) -> bool {
        match self.matcher {
            Matcher::Keywords(words) => words.iter().any(|w| title.contains(w)),
            Matcher::Department(c) => department == Some(c),
        }
    }
}

/// Model for `product`, given the department it is shelved under.
pub fn shape_for(product: &Product, department: Option<Category>) -> ProductShape {
    let title = product.title.to_lowercase();
    SHAPE_TABLE
        .iter()
        .find(|r| r.matches(&title, department))
        .map(|r| (r.build)())
        .unwrap_or_else(ProductShape::default_box)
}

/// Department implied by a title's keywords, if any.
pub fn classify(title: &str) -> Option<Category> {
    let title = title.to_lowercase();
    SHAPE_TABLE
        .iter()
        .find(|r| matches!(r.matcher, Matcher::Keywords(_)) && r.matches(&title, None))
        .map(|r| r.category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Assortment;

    fn product(title: &str) -> Product {
        Product {
            id: None,
            title: title.to_string(),
            price: 1.0,
            thumbnail: String::new(),
            description: None,
        }
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let shape = shape_for(&product("LIPSTICK Set"), None);
        assert_eq!(shape.parts.len(), 2);
        assert!(shape.parts[0].finish.clearcoat > 0.0);
    }

    #[test]
    fn first_matching_rule_wins() {
        // Both "cream" and "pouch" match; the cream row comes first.
        let shape = shape_for(&product("Cream Pouch"), None);
        assert_eq!(shape, jar());
    }

    #[test]
    fn books_match_by_department() {
        let a = Assortment::featured();
        let gatsby = &a.products(Category::Books)[0];
        assert_eq!(shape_for(gatsby, Some(Category::Books)), book());
        assert_eq!(shape_for(gatsby, None), ProductShape::default_box());
    }

    #[test]
    fn grapes_are_a_bunch() {
        let shape = shape_for(&product("Grapes"), Some(Category::Fruits));
        assert_eq!(shape.parts.len(), 9);
        let (min, max) = shape.bounds();
        assert!((max.x - 0.85).abs() < 1e-5);
        assert!((min.y + 0.85).abs() < 1e-5);
    }

    #[test]
    fn every_featured_product_has_a_rule() {
        let a = Assortment::featured();
        for c in Category::ALL {
            for p in a.products(c) {
                let shape = shape_for(p, Some(c));
                assert_ne!(shape, ProductShape::default_box(), "{} fell through", p.title);
            }
        }
    }

    #[test]
    fn unknown_product_is_a_box() {
        let shape = shape_for(&product("Desk Lamp"), None);
        let (min, max) = shape.bounds();
        assert_eq!(max - min, Vec3::splat(4.5));
    }

    #[test]
    fn classify_uses_keywords_only() {
        assert_eq!(classify("Trail Running Shoe"), Some(Category::Footwear));
        assert_eq!(classify("Orange Juice"), Some(Category::Fruits));
        assert_eq!(classify("Harry Potter"), None);
    }

    #[test]
    fn placeholder_is_translucent() {
        let shape = ProductShape::placeholder();
        assert!(!shape.parts[0].finish.tint.is_opaque());
        assert!(!shape.parts[0].finish.textured);
    }

    #[test]
    fn tilted_banana_bounds_cover_rotation() {
        let shape = banana();
        let (min, max) = shape.bounds();
        let r = 0.3_f32.hypot(1.1);
        assert!((max.x - r).abs() < 1e-5 && (max.y - r).abs() < 1e-5);
        assert!((min.z + 0.3).abs() < 1e-5);
    }
}
