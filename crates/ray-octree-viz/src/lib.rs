//! Shared visualization utilities for ray-built octrees.

use std::hash::{Hash, Hasher};

use macroquad::prelude::*;
use nalgebra::{Point3, Vector3};
use ray_octree::{Aabb, Node, Ray};

pub mod navigator;
pub use navigator::OctreeNavigator;

/// Generates a deterministic color from a box's corners using hashing.
/// The same box keeps its color across frames and rebuilds.
pub fn box_color(aabb: &Aabb<f32>) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for c in aabb.min().iter().chain(aabb.max().iter()) {
        c.to_bits().hash(&mut hasher);
    }
    let hash = hasher.finish();

    let r = (((hash >> 16) & 0xFF) as u8).max(40);
    let g = (((hash >> 8) & 0xFF) as u8).max(40);
    let b = ((hash & 0xFF) as u8).max(40);

    Color::from_rgba(r, g, b, 255)
}

/// Converts a nalgebra point into a macroquad vector.
pub fn to_vec3(p: &Point3<f32>) -> Vec3 {
    vec3(p.x, p.y, p.z)
}

/// Draws the edges of a box.
pub fn draw_aabb(aabb: &Aabb<f32>, color: Color) {
    let extent = aabb.extent();
    draw_cube_wires(
        to_vec3(&aabb.center()),
        vec3(extent.x, extent.y, extent.z),
        color,
    );
}

/// Draws a ray as a segment of `length` direction units.
pub fn draw_ray(ray: &Ray<f32>, length: f32, color: Color) {
    draw_line_3d(to_vec3(&ray.pos()), to_vec3(&ray.at(length)), color);
}

/// Collects the boxes of all leaves below `node`, which occupies `shape`.
pub fn leaf_shapes<P>(node: &Node<P, 8>, shape: Aabb<f32>, out: &mut Vec<Aabb<f32>>) {
    if node.is_leaf() {
        out.push(shape);
        return;
    }
    for (index, child) in node.children().iter().enumerate() {
        if let Some(child) = child {
            leaf_shapes(child, shape.octant(index), out);
        }
    }
}

/// Builds a fan of `count` unit rays from `origin` spread over `spread`
/// radians around `axis`, in the plane spanned by `axis` and `up`.
pub fn ray_fan(
    origin: Point3<f32>,
    axis: Vector3<f32>,
    up: Vector3<f32>,
    count: usize,
    spread: f32,
) -> Vec<Ray<f32>> {
    let side = axis.cross(&up);
    (0..count)
        .filter_map(|i| {
            let t = if count > 1 { i as f32 / (count - 1) as f32 - 0.5 } else { 0.0 };
            let angle = t * spread;
            let dir = axis * angle.cos() + side * angle.sin();
            Ray::new(origin, dir).normalized()
        })
        .collect()
}

/// Eye circling the world origin, steered by mouse drag and scroll.
///
/// The eye always looks at the origin, so the view ray doubles as the ray
/// cast into the octree every frame.
pub struct Viewpoint {
    yaw: f32,
    pitch: f32,
    distance: f32,
    zoom_step: f32,
    zoom: std::ops::RangeInclusive<f32>,
}

impl Viewpoint {
    /// Places the eye `distance` units from the origin at the given angles.
    pub fn new(distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch,
            distance,
            zoom_step: 5.0,
            zoom: 10.0..=200.0,
        }
    }

    /// Sets how far one scroll notch moves the eye and the allowed distances.
    pub fn with_zoom(mut self, step: f32, nearest: f32, farthest: f32) -> Self {
        self.zoom_step = step;
        self.zoom = nearest..=farthest;
        self.distance = self.distance.clamp(nearest, farthest);
        self
    }

    /// Applies this frame's mouse input.
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let drag = mouse_delta_position();
            self.yaw -= drag.x * 2.0;
            self.pitch = (self.pitch - drag.y * 2.0).clamp(-1.5, 1.5);
        }
        self.distance = (self.distance - mouse_wheel().1 * self.zoom_step)
            .clamp(*self.zoom.start(), *self.zoom.end());
    }

    /// Returns the eye position.
    pub fn eye(&self) -> Point3<f32> {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Point3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    /// Returns the macroquad camera looking from the eye at the origin.
    pub fn camera(&self) -> Camera3D {
        Camera3D {
            position: to_vec3(&self.eye()),
            up: Vec3::Y,
            target: Vec3::ZERO,
            ..Default::default()
        }
    }

    /// Returns the unit ray from the eye towards the origin.
    pub fn view_ray(&self) -> Option<Ray<f32>> {
        let eye = self.eye();
        Ray::new(eye, -eye.coords).normalized()
    }
}
