use crate::{MaterialId, Sphere, Triangle};
use prism_bvh::Primitive;
use prism_math::{Aabb, Interval, Ray, Vec3};

/// Shading accessors a renderer needs once a query has found the object.
///
/// Kept separate from [`Primitive`] because the acceleration structures
/// never call them.
pub trait Surface: Primitive {
    /// Unit surface normal at a point on the object.
    fn normal_at(&self, point: Vec3) -> Vec3;

    fn material(&self) -> MaterialId;
}

/// Any object a scene can hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Triangle(Triangle),
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Triangle> for Shape {
    fn from(triangle: Triangle) -> Self {
        Shape::Triangle(triangle)
    }
}

impl Primitive for Shape {
    fn bounding_box(&self) -> Aabb {
        match self {
            Shape::Sphere(s) => s.bounding_box(),
            Shape::Triangle(t) => t.bounding_box(),
        }
    }

    fn centroid(&self) -> Vec3 {
        match self {
            Shape::Sphere(s) => s.centroid(),
            Shape::Triangle(t) => t.centroid(),
        }
    }

    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        match self {
            Shape::Sphere(s) => s.intersect(ray, ray_t),
            Shape::Triangle(t) => t.intersect(ray, ray_t),
        }
    }
}

impl Surface for Shape {
    fn normal_at(&self, point: Vec3) -> Vec3 {
        match self {
            Shape::Sphere(s) => s.normal_at(point),
            Shape::Triangle(t) => t.normal_at(point),
        }
    }

    fn material(&self) -> MaterialId {
        match self {
            Shape::Sphere(s) => s.material(),
            Shape::Triangle(t) => t.material(),
        }
    }
}
