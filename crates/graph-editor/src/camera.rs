use glam::{Mat4, Vec2, Vec3};

use crate::settings::DragPlaneSettings;

const PARALLEL_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Point where the ray meets `plane`, if it does.
    ///
    /// Rays running parallel to the plane, or pointing away from it, have
    /// no intersection.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vec3> {
        let denom = plane.normal.dot(self.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = (plane.distance - plane.normal.dot(self.origin)) / denom;
        if t < 0.0 || !t.is_finite() {
            return None;
        }
        Some(self.at(t))
    }
}

/// Infinite plane of points `p` with `normal · p == distance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Plane through the origin, facing the default view axis.
    pub const XY: Plane = Plane {
        normal: Vec3::Z,
        distance: 0.0,
    };

    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self {
            normal: normal.normalize_or(Vec3::Z),
            distance,
        }
    }

    /// Point of the plane closest to the world origin.
    pub fn origin(&self) -> Vec3 {
        self.normal * self.distance
    }
}

impl From<DragPlaneSettings> for Plane {
    fn from(settings: DragPlaneSettings) -> Self {
        Plane::new(Vec3::from_array(settings.normal), settings.distance)
    }
}

/// Turns a pointer position into a world-space ray.
///
/// Implemented by whatever owns the camera; the editor never looks at the
/// camera itself.
pub trait RayCaster {
    fn ray_from_pointer(&self, pointer: Vec2) -> Option<Ray>;
}

/// Perspective camera looking from `eye` towards `target`.
///
/// Pointer coordinates are in pixels with the origin at the top-left of a
/// `viewport`-sized surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub viewport: Vec2,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 75f32.to_radians(),
            viewport: Vec2::new(800.0, 600.0),
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl PerspectiveCamera {
    pub fn view_projection(&self) -> Mat4 {
        let aspect = self.viewport.x / self.viewport.y.max(1.0);
        let projection =
            Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far);
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        projection * view
    }

    /// Pixel position of a world point, or `None` when it sits behind the
    /// camera.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        ))
    }
}

impl RayCaster for PerspectiveCamera {
    fn ray_from_pointer(&self, pointer: Vec2) -> Option<Ray> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }
        let ndc = Vec2::new(
            2.0 * pointer.x / self.viewport.x - 1.0,
            1.0 - 2.0 * pointer.y / self.viewport.y,
        );
        let inverse = self.view_projection().inverse();
        // perspective_rh maps depth to [0, 1].
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        let direction = (far - near).try_normalize()?;
        Some(Ray::new(near, direction))
    }
}
