use glam::{Mat4, Vec2, Vec3, Vec4};

/// A ray in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to the horizontal plane `y = height`, if it is
    /// hit in front of the origin.
    pub fn hit_horizontal_plane(&self, height: f32) -> Option<f32> {
        if self.direction.y.abs() < 1e-8 {
            return None;
        }
        let t = (height - self.origin.y) / self.direction.y;
        (t >= 0.0).then_some(t)
    }
}

/// Right-handed perspective camera with GL clip space.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl PerspectiveCamera {
    /// Straight-down view used by the gallery; screen-up is world -Z.
    pub fn overhead(height: f32, fov_y_degrees: f32, aspect: f32) -> Self {
        Self {
            fov_y_degrees,
            aspect,
            near: 0.1,
            far: 1000.0,
            eye: Vec3::new(0.0, height, 0.0),
            target: Vec3::ZERO,
            up: Vec3::NEG_Z,
        }
    }

    pub fn looking_at(eye: Vec3, target: Vec3, fov_y_degrees: f32, aspect: f32) -> Self {
        Self {
            fov_y_degrees,
            aspect,
            near: 0.1,
            far: 1000.0,
            eye,
            target,
            up: Vec3::Y,
        }
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.aspect = (width / height) as f32;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Ray from the eye through a point given in normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let near = inv * Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;
        Ray::new(near, far - near)
    }

    /// Inverse of [`Self::ray_from_ndc`] for a world point; `None` behind the eye.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * world.extend(1.0);
        (clip.w > 0.0).then(|| Vec2::new(clip.x / clip.w, clip.y / clip.w))
    }
}

/// Client-pixel position inside `rect` (left, top, width, height) to NDC.
pub fn ndc_from_client(x: f64, y: f64, rect: [f64; 4]) -> Option<Vec2> {
    let [left, top, width, height] = rect;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let nx = ((x - left) / width) * 2.0 - 1.0;
    let ny = -((y - top) / height) * 2.0 + 1.0;
    Some(Vec2::new(nx as f32, ny as f32))
}
