use glam::{Affine3A, Mat4, Vec3};

/// Perspective camera (projection only; placement comes from the owning node).
#[derive(Debug, Clone)]
pub struct Camera {
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    // Cached, renderer read-only
    pub(crate) projection_matrix: Mat4,
}

impl Camera {
    /// `fov_degrees` is the vertical field of view.
    #[must_use]
    pub fn new_perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
            projection_matrix: Mat4::IDENTITY,
        };
        cam.update_projection_matrix();
        cam
    }

    /// Non-finite or non-positive ratios are ignored.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
            self.update_projection_matrix();
        }
    }

    pub fn update_projection_matrix(&mut self) {
        // glam's perspective_rh targets the wgpu/Vulkan [0, 1] depth range
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    /// Snapshot of everything a backend needs to draw from this camera.
    #[must_use]
    pub fn extract_render_camera(&self, world: &Affine3A) -> RenderCamera {
        let view = Mat4::from(*world).inverse();
        RenderCamera {
            position: Vec3::from(world.translation),
            view,
            projection: self.projection_matrix,
            view_projection: self.projection_matrix * view,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCamera {
    pub position: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
}
