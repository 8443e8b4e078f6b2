use glam::{vec2, vec4, Mat4, UVec2, Vec2, Vec4, Vec4Swizzles};

use crate::PrePassParams;

/// Linear depth is clamped to this value before reprojection, so that cleared
/// texels don't end up dividing by zero.
pub const MIN_LINEAR_DEPTH: f32 = 1e-6;

/// Camera state needed to reproject the current frame onto the previous one.
///
/// Built once per invocation of the camera-blur path and never mutated
/// afterwards.
///
/// Hardware depth is expected to be reversed, i.e. 1 at the near plane and 0
/// at the far plane; linear depth is the view-space distance divided by the
/// far plane's distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameParameters {
    /// Transformation from current-frame clip space into previous-frame clip
    /// space, as supplied by the camera.
    pub reprojection: Mat4,
    pub near_clip: f32,
    pub far_clip: f32,
    /// Size of the buffer being reprojected, in pixels.
    pub size: UVec2,
    /// Whether depth is sampled from the linear-depth buffer instead of the
    /// hardware depth buffer.
    ///
    /// For a given surface, both representations reproject to the same
    /// position.
    pub linear_z: bool,
}

impl FrameParameters {
    /// Maps a current-frame point (see [`CurToPrev::point()`]) into clip
    /// space, with Y flipped, since textures grow downwards.
    ///
    /// For hardware depth `d` the point is `(x, y, d, 1)` and lands in clip
    /// space as-is. For linear depth `l` it's `(x * l, y * l, 1, l)`, for
    /// which Z becomes `rz * (1 - l)`; after the perspective divide that's
    /// `rz * (1 - l) / l`, i.e. reversed hardware depth, where
    /// `rz = near / (far - near)`.
    pub fn pre_mult(&self) -> Mat4 {
        let rcp_half_dim = self.rcp_half_dim();
        let rcp_z_magic = self.rcp_z_magic();

        Mat4::from_cols(
            vec4(rcp_half_dim.x, 0.0, 0.0, 0.0),
            vec4(0.0, -rcp_half_dim.y, 0.0, 0.0),
            vec4(0.0, 0.0, if self.linear_z { rcp_z_magic } else { 1.0 }, 0.0),
            vec4(-1.0, 1.0, if self.linear_z { -rcp_z_magic } else { 0.0 }, 1.0),
        )
    }

    /// Maps clip space back into pixel coordinates.
    pub fn post_mult(&self) -> Mat4 {
        let rcp_half_dim = self.rcp_half_dim();

        Mat4::from_cols(
            vec4(1.0 / rcp_half_dim.x, 0.0, 0.0, 0.0),
            vec4(0.0, -1.0 / rcp_half_dim.y, 0.0, 0.0),
            vec4(0.0, 0.0, 1.0, 0.0),
            vec4(1.0 / rcp_half_dim.x, 1.0 / rcp_half_dim.y, 0.0, 1.0),
        )
    }

    pub fn cur_to_prev(&self) -> CurToPrev {
        CurToPrev {
            xform: self.post_mult() * self.reprojection * self.pre_mult(),
            linear_z: self.linear_z,
        }
    }

    pub fn rcp_buffer_dim(&self) -> Vec2 {
        vec2(1.0 / self.size.x as f32, 1.0 / self.size.y as f32)
    }

    /// Packs this frame into the constant block consumed by the prepass
    /// kernels.
    pub fn serialize(&self, max_temporal_blend: f32) -> PrePassParams {
        PrePassParams {
            cur_to_prev_xform: self.cur_to_prev().xform,
            rcp_buffer_dim: self.rcp_buffer_dim(),
            max_temporal_blend,
            _pad: 0.0,
        }
    }

    fn rcp_half_dim(&self) -> Vec2 {
        vec2(2.0 / self.size.x as f32, 2.0 / self.size.y as f32)
    }

    fn rcp_z_magic(&self) -> f32 {
        self.near_clip / (self.far_clip - self.near_clip)
    }
}

/// Transformation from current-frame pixel coordinates (plus depth) into
/// previous-frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurToPrev {
    pub xform: Mat4,
    pub linear_z: bool,
}

impl CurToPrev {
    /// Builds the homogeneous point the transformation is applied on, exactly
    /// like the kernels do.
    pub fn point(&self, pixel: Vec2, depth: f32) -> Vec4 {
        if self.linear_z {
            let depth = depth.max(MIN_LINEAR_DEPTH);

            (pixel * depth).extend(1.0).extend(depth)
        } else {
            pixel.extend(depth).extend(1.0)
        }
    }

    /// Reprojects given pixel, exactly like the kernels do.
    pub fn reproject(&self, pixel: Vec2, depth: f32) -> Vec2 {
        let prev = self.xform * self.point(pixel, depth);

        prev.xy() / prev.w
    }

    /// Returns the screen-space motion of given pixel, i.e. the offset from
    /// its current position towards its previous one.
    pub fn velocity(&self, pixel: Vec2, depth: f32) -> Vec2 {
        self.reproject(pixel, depth) - pixel
    }
}
