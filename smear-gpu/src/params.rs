use bytemuck::{Pod, Zeroable};
use glam::{vec2, Mat4, Vec2};

/// Constant block consumed by the camera-velocity and camera-motion-blur
/// prepass kernels.
///
/// Matches `PrePassParams` in `prepass_params.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PrePassParams {
    /// Maps a current-frame point into homogeneous pixel coordinates of the
    /// previous frame; see [`crate::CurToPrev::point()`] for how the point is
    /// built from either depth format.
    pub cur_to_prev_xform: Mat4,
    pub rcp_buffer_dim: Vec2,
    pub max_temporal_blend: f32,
    pub _pad: f32,
}

/// Four 32-bit inline constants pushed right before a dispatch.
///
/// Their meaning depends on the kernel - see the constructors.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct RootConstants {
    pub words: [u32; 4],
}

impl RootConstants {
    /// Constants of the motion-blur final pass.
    pub fn motion_blur(
        rcp_buffer_dim: Vec2,
        max_sample_count: u32,
        step_size: f32,
    ) -> Self {
        Self {
            words: [
                rcp_buffer_dim.x.to_bits(),
                rcp_buffer_dim.y.to_bits(),
                max_sample_count,
                step_size.to_bits(),
            ],
        }
    }

    /// Constants of the temporal-blend pass; when `coverage_aware` is set, the
    /// kernel treats scene color's alpha channel as blur coverage (written by
    /// the temporal variant of the final pass) and damps history accordingly.
    pub fn temporal_blend(
        rcp_buffer_dim: Vec2,
        max_temporal_blend: f32,
        coverage_aware: bool,
    ) -> Self {
        Self {
            words: [
                rcp_buffer_dim.x.to_bits(),
                rcp_buffer_dim.y.to_bits(),
                max_temporal_blend.to_bits(),
                coverage_aware as u32,
            ],
        }
    }

    pub fn rcp_buffer_dim(&self) -> Vec2 {
        vec2(f32::from_bits(self.words[0]), f32::from_bits(self.words[1]))
    }
}

#[cfg(test)]
mod tests {
    use std::mem;

    use super::*;

    #[test]
    fn layout() {
        assert_eq!(80, mem::size_of::<PrePassParams>());
        assert_eq!(16, mem::size_of::<RootConstants>());
    }

    #[test]
    fn motion_blur_constants() {
        let target = RootConstants::motion_blur(vec2(0.5, 0.25), 10, 4.0);

        assert_eq!(vec2(0.5, 0.25), target.rcp_buffer_dim());
        assert_eq!(10, target.words[2]);
        assert_eq!(4.0, f32::from_bits(target.words[3]));
    }

    #[test]
    fn temporal_blend_constants() {
        let target = RootConstants::temporal_blend(vec2(1.0, 2.0), 0.75, true);

        assert_eq!(vec2(1.0, 2.0), target.rcp_buffer_dim());
        assert_eq!(0.75, f32::from_bits(target.words[2]));
        assert_eq!(1, target.words[3]);
    }
}
