//! WGSL sources of smear's compute kernels.
//!
//! Kernels that exist in several variants (depth format, temporal output) are
//! assembled from a small header selecting the variant and a shared body.

pub const CAMERA_VELOCITY: &str = concat!(
    include_str!("../shaders/depth_hyperbolic.wgsl"),
    include_str!("../shaders/prepass_params.wgsl"),
    include_str!("../shaders/camera_velocity.wgsl"),
);

pub const CAMERA_VELOCITY_LINEAR_Z: &str = concat!(
    include_str!("../shaders/depth_linear.wgsl"),
    include_str!("../shaders/prepass_params.wgsl"),
    include_str!("../shaders/camera_velocity.wgsl"),
);

pub const CAMERA_MOTION_BLUR_PREPASS: &str = concat!(
    include_str!("../shaders/depth_hyperbolic.wgsl"),
    include_str!("../shaders/prepass_params.wgsl"),
    include_str!("../shaders/camera_motion_blur_prepass.wgsl"),
);

pub const CAMERA_MOTION_BLUR_PREPASS_LINEAR_Z: &str = concat!(
    include_str!("../shaders/depth_linear.wgsl"),
    include_str!("../shaders/prepass_params.wgsl"),
    include_str!("../shaders/camera_motion_blur_prepass.wgsl"),
);

pub const MOTION_BLUR_PREPASS: &str =
    include_str!("../shaders/motion_blur_prepass.wgsl");

pub const MOTION_BLUR_FINAL_PASS: &str = concat!(
    include_str!("../shaders/spatial.wgsl"),
    include_str!("../shaders/motion_blur_final_pass.wgsl"),
);

pub const MOTION_BLUR_FINAL_PASS_TEMPORAL: &str = concat!(
    include_str!("../shaders/temporal.wgsl"),
    include_str!("../shaders/motion_blur_final_pass.wgsl"),
);

pub const TEMPORAL_BLEND: &str =
    include_str!("../shaders/temporal_blend.wgsl");

/// Entry point shared by every kernel.
pub const ENTRY_POINT: &str = "main";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_differ_only_in_headers() {
        assert!(CAMERA_VELOCITY.contains("texture_depth_2d"));
        assert!(CAMERA_VELOCITY_LINEAR_Z.contains("texture_2d<f32>"));
        assert!(MOTION_BLUR_FINAL_PASS.starts_with("const TEMPORAL: bool = false;"));
        assert!(MOTION_BLUR_FINAL_PASS_TEMPORAL.starts_with("const TEMPORAL: bool = true;"));

        for source in [
            CAMERA_VELOCITY,
            CAMERA_VELOCITY_LINEAR_Z,
            CAMERA_MOTION_BLUR_PREPASS,
            CAMERA_MOTION_BLUR_PREPASS_LINEAR_Z,
            MOTION_BLUR_PREPASS,
            MOTION_BLUR_FINAL_PASS,
            MOTION_BLUR_FINAL_PASS_TEMPORAL,
            TEMPORAL_BLEND,
        ] {
            assert!(source.contains("fn main("));
        }
    }

    #[test]
    fn depth_headers_build_their_own_points() {
        for source in [CAMERA_VELOCITY, CAMERA_MOTION_BLUR_PREPASS] {
            assert!(source.contains("vec4<f32>(pixel, depth, 1.0)"));
        }

        for source in [
            CAMERA_VELOCITY_LINEAR_Z,
            CAMERA_MOTION_BLUR_PREPASS_LINEAR_Z,
        ] {
            assert!(source.contains("vec4<f32>(pixel * w, 1.0, w)"));
            assert!(!source.contains("vec4<f32>(pixel, depth, 1.0)"));
        }
    }
}
