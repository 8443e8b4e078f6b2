use glam::{Mat4, UVec2};
use log::{debug, trace};

use crate::gpu::FrameParameters;
use crate::{
    CommandContext, EffectConfig, EffectMode, MotionBlurPasses, ProfileScope,
    ResourceId, ResourceSet, Step,
};

/// Per-frame camera state required by the camera-blur path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraBlurInputs {
    /// Transformation from this frame's clip space into the previous frame's
    /// clip space, i.e. `prev_view_proj * curr_view_proj.inverse()`, with
    /// both projections using reversed depth.
    pub reprojection: Mat4,
    pub near_clip: f32,
    pub far_clip: f32,
    /// Whether to read depth from [`ResourceId::LinearDepth`] instead of
    /// [`ResourceId::SceneDepth`].
    pub linear_z: bool,
}

impl CameraBlurInputs {
    pub fn frame_parameters(&self, size: UVec2) -> FrameParameters {
        FrameParameters {
            reprojection: self.reprojection,
            near_clip: self.near_clip,
            far_clip: self.far_clip,
            size,
            linear_z: self.linear_z,
        }
    }
}

/// Motion blur and temporal AA.
///
/// Doesn't hold any GPU state on its own: every entry point records its work
/// into given [`CommandContext`], transitioning resources of given
/// [`ResourceSet`] as it goes.
#[derive(Debug, Default)]
pub struct MotionBlur {
    passes: MotionBlurPasses,
}

impl MotionBlur {
    pub fn new() -> Self {
        debug!("Initializing motion blur");

        Self {
            passes: MotionBlurPasses::new(),
        }
    }

    /// Blurs scene color along the motion caused by the camera and, if
    /// enabled, resolves temporal AA.
    ///
    /// `frame` is the caller's frame counter; it selects which history buffer
    /// gets written this frame.
    pub fn render_camera_blur(
        &self,
        ctx: &mut dyn CommandContext,
        resources: &mut ResourceSet,
        config: &EffectConfig,
        frame: u64,
        inputs: &CameraBlurInputs,
    ) {
        let mut ctx = ProfileScope::new(ctx, "MotionBlur");
        let mode = config.mode();

        if mode == EffectMode::Disabled {
            return;
        }

        trace!("Rendering camera blur; frame={frame}, mode={mode:?}");

        let params = inputs
            .frame_parameters(resources.size(ResourceId::SceneColor))
            .serialize(config.temporal_blend_factor());

        ctx.set_constant_block(&params);

        for step in mode.steps() {
            match *step {
                Step::CameraVelocity => {
                    self.passes.camera_velocity.run(
                        &mut *ctx,
                        resources,
                        inputs.linear_z,
                    );
                }

                Step::CameraMotionBlurPrePass => {
                    self.passes.camera_motion_blur_prepass.run(
                        &mut *ctx,
                        resources,
                        inputs.linear_z,
                    );
                }

                Step::MotionBlurFinalPass { temporal } => {
                    self.passes.motion_blur_final.run_camera(
                        &mut *ctx, resources, config, temporal,
                    );
                }

                Step::TemporalBlend { coverage_aware } => {
                    self.temporal_blend(
                        &mut *ctx,
                        resources,
                        config,
                        frame,
                        coverage_aware,
                    );
                }
            }
        }
    }

    /// Blurs scene color along the caller-provided velocity of moving objects
    /// (stored in [`ResourceId::ObjectVelocity`]).
    pub fn render_object_blur(
        &self,
        ctx: &mut dyn CommandContext,
        resources: &mut ResourceSet,
        config: &EffectConfig,
    ) {
        let mut ctx = ProfileScope::new(ctx, "MotionBlur");

        if !config.motion_blur_enabled() {
            return;
        }

        trace!("Rendering object blur");

        self.passes.motion_blur_prepass.run(&mut *ctx, resources);

        self.passes
            .motion_blur_final
            .run_object(&mut *ctx, resources, config);
    }

    /// Resolves temporal AA on its own, using whatever the reprojection buffer
    /// contains for this frame; when temporal AA is disabled, clears both
    /// history buffers instead.
    ///
    /// [`Self::render_camera_blur()`] already resolves temporal AA when it's
    /// enabled, so hosts that run the camera path call this entry point only
    /// to keep the history clean while temporal AA is off.
    pub fn apply_temporal_aa(
        &self,
        ctx: &mut dyn CommandContext,
        resources: &mut ResourceSet,
        config: &EffectConfig,
        frame: u64,
    ) {
        if config.temporal_aa_enabled() {
            self.temporal_blend(ctx, resources, config, frame, false);
        } else {
            let mut ctx = ProfileScope::new(ctx, "TAA");

            self.passes.history_clear.run(&mut *ctx, resources);
        }
    }

    fn temporal_blend(
        &self,
        ctx: &mut dyn CommandContext,
        resources: &mut ResourceSet,
        config: &EffectConfig,
        frame: u64,
        coverage_aware: bool,
    ) {
        let mut ctx = ProfileScope::new(ctx, "TAA");

        self.passes.temporal_blend.run(
            &mut *ctx,
            resources,
            config,
            frame,
            coverage_aware,
        );
    }
}
