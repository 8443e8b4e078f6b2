use crate::gpu::RootConstants;
use crate::{
    CommandContext, ComputePass, EffectConfig, Kernel, ResourceId, ResourceSet,
};

/// Blurs scene color in place along per-pixel velocity, gathering from the
/// motion-prep buffer.
#[derive(Debug)]
pub struct MotionBlurFinalPass {
    camera: [ComputePass; 2],
    object: ComputePass,
}

impl MotionBlurFinalPass {
    pub fn new() -> Self {
        let camera = [false, true].map(|temporal| {
            Self::build(ResourceId::Velocity, temporal)
        });

        let object = Self::build(ResourceId::ObjectVelocity, false);

        Self { camera, object }
    }

    fn build(velocity: ResourceId, temporal: bool) -> ComputePass {
        ComputePass::builder(Kernel::MotionBlurFinalPass { temporal })
            .read(velocity)
            .read(ResourceId::MotionPrep)
            .write(ResourceId::SceneColor)
            .build()
    }

    /// Blurs along the velocity produced by the camera prepass; the temporal
    /// variant leaves blur coverage in color's alpha channel for the temporal
    /// blend.
    pub fn run_camera(
        &self,
        ctx: &mut dyn CommandContext,
        resources: &mut ResourceSet,
        config: &EffectConfig,
        temporal: bool,
    ) {
        Self::set_constants(ctx, resources, config);

        self.camera[temporal as usize].run(ctx, resources);
    }

    /// Blurs along the caller-provided velocity of moving objects.
    pub fn run_object(
        &self,
        ctx: &mut dyn CommandContext,
        resources: &mut ResourceSet,
        config: &EffectConfig,
    ) {
        Self::set_constants(ctx, resources, config);

        self.object.run(ctx, resources);
    }

    fn set_constants(
        ctx: &mut dyn CommandContext,
        resources: &ResourceSet,
        config: &EffectConfig,
    ) {
        let size = resources.size(ResourceId::SceneColor).as_vec2();

        ctx.set_constants(RootConstants::motion_blur(
            size.recip(),
            config.max_sample_count(),
            config.step_size(),
        ));
    }
}
