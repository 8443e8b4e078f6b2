use crate::gpu::{FrameParity, RootConstants};
use crate::{
    CommandContext, ComputePass, DoubleBuffered, EffectConfig, Kernel,
    ResourceId, ResourceSet,
};

/// Blends scene color with the history written during the previous frame and
/// stores the result as this frame's history.
#[derive(Debug)]
pub struct TemporalBlendPass {
    pass: DoubleBuffered<ComputePass>,
}

impl TemporalBlendPass {
    pub fn new() -> Self {
        let pass = DoubleBuffered::new(|parity| {
            ComputePass::builder(Kernel::TemporalBlend)
                .read(ResourceId::Reprojection)
                .read(ResourceId::temporal_history(parity.last_frame()))
                .write(ResourceId::SceneColor)
                .write(ResourceId::temporal_history(parity.this_frame()))
                .build()
        });

        Self { pass }
    }

    /// Expects the reprojection buffer to be filled for this frame.
    ///
    /// When `coverage_aware` is set, history is damped on pixels that were
    /// just motion-blurred (see [`crate::Kernel::MotionBlurFinalPass`]).
    pub fn run(
        &self,
        ctx: &mut dyn CommandContext,
        resources: &mut ResourceSet,
        config: &EffectConfig,
        frame: u64,
        coverage_aware: bool,
    ) {
        let size = resources.size(ResourceId::SceneColor).as_vec2();

        ctx.set_constants(RootConstants::temporal_blend(
            size.recip(),
            config.temporal_blend_factor(),
            coverage_aware,
        ));

        self.pass.get(FrameParity::new(frame)).run(ctx, resources);
    }
}
