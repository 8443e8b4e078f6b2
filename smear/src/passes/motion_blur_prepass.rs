use crate::{CommandContext, ComputePass, Kernel, ResourceId, ResourceSet};

/// Downsamples color into the motion-prep buffer, using the caller-provided
/// velocity of moving objects.
#[derive(Debug)]
pub struct MotionBlurPrePass {
    pass: ComputePass,
}

impl MotionBlurPrePass {
    pub fn new() -> Self {
        let pass = ComputePass::builder(Kernel::MotionBlurPrePass)
            .read(ResourceId::SceneColor)
            .read(ResourceId::ObjectVelocity)
            .write(ResourceId::MotionPrep)
            .build();

        Self { pass }
    }

    pub fn run(&self, ctx: &mut dyn CommandContext, resources: &mut ResourceSet) {
        self.pass.run(ctx, resources);
    }
}
