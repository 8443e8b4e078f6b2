use crate::{CommandContext, ComputePass, Kernel, ResourceId, ResourceSet};

/// Derives per-pixel velocity from depth and the camera's reprojection, and
/// downsamples color into the half-resolution motion-prep buffer.
///
/// Also fills the reprojection buffer, so that temporal AA can follow without
/// a separate velocity pass.
#[derive(Debug)]
pub struct CameraMotionBlurPrePass {
    passes: [ComputePass; 2],
}

impl CameraMotionBlurPrePass {
    pub fn new() -> Self {
        let passes = [false, true].map(|linear_z| {
            ComputePass::builder(Kernel::CameraMotionBlurPrePass { linear_z })
                .read(ResourceId::depth(linear_z))
                .read(ResourceId::SceneColor)
                .write(ResourceId::MotionPrep)
                .write(ResourceId::Velocity)
                .write(ResourceId::Reprojection)
                .build()
        });

        Self { passes }
    }

    /// Expects the prepass constant block to be set.
    pub fn run(
        &self,
        ctx: &mut dyn CommandContext,
        resources: &mut ResourceSet,
        linear_z: bool,
    ) {
        self.passes[linear_z as usize].run(ctx, resources);
    }
}
