use crate::{CommandContext, ComputePass, Kernel, ResourceId, ResourceSet};

/// Fills the reprojection buffer out of depth alone; used when temporal AA is
/// on but motion blur is off.
#[derive(Debug)]
pub struct CameraVelocityPass {
    passes: [ComputePass; 2],
}

impl CameraVelocityPass {
    pub fn new() -> Self {
        let passes = [false, true].map(|linear_z| {
            ComputePass::builder(Kernel::CameraVelocity { linear_z })
                .read(ResourceId::depth(linear_z))
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
