use log::trace;

use crate::{CommandContext, Kernel, Requirement, ResourceId, ResourceSet};

/// Single dispatch of a kernel over a fixed set of resources.
#[derive(Clone, Debug)]
pub struct ComputePass {
    kernel: Kernel,
    srvs: Vec<ResourceId>,
    uavs: Vec<ResourceId>,
    target: ResourceId,
}

impl ComputePass {
    pub fn builder(kernel: Kernel) -> ComputePassBuilder {
        ComputePassBuilder {
            kernel,
            srvs: Default::default(),
            uavs: Default::default(),
            target: None,
        }
    }

    pub fn requirements(&self) -> Vec<Requirement> {
        let srvs = self.srvs.iter().copied().map(Requirement::read);
        let uavs = self.uavs.iter().copied().map(Requirement::read_write);

        srvs.chain(uavs).collect()
    }

    /// Transitions resources, binds them and dispatches the kernel over the
    /// entire target resource.
    ///
    /// Constants must be already set.
    pub fn run(
        &self,
        ctx: &mut dyn CommandContext,
        resources: &mut ResourceSet,
    ) {
        let threads = resources.size(self.target);

        trace!(
            "Dispatching {}; threads={}x{}",
            self.kernel.label(),
            threads.x,
            threads.y
        );

        resources.transition_for_pass(ctx, &self.requirements());

        ctx.set_kernel(self.kernel);

        if !self.srvs.is_empty() {
            ctx.bind_srvs(0, &self.srvs);
        }

        if !self.uavs.is_empty() {
            ctx.bind_uavs(0, &self.uavs);
        }

        ctx.dispatch_2d(threads);
    }
}

pub struct ComputePassBuilder {
    kernel: Kernel,
    srvs: Vec<ResourceId>,
    uavs: Vec<ResourceId>,
    target: Option<ResourceId>,
}

impl ComputePassBuilder {
    /// Binds a read-only resource into the next SRV slot.
    pub fn read(mut self, resource: ResourceId) -> Self {
        self.srvs.push(resource);
        self
    }

    /// Binds a writable resource into the next UAV slot.
    pub fn write(mut self, resource: ResourceId) -> Self {
        self.uavs.push(resource);
        self
    }

    /// Specifies the resource the dispatch is sized after; defaults to the
    /// first writable one.
    pub fn target(mut self, resource: ResourceId) -> Self {
        self.target = Some(resource);
        self
    }

    pub fn build(self) -> ComputePass {
        let sig = self.kernel.signature();

        assert_eq!(
            sig.srvs.len(),
            self.srvs.len(),
            "{} expects {} read-only resources",
            self.kernel.label(),
            sig.srvs.len(),
        );

        assert_eq!(
            sig.uavs.len(),
            self.uavs.len(),
            "{} expects {} writable resources",
            self.kernel.label(),
            sig.uavs.len(),
        );

        let target = self
            .target
            .or_else(|| self.uavs.first().copied())
            .unwrap_or_else(|| {
                panic!(
                    "{} has nothing to size the dispatch after",
                    self.kernel.label()
                )
            });

        ComputePass {
            kernel: self.kernel,
            srvs: self.srvs,
            uavs: self.uavs,
            target,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;
    use crate::{Access, RecordingContext};

    #[test]
    fn requirements() {
        let target = ComputePass::builder(Kernel::MotionBlurPrePass)
            .read(ResourceId::SceneColor)
            .read(ResourceId::ObjectVelocity)
            .write(ResourceId::MotionPrep)
            .build();

        let actual: Vec<_> = target
            .requirements()
            .into_iter()
            .map(|req| (req.resource, req.access))
            .collect();

        assert_eq!(
            vec![
                (ResourceId::SceneColor, Access::Read),
                (ResourceId::ObjectVelocity, Access::Read),
                (ResourceId::MotionPrep, Access::ReadWrite),
            ],
            actual
        );
    }

    #[test]
    fn run() {
        let target = ComputePass::builder(Kernel::MotionBlurPrePass)
            .read(ResourceId::SceneColor)
            .read(ResourceId::ObjectVelocity)
            .write(ResourceId::MotionPrep)
            .build();

        let mut resources = ResourceSet::for_output(uvec2(1920, 1080));
        let mut ctx = RecordingContext::default();

        target.run(&mut ctx, &mut resources);

        assert_eq!(
            vec![(Kernel::MotionBlurPrePass, uvec2(960, 540))],
            ctx.dispatches().collect::<Vec<_>>()
        );
    }

    #[test]
    #[should_panic(expected = "expects 2 read-only resources")]
    fn mismatched_signature() {
        ComputePass::builder(Kernel::MotionBlurPrePass)
            .read(ResourceId::SceneColor)
            .write(ResourceId::MotionPrep)
            .build();
    }
}
