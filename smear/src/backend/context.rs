use std::mem;

#[cfg(feature = "metrics")]
use std::time::Instant;

use derivative::Derivative;
use fxhash::FxHashMap;
use glam::UVec2;
use log::trace;
use wgpu::util::DeviceExt;

use crate::gpu::{PrePassParams, RootConstants};
use crate::{
    group_count, CommandContext, GpuResources, Kernel, Pipelines, ResourceId,
    ResourceState, CONSTANT_BLOCK_BINDING, MAX_SRVS, MAX_UAVS,
    SAMPLER_BINDING, SRV_BINDING_BASE, UAV_BINDING_BASE,
};

/// [`CommandContext`] recording into a [`wgpu::CommandEncoder`].
///
/// wgpu tracks resource usage and inserts barriers on its own, so transitions
/// are only logged and checked against each other here; bindings are
/// collected per slot and turned into a bind group right before each
/// dispatch.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct WgpuContext<'a> {
    #[derivative(Debug = "ignore")]
    device: &'a wgpu::Device,
    #[derivative(Debug = "ignore")]
    encoder: &'a mut wgpu::CommandEncoder,
    #[derivative(Debug = "ignore")]
    pipelines: &'a Pipelines,
    #[derivative(Debug = "ignore")]
    resources: &'a GpuResources,
    kernel: Option<Kernel>,
    srvs: [Option<ResourceId>; MAX_SRVS],
    uavs: [Option<ResourceId>; MAX_UAVS],
    constants: Option<RootConstants>,
    #[derivative(Debug = "ignore")]
    constant_block: Option<wgpu::Buffer>,
    states: FxHashMap<ResourceId, ResourceState>,
    scopes: Vec<Scope>,
}

#[derive(Debug)]
struct Scope {
    #[cfg(feature = "metrics")]
    name: String,
    #[cfg(feature = "metrics")]
    started_at: Instant,
}

impl<'a> WgpuContext<'a> {
    /// Features the device must be created with.
    pub const REQUIRED_FEATURES: wgpu::Features = wgpu::Features::PUSH_CONSTANTS
        .union(wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES);

    pub fn new(
        device: &'a wgpu::Device,
        encoder: &'a mut wgpu::CommandEncoder,
        pipelines: &'a Pipelines,
        resources: &'a GpuResources,
    ) -> Self {
        Self {
            device,
            encoder,
            pipelines,
            resources,
            kernel: None,
            srvs: Default::default(),
            uavs: Default::default(),
            constants: None,
            constant_block: None,
            states: Default::default(),
            scopes: Default::default(),
        }
    }

    /// Limits the device must be created with.
    pub fn required_limits() -> wgpu::Limits {
        wgpu::Limits {
            max_push_constant_size: mem::size_of::<RootConstants>() as u32,
            ..Default::default()
        }
    }

    fn bind_group(&self, kernel: Kernel) -> wgpu::BindGroup {
        let pipeline = self.pipelines.get(kernel);
        let sig = pipeline.desc().signature;
        let resources = self.resources;
        let mut entries = Vec::new();

        if sig.constant_block {
            let buffer = self.constant_block.as_ref().unwrap_or_else(|| {
                panic!("{} requires a constant block", kernel.label())
            });

            entries.push(wgpu::BindGroupEntry {
                binding: CONSTANT_BLOCK_BINDING,
                resource: buffer.as_entire_binding(),
            });
        }

        if sig.sampler {
            entries.push(wgpu::BindGroupEntry {
                binding: SAMPLER_BINDING,
                resource: wgpu::BindingResource::Sampler(resources.sampler()),
            });
        }

        let srvs = self.srvs[..sig.srvs.len()]
            .iter()
            .enumerate()
            .map(|(slot, res)| (SRV_BINDING_BASE + slot as u32, *res));

        let uavs = self.uavs[..sig.uavs.len()]
            .iter()
            .enumerate()
            .map(|(slot, res)| (UAV_BINDING_BASE + slot as u32, *res));

        for (binding, resource) in srvs.chain(uavs) {
            let resource = resource.unwrap_or_else(|| {
                panic!("{} has nothing bound to {binding}", kernel.label())
            });

            entries.push(wgpu::BindGroupEntry {
                binding,
                resource: wgpu::BindingResource::TextureView(
                    resources.get(resource).view(),
                ),
            });
        }

        let label = format!("{}_bind_group", kernel.label());

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&label),
            layout: pipeline.bind_group_layout(),
            entries: &entries,
        })
    }
}

impl CommandContext for WgpuContext<'_> {
    fn set_kernel(&mut self, kernel: Kernel) {
        self.kernel = Some(kernel);
    }

    fn bind_srvs(&mut self, first_slot: u32, resources: &[ResourceId]) {
        for (slot, &resource) in resources.iter().enumerate() {
            self.srvs[first_slot as usize + slot] = Some(resource);
        }
    }

    fn bind_uavs(&mut self, first_slot: u32, resources: &[ResourceId]) {
        for (slot, &resource) in resources.iter().enumerate() {
            self.uavs[first_slot as usize + slot] = Some(resource);
        }
    }

    fn set_constants(&mut self, constants: RootConstants) {
        self.constants = Some(constants);
    }

    fn set_constant_block(&mut self, params: &PrePassParams) {
        let buffer =
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("smear_prepass_params"),
                    contents: bytemuck::bytes_of(params),
                    usage: wgpu::BufferUsages::UNIFORM,
                });

        self.constant_block = Some(buffer);
    }

    fn transition(
        &mut self,
        resource: ResourceId,
        from: ResourceState,
        to: ResourceState,
    ) {
        trace!("Transitioning {resource:?}: {from:?} -> {to:?}");

        if let Some(prev) = self.states.insert(resource, to) {
            assert_eq!(
                prev, from,
                "{resource:?} transitioned from {from:?}, but it's in {prev:?}"
            );
        }
    }

    fn clear(&mut self, resource: ResourceId) {
        let label = format!("{}_clear", resource.label());

        let attachment = wgpu::RenderPassColorAttachment {
            view: self.resources.get(resource).view(),
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        };

        let _pass =
            self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(&label),
                color_attachments: &[Some(attachment)],
                ..Default::default()
            });
    }

    fn dispatch_2d(&mut self, threads: UVec2) {
        let kernel = self.kernel.expect("dispatch without a kernel");
        let bind_group = self.bind_group(kernel);
        let pipeline = self.pipelines.get(kernel);
        let groups = group_count(threads);

        let mut pass =
            self.encoder
                .begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some(kernel.label()),
                    timestamp_writes: None,
                });

        pass.set_pipeline(pipeline.pipeline());

        if pipeline.desc().signature.root_constants {
            let constants = self.constants.unwrap_or_else(|| {
                panic!("{} requires root constants", kernel.label())
            });

            pass.set_push_constants(0, bytemuck::bytes_of(&constants));
        }

        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(groups.x, groups.y, 1);
    }

    fn begin_scope(&mut self, name: &str) {
        self.encoder.push_debug_group(name);

        self.scopes.push(Scope {
            #[cfg(feature = "metrics")]
            name: name.to_owned(),
            #[cfg(feature = "metrics")]
            started_at: Instant::now(),
        });
    }

    fn end_scope(&mut self) {
        self.encoder.pop_debug_group();

        let scope = self.scopes.pop().expect("unbalanced profiling scope");

        #[cfg(feature = "metrics")]
        log::info!(
            "Recorded `{}` in {}",
            scope.name,
            humantime::format_duration(scope.started_at.elapsed())
        );

        #[cfg(not(feature = "metrics"))]
        let _ = scope;
    }
}
