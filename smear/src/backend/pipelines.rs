use std::mem;
use std::ops::Range;

use fxhash::FxHashMap;
use log::debug;

use crate::gpu::RootConstants;
use crate::{
    Kernel, KernelDesc, Signature, SrvKind, UavAccess, COLOR_FORMAT,
    CONSTANT_BLOCK_BINDING, KERNELS, SAMPLER_BINDING, SRV_BINDING_BASE,
    UAV_BINDING_BASE,
};

/// Compute pipelines of every kernel variant, created once.
#[derive(Debug)]
pub struct Pipelines {
    pipelines: FxHashMap<Kernel, Pipeline>,
}

impl Pipelines {
    pub fn new(device: &wgpu::Device) -> Self {
        debug!("Initializing pipelines");

        let pipelines = KERNELS
            .iter()
            .map(|desc| {
                let pipeline = ComputePipelineBuilder::new(desc).build(device);

                (desc.kernel, pipeline)
            })
            .collect();

        Self { pipelines }
    }

    pub fn get(&self, kernel: Kernel) -> &Pipeline {
        self.pipelines
            .get(&kernel)
            .unwrap_or_else(|| panic!("kernel {kernel:?} has no pipeline"))
    }
}

#[derive(Debug)]
pub struct Pipeline {
    desc: &'static KernelDesc,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::ComputePipeline,
}

impl Pipeline {
    pub fn desc(&self) -> &'static KernelDesc {
        self.desc
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn pipeline(&self) -> &wgpu::ComputePipeline {
        &self.pipeline
    }
}

/// Builds a pipeline out of a [`KernelDesc`], deriving the bind group layout
/// from the kernel's signature.
pub struct ComputePipelineBuilder {
    desc: &'static KernelDesc,
}

impl ComputePipelineBuilder {
    pub fn new(desc: &'static KernelDesc) -> Self {
        Self { desc }
    }

    pub fn build(self, device: &wgpu::Device) -> Pipeline {
        let desc = self.desc;
        let label = desc.label;

        debug!("Initializing pipeline: {label}:{}", desc.entry_point);

        let bind_group_layout_label = format!("{label}_bind_group_layout");

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&bind_group_layout_label),
                entries: &layout_entries(&desc.signature),
            });

        let push_constant_ranges = if desc.signature.root_constants {
            vec![wgpu::PushConstantRange {
                stages: wgpu::ShaderStages::COMPUTE,
                range: Range {
                    start: 0,
                    end: mem::size_of::<RootConstants>() as u32,
                },
            }]
        } else {
            vec![]
        };

        let pipeline_layout_label = format!("{label}_pipeline_layout");

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&pipeline_layout_label),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &push_constant_ranges,
            });

        let module =
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(desc.source.into()),
            });

        let pipeline_label = format!("{label}_pipeline");

        let pipeline =
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(&pipeline_label),
                layout: Some(&pipeline_layout),
                module: &module,
                entry_point: Some(desc.entry_point),
                compilation_options: Default::default(),
                cache: None,
            });

        Pipeline {
            desc,
            bind_group_layout,
            pipeline,
        }
    }
}

fn layout_entries(sig: &Signature) -> Vec<wgpu::BindGroupLayoutEntry> {
    let entry = |binding, ty| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty,
        count: None,
    };

    let mut entries = Vec::new();

    if sig.constant_block {
        entries.push(entry(
            CONSTANT_BLOCK_BINDING,
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
        ));
    }

    if sig.sampler {
        entries.push(entry(
            SAMPLER_BINDING,
            wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        ));
    }

    for (slot, kind) in sig.srvs.iter().enumerate() {
        let sample_type = match kind {
            SrvKind::Color => {
                wgpu::TextureSampleType::Float { filterable: true }
            }
            SrvKind::Depth => wgpu::TextureSampleType::Depth,
            SrvKind::LinearDepth => {
                wgpu::TextureSampleType::Float { filterable: false }
            }
        };

        entries.push(entry(
            SRV_BINDING_BASE + slot as u32,
            wgpu::BindingType::Texture {
                sample_type,
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
        ));
    }

    for (slot, access) in sig.uavs.iter().enumerate() {
        let access = match access {
            UavAccess::WriteOnly => wgpu::StorageTextureAccess::WriteOnly,
            UavAccess::ReadWrite => wgpu::StorageTextureAccess::ReadWrite,
        };

        entries.push(entry(
            UAV_BINDING_BASE + slot as u32,
            wgpu::BindingType::StorageTexture {
                access,
                format: COLOR_FORMAT,
                view_dimension: wgpu::TextureViewDimension::D2,
            },
        ));
    }

    entries
}
