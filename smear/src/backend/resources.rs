use fxhash::FxHashMap;

use crate::{ResourceId, ResourceSet, Texture};

/// Format of every color-like resource and of every writable binding.
pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub const LINEAR_DEPTH_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::R32Float;

/// GPU textures backing a [`ResourceSet`].
#[derive(Debug)]
pub struct GpuResources {
    textures: FxHashMap<ResourceId, Texture>,
    sampler: wgpu::Sampler,
}

impl GpuResources {
    pub fn new(device: &wgpu::Device, resources: &ResourceSet) -> Self {
        let textures = resources
            .iter()
            .map(|(id, binding)| {
                let tex = Texture::builder(id.label())
                    .with_size(binding.size)
                    .with_format(Self::format_of(id))
                    .with_usage(Self::usage_of(id))
                    .build(device);

                (id, tex)
            })
            .collect();

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("smear_linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self { textures, sampler }
    }

    pub fn format_of(id: ResourceId) -> wgpu::TextureFormat {
        match id {
            ResourceId::SceneDepth => DEPTH_FORMAT,
            ResourceId::LinearDepth => LINEAR_DEPTH_FORMAT,
            _ => COLOR_FORMAT,
        }
    }

    pub fn usage_of(id: ResourceId) -> wgpu::TextureUsages {
        match id {
            ResourceId::SceneDepth | ResourceId::LinearDepth => {
                wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::RENDER_ATTACHMENT
            }

            _ => {
                wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::STORAGE_BINDING
                    | wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::COPY_SRC
                    | wgpu::TextureUsages::COPY_DST
            }
        }
    }

    pub fn get(&self, id: ResourceId) -> &Texture {
        self.textures
            .get(&id)
            .unwrap_or_else(|| panic!("resource {id:?} has no texture"))
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writable_resources_are_color() {
        for id in [
            ResourceId::SceneColor,
            ResourceId::Velocity,
            ResourceId::MotionPrep,
            ResourceId::Reprojection,
            ResourceId::TemporalHistoryA,
            ResourceId::TemporalHistoryB,
        ] {
            assert_eq!(COLOR_FORMAT, GpuResources::format_of(id));

            assert!(GpuResources::usage_of(id)
                .contains(wgpu::TextureUsages::STORAGE_BINDING));
        }
    }

    #[test]
    fn history_is_clearable() {
        for id in [ResourceId::TemporalHistoryA, ResourceId::TemporalHistoryB] {
            assert!(GpuResources::usage_of(id)
                .contains(wgpu::TextureUsages::RENDER_ATTACHMENT));
        }
    }
}
