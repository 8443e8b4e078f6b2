use glam::UVec2;
use log::info;

/// Texture together with its default view.
#[derive(Debug)]
pub struct Texture {
    tex: wgpu::Texture,
    view: wgpu::TextureView,
    size: UVec2,
}

impl Texture {
    pub fn builder(label: impl Into<String>) -> TextureBuilder {
        TextureBuilder {
            label: label.into(),
            size: None,
            format: None,
            usage: wgpu::TextureUsages::empty(),
        }
    }

    pub fn tex(&self) -> &wgpu::Texture {
        &self.tex
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.tex.format()
    }
}

pub struct TextureBuilder {
    label: String,
    size: Option<UVec2>,
    format: Option<wgpu::TextureFormat>,
    usage: wgpu::TextureUsages,
}

impl TextureBuilder {
    pub fn with_size(mut self, size: UVec2) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_usage(mut self, usage: wgpu::TextureUsages) -> Self {
        self.usage |= usage;
        self
    }

    pub fn build(self, device: &wgpu::Device) -> Texture {
        let label = self.label;
        let size = self.size.expect("texture has no size");
        let format = self.format.expect("texture has no format");

        info!(
            "Allocating texture `{label}`; size={}x{}, format={format:?}",
            size.x, size.y
        );

        assert!(size.x > 0);
        assert!(size.y > 0);

        let tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&label),
            size: wgpu::Extent3d {
                width: size.x,
                height: size.y,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: self.usage,
            view_formats: &[],
        });

        let view = tex.create_view(&Default::default());

        Texture { tex, view, size }
    }
}
