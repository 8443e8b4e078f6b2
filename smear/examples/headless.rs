//! Runs a few frames of camera blur + temporal AA on the default adapter,
//! without any window.
//!
//! Run with `RUST_LOG=smear=trace` to see every pass and transition.

use glam::{uvec2, vec3, Mat4, Vec3, Vec4};
use smear::{
    CameraBlurInputs, EffectConfig, GpuResources, MotionBlur, Pipelines,
    ResourceId, ResourceSet, ResourceState, WgpuContext,
};

fn main() {
    env_logger::init();
    pollster::block_on(run());
}

async fn run() {
    let instance = wgpu::Instance::default();

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions::default())
        .await
        .expect("couldn't find any adapter");

    log::info!("Using adapter: {:?}", adapter.get_info());

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("smear"),
                required_features: WgpuContext::REQUIRED_FEATURES,
                required_limits: WgpuContext::required_limits(),
                memory_hints: Default::default(),
            },
            None,
        )
        .await
        .expect("couldn't create device");

    let mut resources = ResourceSet::for_output(uvec2(1280, 720));
    let gpu_resources = GpuResources::new(&device, &resources);
    let pipelines = Pipelines::new(&device);
    let motion_blur = MotionBlur::new();

    let mut config = EffectConfig::default();

    config
        .set_motion_blur_enabled(true)
        .set_temporal_aa_enabled(true)
        .set_max_sample_count(16);

    // Reversed depth: 1 at the near plane, 0 at the far plane
    let reverse_z = Mat4::from_cols(Vec4::X, Vec4::Y, -Vec4::Z, Vec4::Z + Vec4::W);
    let proj = reverse_z * Mat4::perspective_rh(1.0, 16.0 / 9.0, 0.1, 100.0);

    let view_at = |frame: u64| {
        let eye = vec3(frame as f32 * 0.05, 1.0, 5.0);

        proj * Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y)
    };

    for frame in 1..=8 {
        let inputs = CameraBlurInputs {
            reprojection: view_at(frame - 1) * view_at(frame).inverse(),
            near_clip: 0.1,
            far_clip: 100.0,
            linear_z: false,
        };

        // Pretend a scene renderer has just drawn into the color buffer
        resources
            .assume_state(ResourceId::SceneColor, ResourceState::RenderTarget);

        let mut encoder = device.create_command_encoder(&Default::default());

        {
            let mut ctx = WgpuContext::new(
                &device,
                &mut encoder,
                &pipelines,
                &gpu_resources,
            );

            motion_blur.render_camera_blur(
                &mut ctx,
                &mut resources,
                &config,
                frame,
                &inputs,
            );
        }

        queue.submit([encoder.finish()]);

        log::info!("Frame #{frame} submitted");
    }

    let _ = device.poll(wgpu::Maintain::Wait);
}
