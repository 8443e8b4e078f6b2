//! Prints the commands every effect mode records, together with the resource
//! states they leave behind.

use glam::{uvec2, Mat4};
use smear::{
    verify_transitions, CameraBlurInputs, EffectConfig, EffectMode,
    MotionBlur, RecordingContext, ResourceSet,
};

fn main() {
    env_logger::init();

    let motion_blur = MotionBlur::new();

    let inputs = CameraBlurInputs {
        reprojection: Mat4::IDENTITY,
        near_clip: 0.1,
        far_clip: 100.0,
        linear_z: false,
    };

    for mode in EffectMode::ALL {
        let (motion_blur_enabled, temporal_aa_enabled) = match mode {
            EffectMode::Disabled => (false, false),
            EffectMode::VelocityOnly => (false, true),
            EffectMode::FullBlur { temporal } => (true, temporal),
        };

        let mut config = EffectConfig::default();

        config
            .set_motion_blur_enabled(motion_blur_enabled)
            .set_temporal_aa_enabled(temporal_aa_enabled);

        let mut resources = ResourceSet::for_output(uvec2(1920, 1080));
        let initial = resources.states().clone();
        let mut ctx = RecordingContext::default();

        motion_blur.render_camera_blur(
            &mut ctx,
            &mut resources,
            &config,
            0,
            &inputs,
        );

        if !temporal_aa_enabled {
            motion_blur.apply_temporal_aa(
                &mut ctx,
                &mut resources,
                &config,
                0,
            );
        }

        println!("{mode:?}");

        for cmd in ctx.commands() {
            println!("  {cmd:?}");
        }

        match verify_transitions(&initial, ctx.commands()) {
            Ok(states) => {
                let mut states: Vec<_> = states.into_iter().collect();

                states.sort_by_key(|(id, _)| *id);

                for (id, state) in states {
                    println!("  = {id:?}: {state:?}");
                }
            }

            Err(err) => {
                println!("  ! {err}");
            }
        }

        println!();
    }
}
