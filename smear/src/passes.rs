use log::debug;

macro_rules! passes {
    ([ $( $name:ident => $class:ident, )* ]) => {
        $( mod $name; )*
        $( pub use self::$name::*; )*

        #[derive(Debug)]
        pub struct MotionBlurPasses {
            $( pub $name: $class, )*
        }

        impl MotionBlurPasses {
            pub fn new() -> Self {
                debug!("Initializing motion blur passes");

                Self {
                    $( $name: $class::new(), )*
                }
            }
        }

        impl Default for MotionBlurPasses {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

passes!([
    camera_motion_blur_prepass => CameraMotionBlurPrePass,
    camera_velocity => CameraVelocityPass,
    history_clear => HistoryClearPass,
    motion_blur_final => MotionBlurFinalPass,
    motion_blur_prepass => MotionBlurPrePass,
    temporal_blend => TemporalBlendPass,
]);
