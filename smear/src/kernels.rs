use smear_shaders as shaders;

/// Binding of the [`crate::gpu::PrePassParams`] constant block.
pub const CONSTANT_BLOCK_BINDING: u32 = 0;

/// Binding of the linear sampler.
pub const SAMPLER_BINDING: u32 = 1;

/// Binding of the first read-only texture; slot `n` lives at `base + n`.
pub const SRV_BINDING_BASE: u32 = 10;

/// Binding of the first writable texture; slot `n` lives at `base + n`.
pub const UAV_BINDING_BASE: u32 = 20;

pub const MAX_SRVS: usize = 4;
pub const MAX_UAVS: usize = 3;

/// Compute kernel, together with its variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kernel {
    /// Produces the reprojection buffer out of depth alone.
    CameraVelocity { linear_z: bool },

    /// Produces velocity, motion-prep and reprojection buffers out of color
    /// and depth.
    CameraMotionBlurPrePass { linear_z: bool },

    /// Produces the motion-prep buffer out of color and a caller-provided
    /// velocity buffer.
    MotionBlurPrePass,

    /// Blurs color in place; the temporal variant additionally stores blur
    /// coverage in color's alpha channel.
    MotionBlurFinalPass { temporal: bool },

    /// Blends color with the previous frame's history.
    TemporalBlend,
}

/// Kind of a read-only texture binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SrvKind {
    Color,
    Depth,
    LinearDepth,
}

/// Kind of a writable texture binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UavAccess {
    WriteOnly,
    ReadWrite,
}

/// Everything a kernel expects to have bound when it's dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    pub constant_block: bool,
    pub root_constants: bool,
    pub sampler: bool,
    pub srvs: &'static [SrvKind],
    pub uavs: &'static [UavAccess],
}

#[derive(Clone, Copy, Debug)]
pub struct KernelDesc {
    pub kernel: Kernel,
    pub label: &'static str,
    pub source: &'static str,
    pub entry_point: &'static str,
    pub signature: Signature,
}

const CAMERA_VELOCITY: Signature = Signature {
    constant_block: true,
    root_constants: false,
    sampler: false,
    srvs: &[SrvKind::Depth],
    uavs: &[UavAccess::WriteOnly],
};

const CAMERA_VELOCITY_LINEAR_Z: Signature = Signature {
    srvs: &[SrvKind::LinearDepth],
    ..CAMERA_VELOCITY
};

const CAMERA_MOTION_BLUR_PREPASS: Signature = Signature {
    constant_block: true,
    root_constants: false,
    sampler: false,
    srvs: &[SrvKind::Depth, SrvKind::Color],
    uavs: &[UavAccess::WriteOnly, UavAccess::WriteOnly, UavAccess::WriteOnly],
};

const CAMERA_MOTION_BLUR_PREPASS_LINEAR_Z: Signature = Signature {
    srvs: &[SrvKind::LinearDepth, SrvKind::Color],
    ..CAMERA_MOTION_BLUR_PREPASS
};

const MOTION_BLUR_PREPASS: Signature = Signature {
    constant_block: false,
    root_constants: false,
    sampler: false,
    srvs: &[SrvKind::Color, SrvKind::Color],
    uavs: &[UavAccess::WriteOnly],
};

const MOTION_BLUR_FINAL_PASS: Signature = Signature {
    constant_block: false,
    root_constants: true,
    sampler: true,
    srvs: &[SrvKind::Color, SrvKind::Color],
    uavs: &[UavAccess::ReadWrite],
};

const TEMPORAL_BLEND: Signature = Signature {
    constant_block: false,
    root_constants: true,
    sampler: true,
    srvs: &[SrvKind::Color, SrvKind::Color],
    uavs: &[UavAccess::ReadWrite, UavAccess::WriteOnly],
};

/// Every kernel variant, consumed by the pipeline builder.
pub const KERNELS: &[KernelDesc] = &[
    KernelDesc {
        kernel: Kernel::CameraVelocity { linear_z: false },
        label: "smear_camera_velocity",
        source: shaders::CAMERA_VELOCITY,
        entry_point: shaders::ENTRY_POINT,
        signature: CAMERA_VELOCITY,
    },
    KernelDesc {
        kernel: Kernel::CameraVelocity { linear_z: true },
        label: "smear_camera_velocity_linear_z",
        source: shaders::CAMERA_VELOCITY_LINEAR_Z,
        entry_point: shaders::ENTRY_POINT,
        signature: CAMERA_VELOCITY_LINEAR_Z,
    },
    KernelDesc {
        kernel: Kernel::CameraMotionBlurPrePass { linear_z: false },
        label: "smear_camera_motion_blur_prepass",
        source: shaders::CAMERA_MOTION_BLUR_PREPASS,
        entry_point: shaders::ENTRY_POINT,
        signature: CAMERA_MOTION_BLUR_PREPASS,
    },
    KernelDesc {
        kernel: Kernel::CameraMotionBlurPrePass { linear_z: true },
        label: "smear_camera_motion_blur_prepass_linear_z",
        source: shaders::CAMERA_MOTION_BLUR_PREPASS_LINEAR_Z,
        entry_point: shaders::ENTRY_POINT,
        signature: CAMERA_MOTION_BLUR_PREPASS_LINEAR_Z,
    },
    KernelDesc {
        kernel: Kernel::MotionBlurPrePass,
        label: "smear_motion_blur_prepass",
        source: shaders::MOTION_BLUR_PREPASS,
        entry_point: shaders::ENTRY_POINT,
        signature: MOTION_BLUR_PREPASS,
    },
    KernelDesc {
        kernel: Kernel::MotionBlurFinalPass { temporal: false },
        label: "smear_motion_blur_final_pass",
        source: shaders::MOTION_BLUR_FINAL_PASS,
        entry_point: shaders::ENTRY_POINT,
        signature: MOTION_BLUR_FINAL_PASS,
    },
    KernelDesc {
        kernel: Kernel::MotionBlurFinalPass { temporal: true },
        label: "smear_motion_blur_final_pass_temporal",
        source: shaders::MOTION_BLUR_FINAL_PASS_TEMPORAL,
        entry_point: shaders::ENTRY_POINT,
        signature: MOTION_BLUR_FINAL_PASS,
    },
    KernelDesc {
        kernel: Kernel::TemporalBlend,
        label: "smear_temporal_blend",
        source: shaders::TEMPORAL_BLEND,
        entry_point: shaders::ENTRY_POINT,
        signature: TEMPORAL_BLEND,
    },
];

impl Kernel {
    pub fn desc(self) -> &'static KernelDesc {
        KERNELS
            .iter()
            .find(|desc| desc.kernel == self)
            .unwrap_or_else(|| panic!("kernel {self:?} is missing a descriptor"))
    }

    pub fn label(self) -> &'static str {
        self.desc().label
    }

    pub fn signature(self) -> Signature {
        self.desc().signature
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const ALL: [Kernel; 8] = [
        Kernel::CameraVelocity { linear_z: false },
        Kernel::CameraVelocity { linear_z: true },
        Kernel::CameraMotionBlurPrePass { linear_z: false },
        Kernel::CameraMotionBlurPrePass { linear_z: true },
        Kernel::MotionBlurPrePass,
        Kernel::MotionBlurFinalPass { temporal: false },
        Kernel::MotionBlurFinalPass { temporal: true },
        Kernel::TemporalBlend,
    ];

    #[test]
    fn table_is_complete() {
        assert_eq!(ALL.len(), KERNELS.len());

        for kernel in ALL {
            assert_eq!(kernel, kernel.desc().kernel);
        }
    }

    #[test]
    fn labels_are_unique() {
        let labels: HashSet<_> = KERNELS.iter().map(|desc| desc.label).collect();

        assert_eq!(KERNELS.len(), labels.len());
    }

    #[test]
    fn signatures_fit_bindings() {
        for desc in KERNELS {
            let sig = desc.signature;

            assert!(sig.srvs.len() <= MAX_SRVS, "{desc:?}");
            assert!(sig.uavs.len() <= MAX_UAVS, "{desc:?}");

            for slot in 0..sig.srvs.len() {
                let binding = SRV_BINDING_BASE + slot as u32;

                assert!(
                    desc.source.contains(&format!("@binding({binding})")),
                    "{} doesn't declare SRV slot {slot}",
                    desc.label
                );
            }

            for slot in 0..sig.uavs.len() {
                let binding = UAV_BINDING_BASE + slot as u32;

                assert!(
                    desc.source.contains(&format!("@binding({binding})")),
                    "{} doesn't declare UAV slot {slot}",
                    desc.label
                );
            }

            assert_eq!(
                sig.constant_block,
                desc.source.contains("var<uniform>"),
                "{}",
                desc.label
            );

            assert_eq!(
                sig.root_constants,
                desc.source.contains("var<push_constant>"),
                "{}",
                desc.label
            );

            assert_eq!(
                sig.sampler,
                desc.source.contains(": sampler;"),
                "{}",
                desc.label
            );
        }
    }
}
