/// Which passes run, as selected by the motion-blur and temporal-AA flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectMode {
    /// Nothing runs; temporal history gets cleared.
    Disabled,

    /// Temporal AA alone: camera velocity, then the temporal blend.
    VelocityOnly,

    /// Motion blur: camera prepass, then the final pass, then (if `temporal`)
    /// the temporal blend.
    FullBlur { temporal: bool },
}

/// One step of the camera-blur path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    CameraVelocity,
    CameraMotionBlurPrePass,
    MotionBlurFinalPass { temporal: bool },
    TemporalBlend { coverage_aware: bool },
}

impl EffectMode {
    pub const ALL: [Self; 4] = [
        Self::Disabled,
        Self::VelocityOnly,
        Self::FullBlur { temporal: false },
        Self::FullBlur { temporal: true },
    ];

    pub fn select(motion_blur_enabled: bool, temporal_aa_enabled: bool) -> Self {
        match (motion_blur_enabled, temporal_aa_enabled) {
            (false, false) => Self::Disabled,
            (false, true) => Self::VelocityOnly,
            (true, temporal) => Self::FullBlur { temporal },
        }
    }

    pub fn is_temporal(self) -> bool {
        matches!(self, Self::VelocityOnly | Self::FullBlur { temporal: true })
    }

    /// Returns steps of the camera-blur path, in the order they run.
    pub fn steps(self) -> &'static [Step] {
        match self {
            Self::Disabled => &[],

            Self::VelocityOnly => &[
                Step::CameraVelocity,
                Step::TemporalBlend {
                    coverage_aware: false,
                },
            ],

            Self::FullBlur { temporal: false } => &[
                Step::CameraMotionBlurPrePass,
                Step::MotionBlurFinalPass { temporal: false },
            ],

            Self::FullBlur { temporal: true } => &[
                Step::CameraMotionBlurPrePass,
                Step::MotionBlurFinalPass { temporal: true },
                Step::TemporalBlend {
                    coverage_aware: true,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select() {
        assert_eq!(EffectMode::Disabled, EffectMode::select(false, false));
        assert_eq!(EffectMode::VelocityOnly, EffectMode::select(false, true));

        assert_eq!(
            EffectMode::FullBlur { temporal: false },
            EffectMode::select(true, false)
        );

        assert_eq!(
            EffectMode::FullBlur { temporal: true },
            EffectMode::select(true, true)
        );
    }

    #[test]
    fn steps() {
        for mode in EffectMode::ALL {
            let steps = mode.steps();

            let blends = steps
                .iter()
                .filter(|step| matches!(step, Step::TemporalBlend { .. }))
                .count();

            assert_eq!(mode.is_temporal() as usize, blends, "{mode:?}");

            // The temporal blend consumes the reprojection buffer, so it must
            // come last.
            if blends > 0 {
                assert!(
                    matches!(steps.last(), Some(Step::TemporalBlend { .. })),
                    "{mode:?}"
                );
            }

            // Coverage is written only by the temporal final pass.
            for step in steps {
                if let Step::TemporalBlend { coverage_aware } = step {
                    assert_eq!(
                        *coverage_aware,
                        steps.contains(&Step::MotionBlurFinalPass {
                            temporal: true
                        }),
                        "{mode:?}"
                    );
                }
            }
        }

        assert!(EffectMode::Disabled.steps().is_empty());
    }
}
