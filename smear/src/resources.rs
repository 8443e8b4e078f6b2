use fxhash::FxHashMap;
use glam::UVec2;
use log::info;

use crate::{plan_transitions, CommandContext, Requirement, ResourceStates};

/// Identifies one of the textures the pipeline reads or writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceId {
    /// Lit scene; blurred and antialiased in place.
    SceneColor,
    /// Hardware depth buffer, reversed (1 at the near plane, 0 at the far
    /// plane).
    SceneDepth,
    /// View-space distance divided by the far plane's distance.
    LinearDepth,
    /// Per-pixel screen-space velocity, produced by the camera prepass.
    Velocity,
    /// Half-resolution color + speed, consumed by the final blur pass.
    MotionPrep,
    /// Per-pixel velocity, depth and confidence consumed by the temporal
    /// blend.
    Reprojection,
    TemporalHistoryA,
    TemporalHistoryB,
    /// Caller-provided velocity of moving objects.
    ObjectVelocity,
}

impl ResourceId {
    pub const ALL: [Self; 9] = [
        Self::SceneColor,
        Self::SceneDepth,
        Self::LinearDepth,
        Self::Velocity,
        Self::MotionPrep,
        Self::Reprojection,
        Self::TemporalHistoryA,
        Self::TemporalHistoryB,
        Self::ObjectVelocity,
    ];

    /// Returns history buffer of given index (see [`crate::gpu::FrameParity`]).
    pub fn temporal_history(idx: usize) -> Self {
        match idx {
            0 => Self::TemporalHistoryA,
            1 => Self::TemporalHistoryB,
            _ => panic!("there are only two history buffers, got #{idx}"),
        }
    }

    /// Returns the depth buffer camera passes read from.
    pub fn depth(linear_z: bool) -> Self {
        if linear_z {
            Self::LinearDepth
        } else {
            Self::SceneDepth
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SceneColor => "smear_scene_color",
            Self::SceneDepth => "smear_scene_depth",
            Self::LinearDepth => "smear_linear_depth",
            Self::Velocity => "smear_velocity",
            Self::MotionPrep => "smear_motion_prep",
            Self::Reprojection => "smear_reprojection",
            Self::TemporalHistoryA => "smear_temporal_history_a",
            Self::TemporalHistoryB => "smear_temporal_history_b",
            Self::ObjectVelocity => "smear_object_velocity",
        }
    }
}

/// How a resource may currently be accessed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResourceState {
    #[default]
    Common,
    /// Read-write access from compute kernels.
    UnorderedAccess,
    /// Read-only access from compute kernels.
    ShaderResource,
    /// Target of clears.
    RenderTarget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceBinding {
    pub state: ResourceState,
    pub size: UVec2,
}

/// Registry of every resource the pipeline touches, together with the state
/// each one was last transitioned into.
///
/// Resources are created once, at output resolution; afterwards only their
/// states change.
#[derive(Clone, Debug, Default)]
pub struct ResourceSet {
    sizes: FxHashMap<ResourceId, UVec2>,
    states: ResourceStates,
}

impl ResourceSet {
    /// Registers all resources for given output resolution, in the
    /// [`ResourceState::Common`] state.
    ///
    /// The motion-prep buffer is half the resolution, rounded up.
    pub fn for_output(size: UVec2) -> Self {
        assert!(size.x > 0 && size.y > 0, "output size must not be empty");

        info!("Registering resources; size={}x{}", size.x, size.y);

        let mut this = Self::default();

        for id in ResourceId::ALL {
            let size = if id == ResourceId::MotionPrep {
                (size + 1) / 2
            } else {
                size
            };

            this.register(
                id,
                ResourceBinding {
                    state: ResourceState::Common,
                    size,
                },
            );
        }

        this
    }

    pub fn register(&mut self, id: ResourceId, binding: ResourceBinding) {
        assert!(
            binding.size.x > 0 && binding.size.y > 0,
            "resource {id:?} must not be empty"
        );

        self.sizes.insert(id, binding.size);
        self.states.insert(id, binding.state);
    }

    pub fn binding(&self, id: ResourceId) -> ResourceBinding {
        ResourceBinding {
            state: self.state(id),
            size: self.size(id),
        }
    }

    pub fn size(&self, id: ResourceId) -> UVec2 {
        self.sizes
            .get(&id)
            .copied()
            .unwrap_or_else(|| panic!("resource {id:?} is not registered"))
    }

    pub fn state(&self, id: ResourceId) -> ResourceState {
        self.states
            .get(&id)
            .copied()
            .unwrap_or_else(|| panic!("resource {id:?} is not registered"))
    }

    pub fn states(&self) -> &ResourceStates {
        &self.states
    }

    /// Overrides the tracked state of given resource, for collaborators that
    /// transition it outside of the pipeline (e.g. a scene renderer handing
    /// color back as a render target).
    pub fn assume_state(&mut self, id: ResourceId, state: ResourceState) {
        assert!(
            self.states.contains_key(&id),
            "resource {id:?} is not registered"
        );

        self.states.insert(id, state);
    }

    /// Records whichever transitions are needed to satisfy given requirements
    /// and updates the tracked states.
    pub fn transition_for_pass(
        &mut self,
        ctx: &mut dyn CommandContext,
        requirements: &[Requirement],
    ) {
        for transition in plan_transitions(&self.states, requirements) {
            ctx.transition(transition.resource, transition.from, transition.to);

            self.states.insert(transition.resource, transition.to);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, ResourceBinding)> + '_ {
        self.sizes.keys().map(|&id| (id, self.binding(id)))
    }
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;
    use crate::{Command, RecordingContext, Transition};

    #[test]
    fn for_output() {
        let target = ResourceSet::for_output(uvec2(1921, 1081));

        assert_eq!(uvec2(1921, 1081), target.size(ResourceId::SceneColor));
        assert_eq!(uvec2(961, 541), target.size(ResourceId::MotionPrep));

        for id in ResourceId::ALL {
            assert_eq!(ResourceState::Common, target.state(id));
        }
    }

    #[test]
    #[should_panic(expected = "output size must not be empty")]
    fn for_empty_output() {
        ResourceSet::for_output(uvec2(0, 1080));
    }

    #[test]
    fn transition_for_pass() {
        let mut target = ResourceSet::for_output(uvec2(64, 64));
        let mut ctx = RecordingContext::default();

        target.assume_state(ResourceId::SceneColor, ResourceState::RenderTarget);

        target.transition_for_pass(
            &mut ctx,
            &[
                Requirement::read(ResourceId::SceneDepth),
                Requirement::read_write(ResourceId::SceneColor),
            ],
        );

        // already satisfied, so nothing should get recorded
        target.transition_for_pass(
            &mut ctx,
            &[Requirement::read_write(ResourceId::SceneColor)],
        );

        assert_eq!(
            &[
                Command::Transition(Transition {
                    resource: ResourceId::SceneDepth,
                    from: ResourceState::Common,
                    to: ResourceState::ShaderResource,
                }),
                Command::Transition(Transition {
                    resource: ResourceId::SceneColor,
                    from: ResourceState::RenderTarget,
                    to: ResourceState::UnorderedAccess,
                }),
            ],
            ctx.commands()
        );

        assert_eq!(
            ResourceState::ShaderResource,
            target.state(ResourceId::SceneDepth)
        );

        assert_eq!(
            ResourceState::UnorderedAccess,
            target.state(ResourceId::SceneColor)
        );
    }

    #[test]
    fn temporal_history() {
        assert_eq!(
            ResourceId::TemporalHistoryA,
            ResourceId::temporal_history(0)
        );

        assert_eq!(
            ResourceId::TemporalHistoryB,
            ResourceId::temporal_history(1)
        );
    }
}
