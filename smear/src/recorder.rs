use glam::UVec2;
use log::trace;
use thiserror::Error;

use crate::gpu::{PrePassParams, RootConstants};
use crate::{
    group_count, CommandContext, Kernel, ResourceId, ResourceState,
    ResourceStates, Transition, MAX_SRVS, MAX_UAVS,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    BeginScope(String),
    EndScope,
    SetKernel(Kernel),
    BindSrvs {
        first_slot: u32,
        resources: Vec<ResourceId>,
    },
    BindUavs {
        first_slot: u32,
        resources: Vec<ResourceId>,
    },
    SetConstants(RootConstants),
    SetConstantBlock(PrePassParams),
    Transition(Transition),
    Clear(ResourceId),
    Dispatch {
        kernel: Option<Kernel>,
        threads: UVec2,
        groups: UVec2,
    },
}

/// [`CommandContext`] that doesn't execute anything, but rather remembers the
/// commands for later inspection.
#[derive(Clone, Debug, Default)]
pub struct RecordingContext {
    commands: Vec<Command>,
    kernel: Option<Kernel>,
}

impl RecordingContext {
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Returns kernels and thread-grid sizes of all recorded dispatches.
    pub fn dispatches(&self) -> impl Iterator<Item = (Kernel, UVec2)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            Command::Dispatch {
                kernel: Some(kernel),
                threads,
                ..
            } => Some((*kernel, *threads)),
            _ => None,
        })
    }

    pub fn dispatch_count(&self, f: impl Fn(Kernel) -> bool) -> usize {
        self.dispatches().filter(|(kernel, _)| f(*kernel)).count()
    }

    pub fn cleared(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            Command::Clear(id) => Some(*id),
            _ => None,
        })
    }

    fn push(&mut self, cmd: Command) {
        trace!("Recording: {cmd:?}");

        self.commands.push(cmd);
    }
}

impl CommandContext for RecordingContext {
    fn set_kernel(&mut self, kernel: Kernel) {
        self.kernel = Some(kernel);
        self.push(Command::SetKernel(kernel));
    }

    fn bind_srvs(&mut self, first_slot: u32, resources: &[ResourceId]) {
        self.push(Command::BindSrvs {
            first_slot,
            resources: resources.to_vec(),
        });
    }

    fn bind_uavs(&mut self, first_slot: u32, resources: &[ResourceId]) {
        self.push(Command::BindUavs {
            first_slot,
            resources: resources.to_vec(),
        });
    }

    fn set_constants(&mut self, constants: RootConstants) {
        self.push(Command::SetConstants(constants));
    }

    fn set_constant_block(&mut self, params: &PrePassParams) {
        self.push(Command::SetConstantBlock(*params));
    }

    fn transition(
        &mut self,
        resource: ResourceId,
        from: ResourceState,
        to: ResourceState,
    ) {
        self.push(Command::Transition(Transition { resource, from, to }));
    }

    fn clear(&mut self, resource: ResourceId) {
        self.push(Command::Clear(resource));
    }

    fn dispatch_2d(&mut self, threads: UVec2) {
        self.push(Command::Dispatch {
            kernel: self.kernel,
            threads,
            groups: group_count(threads),
        });
    }

    fn begin_scope(&mut self, name: &str) {
        self.push(Command::BeginScope(name.to_owned()));
    }

    fn end_scope(&mut self) {
        self.push(Command::EndScope);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StateViolation {
    #[error("command #{index}: {resource:?} is not registered")]
    Unregistered { index: usize, resource: ResourceId },

    #[error(
        "command #{index}: {resource:?} transitioned from {from:?}, but it's \
         in {actual:?}"
    )]
    StaleTransition {
        index: usize,
        resource: ResourceId,
        from: ResourceState,
        actual: ResourceState,
    },

    #[error(
        "command #{index}: {kernel:?} uses {resource:?} as {required:?}, but \
         it's in {actual:?}"
    )]
    UseBeforeTransition {
        index: usize,
        kernel: Kernel,
        resource: ResourceId,
        required: ResourceState,
        actual: ResourceState,
    },

    #[error("command #{index}: {resource:?} cleared while in {actual:?}")]
    ClearBeforeTransition {
        index: usize,
        resource: ResourceId,
        actual: ResourceState,
    },

    #[error("command #{index}: {kernel:?} has nothing bound to {slot}")]
    MissingBinding {
        index: usize,
        kernel: Kernel,
        slot: Slot,
    },

    #[error("command #{index}: dispatch without a kernel")]
    MissingKernel { index: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    ConstantBlock,
    RootConstants,
    Srv(usize),
    Uav(usize),
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::ConstantBlock => write!(f, "the constant block"),
            Slot::RootConstants => write!(f, "root constants"),
            Slot::Srv(slot) => write!(f, "SRV slot {slot}"),
            Slot::Uav(slot) => write!(f, "UAV slot {slot}"),
        }
    }
}

/// Replays given commands, starting from `states`, and checks that every
/// transition starts from the state the resource is actually in and that
/// every dispatch and clear touches resources only in the state they require.
///
/// Returns the states resources end up in.
pub fn verify_transitions(
    states: &ResourceStates,
    commands: &[Command],
) -> Result<ResourceStates, StateViolation> {
    let mut states = states.clone();
    let mut kernel = None;
    let mut srvs = [None; MAX_SRVS];
    let mut uavs = [None; MAX_UAVS];
    let mut has_constants = false;
    let mut has_constant_block = false;

    let state_of = |states: &ResourceStates, index, resource| {
        states
            .get(&resource)
            .copied()
            .ok_or(StateViolation::Unregistered { index, resource })
    };

    for (index, cmd) in commands.iter().enumerate() {
        match cmd {
            Command::BeginScope(_) | Command::EndScope => {
                //
            }

            Command::SetKernel(k) => {
                kernel = Some(*k);
            }

            Command::BindSrvs {
                first_slot,
                resources,
            } => {
                bind(&mut srvs, *first_slot, resources);
            }

            Command::BindUavs {
                first_slot,
                resources,
            } => {
                bind(&mut uavs, *first_slot, resources);
            }

            Command::SetConstants(_) => {
                has_constants = true;
            }

            Command::SetConstantBlock(_) => {
                has_constant_block = true;
            }

            Command::Transition(transition) => {
                let actual = state_of(&states, index, transition.resource)?;

                if actual != transition.from {
                    return Err(StateViolation::StaleTransition {
                        index,
                        resource: transition.resource,
                        from: transition.from,
                        actual,
                    });
                }

                states.insert(transition.resource, transition.to);
            }

            Command::Clear(resource) => {
                let actual = state_of(&states, index, *resource)?;

                if actual != ResourceState::RenderTarget {
                    return Err(StateViolation::ClearBeforeTransition {
                        index,
                        resource: *resource,
                        actual,
                    });
                }
            }

            Command::Dispatch { .. } => {
                let kernel =
                    kernel.ok_or(StateViolation::MissingKernel { index })?;

                let sig = kernel.signature();

                let missing = |slot| StateViolation::MissingBinding {
                    index,
                    kernel,
                    slot,
                };

                if sig.constant_block && !has_constant_block {
                    return Err(missing(Slot::ConstantBlock));
                }

                if sig.root_constants && !has_constants {
                    return Err(missing(Slot::RootConstants));
                }

                let bound_srvs = (0..sig.srvs.len())
                    .map(|slot| srvs[slot].ok_or(missing(Slot::Srv(slot))))
                    .collect::<Result<Vec<_>, _>>()?;

                let bound_uavs = (0..sig.uavs.len())
                    .map(|slot| uavs[slot].ok_or(missing(Slot::Uav(slot))))
                    .collect::<Result<Vec<_>, _>>()?;

                for (resources, required) in [
                    (&bound_srvs, ResourceState::ShaderResource),
                    (&bound_uavs, ResourceState::UnorderedAccess),
                ] {
                    for &resource in resources {
                        let actual = state_of(&states, index, resource)?;

                        if actual != required {
                            return Err(StateViolation::UseBeforeTransition {
                                index,
                                kernel,
                                resource,
                                required,
                                actual,
                            });
                        }
                    }
                }
            }
        }
    }

    Ok(states)
}

fn bind<const N: usize>(
    slots: &mut [Option<ResourceId>; N],
    first_slot: u32,
    resources: &[ResourceId],
) {
    for (slot, &resource) in resources.iter().enumerate() {
        let slot = first_slot as usize + slot;

        assert!(slot < N, "slot {slot} is out of range (max: {N})");

        slots[slot] = Some(resource);
    }
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;
    use crate::ResourceSet;

    fn states() -> ResourceStates {
        ResourceSet::for_output(uvec2(64, 64)).states().clone()
    }

    fn transition(
        resource: ResourceId,
        from: ResourceState,
        to: ResourceState,
    ) -> Command {
        Command::Transition(Transition { resource, from, to })
    }

    fn velocity_pass() -> Vec<Command> {
        vec![
            Command::SetConstantBlock(Default::default()),
            Command::SetKernel(Kernel::CameraVelocity { linear_z: false }),
            Command::BindSrvs {
                first_slot: 0,
                resources: vec![ResourceId::SceneDepth],
            },
            Command::BindUavs {
                first_slot: 0,
                resources: vec![ResourceId::Reprojection],
            },
            Command::Dispatch {
                kernel: Some(Kernel::CameraVelocity { linear_z: false }),
                threads: uvec2(64, 64),
                groups: uvec2(8, 8),
            },
        ]
    }

    #[test]
    fn valid() {
        let mut commands = vec![
            transition(
                ResourceId::SceneDepth,
                ResourceState::Common,
                ResourceState::ShaderResource,
            ),
            transition(
                ResourceId::Reprojection,
                ResourceState::Common,
                ResourceState::UnorderedAccess,
            ),
        ];

        commands.extend(velocity_pass());

        let states = verify_transitions(&states(), &commands).unwrap();

        assert_eq!(
            Some(&ResourceState::UnorderedAccess),
            states.get(&ResourceId::Reprojection)
        );
    }

    #[test]
    fn use_before_transition() {
        let mut commands = vec![transition(
            ResourceId::SceneDepth,
            ResourceState::Common,
            ResourceState::ShaderResource,
        )];

        commands.extend(velocity_pass());

        assert_eq!(
            Err(StateViolation::UseBeforeTransition {
                index: 5,
                kernel: Kernel::CameraVelocity { linear_z: false },
                resource: ResourceId::Reprojection,
                required: ResourceState::UnorderedAccess,
                actual: ResourceState::Common,
            }),
            verify_transitions(&states(), &commands)
        );
    }

    #[test]
    fn stale_transition() {
        let commands = [transition(
            ResourceId::SceneColor,
            ResourceState::RenderTarget,
            ResourceState::UnorderedAccess,
        )];

        assert_eq!(
            Err(StateViolation::StaleTransition {
                index: 0,
                resource: ResourceId::SceneColor,
                from: ResourceState::RenderTarget,
                actual: ResourceState::Common,
            }),
            verify_transitions(&states(), &commands)
        );
    }

    #[test]
    fn clear_before_transition() {
        let commands = [Command::Clear(ResourceId::TemporalHistoryA)];

        assert_eq!(
            Err(StateViolation::ClearBeforeTransition {
                index: 0,
                resource: ResourceId::TemporalHistoryA,
                actual: ResourceState::Common,
            }),
            verify_transitions(&states(), &commands)
        );
    }

    #[test]
    fn missing_binding() {
        let commands = [
            Command::SetKernel(Kernel::MotionBlurPrePass),
            Command::BindSrvs {
                first_slot: 0,
                resources: vec![ResourceId::SceneColor],
            },
            Command::Dispatch {
                kernel: Some(Kernel::MotionBlurPrePass),
                threads: uvec2(32, 32),
                groups: uvec2(4, 4),
            },
        ];

        assert_eq!(
            Err(StateViolation::MissingBinding {
                index: 2,
                kernel: Kernel::MotionBlurPrePass,
                slot: Slot::Srv(1),
            }),
            verify_transitions(&states(), &commands)
        );
    }

    #[test]
    fn read_write_aliasing() {
        let mut initial = states();

        initial.insert(ResourceId::SceneColor, ResourceState::UnorderedAccess);
        initial.insert(ResourceId::Reprojection, ResourceState::ShaderResource);

        initial.insert(
            ResourceId::TemporalHistoryA,
            ResourceState::ShaderResource,
        );

        let commands = [
            Command::SetConstants(Default::default()),
            Command::SetKernel(Kernel::TemporalBlend),
            Command::BindSrvs {
                first_slot: 0,
                resources: vec![
                    ResourceId::Reprojection,
                    ResourceId::TemporalHistoryA,
                ],
            },
            Command::BindUavs {
                first_slot: 0,
                resources: vec![
                    ResourceId::SceneColor,
                    ResourceId::TemporalHistoryA,
                ],
            },
            Command::Dispatch {
                kernel: Some(Kernel::TemporalBlend),
                threads: uvec2(64, 64),
                groups: uvec2(8, 8),
            },
        ];

        // A resource is never in both states at once
        assert!(matches!(
            verify_transitions(&initial, &commands),
            Err(StateViolation::UseBeforeTransition {
                index: 4,
                resource: ResourceId::TemporalHistoryA,
                ..
            })
        ));
    }

    #[test]
    fn recording() {
        let mut target = RecordingContext::default();

        target.set_kernel(Kernel::TemporalBlend);
        target.dispatch_2d(uvec2(1920, 1080));
        target.set_kernel(Kernel::MotionBlurPrePass);
        target.dispatch_2d(uvec2(960, 540));

        assert_eq!(
            vec![
                (Kernel::TemporalBlend, uvec2(1920, 1080)),
                (Kernel::MotionBlurPrePass, uvec2(960, 540)),
            ],
            target.dispatches().collect::<Vec<_>>()
        );

        assert_eq!(
            Some(&Command::Dispatch {
                kernel: Some(Kernel::MotionBlurPrePass),
                threads: uvec2(960, 540),
                groups: uvec2(120, 68),
            }),
            target.commands().last()
        );
    }
}
