use fxhash::FxHashMap;

use crate::{ResourceId, ResourceState};

pub type ResourceStates = FxHashMap<ResourceId, ResourceState>;

/// How a pass is going to use a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    Read,
    ReadWrite,
    Clear,
}

impl Access {
    pub fn state(self) -> ResourceState {
        match self {
            Access::Read => ResourceState::ShaderResource,
            Access::ReadWrite => ResourceState::UnorderedAccess,
            Access::Clear => ResourceState::RenderTarget,
        }
    }

    fn merge(self, other: Self, resource: ResourceId) -> Self {
        match (self, other) {
            (Access::Clear, Access::Clear) => Access::Clear,

            (Access::Clear, _) | (_, Access::Clear) => {
                panic!("{resource:?} cannot be cleared and accessed by the same pass")
            }

            (Access::Read, Access::Read) => Access::Read,
            _ => Access::ReadWrite,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Requirement {
    pub resource: ResourceId,
    pub access: Access,
}

impl Requirement {
    pub fn read(resource: ResourceId) -> Self {
        Self {
            resource,
            access: Access::Read,
        }
    }

    pub fn read_write(resource: ResourceId) -> Self {
        Self {
            resource,
            access: Access::ReadWrite,
        }
    }

    pub fn clear(resource: ResourceId) -> Self {
        Self {
            resource,
            access: Access::Clear,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub resource: ResourceId,
    pub from: ResourceState,
    pub to: ResourceState,
}

/// Returns the transitions needed to bring resources from `states` into the
/// states required by a pass.
///
/// Only resources whose current state differs are transitioned. Requirements
/// for the same resource are merged (reading and writing a resource within
/// one pass means read-write access); transitions are returned in the order
/// the resources first appear in `requirements`.
pub fn plan_transitions(
    states: &ResourceStates,
    requirements: &[Requirement],
) -> Vec<Transition> {
    let mut merged: Vec<Requirement> = Vec::with_capacity(requirements.len());

    for req in requirements {
        if let Some(prev) =
            merged.iter_mut().find(|prev| prev.resource == req.resource)
        {
            prev.access = prev.access.merge(req.access, req.resource);
        } else {
            merged.push(*req);
        }
    }

    merged
        .into_iter()
        .filter_map(|req| {
            let from = states.get(&req.resource).copied().unwrap_or_else(|| {
                panic!("resource {:?} is not registered", req.resource)
            });

            let to = req.access.state();

            (from != to).then_some(Transition {
                resource: req.resource,
                from,
                to,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states(
        entries: impl IntoIterator<Item = (ResourceId, ResourceState)>,
    ) -> ResourceStates {
        entries.into_iter().collect()
    }

    #[test]
    fn minimal() {
        let states = states([
            (ResourceId::SceneColor, ResourceState::UnorderedAccess),
            (ResourceId::SceneDepth, ResourceState::Common),
            (ResourceId::Velocity, ResourceState::ShaderResource),
        ]);

        let actual = plan_transitions(
            &states,
            &[
                Requirement::read_write(ResourceId::SceneColor),
                Requirement::read(ResourceId::SceneDepth),
                Requirement::read(ResourceId::Velocity),
            ],
        );

        assert_eq!(
            vec![Transition {
                resource: ResourceId::SceneDepth,
                from: ResourceState::Common,
                to: ResourceState::ShaderResource,
            }],
            actual
        );
    }

    #[test]
    fn merges_duplicates() {
        let states = states([
            (ResourceId::SceneColor, ResourceState::RenderTarget),
            (ResourceId::Velocity, ResourceState::Common),
        ]);

        let actual = plan_transitions(
            &states,
            &[
                Requirement::read(ResourceId::Velocity),
                Requirement::read(ResourceId::SceneColor),
                Requirement::read_write(ResourceId::SceneColor),
                Requirement::read(ResourceId::Velocity),
            ],
        );

        assert_eq!(
            vec![
                Transition {
                    resource: ResourceId::Velocity,
                    from: ResourceState::Common,
                    to: ResourceState::ShaderResource,
                },
                Transition {
                    resource: ResourceId::SceneColor,
                    from: ResourceState::RenderTarget,
                    to: ResourceState::UnorderedAccess,
                },
            ],
            actual
        );
    }

    #[test]
    fn clear() {
        let states = states([
            (ResourceId::TemporalHistoryA, ResourceState::ShaderResource),
            (ResourceId::TemporalHistoryB, ResourceState::RenderTarget),
        ]);

        let actual = plan_transitions(
            &states,
            &[
                Requirement::clear(ResourceId::TemporalHistoryA),
                Requirement::clear(ResourceId::TemporalHistoryB),
            ],
        );

        assert_eq!(
            vec![Transition {
                resource: ResourceId::TemporalHistoryA,
                from: ResourceState::ShaderResource,
                to: ResourceState::RenderTarget,
            }],
            actual
        );
    }

    #[test]
    #[should_panic(expected = "cannot be cleared and accessed")]
    fn clear_conflict() {
        let states =
            states([(ResourceId::TemporalHistoryA, ResourceState::Common)]);

        plan_transitions(
            &states,
            &[
                Requirement::clear(ResourceId::TemporalHistoryA),
                Requirement::read(ResourceId::TemporalHistoryA),
            ],
        );
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn unregistered() {
        plan_transitions(
            &Default::default(),
            &[Requirement::read(ResourceId::SceneColor)],
        );
    }
}
