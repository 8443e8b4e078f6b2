use crate::{CommandContext, Requirement, ResourceId, ResourceSet};

const HISTORY: [ResourceId; 2] =
    [ResourceId::TemporalHistoryA, ResourceId::TemporalHistoryB];

/// Clears both history buffers to black, so that re-enabling temporal AA
/// doesn't blend in stale frames.
#[derive(Debug)]
pub struct HistoryClearPass;

impl HistoryClearPass {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, ctx: &mut dyn CommandContext, resources: &mut ResourceSet) {
        let requirements = HISTORY.map(Requirement::clear);

        resources.transition_for_pass(ctx, &requirements);

        for resource in HISTORY {
            ctx.clear(resource);
        }
    }
}
