use std::ops::{Deref, DerefMut};

use glam::UVec2;

use crate::gpu::{self, PrePassParams, RootConstants};
use crate::{Kernel, ResourceId, ResourceState};

/// Sink of GPU work.
///
/// Commands are recorded in order; a dispatch uses whatever kernel, bindings
/// and constants were set before it.
pub trait CommandContext {
    fn set_kernel(&mut self, kernel: Kernel);

    /// Binds read-only textures into consecutive slots, starting at
    /// `first_slot`.
    fn bind_srvs(&mut self, first_slot: u32, resources: &[ResourceId]);

    /// Binds writable textures into consecutive slots, starting at
    /// `first_slot`.
    fn bind_uavs(&mut self, first_slot: u32, resources: &[ResourceId]);

    fn set_constants(&mut self, constants: RootConstants);

    /// Uploads a transient constant block, valid until it's replaced.
    fn set_constant_block(&mut self, params: &PrePassParams);

    fn transition(
        &mut self,
        resource: ResourceId,
        from: ResourceState,
        to: ResourceState,
    );

    /// Clears given resource to black; it must be a render target.
    fn clear(&mut self, resource: ResourceId);

    /// Dispatches enough thread groups to cover `threads`; see
    /// [`group_count()`].
    fn dispatch_2d(&mut self, threads: UVec2);

    fn begin_scope(&mut self, name: &str);

    fn end_scope(&mut self);
}

/// Returns the number of thread groups needed to cover given grid.
pub fn group_count(threads: UVec2) -> UVec2 {
    (threads + gpu::WORKGROUP_SIZE - 1) / gpu::WORKGROUP_SIZE
}

/// Named profiling scope that ends when dropped.
pub struct ProfileScope<'a> {
    ctx: &'a mut dyn CommandContext,
}

impl<'a> ProfileScope<'a> {
    pub fn new(ctx: &'a mut dyn CommandContext, name: &str) -> Self {
        ctx.begin_scope(name);

        Self { ctx }
    }
}

impl<'a> Deref for ProfileScope<'a> {
    type Target = dyn CommandContext + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.ctx
    }
}

impl<'a> DerefMut for ProfileScope<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.ctx
    }
}

impl Drop for ProfileScope<'_> {
    fn drop(&mut self) {
        self.ctx.end_scope();
    }
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;
    use crate::{Command, RecordingContext};

    #[test]
    fn group_count() {
        assert_eq!(uvec2(240, 135), super::group_count(uvec2(1920, 1080)));
        assert_eq!(uvec2(120, 68), super::group_count(uvec2(960, 540)));
        assert_eq!(uvec2(1, 1), super::group_count(uvec2(1, 1)));
        assert_eq!(uvec2(2, 1), super::group_count(uvec2(9, 8)));
    }

    #[test]
    fn profile_scope() {
        let mut ctx = RecordingContext::default();

        {
            let mut scope = ProfileScope::new(&mut ctx, "MotionBlur");

            scope.clear(ResourceId::TemporalHistoryA);
        }

        assert_eq!(
            &[
                Command::BeginScope("MotionBlur".into()),
                Command::Clear(ResourceId::TemporalHistoryA),
                Command::EndScope,
            ],
            ctx.commands()
        );
    }
}
