//! Motion blur and temporal anti-aliasing, recorded as a sequence of compute
//! passes with explicit resource-state transitions.
//!
//! The pipeline itself ([`MotionBlur`]) is backend-agnostic: it records into a
//! [`CommandContext`], tracking the state of every resource in a
//! [`ResourceSet`]. [`WgpuContext`] executes the recorded work on wgpu, while
//! [`RecordingContext`] captures it for inspection and validation.

mod backend;
mod config;
mod context;
mod double_buffered;
mod kernels;
mod mode;
mod motion_blur;
mod pass;
mod passes;
mod recorder;
mod resources;
mod transitions;

pub use smear_gpu as gpu;

pub use self::backend::*;
pub use self::config::*;
pub use self::context::*;
pub use self::double_buffered::*;
pub use self::kernels::*;
pub use self::mode::*;
pub use self::motion_blur::*;
pub use self::pass::*;
pub use self::passes::*;
pub use self::recorder::*;
pub use self::resources::*;
pub use self::transitions::*;
