mod context;
mod pipelines;
mod resources;
mod texture;

pub use self::context::*;
pub use self::pipelines::*;
pub use self::resources::*;
pub use self::texture::*;
