use crate::gpu::FrameParity;

/// A pair of values that swap roles every frame.
#[derive(Clone, Debug)]
pub struct DoubleBuffered<T> {
    a: T,
    b: T,
}

impl<T> DoubleBuffered<T> {
    pub fn new(mut f: impl FnMut(FrameParity) -> T) -> Self {
        Self {
            a: f(FrameParity::new(0)),
            b: f(FrameParity::new(1)),
        }
    }

    pub fn get(&self, parity: FrameParity) -> &T {
        if parity.is_alternate() {
            &self.b
        } else {
            &self.a
        }
    }
}
