/// Selects which of the two temporal-history buffers is written and which is
/// read during given frame.
///
/// History buffers are never copied; they swap roles every frame, based on the
/// frame counter's lowest bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameParity {
    this_frame: usize,
}

impl FrameParity {
    pub fn new(frame: u64) -> Self {
        Self {
            this_frame: (frame & 1) as usize,
        }
    }

    /// Index of the history buffer written during this frame.
    pub fn this_frame(&self) -> usize {
        self.this_frame
    }

    /// Index of the history buffer written during the previous frame (and
    /// read during this one).
    pub fn last_frame(&self) -> usize {
        self.this_frame ^ 1
    }

    pub fn is_alternate(&self) -> bool {
        self.this_frame == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_alternate() {
        let frames = (0..1024).chain(u64::MAX - 1024..u64::MAX);

        for frame in frames {
            let curr = FrameParity::new(frame);
            let next = FrameParity::new(frame + 1);

            assert_eq!(curr.this_frame(), next.last_frame(), "frame={frame}");
            assert_ne!(curr.this_frame(), curr.last_frame(), "frame={frame}");
        }
    }

    #[test]
    fn even_frames_write_first_buffer() {
        assert_eq!(0, FrameParity::new(0).this_frame());
        assert_eq!(1, FrameParity::new(0).last_frame());
        assert_eq!(1, FrameParity::new(7).this_frame());
        assert!(FrameParity::new(7).is_alternate());
    }
}
