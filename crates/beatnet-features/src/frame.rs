//! Analysis frame assembly from streamed blocks.
//!
//! A small ring buffer collects resampled samples and, once warmed up, hands
//! out the most recent full analysis frame on every call. Hopping is
//! caller-paced: the caller decides how many samples go in between frames.

/// Ring buffer that yields the latest `frame_size` samples.
pub struct FrameAssembler {
    frame_size: usize,
    ring_size: usize,
    write_pos: usize,
    total_written: usize,
    ring: Vec<f32>,
}

impl FrameAssembler {
    /// Create an assembler for frames of `frame_size` samples.
    pub fn new(frame_size: usize) -> Self {
        // A little headroom over one frame so a block can straddle the seam.
        let ring_size = frame_size + frame_size / 10;
        Self {
            frame_size,
            ring_size,
            write_pos: 0,
            total_written: 0,
            ring: vec![0.0; ring_size],
        }
    }

    /// Append a block and return the most recent frame, or `None` while the
    /// buffer is still warming up.
    pub fn process(&mut self, input: &[f32]) -> Option<Vec<f32>> {
        for &sample in input {
            self.ring[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % self.ring_size;
            self.total_written += 1;
        }

        if self.total_written < self.frame_size {
            return None;
        }

        let mut frame = vec![0.0; self.frame_size];
        for (i, slot) in frame.iter_mut().enumerate() {
            let index = (self.write_pos + self.ring_size - self.frame_size + i) % self.ring_size;
            *slot = self.ring[index];
        }
        Some(frame)
    }

    /// Clear all buffered samples.
    pub fn reset(&mut self) {
        self.ring.fill(0.0);
        self.write_pos = 0;
        self.total_written = 0;
    }
}
