/// Shortest playback/capture length, in samples.
pub const BUF_MIN_LENGTH: usize = 4096;

/// Longest playback/capture length, in samples. The physical buffers hold
/// one extra guard slot past this.
pub const BUF_MAX_LENGTH: usize = 32767;

/// Names one of the two physical sample buffers. Voices hold on to the id
/// they were triggered with, so a later role swap never changes what a
/// mid-flight voice is reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferId {
    A,
    B,
}

/// The two capture/play buffers. Exactly one is the capture target at any
/// time; the other is the play source. Roles are exchanged only through
/// [`BufferPair::swap`], never partially.
pub struct BufferPair {
    a: Vec<i16>,
    b: Vec<i16>,
    capture_target: BufferId,
}

impl BufferPair {
    pub fn new() -> Self {
        // The extra slot lets interpolation read one sample past the
        // logical end of a full-length buffer.
        Self {
            a: vec![0; BUF_MAX_LENGTH + 1],
            b: vec![0; BUF_MAX_LENGTH + 1],
            capture_target: BufferId::A,
        }
    }

    pub fn capture_id(&self) -> BufferId {
        self.capture_target
    }

    pub fn play_id(&self) -> BufferId {
        match self.capture_target {
            BufferId::A => BufferId::B,
            BufferId::B => BufferId::A,
        }
    }

    pub fn get(&self, id: BufferId) -> &[i16] {
        match id {
            BufferId::A => &self.a,
            BufferId::B => &self.b,
        }
    }

    pub fn capture_mut(&mut self) -> &mut [i16] {
        match self.capture_target {
            BufferId::A => &mut self.a,
            BufferId::B => &mut self.b,
        }
    }

    pub fn swap(&mut self) {
        self.capture_target = self.play_id();
    }

    pub fn reset(&mut self) {
        self.a.fill(0);
        self.b.fill(0);
        self.capture_target = BufferId::A;
    }
}

impl Default for BufferPair {
    fn default() -> Self {
        Self::new()
    }
}
