use fractus_render::RenderBuffer;

/// Where finished frames go.
///
/// `present` must copy what it needs; the frame is only borrowed for the
/// duration of the call.
pub trait Surface {
    fn present(&mut self, frame: &RenderBuffer);
}

/// Keeps the most recent frame and counts how many have been presented, so
/// a host can upload only when something changed.
#[derive(Debug, Default)]
pub struct FrameSurface {
    frame: Option<RenderBuffer>,
    revision: u64,
}

impl FrameSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> Option<&RenderBuffer> {
        self.frame.as_ref()
    }

    /// Number of frames presented so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Surface for FrameSurface {
    fn present(&mut self, frame: &RenderBuffer) {
        match self.frame.as_mut() {
            Some(current) => current.copy_from(frame),
            None => self.frame = Some(frame.clone()),
        }
        self.revision += 1;
    }
}
