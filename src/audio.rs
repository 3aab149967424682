use std::io::{self, Write};

use tracing::trace;

use crate::engine::Cue;

/// Plays sound cues. Playback must never block or fail the caller.
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
}

/// Rings the terminal bell. Wall bounces are too frequent for a bell and stay silent.
pub struct Bell<W: Write> {
    out: W,
}

impl Bell<io::Stdout> {
    pub fn stdout() -> Self {
        Bell { out: io::stdout() }
    }
}

impl<W: Write> Bell<W> {
    pub fn new(out: W) -> Self {
        Bell { out }
    }
}

impl<W: Write> AudioSink for Bell<W> {
    fn play(&mut self, cue: Cue) {
        trace!(?cue, "cue");
        if cue == Cue::WallHit {
            return;
        }
        // Failures are dropped: a missing beep is not worth a crash.
        let _ = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
    }
}

pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, cue: Cue) {
        trace!(?cue, "cue muted");
    }
}
