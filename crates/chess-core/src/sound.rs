use serde::Serialize;

/// Sound effects the board may play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Move,
    Capture,
}

impl SoundCue {
    /// Asset path served to the web client.
    pub fn asset(self) -> &'static str {
        match self {
            SoundCue::Move => "/sounds/move.mp3",
            SoundCue::Capture => "/sounds/capture.mp3",
        }
    }
}

/// Where the session sends its sound cues.
pub trait SoundEffects: Send {
    fn play(&self, cue: SoundCue);
}

/// Discards every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl SoundEffects for Silent {
    fn play(&self, _cue: SoundCue) {}
}

impl<F> SoundEffects for F
where
    F: Fn(SoundCue) + Send,
{
    fn play(&self, cue: SoundCue) {
        self(cue)
    }
}
