// Audio cues and the sound board that plays them

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::engine::assets::{AssetHandle, AssetId, SoundHandle};

/// Every sound the game triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Intro,
    Win,
    GamePlay,
    GameOver,
    EnemyHit,
    PlayerHit,
    PickUp,
    Select,
}

impl Cue {
    pub const ALL: [Cue; 8] = [
        Cue::Intro,
        Cue::Win,
        Cue::GamePlay,
        Cue::GameOver,
        Cue::EnemyHit,
        Cue::PlayerHit,
        Cue::PickUp,
        Cue::Select,
    ];

    /// Asset path of the cue
    pub fn path(&self) -> &'static str {
        match self {
            Cue::Intro => "audio/intro.mp3",
            Cue::Win => "audio/win.mp3",
            Cue::GamePlay => "audio/gameplay.mp3",
            Cue::GameOver => "audio/gameover.mp3",
            Cue::EnemyHit => "audio/enemyHit.wav",
            Cue::PlayerHit => "audio/playerHit.wav",
            Cue::PickUp => "audio/pickup.wav",
            Cue::Select => "audio/select.wav",
        }
    }
}

/// Fire-and-forget playback keyed by cue
pub trait AudioSink {
    fn play(&mut self, cue: Cue);

    fn stop(&mut self, cue: Cue);
}

/// Sound board backed by sound asset handles
///
/// Keeps track of what is currently playing and how often each cue fired.
#[derive(Debug)]
pub struct SoundBoard {
    sounds: HashMap<Cue, SoundHandle>,
    playing: HashSet<Cue>,
    plays: HashMap<Cue, u32>,
    /// Volume for every cue (0.0 - 1.0)
    volume: f32,
}

impl SoundBoard {
    pub fn new() -> Self {
        let sounds = Cue::ALL
            .iter()
            .map(|cue| (*cue, AssetHandle::new(AssetId::from_path(cue.path()))))
            .collect();

        Self {
            sounds,
            playing: HashSet::new(),
            plays: HashMap::new(),
            volume: 0.3,
        }
    }

    /// Handle of the sound behind a cue
    pub fn handle(&self, cue: Cue) -> Option<SoundHandle> {
        self.sounds.get(&cue).copied()
    }

    #[cfg(test)]
    pub fn is_playing(&self, cue: Cue) -> bool {
        self.playing.contains(&cue)
    }

    /// Number of times a cue was started
    #[cfg(test)]
    pub fn play_count(&self, cue: Cue) -> u32 {
        self.plays.get(&cue).copied().unwrap_or(0)
    }
}

impl Default for SoundBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for SoundBoard {
    fn play(&mut self, cue: Cue) {
        if let Some(handle) = self.handle(cue) {
            debug!("Playing {} ({:?}) at volume {}", cue.path(), handle.id(), self.volume);
        }
        self.playing.insert(cue);
        *self.plays.entry(cue).or_insert(0) += 1;
    }

    fn stop(&mut self, cue: Cue) {
        if self.playing.remove(&cue) {
            debug!("Stopped {}", cue.path());
        }
    }
}
