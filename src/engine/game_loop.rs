/// Frame timing for the render-driven game loop
///
/// Every frame measures the time since the previous one and hands it to the
/// simulation as its delta. Frames longer than `MAX_FRAME_DELTA` are clamped
/// so a stalled window does not teleport entities across the map.
use std::time::{Duration, Instant};

/// Longest delta handed to the simulation
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Game loop timing state
pub struct GameLoop {
    /// Time of last frame
    last_frame_time: Instant,

    /// Whether frames keep being requested
    running: bool,

    /// Whether the simulation is paused
    paused: bool,

    /// Current frame number
    frame_count: u64,
}

impl GameLoop {
    /// Create a new game loop
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a game loop whose first frame is measured from `now`
    pub fn starting_at(now: Instant) -> Self {
        Self {
            last_frame_time: now,
            running: true,
            paused: false,
            frame_count: 0,
        }
    }

    /// Begin a new frame at `now`, returns the simulation delta
    pub fn begin_frame_at(&mut self, now: Instant) -> Duration {
        let frame_time = now.saturating_duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.frame_count += 1;

        // A paused simulation sees no time pass
        if self.paused {
            Duration::ZERO
        } else {
            frame_time.min(MAX_FRAME_DELTA)
        }
    }

    /// Whether the host should be asked for another frame
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop requesting frames
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            log::info!("Game loop stopped after {} frames", self.frame_count);
        }
    }

    /// Check if game is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause the game
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Game paused");
        }
    }

    /// Resume the game
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            log::info!("Game resumed");
        }
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_loop_creation() {
        let game_loop = GameLoop::new();
        assert_eq!(game_loop.frame_count, 0);
        assert!(game_loop.is_running());
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_delta_is_time_since_previous_frame() {
        let start = Instant::now();
        let mut game_loop = GameLoop::starting_at(start);

        let delta = game_loop.begin_frame_at(start + Duration::from_millis(16));
        assert_eq!(delta, Duration::from_millis(16));

        let delta = game_loop.begin_frame_at(start + Duration::from_millis(50));
        assert_eq!(delta, Duration::from_millis(34));
        assert_eq!(game_loop.frame_count, 2);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let start = Instant::now();
        let mut game_loop = GameLoop::starting_at(start);

        let delta = game_loop.begin_frame_at(start + Duration::from_secs(3));
        assert_eq!(delta, MAX_FRAME_DELTA);
    }

    #[test]
    fn test_paused_delta_is_zero() {
        let start = Instant::now();
        let mut game_loop = GameLoop::starting_at(start);
        game_loop.pause();

        let delta = game_loop.begin_frame_at(start + Duration::from_millis(50));
        assert_eq!(delta, Duration::ZERO);

        game_loop.resume();
        let delta = game_loop.begin_frame_at(start + Duration::from_millis(70));
        assert_eq!(delta, Duration::from_millis(20));
    }

    #[test]
    fn test_toggle_pause() {
        let mut game_loop = GameLoop::new();

        game_loop.toggle_pause();
        assert!(game_loop.is_paused());

        game_loop.toggle_pause();
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_stop() {
        let mut game_loop = GameLoop::new();
        game_loop.stop();
        assert!(!game_loop.is_running());
    }
}
