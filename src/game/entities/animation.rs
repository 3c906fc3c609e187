// Sprite-sheet animation shared by every entity

use std::collections::HashMap;
use std::time::Duration;

use glam::Vec2;

use super::direction::Direction;

/// Names of the sprite configurations an entity can switch between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    Idle,
    Right,
    Down,
    Left,
    Up,
    AttackRight,
    AttackDown,
    AttackLeft,
    AttackUp,
    HitRight,
    HitDown,
    HitLeft,
    HitUp,
}

impl ActionName {
    /// Walking action for a direction (`Idle` when there is none)
    pub fn walking(direction: Direction) -> Self {
        match direction {
            Direction::None => Self::Idle,
            Direction::Right => Self::Right,
            Direction::Down => Self::Down,
            Direction::Left => Self::Left,
            Direction::Up => Self::Up,
        }
    }

    /// Attack facing a direction
    pub fn attack(direction: Direction) -> Option<Self> {
        match direction {
            Direction::None => None,
            Direction::Right => Some(Self::AttackRight),
            Direction::Down => Some(Self::AttackDown),
            Direction::Left => Some(Self::AttackLeft),
            Direction::Up => Some(Self::AttackUp),
        }
    }

    /// Taking a hit that arrives from a direction
    pub fn hit_from(direction: Direction) -> Option<Self> {
        match direction {
            Direction::None => None,
            Direction::Right => Some(Self::HitRight),
            Direction::Down => Some(Self::HitDown),
            Direction::Left => Some(Self::HitLeft),
            Direction::Up => Some(Self::HitUp),
        }
    }
}

/// A named sprite configuration: one single-row sprite sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAction {
    /// Image path, resolved through the asset cache at draw time
    pub source: String,
    /// Width of the whole sheet in pixels
    pub sheet_width: f32,
    /// Number of frames laid out horizontally
    pub columns: u32,
}

impl SpriteAction {
    pub fn new(source: impl Into<String>, sheet_width: f32, columns: u32) -> Self {
        Self {
            source: source.into(),
            sheet_width,
            columns: columns.max(1),
        }
    }

    /// Width of a single frame
    pub fn frame_width(&self) -> f32 {
        self.sheet_width / self.columns as f32
    }
}

/// Table of the actions an entity can switch to
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    actions: HashMap<ActionName, SpriteAction>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action (builder style)
    pub fn with_action(mut self, name: ActionName, action: SpriteAction) -> Self {
        self.actions.insert(name, action);
        self
    }

    pub fn get(&self, name: ActionName) -> Option<&SpriteAction> {
        self.actions.get(&name)
    }
}

#[cfg(test)]
impl ActionTable {
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Which sub-image of the current sprite sheet to draw
///
/// Frames advance on a fixed period fed by [`AnimationState::tick`], never
/// by rendering.
#[derive(Debug, Clone)]
pub struct AnimationState {
    /// Image path of the active sheet
    image: String,
    /// Current frame index, always in `0..frame_count`
    current_frame: u32,
    /// Number of frames in the active sheet (at least 1)
    frame_count: u32,
    /// Width of a single frame
    frame_width: f32,
    /// Top-left corner of the current frame inside the sheet
    source: Vec2,
    /// Time between frames
    interval: Duration,
    /// Time accumulated toward the next frame
    elapsed: Duration,
}

impl AnimationState {
    pub fn new(
        image: impl Into<String>,
        frame_width: f32,
        frame_count: u32,
        start_frame: u32,
        interval: Duration,
    ) -> Self {
        let frame_count = frame_count.max(1);
        Self {
            image: image.into(),
            current_frame: start_frame % frame_count,
            frame_count,
            frame_width,
            source: Vec2::ZERO,
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Step to the next frame, wrapping at `frame_count`
    pub fn advance_frame(&mut self) {
        self.current_frame = (self.current_frame + 1) % self.frame_count;
        self.source.x = self.current_frame as f32 * self.frame_width;
    }

    /// Feed elapsed time into the animation clock, returns frames advanced
    pub fn tick(&mut self, dt: Duration) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }

        self.elapsed += dt;

        let mut advanced = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.advance_frame();
            advanced += 1;
        }
        advanced
    }

    /// Switch to another sheet and restart from frame 0
    pub fn set_action(&mut self, action: &SpriteAction) {
        self.image.clone_from(&action.source);
        self.frame_width = action.frame_width();
        self.frame_count = action.columns.max(1);
        self.current_frame = 0;
    }

    /// Collapse to an empty frame (used on soft removal)
    pub fn collapse(&mut self) {
        self.frame_width = 0.0;
        self.source = Vec2::ZERO;
    }

    /// Point the source rectangle at an explicit column
    pub fn set_source_x(&mut self, x: f32) {
        self.source.x = x;
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn frame_width(&self) -> f32 {
        self.frame_width
    }

    pub fn source(&self) -> Vec2 {
        self.source
    }
}
