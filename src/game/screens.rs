// Intro, win and lose overlays

use std::time::Duration;

use crate::core::math::SurfaceSize;
use crate::engine::assets::AssetCache;
use crate::engine::renderer::surface::{Color, Rect, Surface, TextAlign};
use crate::game::world::Score;

/// Splash art scrolled in by the intro
pub const INTRO_BACKGROUND: &str = "images/screen/slime.png";
/// Slime icon next to the kill count
pub const KILLS_ICON: &str = "images/screen/enemy.png";

const SCROLL_START: f32 = 800.0;
const SCROLL_STEP: f32 = 35.0;
const SCROLL_PERIOD: Duration = Duration::from_millis(100);
const BLINK_PERIOD: Duration = Duration::from_millis(450);

/// Horizontal centre used for every centred line
const TEXT_X: f32 = 255.0;

/// Title screen: the splash scrolls down, then the title and a blinking prompt
#[derive(Debug, Clone)]
pub struct IntroScreen {
    /// Splash offset, drawn at `-y`
    y: f32,
    scroll: Duration,
    blink: Duration,
    /// Prompt colour toggle, `None` until the first blink
    cta_dark: Option<bool>,
}

impl Default for IntroScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl IntroScreen {
    pub fn new() -> Self {
        Self {
            y: SCROLL_START,
            scroll: Duration::ZERO,
            blink: Duration::ZERO,
            cta_dark: None,
        }
    }

    /// Scroll finished; Enter may start the game
    pub fn is_ready(&self) -> bool {
        self.y <= 0.0
    }

    pub fn offset(&self) -> f32 {
        self.y
    }

    pub fn update(&mut self, dt: Duration) {
        if !self.is_ready() {
            self.scroll += dt;
            while self.scroll >= SCROLL_PERIOD && !self.is_ready() {
                self.scroll -= SCROLL_PERIOD;
                self.y = (self.y - SCROLL_STEP).max(0.0);
            }
            return;
        }

        self.blink += dt;
        while self.blink >= BLINK_PERIOD {
            self.blink -= BLINK_PERIOD;
            self.cta_dark = Some(!self.cta_dark.unwrap_or(true));
        }
    }

    pub fn render(&self, surface: &mut dyn Surface, assets: &AssetCache) {
        let size = surface.size();
        surface.clear();

        if let Some(handle) = assets.get(INTRO_BACKGROUND) {
            if let Some(image) = assets.image(handle) {
                let (w, h) = (image.width as f32, image.height as f32);
                surface.draw_image(handle, Rect::new(0.0, 0.0, w, h), Rect::new(0.0, -self.y, w, h));
            }
        }

        if !self.is_ready() {
            return;
        }

        let middle = size.height / 2.0;
        surface.fill_text("James in the", TEXT_X, middle, 30.0, Color::WHITE, TextAlign::Center);
        surface.fill_text("Dungeon of Slime", TEXT_X, middle + 25.0, 30.0, Color::WHITE, TextAlign::Center);

        if let Some(dark) = self.cta_dark {
            surface.fill_rect(Rect::new(0.0, middle + 55.0, size.width, 30.0), Color::BLACK);
            let color = if dark { Color::BLACK } else { Color::WHITE };
            surface.fill_text("Press enter to start", TEXT_X, middle + 75.0, 12.0, color, TextAlign::Center);
        }

        surface.fill_text(
            "\u{a9} lloan alas.",
            TEXT_X,
            size.height - 50.0,
            12.0,
            Color::WHITE,
            TextAlign::Center,
        );
    }
}

/// Win or lose panel shown over the level
#[derive(Debug, Clone)]
pub struct EndScreen {
    background: Color,
    panel: Rect,
    message: Option<String>,
}

impl EndScreen {
    fn with_background(background: Color, surface: SurfaceSize) -> Self {
        Self {
            background,
            panel: Rect::new(10.0, 100.0, surface.width - 20.0, surface.height / 2.0),
            message: None,
        }
    }

    pub fn win(surface: SurfaceSize) -> Self {
        Self::with_background(Color::BLACK, surface)
    }

    pub fn lose(surface: SurfaceSize) -> Self {
        Self::with_background(Color::from_hex(0x850402), surface)
    }

    /// Show the panel with a message
    pub fn init_end(&mut self, message: &str) {
        self.message = Some(message.to_string());
    }

    pub fn hide(&mut self) {
        self.message = None;
    }

    pub fn is_shown(&self) -> bool {
        self.message.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn render(&self, surface: &mut dyn Surface, assets: &AssetCache, score: Score) {
        let Some(message) = &self.message else {
            return;
        };

        let size = surface.size();
        let y = self.panel.y;
        surface.fill_rect(self.panel, self.background);

        surface.fill_text(message, TEXT_X, y + 100.0, 30.0, Color::WHITE, TextAlign::Center);
        surface.fill_text(
            &format!("Score: {}", score.score),
            TEXT_X,
            y + 130.0,
            20.0,
            Color::WHITE,
            TextAlign::Center,
        );

        if let Some(handle) = assets.get(KILLS_ICON) {
            if let Some(image) = assets.image(handle) {
                let (w, h) = (image.width as f32, image.height as f32);
                surface.draw_image(
                    handle,
                    Rect::new(0.0, 0.0, w, h),
                    Rect::new(size.width / 2.0 - 50.0, y + 160.0, w, h),
                );
            }
        }

        surface.fill_text(
            &format!("X  {}", score.enemies_killed),
            size.width / 2.0 + 30.0,
            y + 180.0,
            14.0,
            Color::WHITE,
            TextAlign::Center,
        );
        surface.fill_text(
            "Thank You for Playing!",
            TEXT_X,
            y + 240.0,
            14.0,
            Color::WHITE,
            TextAlign::Center,
        );
    }
}
