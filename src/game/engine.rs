// Game engine: owns the frame clock, the screens and the running level

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::engine::assets::AssetCache;
use crate::engine::audio::{AudioSink, Cue};
use crate::engine::game_loop::GameLoop;
use crate::engine::input::{Action, InputEvent};
use crate::engine::renderer::surface::{Color, Rect, Surface, TextAlign};
use crate::game::entities::player;
use crate::game::level;
use crate::game::screens::{EndScreen, IntroScreen, INTRO_BACKGROUND, KILLS_ICON};
use crate::game::world::{GameEvent, Score, TickContext, World};

/// Which screen has the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Intro,
    Playing,
}

/// What a deferred draw can look at when the queue is flushed
pub struct FrameView<'a> {
    pub assets: &'a AssetCache,
    pub score: Score,
}

/// One-shot draw run after the level, before the score
pub type DeferredDraw = Box<dyn FnOnce(&mut dyn Surface, &FrameView<'_>)>;

/// Top-level game state driven once per host frame
pub struct Engine<A: AudioSink> {
    config: GameConfig,
    clock: GameLoop,
    phase: Phase,

    // Screens
    intro: IntroScreen,
    win: EndScreen,
    lose: EndScreen,

    /// Current level, built when the game starts
    world: Option<World>,
    rng: StdRng,

    audio: A,
    assets: AssetCache,
    /// Set by the asset cache once every preload resolved
    assets_ready: Rc<Cell<bool>>,

    /// Draws flushed and cleared at the end of every render
    render_queue: Vec<DeferredDraw>,
    events: Vec<GameEvent>,
}

impl<A: AudioSink> Engine<A> {
    pub fn new(config: GameConfig, mut assets: AssetCache, mut audio: A) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut paths = level::image_paths();
        paths.push(INTRO_BACKGROUND.to_string());
        paths.push(KILLS_ICON.to_string());
        assets.load(paths);

        let assets_ready = Rc::new(Cell::new(false));
        let flag = assets_ready.clone();
        assets.on_ready(move || flag.set(true));

        audio.play(Cue::Intro);
        info!("Engine ready, {} images queued", assets.stats().pending);

        Self {
            clock: GameLoop::new(),
            phase: Phase::Intro,
            intro: IntroScreen::new(),
            win: EndScreen::win(config.surface),
            lose: EndScreen::lose(config.surface),
            world: None,
            rng,
            audio,
            assets,
            assets_ready,
            render_queue: Vec::new(),
            events: Vec::new(),
            config,
        }
    }

    /// Route one input event to the active screen
    pub fn handle_input(&mut self, event: InputEvent) {
        if event.repeat && !event.action.repeats() {
            return;
        }

        if event.action == Action::Pause {
            if event.pressed {
                self.clock.toggle_pause();
            }
            return;
        }

        match self.phase {
            Phase::Intro => {
                if event.pressed
                    && event.action == Action::Start
                    && self.intro.is_ready()
                    && self.assets_ready.get()
                {
                    self.start();
                }
            }
            Phase::Playing => {
                if event.action == Action::Reset {
                    if event.pressed {
                        self.reset();
                    }
                    return;
                }

                let Some(player) = self.world.as_mut().and_then(World::player_mut) else {
                    return;
                };
                if event.pressed {
                    player::key_pressed(player, event.action, event.shift, &mut self.audio);
                } else {
                    player::key_released(player, event.action);
                }
            }
        }
    }

    fn start(&mut self) {
        info!("Game started");
        self.world = Some(level::build(&self.config, &mut self.rng));
        self.phase = Phase::Playing;
        self.audio.stop(Cue::Intro);
        self.audio.play(Cue::Select);
        self.audio.play(Cue::GamePlay);
    }

    /// Throw the level away and build a fresh one
    fn reset(&mut self) {
        info!("Game reset");
        self.render_queue.clear();
        self.events.clear();
        self.win.hide();
        self.lose.hide();

        self.audio.stop(Cue::Win);
        self.audio.stop(Cue::GameOver);
        self.audio.stop(Cue::GamePlay);
        self.audio.play(Cue::GamePlay);

        self.world = Some(level::build(&self.config, &mut self.rng));
    }

    /// Run one frame: measure the delta, update, then draw into `surface`
    pub fn frame(&mut self, surface: &mut dyn Surface) {
        self.frame_at(Instant::now(), surface);
    }

    pub fn frame_at(&mut self, now: Instant, surface: &mut dyn Surface) {
        let dt = self.clock.begin_frame_at(now);
        if !self.clock.is_paused() {
            self.update(dt);
        }
        self.render(surface);
    }

    /// Advance the active screen by `dt`
    pub fn update(&mut self, dt: Duration) {
        self.assets.poll();

        match self.phase {
            Phase::Intro => self.intro.update(dt),
            Phase::Playing => {
                if let Some(world) = self.world.as_mut() {
                    let mut ctx = TickContext {
                        config: &self.config,
                        audio: &mut self.audio,
                        rng: &mut self.rng,
                        events: &mut self.events,
                    };
                    world.update(dt, &mut ctx);
                }
            }
        }

        for event in self.events.drain(..) {
            match event {
                GameEvent::Won { message } => {
                    info!("{}", message);
                    self.win.init_end(&message);
                }
                GameEvent::Lost { message } => {
                    info!("{}", message);
                    self.lose.init_end(&message);
                }
            }
        }
    }

    /// Draw the active screen
    pub fn render(&mut self, surface: &mut dyn Surface) {
        let world = match (self.phase, &self.world) {
            (Phase::Playing, Some(world)) => world,
            _ => {
                self.intro.render(surface, &self.assets);
                return;
            }
        };

        world.render(surface, &self.assets);

        for screen in [&self.win, &self.lose] {
            if screen.is_shown() {
                let screen = screen.clone();
                self.render_queue.push(Box::new(
                    move |surface: &mut dyn Surface, view: &FrameView<'_>| {
                        screen.render(surface, view.assets, view.score)
                    },
                ));
            }
        }

        if self.config.debug_collision {
            let boxes: Vec<Rect> = world
                .entities()
                .map(|e| Rect::new(e.pos.x, e.pos.y, e.width(), e.height))
                .collect();
            self.render_queue.push(Box::new(move |surface: &mut dyn Surface, _: &FrameView<'_>| {
                for rect in boxes {
                    surface.stroke_rect(rect, Color::RED, 2.0);
                }
            }));
        }

        let view = FrameView {
            assets: &self.assets,
            score: world.score(),
        };
        for draw in self.render_queue.drain(..) {
            draw(surface, &view);
        }

        surface.fill_text(
            &format!("Score: {}", view.score.label()),
            70.0,
            60.0,
            20.0,
            Color::WHITE,
            TextAlign::Left,
        );
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn stop(&mut self) {
        self.clock.stop();
    }

    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }
}
