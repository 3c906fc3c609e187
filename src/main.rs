use std::sync::Arc;

use anyhow::Result;
use log::{error, info};
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

mod config;
mod core;
mod engine;
mod game;

use config::GameConfig;
use engine::assets::AssetCache;
use engine::audio::SoundBoard;
use engine::input::InputManager;
use engine::renderer::{surface::DrawList, Renderer};
use game::Engine;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = GameConfig::from_env()?;
    info!("Starting {}...", config.title);

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.surface.width as f64,
                config.surface.height as f64,
            ))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    info!("Window created successfully");

    let mut renderer = pollster::block_on(Renderer::new(window.clone(), config.surface))?;
    let mut draw_list = DrawList::new(config.surface);
    let mut input = InputManager::new();
    let assets = AssetCache::new(&config.asset_dir);
    let mut engine = Engine::new(config, assets, SoundBoard::new());

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("Close requested, shutting down...");
                    engine.stop();
                    elwt.exit();
                }
                WindowEvent::Resized(physical_size) => {
                    info!("Window resized to {:?}", physical_size);
                    renderer.resize(physical_size);
                }
                WindowEvent::ModifiersChanged(modifiers) => {
                    input.set_modifiers(modifiers.state());
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input.process_keyboard_event(&event);
                }
                WindowEvent::RedrawRequested => {
                    for input_event in input.drain_events() {
                        engine.handle_input(input_event);
                    }

                    draw_list.reset();
                    engine.frame(&mut draw_list);
                    renderer.upload_images(engine.assets());

                    if let Err(e) = renderer.render(&draw_list) {
                        match e.downcast_ref::<wgpu::SurfaceError>() {
                            Some(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                renderer.reconfigure()
                            }
                            _ => error!("Render error: {}", e),
                        }
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                // Request the next frame while the engine runs
                if engine.is_running() {
                    window.request_redraw();
                }
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
