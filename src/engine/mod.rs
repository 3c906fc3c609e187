// Engine modules: renderer, input, audio, assets, frame timing

pub mod assets;
pub mod audio;
pub mod game_loop;
pub mod input;
pub mod renderer;
