// Game logic
//
// The dungeon itself, built on the engine layer:
// - Entities and their behaviors
// - The level's collision map and factory
// - World simulation, screens and the top-level engine

pub mod collision_map;
pub mod engine;
pub mod entities;
pub mod level;
pub mod screens;
pub mod world;

pub use engine::Engine;
