pub mod grid_map;
pub mod grid_world;
pub mod presets;
