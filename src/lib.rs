pub mod biome;
pub mod carve;
pub mod config;
pub mod grid;
pub mod math;
pub mod noise;
pub mod pathfind;
pub mod render;
pub mod rivers;
pub mod terraform;

pub use config::{GeneratorParams, NoiseAlgorithm, NoiseSettings, WaterSettings};
pub use grid::Grid;
pub use math::{Point2d, Point2i};
pub use terraform::Terraformer;
