extern crate glam;

pub mod assets;
pub mod breakout;
pub mod camera;
pub mod collision;
pub mod first_person;
pub mod geometry;
pub mod glyphs;
pub mod math;
pub mod mesh;
pub mod orbit;
pub mod raster;
pub mod scene;
pub mod sprite;
pub mod terrain;
pub mod transform;
