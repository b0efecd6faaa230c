pub mod program;
pub mod textures;
