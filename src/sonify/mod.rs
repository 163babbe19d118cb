pub mod mapping;
pub mod player;
pub mod render;
pub mod timbre;
pub mod voice;
