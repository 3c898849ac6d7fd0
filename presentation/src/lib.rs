pub mod brief_export;
pub mod cli;
pub mod interactive;
pub mod render;
