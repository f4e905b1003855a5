pub mod color;
pub mod file;
