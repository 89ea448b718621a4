pub mod draw;
pub mod project;
