pub mod display;
pub mod theme;
