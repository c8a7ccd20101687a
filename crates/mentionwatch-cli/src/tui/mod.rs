pub mod app;
pub mod bars;
pub mod ui;
