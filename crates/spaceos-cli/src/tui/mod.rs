pub mod app;
pub mod art;
pub mod ui;
