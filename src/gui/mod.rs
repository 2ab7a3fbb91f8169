pub mod app;
pub mod menu;
pub mod pipeline;
pub mod view;
