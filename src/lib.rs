pub mod app;
pub mod city;
pub mod clock;
pub mod config;
pub mod display;
pub mod input;
pub mod state;
pub mod surface;
pub mod util;
