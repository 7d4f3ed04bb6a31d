pub mod config;
pub mod error;
pub mod game;
pub mod history;
pub mod logging;
pub mod matrix;
pub mod moves;
pub mod player;
pub mod random_utils;
pub mod session;
pub mod sprt;
pub mod strategy;
