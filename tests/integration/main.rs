//! Integration tests driving the engine through whole games.

mod game;
mod transcript;
