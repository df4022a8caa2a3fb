pub mod budget;
pub mod choice;
pub mod design;
pub mod error;
pub mod mini_game;
pub mod not_found;
pub mod progress;
pub mod reward;
pub mod shell;
pub mod thanks;
pub mod welcome;
