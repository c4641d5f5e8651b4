pub mod account;
pub mod audio;
pub mod breathe;
pub mod journal;
pub mod lessons;
pub mod panic;
pub mod progress;
pub mod visualize;

mod ui;
