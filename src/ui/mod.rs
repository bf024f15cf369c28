// UI module - the interactive surface
//
// The menu is the producer half of the pipeline; the reporter prints analysis
// outcomes without touching the menu's input lock.

pub mod menu;
pub mod reporter;

pub use menu::{MenuChoice, MenuLoop};
pub use reporter::spawn_reporter;
