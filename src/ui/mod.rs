//! 终端交互

pub mod console;

pub use console::{Console, ScriptedConsole, StdConsole};
