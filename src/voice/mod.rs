pub mod interpreter;
pub mod wake;

pub use interpreter::{InterpreterPhase, VoiceCommandInterpreter};
pub use wake::{WakeMatch, WakeWord};
