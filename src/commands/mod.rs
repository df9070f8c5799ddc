// Re-export commands from individual modules
pub mod sample_commands;
pub mod synthesis_commands;
pub mod utility_commands;

// Re-export functions from modules
pub use sample_commands::*;
pub use synthesis_commands::*;
pub use utility_commands::*;
