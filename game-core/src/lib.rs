pub mod match_state;
pub mod scoring;

// Re-export main components
pub use match_state::*;
pub use scoring::*;
