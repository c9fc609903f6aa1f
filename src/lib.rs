// Library surface for headless/integration tests and reuse.
// The ratatui rendering and key maps stay with the binary in main.rs.
pub mod game;
pub mod runtime;
pub mod schedule;
pub mod theme;
