// Live-camera color picker. The sampling core (mapper, sampler, history,
// session) is plain library code so it can run headless; main.rs wires it
// to a real camera and window.

pub mod camera;
pub mod color;
pub mod config;
pub mod draw;
pub mod error;
pub mod history;
pub mod mapper;
pub mod sampler;
pub mod session;
pub mod types;
