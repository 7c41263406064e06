// Milwaukee: a software pixel canvas with a tiny sphere ray tracer,
// shown through a frame target in a minifb window.

pub mod canvas;
pub mod config;
pub mod draw;
pub mod error;
pub mod milwaukee;
pub mod orchestrator;
pub mod raster;
pub mod snapshot;
pub mod target;
pub mod tracer;
pub mod types;
