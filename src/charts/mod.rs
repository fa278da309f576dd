//! Charts module - Static chart export

mod renderer;

pub use renderer::{RenderError, StaticChartRenderer};
