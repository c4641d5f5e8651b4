//! Guided visualizations.

mod catalog;
mod session;

pub use catalog::{VISUALIZATIONS, Visualization, find_visualization};
pub use session::{VisualizationProgress, VisualizationSession};
