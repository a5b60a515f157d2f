mod panel;
pub use panel::GraphPanel;

mod plot;
pub use plot::Plot;

pub mod layout;

mod tooltip;
pub use tooltip::{Hover, Tooltip};
