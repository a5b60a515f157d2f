mod graphs;
pub use graphs::Graphs;
