//! Workspace dependency graph (petgraph) for publish ordering

pub mod publish_order;

pub use publish_order::CrateGraph;
