//! Stagegate Graph
//!
//! Two pieces of static structure consumed by the access evaluator:
//!
//! 1. **Task Dependency Graph**: each task lists the tasks that must be
//!    completed before it unlocks. Built through [`TaskGraphBuilder`], which
//!    refuses self-dependencies and rejects cycles when the graph is built.
//!    A [`TaskGraph`] therefore always holds a finite DAG.
//! 2. **Cell Layout Table**: for each (role, stage) cell of the matrix, a
//!    [`CellLayout`] describing which task controls render there.
//!
//! # Example
//!
//! ```rust,ignore
//! use stagegate_graph::TaskGraphBuilder;
//!
//! let mut builder = TaskGraphBuilder::new();
//! builder.add_dependency(task(2), task(1))?;
//! let graph = builder.build()?;
//! assert!(graph.prerequisites_of(task(2)).contains(&task(1)));
//! ```

#![warn(unreachable_pub)]

pub mod builder;
pub mod error;
pub mod graph;
pub mod layout;

pub use builder::TaskGraphBuilder;
pub use error::GraphError;
pub use graph::TaskGraph;
pub use layout::{CellLayout, LayoutTable, Track};
