//! Drag-and-drop tree reparenting.
//!
//! The core is two pure functions over a flat, parent-referencing node list:
//! [`ops::build::build_tree`] derives the nested view, and
//! [`ops::reparent::reparent`] computes the list after a drop. [`session::Session`]
//! is the stateful shell a host keeps around them.

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod session;
