//! Ant-colony scheduling support structures
//!
//! The ant-colony driver repeatedly scans all ready candidates, scores them
//! against the pheromone table, picks one, and removes it. The data
//! structures here are tuned for that access pattern: append-only insertion,
//! O(1) removal from any position, and full-array scans.

mod ready_list;

pub use ready_list::{AcoReadyList, ReadyListEntry};
