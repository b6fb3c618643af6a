//! Betweenness and closeness centrality of large undirected graphs, with
//! the sources split among a fixed number of workers.
//!
//! The root worker loads a [`GraphStore`](graph::GraphStore) and broadcasts
//! it; every worker derives its own [`NodeSlice`](partition::NodeSlice),
//! runs a [`CentralityKernel`](kernel::CentralityKernel) from each node of
//! the slice, and the partial results are gathered and merged by the root.
//!
//! ```no_run
//! use dsi_progress_logger::ProgressLogger;
//! use partitioned_centralities::{betweenness, graph::edge_list};
//! use std::sync::Arc;
//!
//! let graph = Arc::new(edge_list::load("facebook_combined.txt", None)?);
//! let betweenness = betweenness::compute(graph, 4, &mut ProgressLogger::default())?;
//! for (node, value) in betweenness.iter() {
//!     println!("{node}: {value}");
//! }
//! # Ok::<(), partitioned_centralities::Error>(())
//! ```

pub mod aggregate;
pub mod betweenness;
pub mod closeness;
pub mod comm;
pub mod coordinator;
pub mod error;
pub mod graph;
pub mod kernel;
pub mod output;
pub mod partition;
pub mod worker;

#[cfg(test)]
mod utils;

pub use error::{Error, SourceError};
