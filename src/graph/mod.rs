pub mod edge_list;
pub mod graph_store;

pub use edge_list::EdgeListFormat;
pub use graph_store::{GraphStore, GraphStoreBuilder};
