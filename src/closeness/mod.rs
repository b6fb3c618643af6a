pub mod closeness_centrality;

pub use closeness_centrality::*;
