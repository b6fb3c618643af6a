pub mod betweenness_centrality;

pub use betweenness_centrality::*;
