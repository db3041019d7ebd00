pub mod config;
pub mod error;
pub mod graph;
pub mod routing;

pub use config::Config;
pub use error::{GraphrouteError, Result};
pub use graph::{load_graph, MultiGraph, ServiceGraph};
pub use routing::{route, RouteRecord, Router, RoutingRules};
