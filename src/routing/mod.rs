// Routing module entry

mod matcher;

pub use matcher::{match_route, ApiRoute, COLLECTION_PATH};
