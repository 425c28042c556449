pub mod guard;
pub mod routes;

pub use guard::{Navigation, RouteData, Router};
pub use routes::{Route, RouteGuard, RouteMatch, RouteTable, View};
