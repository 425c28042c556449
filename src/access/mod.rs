//! Quiz access decisions and the navigation-time coordination around them.

pub mod coordinator;
pub mod decision;
pub mod resolver;

pub use coordinator::{NavigationCoordinator, NavigationTicket};
pub use decision::{AccessDecision, AccessReason};
pub use resolver::{AccessResolver, QuizMetadataSource};
