pub mod account_auth_service;
pub mod account_service;
pub mod group_service;
pub mod http_client;
pub mod http_helpers;
pub mod participant_auth_service;
pub mod quiz_attempt_service;
pub mod quiz_service;

pub use account_auth_service::AccountAuthService;
pub use account_service::AccountService;
pub use group_service::GroupService;
pub use http_client::{HttpClient, RequestScope};
pub use participant_auth_service::ParticipantAuthService;
pub use quiz_attempt_service::{QuizAnswerSheet, QuizAttemptService};
pub use quiz_service::QuizService;
