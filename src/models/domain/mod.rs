pub mod group;
pub mod ids;
pub mod member;
pub mod participant;
pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub mod user;
pub use group::Group;
pub use member::{Member, MemberRole};
pub use participant::{Participant, ParticipantAuthResponse, QuizRef};
pub use quiz::{AccessControl, PresentationMode, Quiz, QuizMetadata};
pub use quiz_attempt::QuizAttempt;
pub use quiz_question::QuizQuestion;
pub use user::{Account, User, UserRole};
