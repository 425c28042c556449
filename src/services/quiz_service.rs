use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use crate::{
    access::QuizMetadataSource,
    errors::{ClientError, ClientResult},
    models::{
        domain::{Quiz, QuizAttempt, QuizMetadata},
        dto::{
            request::{
                CreateQuizRequest, MoveToGroupRequest, OrderEntry, QuizOrderRequest,
                SubmitAnswersRequest, UpdateQuizRequest,
            },
            response::{SharedQuiz, SubmissionResult},
        },
    },
    services::http_client::{HttpClient, RequestScope},
};

/// Quiz endpoints. Management calls run as the account holder; loading and
/// submitting a quiz run as whoever is taking it.
pub struct QuizService {
    http: Arc<HttpClient>,
}

impl QuizService {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list_quizzes(&self) -> ClientResult<Vec<Quiz>> {
        self.http.get("/quizzes/", RequestScope::Account).await
    }

    /// Full quiz including questions.
    pub async fn get_quiz(&self, quiz_id: &str) -> ClientResult<Quiz> {
        self.http
            .get(&quiz_path(quiz_id, ""), RequestScope::Participant)
            .await
    }

    pub async fn create_quiz(&self, request: CreateQuizRequest) -> ClientResult<Quiz> {
        request.validate()?;
        if request.is_timed && request.quiz_time_limit.is_none() {
            return Err(ClientError::ValidationError(
                "quiz_time_limit is required for timed quizzes".to_string(),
            ));
        }

        let quiz: Quiz = self
            .http
            .post("/quizzes/create/", &request, RequestScope::Account)
            .await?;
        log::info!("Created quiz {} ('{}')", quiz.id, quiz.title);
        Ok(quiz)
    }

    pub async fn update_quiz(&self, quiz_id: &str, request: UpdateQuizRequest) -> ClientResult<Quiz> {
        request.validate()?;
        self.http
            .put(&quiz_path(quiz_id, ""), &request, RequestScope::Account)
            .await
    }

    pub async fn delete_quiz(&self, quiz_id: &str) -> ClientResult<()> {
        self.http
            .delete(&quiz_path(quiz_id, ""), RequestScope::Account)
            .await?;
        log::info!("Deleted quiz {}", quiz_id);
        Ok(())
    }

    pub async fn duplicate_quiz(&self, quiz_id: &str) -> ClientResult<Quiz> {
        self.http
            .post(
                &quiz_path(quiz_id, "duplicate/"),
                &serde_json::json!({}),
                RequestScope::Account,
            )
            .await
    }

    pub async fn share_quiz(&self, quiz_id: &str) -> ClientResult<SharedQuiz> {
        self.http
            .post(
                &quiz_path(quiz_id, "share/"),
                &serde_json::json!({}),
                RequestScope::Account,
            )
            .await
    }

    /// `None` moves the quiz out of any group.
    pub async fn move_to_group(&self, quiz_id: &str, group_id: Option<&str>) -> ClientResult<Quiz> {
        let request = MoveToGroupRequest {
            group_id: group_id.map(str::to_string),
        };
        self.http
            .put(
                &quiz_path(quiz_id, "move-to-group/"),
                &request,
                RequestScope::Account,
            )
            .await
    }

    pub async fn update_order(&self, quiz_orders: Vec<OrderEntry>) -> ClientResult<()> {
        let request = QuizOrderRequest { quiz_orders };
        self.http
            .put_unit("/quizzes/update-order/", &request, RequestScope::Account)
            .await
    }

    pub async fn list_attempts(&self, quiz_id: &str) -> ClientResult<Vec<QuizAttempt>> {
        self.http
            .get(&quiz_path(quiz_id, "attempts/"), RequestScope::Account)
            .await
    }

    pub async fn submit_answers(
        &self,
        quiz_id: &str,
        request: &SubmitAnswersRequest,
    ) -> ClientResult<SubmissionResult> {
        if request.quiz_id != quiz_id {
            return Err(ClientError::ValidationError(format!(
                "answers belong to quiz {}, not {}",
                request.quiz_id, quiz_id
            )));
        }

        let result: SubmissionResult = self
            .http
            .post(&quiz_path(quiz_id, "submit/"), request, RequestScope::Participant)
            .await?;
        log::info!("Submitted answers for quiz {}", quiz_id);
        Ok(result)
    }
}

#[async_trait]
impl QuizMetadataSource for QuizService {
    async fn fetch_quiz_metadata(&self, quiz_id: &str) -> ClientResult<QuizMetadata> {
        self.http
            .get(&quiz_path(quiz_id, ""), RequestScope::Participant)
            .await
    }
}

fn quiz_path(quiz_id: &str, suffix: &str) -> String {
    format!("/quizzes/{}/{}", quiz_id, suffix)
}
