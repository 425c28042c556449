use std::sync::Arc;

use crate::{
    errors::{ClientError, ClientResult},
    models::{
        domain::{PresentationMode, Quiz, QuizQuestion},
        dto::{request::SubmitAnswersRequest, response::SubmissionResult},
    },
    services::quiz_service::QuizService,
    session::ParticipantStore,
};

/// Answers being filled in for one quiz, one slot per question.
#[derive(Clone, Debug)]
pub struct QuizAnswerSheet {
    quiz: Quiz,
    answers: Vec<Option<String>>,
    current: usize,
}

impl QuizAnswerSheet {
    pub fn new(quiz: Quiz) -> Self {
        let answers = vec![None; quiz.questions.len()];
        Self {
            quiz,
            answers,
            current: 0,
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn mode(&self) -> PresentationMode {
        self.quiz.presentation_mode()
    }

    pub fn answers(&self) -> &[Option<String>] {
        &self.answers
    }

    pub fn update_answer(&mut self, index: usize, answer: &str) -> ClientResult<()> {
        let question = self.question(index)?;
        if !question.accepts(answer) {
            return Err(ClientError::ValidationError(format!(
                "'{}' is not an option of question {}",
                answer,
                index + 1
            )));
        }

        self.answers[index] = Some(answer.to_ascii_lowercase());
        Ok(())
    }

    pub fn clear_answer(&mut self, index: usize) -> ClientResult<()> {
        self.question(index)?;
        self.answers[index] = None;
        Ok(())
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.answered_count() == self.answers.len()
    }

    /// Question shown in stepwise mode.
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.quiz.questions.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Advances in stepwise mode. Returns false on the last question.
    pub fn next_question(&mut self) -> bool {
        if self.current + 1 < self.answers.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    pub fn previous_question(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    pub fn to_request(&self, participant_id: Option<String>) -> SubmitAnswersRequest {
        SubmitAnswersRequest {
            participant_id,
            quiz_id: self.quiz.id.clone(),
            answers: self.answers.clone(),
        }
    }

    fn question(&self, index: usize) -> ClientResult<&QuizQuestion> {
        self.quiz.questions.get(index).ok_or_else(|| {
            ClientError::ValidationError(format!(
                "question index {} out of range (quiz has {})",
                index,
                self.answers.len()
            ))
        })
    }
}

/// Loads a quiz for taking and submits the finished sheet under the current
/// participant.
pub struct QuizAttemptService {
    quizzes: Arc<QuizService>,
    participant: Arc<ParticipantStore>,
}

impl QuizAttemptService {
    pub fn new(quizzes: Arc<QuizService>, participant: Arc<ParticipantStore>) -> Self {
        Self {
            quizzes,
            participant,
        }
    }

    pub async fn start(&self, quiz_id: &str) -> ClientResult<QuizAnswerSheet> {
        let quiz = self.quizzes.get_quiz(quiz_id).await?;
        if quiz.questions.is_empty() {
            return Err(ClientError::ValidationError(format!(
                "Quiz {} has no questions",
                quiz_id
            )));
        }
        Ok(QuizAnswerSheet::new(quiz))
    }

    pub async fn submit(&self, sheet: &QuizAnswerSheet) -> ClientResult<SubmissionResult> {
        let session = self.participant.snapshot().await;
        let participant_id = session.participant_id().map(str::to_string);
        if participant_id.is_none() {
            log::warn!("Submitting quiz {} without a participant id", sheet.quiz().id);
        }
        if !sheet.is_complete() {
            log::debug!(
                "Submitting quiz {} with {}/{} answers",
                sheet.quiz().id,
                sheet.answered_count(),
                sheet.answers().len()
            );
        }

        let request = sheet.to_request(participant_id);
        self.quizzes.submit_answers(&sheet.quiz().id, &request).await
    }
}
