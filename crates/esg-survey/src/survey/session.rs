use super::answers::AnswerStore;
use super::catalog::QuestionCatalog;
use super::domain::{DetailTag, Question, QuestionId, Rating, SurveyError};
use super::submission::{CategoryTotals, PayloadAnswer, SubmissionPayload};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub department: String,
}

impl Participant {
    /// Both fields are required; surrounding whitespace is dropped.
    pub fn new(name: &str, department: &str) -> Result<Self, SurveyError> {
        let name = name.trim();
        let department = department.trim();
        if name.is_empty() {
            return Err(SurveyError::MissingParticipantField("name"));
        }
        if department.is_empty() {
            return Err(SurveyError::MissingParticipantField("department"));
        }
        Ok(Self {
            name: name.to_string(),
            department: department.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    pub percent: u8,
}

/// One participant walking the catalog in order. Owns its answers exclusively.
#[derive(Debug)]
pub struct AssessmentSession {
    participant: Participant,
    catalog: Arc<QuestionCatalog>,
    store: AnswerStore,
    cursor: usize,
}

impl AssessmentSession {
    pub fn start(participant: Participant, catalog: Arc<QuestionCatalog>) -> Self {
        Self {
            participant,
            catalog,
            store: AnswerStore::new(),
            cursor: 0,
        }
    }

    pub fn participant(&self) -> &Participant {
        &self.participant
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.store
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.catalog.get(self.cursor)
    }

    pub fn is_last(&self) -> bool {
        self.cursor + 1 >= self.catalog.len()
    }

    fn current(&self) -> Result<&Question, SurveyError> {
        self.current_question().ok_or(SurveyError::Incomplete {
            answered: self.store.answered_count(),
            total: self.catalog.len(),
        })
    }

    pub fn rate_current(&mut self, rating: Rating) -> Result<(), SurveyError> {
        let question_id = self.current()?.id.clone();
        self.store.set_rating(&question_id, rating);
        Ok(())
    }

    /// Toggles a tag on one of the current question's sub-checks.
    pub fn toggle_current_detail(&mut self, index: usize, tag: DetailTag) -> Result<bool, SurveyError> {
        let question = self.current()?;
        if index >= question.checks.len() {
            return Err(SurveyError::UnknownCheck {
                question_id: question.id.clone(),
                index,
            });
        }
        let question_id = question.id.clone();
        Ok(self.store.toggle_detail(&question_id, index, tag))
    }

    /// Moves to the next question. Requires the current one to be rated; returns false on the last.
    pub fn advance(&mut self) -> Result<bool, SurveyError> {
        let question = self.current()?;
        if !self.store.is_answered(&question.id) {
            return Err(SurveyError::Unrated(question.id.clone()));
        }
        if self.is_last() {
            return Ok(false);
        }
        self.cursor += 1;
        Ok(true)
    }

    pub fn retreat(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Only rated questions count as answered.
    pub fn progress(&self) -> Progress {
        let total = self.catalog.len();
        let answered = self
            .catalog
            .questions()
            .iter()
            .filter(|question| self.store.is_answered(&question.id))
            .count();
        let percent = if total == 0 {
            0
        } else {
            ((answered as f64 / total as f64) * 100.0).round() as u8
        };
        Progress {
            answered,
            total,
            percent,
        }
    }

    pub fn is_complete(&self) -> bool {
        let progress = self.progress();
        progress.answered == progress.total
    }

    /// Freezes the answers into the gateway payload, computing category totals.
    pub fn to_payload(&self) -> Result<SubmissionPayload, SurveyError> {
        let progress = self.progress();
        if progress.answered != progress.total {
            return Err(SurveyError::Incomplete {
                answered: progress.answered,
                total: progress.total,
            });
        }

        let answers: BTreeMap<_, _> = self
            .store
            .answers()
            .iter()
            .filter(|answer| self.catalog.find(&answer.question_id).is_some())
            .filter_map(|answer| {
                let rating = answer.rating?;
                let details = answer
                    .details
                    .iter()
                    .filter(|(_, tags)| !tags.is_empty())
                    .map(|(index, tags)| (*index, tags.clone()))
                    .collect();
                Some((answer.question_id.clone(), PayloadAnswer { rating, details }))
            })
            .collect();

        let total_score = CategoryTotals::from_ratings(
            answers
                .iter()
                .map(|(question_id, answer)| (question_id, answer.rating)),
        );

        Ok(SubmissionPayload {
            name: self.participant.name.clone(),
            department: self.participant.department.clone(),
            answers,
            total_score,
        })
    }

    /// Builds a finished session from answers collected elsewhere (e.g. an HTTP request body).
    pub fn from_answers<I>(
        participant: Participant,
        catalog: Arc<QuestionCatalog>,
        answers: I,
    ) -> Result<Self, SurveyError>
    where
        I: IntoIterator<Item = (QuestionId, PayloadAnswer)>,
    {
        let mut session = Self::start(participant, catalog);
        session.store = AnswerStore::from_payload(&session.catalog, answers)?;
        session.cursor = session.catalog.len().saturating_sub(1);
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::domain::{Category, QuestionId};

    fn session() -> AssessmentSession {
        let participant = Participant::new("홍길동", "기획운영지원팀").expect("participant");
        AssessmentSession::start(participant, Arc::new(QuestionCatalog::standard()))
    }

    fn rating(value: i64) -> Rating {
        Rating::new(value).expect("rating")
    }

    #[test]
    fn participant_requires_name_and_department() {
        assert_eq!(
            Participant::new("  ", "팀").expect_err("missing name"),
            SurveyError::MissingParticipantField("name")
        );
        assert_eq!(
            Participant::new("홍길동", "").expect_err("missing department"),
            SurveyError::MissingParticipantField("department")
        );

        let participant = Participant::new(" 홍길동 ", " 기획운영지원팀").expect("participant");
        let session = AssessmentSession::start(participant, Arc::new(QuestionCatalog::standard()));
        assert_eq!(session.participant().name, "홍길동");
        assert_eq!(session.participant().department, "기획운영지원팀");
    }

    #[test]
    fn advance_requires_rating_even_with_details() {
        let mut session = session();
        session
            .toggle_current_detail(0, DetailTag::Aware)
            .expect("toggle");

        let error = session.advance().expect_err("unrated");
        assert!(matches!(error, SurveyError::Unrated(_)));
        assert_eq!(session.position(), 0);
        assert_eq!(session.progress().answered, 0);

        session.rate_current(rating(3)).expect("rate");
        assert!(session.advance().expect("advance"));
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn toggle_rejects_out_of_range_check() {
        let mut session = session();
        let checks = session.current_question().expect("question").checks.len();
        let error = session
            .toggle_current_detail(checks, DetailTag::Doing)
            .expect_err("out of range");
        assert!(matches!(error, SurveyError::UnknownCheck { .. }));
    }

    #[test]
    fn payload_requires_every_question_rated() {
        let mut session = session();
        session.rate_current(rating(4)).expect("rate");
        let error = session.to_payload().expect_err("incomplete");
        assert!(matches!(error, SurveyError::Incomplete { answered: 1, .. }));
    }

    #[test]
    fn completed_session_builds_payload_with_totals() {
        let mut session = session();
        loop {
            let category = session.current_question().expect("question").category;
            let value = match category {
                Category::Environment => 2,
                Category::Social => 3,
                Category::Governance => 4,
            };
            session.rate_current(rating(value)).expect("rate");
            if !session.advance().expect("advance") {
                break;
            }
        }
        assert!(session.retreat());
        assert!(session.is_complete());
        assert_eq!(session.progress().percent, 100);

        let payload = session.to_payload().expect("payload");
        let catalog = QuestionCatalog::standard();
        assert_eq!(payload.answers.len(), catalog.len());
        assert_eq!(
            payload.total_score.environment,
            2 * catalog.count_for(Category::Environment) as u32
        );
        assert_eq!(
            payload.total_score.governance,
            4 * catalog.count_for(Category::Governance) as u32
        );
        assert_eq!(payload.department, "기획운영지원팀");
    }

    #[test]
    fn from_answers_rejects_unknown_questions() {
        let participant = Participant::new("김철수", "복지팀").expect("participant");
        let unknown = QuestionId::parse("E9-9").expect("id");
        let answers = vec![(
            unknown.clone(),
            PayloadAnswer {
                rating: rating(3),
                details: Default::default(),
            },
        )];
        let error = AssessmentSession::from_answers(
            participant,
            Arc::new(QuestionCatalog::standard()),
            answers,
        )
        .expect_err("unknown question");
        assert_eq!(error, SurveyError::UnknownQuestion(unknown));
    }
}
