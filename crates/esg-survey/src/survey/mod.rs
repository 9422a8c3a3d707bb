//! The ESG self-assessment: catalog, answer capture, submission shapes, and scoring.

pub mod access;
pub mod answers;
pub mod catalog;
pub mod dashboard;
pub mod domain;
pub mod scoring;
pub mod service;
pub mod session;
pub mod submission;

pub use access::{AccessError, AdminGate};
pub use answers::{Answer, AnswerStore, DetailSelections};
pub use catalog::QuestionCatalog;
pub use dashboard::DashboardSession;
pub use domain::{Category, DetailTag, Question, QuestionId, Rating, SurveyError};
pub use service::SurveyService;
pub use session::{AssessmentSession, Participant, Progress};
pub use submission::{
    CategoryTotals, NormalizedAnswer, PayloadAnswer, StoredAnswerValue, Submission,
    SubmissionPayload,
};
