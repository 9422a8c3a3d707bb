use super::catalog::QuestionCatalog;
use super::domain::{Category, DetailTag, QuestionId, Rating, SurveyError};
use super::submission::PayloadAnswer;
use serde::Serialize;
use std::collections::BTreeMap;

/// Tags selected per sub-check, keyed by the sub-check's position in the question.
pub type DetailSelections = BTreeMap<usize, Vec<DetailTag>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub question_id: QuestionId,
    /// Unset while only detail tags have been chosen.
    pub rating: Option<Rating>,
    pub details: DetailSelections,
}

impl Answer {
    fn new(question_id: QuestionId) -> Self {
        Self {
            question_id,
            rating: None,
            details: DetailSelections::new(),
        }
    }

    pub fn is_answered(&self) -> bool {
        self.rating.is_some()
    }

    pub fn selections(&self, index: usize) -> &[DetailTag] {
        self.details.get(&index).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Answers collected during one assessment session, at most one per question.
#[derive(Debug, Clone, Default)]
pub struct AnswerStore {
    answers: Vec<Answer>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads answers collected elsewhere, checking each question and sub-check index
    /// against the catalog. Completeness is left to the caller.
    pub fn from_payload<I>(catalog: &QuestionCatalog, answers: I) -> Result<Self, SurveyError>
    where
        I: IntoIterator<Item = (QuestionId, PayloadAnswer)>,
    {
        let mut store = Self::new();
        for (question_id, answer) in answers {
            let checks = catalog.require(&question_id)?.checks.len();
            let entry = store.entry(&question_id);
            for (index, tags) in answer.details {
                if index >= checks {
                    return Err(SurveyError::UnknownCheck { question_id, index });
                }
                let selection = entry.details.entry(index).or_default();
                for tag in tags {
                    if !selection.contains(&tag) {
                        selection.push(tag);
                    }
                }
            }
            entry.rating = Some(answer.rating);
        }
        Ok(store)
    }

    pub fn get(&self, question_id: &QuestionId) -> Option<&Answer> {
        self.answers
            .iter()
            .find(|answer| &answer.question_id == question_id)
    }

    fn entry(&mut self, question_id: &QuestionId) -> &mut Answer {
        let position = match self
            .answers
            .iter()
            .position(|answer| &answer.question_id == question_id)
        {
            Some(position) => position,
            None => {
                self.answers.push(Answer::new(question_id.clone()));
                self.answers.len() - 1
            }
        };
        &mut self.answers[position]
    }

    /// Replaces only the rating; previously chosen details stay untouched.
    pub fn set_rating(&mut self, question_id: &QuestionId, rating: Rating) {
        self.entry(question_id).rating = Some(rating);
    }

    /// Adds the tag at `index` if absent, removes it otherwise. Returns whether it is now selected.
    pub fn toggle_detail(&mut self, question_id: &QuestionId, index: usize, tag: DetailTag) -> bool {
        let selection = self.entry(question_id).details.entry(index).or_default();
        if let Some(position) = selection.iter().position(|selected| *selected == tag) {
            selection.remove(position);
            false
        } else {
            selection.push(tag);
            true
        }
    }

    pub fn is_answered(&self, question_id: &QuestionId) -> bool {
        self.get(question_id).is_some_and(Answer::is_answered)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|answer| answer.is_answered()).count()
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Rated answers only, in the order they were first touched.
    pub fn rated(&self) -> impl Iterator<Item = (&QuestionId, Rating)> + '_ {
        self.answers
            .iter()
            .filter_map(|answer| answer.rating.map(|rating| (&answer.question_id, rating)))
    }

    pub fn rated_in(&self, category: Category) -> impl Iterator<Item = Rating> + '_ {
        self.rated()
            .filter(move |(question_id, _)| question_id.category() == category)
            .map(|(_, rating)| rating)
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> QuestionId {
        QuestionId::parse(raw).expect("valid id")
    }

    fn rating(value: i64) -> Rating {
        Rating::new(value).expect("valid rating")
    }

    #[test]
    fn setting_rating_twice_keeps_one_answer_and_details() {
        let mut store = AnswerStore::new();
        let question = id("E1-1");

        store.set_rating(&question, rating(2));
        store.toggle_detail(&question, 0, DetailTag::Aware);
        store.toggle_detail(&question, 2, DetailTag::NotDoing);
        store.set_rating(&question, rating(4));

        assert_eq!(store.answers().len(), 1);
        let answer = store.get(&question).expect("answer present");
        assert_eq!(answer.rating, Some(rating(4)));
        assert_eq!(answer.selections(0), &[DetailTag::Aware]);
        assert_eq!(answer.selections(2), &[DetailTag::NotDoing]);
    }

    #[test]
    fn toggling_twice_restores_selection() {
        let mut store = AnswerStore::new();
        let question = id("S1-2");
        store.set_rating(&question, rating(3));
        store.toggle_detail(&question, 1, DetailTag::Doing);
        let before = store.get(&question).expect("answer").selections(1).to_vec();

        assert!(store.toggle_detail(&question, 1, DetailTag::Aware));
        assert!(!store.toggle_detail(&question, 1, DetailTag::Aware));

        assert_eq!(store.get(&question).expect("answer").selections(1), before);
    }

    #[test]
    fn toggle_without_rating_leaves_question_unanswered() {
        let mut store = AnswerStore::new();
        let question = id("G1-1");

        store.toggle_detail(&question, 0, DetailTag::Unaware);

        let answer = store.get(&question).expect("answer created");
        assert!(answer.rating.is_none());
        assert_eq!(answer.selections(0), &[DetailTag::Unaware]);
        assert!(!store.is_answered(&question));
        assert_eq!(store.answered_count(), 0);

        store.set_rating(&question, rating(1));
        assert!(store.is_answered(&question));
        assert_eq!(
            store.get(&question).expect("answer").selections(0),
            &[DetailTag::Unaware]
        );
    }

    #[test]
    fn rated_in_filters_by_category_and_skips_unrated() {
        let mut store = AnswerStore::new();
        store.set_rating(&id("E1-1"), rating(4));
        store.set_rating(&id("S1-1"), rating(2));
        store.toggle_detail(&id("E1-2"), 0, DetailTag::Doing);

        let environment: Vec<u8> = store
            .rated_in(Category::Environment)
            .map(Rating::value)
            .collect();
        assert_eq!(environment, vec![4]);
    }

    #[test]
    fn payload_loading_checks_sub_check_indexes() {
        let catalog = QuestionCatalog::standard();
        let payload = |index: usize| PayloadAnswer {
            rating: rating(3),
            details: DetailSelections::from([(index, vec![DetailTag::Aware, DetailTag::Aware])]),
        };

        let error = AnswerStore::from_payload(&catalog, [(id("E1-1"), payload(99))])
            .expect_err("index out of range");
        assert_eq!(
            error,
            SurveyError::UnknownCheck {
                question_id: id("E1-1"),
                index: 99
            }
        );

        let store = AnswerStore::from_payload(&catalog, [(id("E1-1"), payload(0))]).expect("store");
        let answer = store.get(&id("E1-1")).expect("answer");
        assert_eq!(answer.rating, Some(rating(3)));
        assert_eq!(answer.selections(0), &[DetailTag::Aware]);
    }
}
