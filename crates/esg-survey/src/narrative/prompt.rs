use crate::survey::{AnswerStore, QuestionCatalog, QuestionId, Rating};
use serde_json::{json, Value};
use std::fmt::Write as _;

pub const WEAK_RATING_CEILING: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedAnswer {
    pub question_id: QuestionId,
    pub sub_category: &'static str,
    pub indicator: &'static str,
    pub rating: Rating,
}

/// Weak (rating ≤ 2) and strong (rating 4) answers, annotated from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NarrativePrompt {
    pub weaknesses: Vec<HighlightedAnswer>,
    pub strengths: Vec<HighlightedAnswer>,
}

impl NarrativePrompt {
    pub fn from_answers(answers: &AnswerStore, catalog: &QuestionCatalog) -> Self {
        let mut prompt = Self::default();
        for (question_id, rating) in answers.rated() {
            let (sub_category, indicator) = catalog
                .find(question_id)
                .map(|question| (question.sub_category, question.indicator))
                .unwrap_or(("", ""));
            let entry = HighlightedAnswer {
                question_id: question_id.clone(),
                sub_category,
                indicator,
                rating,
            };
            if rating.value() <= WEAK_RATING_CEILING {
                prompt.weaknesses.push(entry);
            } else if rating.value() == Rating::MAX {
                prompt.strengths.push(entry);
            }
        }
        prompt
    }

    pub fn render(&self) -> String {
        let mut text = String::from(
            "당신은 사회복지관의 ESG 경영 컨설턴트입니다.\n\
             직원이 작성한 ESG 자체진단 결과를 바탕으로 분석 리포트를 작성해주세요.\n\n\
             [진단 개요]\n\
             - 4점 만점 기준\n\
             - 낮은 점수(취약점):\n",
        );
        for entry in &self.weaknesses {
            let _ = writeln!(
                text,
                "  {} ({} - {}): {}점",
                entry.question_id,
                entry.sub_category,
                entry.indicator,
                entry.rating.value()
            );
        }
        text.push_str("- 높은 점수(강점):\n");
        for entry in &self.strengths {
            let _ = writeln!(
                text,
                "  {} ({} - {})",
                entry.question_id, entry.sub_category, entry.indicator
            );
        }
        text.push_str(
            "\n위 데이터를 분석하여 여섯 가지 제언 목록과 종합 분석 코멘트를 작성해주세요.\n\
             말투는 전문적이고 정중하게(해요체) 작성하고, 복지관의 특성을 고려해 실현 가능한 조언을 해주세요.\n",
        );
        text
    }
}

/// JSON schema the model is asked to fill; mirrors [`super::AnalysisResult`].
pub fn response_schema() -> Value {
    let list = |description: &str| {
        json!({ "type": "ARRAY", "items": { "type": "STRING" }, "description": description })
    };
    json!({
        "type": "OBJECT",
        "properties": {
            "focusAreas": list("집중할 분야 (3가지)"),
            "improvementAreas": list("향후 개선할 분야 (3가지)"),
            "collaborationWithResidents": list("지역주민과 같이할 분야"),
            "communitySolidarity": list("사회복지 유관기관, 지역사회와 연대할 분야"),
            "corporatePartnership": list("기업과 함께할 분야"),
            "otherMeaningfulAreas": list("그 외 의미 있는 분야"),
            "summary": { "type": "STRING", "description": "종합 분석 코멘트" }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(store: &mut AnswerStore, raw: &str, value: i64) {
        store.set_rating(
            &QuestionId::parse(raw).expect("id"),
            Rating::new(value).expect("rating"),
        );
    }

    #[test]
    fn splits_weak_and_strong_answers() {
        let catalog = QuestionCatalog::standard();
        let mut store = AnswerStore::new();
        rate(&mut store, "E1-1", 1);
        rate(&mut store, "E1-2", 2);
        rate(&mut store, "S1-1", 3);
        rate(&mut store, "G1-1", 4);

        let prompt = NarrativePrompt::from_answers(&store, &catalog);
        assert_eq!(prompt.weaknesses.len(), 2);
        assert_eq!(prompt.strengths.len(), 1);

        let g11 = catalog
            .find(&QuestionId::parse("G1-1").expect("id"))
            .expect("question");
        assert_eq!(prompt.strengths[0].indicator, g11.indicator);

        let text = prompt.render();
        assert!(text.contains("E1-2"));
        assert!(!text.contains("S1-1"));
    }

    #[test]
    fn schema_lists_every_result_field() {
        let schema = response_schema();
        let properties = schema["properties"].as_object().expect("properties");
        assert_eq!(properties.len(), 7);
        assert!(properties.contains_key("summary"));
    }
}
