use super::domain::{Category, Question, QuestionId, SurveyError};

/// Ordered, immutable list of assessment items.
#[derive(Debug)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    pub fn standard() -> Self {
        Self {
            questions: standard_questions(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn find(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| &question.id == id)
    }

    pub fn require(&self, id: &QuestionId) -> Result<&Question, SurveyError> {
        self.find(id)
            .ok_or_else(|| SurveyError::UnknownQuestion(id.clone()))
    }

    pub fn questions_for_category(&self, category: Category) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| question.category == category)
            .collect()
    }

    /// Denominator used when normalizing a category total.
    pub fn count_for(&self, category: Category) -> usize {
        self.questions
            .iter()
            .filter(|question| question.category == category)
            .count()
    }
}

fn question(
    id: &'static str,
    sub_category: &'static str,
    indicator: &'static str,
    checks: Vec<&'static str>,
) -> Question {
    let id = QuestionId::parse(id).expect("static catalog ids are well formed");
    Question {
        category: id.category(),
        id,
        sub_category,
        indicator,
        checks,
    }
}

fn standard_questions() -> Vec<Question> {
    vec![
        question(
            "E1-1",
            "친환경 경영",
            "지역사회가 공감하는 환경 목표 수립 과정",
            vec![
                "기관의 환경경영 목표와 실천 계획이 문서로 마련되어 있다.",
                "목표 수립 과정에서 지역주민과 이용자의 의견을 수렴한다.",
                "수립된 환경 목표를 전 직원에게 공유하고 있다.",
            ],
        ),
        question(
            "E1-2",
            "친환경 경영",
            "환경경영 책임 체계",
            vec![
                "환경경영을 담당하는 부서 또는 담당자가 지정되어 있다.",
                "담당자의 역할과 권한이 업무 분장에 명시되어 있다.",
            ],
        ),
        question(
            "E2-1",
            "자원 및 에너지 관리",
            "에너지 사용량 측정과 절감",
            vec![
                "전기, 가스, 수도 사용량을 정기적으로 기록하고 점검한다.",
                "에너지 절감 목표를 설정하고 결과를 공유한다.",
                "노후 설비의 고효율 교체 계획이 있다.",
            ],
        ),
        question(
            "E2-2",
            "자원 및 에너지 관리",
            "폐기물 감축과 자원 순환",
            vec![
                "일회용품 사용을 줄이기 위한 내부 지침이 있다.",
                "분리배출과 재활용을 프로그램 운영 전반에서 실천한다.",
            ],
        ),
        question(
            "S1-1",
            "인권 및 노동",
            "직원 인권 보호 체계",
            vec![
                "직원 인권 보호 지침과 고충 처리 절차가 마련되어 있다.",
                "직장 내 괴롭힘 예방 교육을 정기적으로 실시한다.",
            ],
        ),
        question(
            "S1-2",
            "인권 및 노동",
            "일과 삶의 균형 지원",
            vec![
                "유연근무와 휴가 사용을 장려하는 제도를 운영한다.",
                "직원 역량 개발을 위한 교육 기회를 제공한다.",
            ],
        ),
        question(
            "S2-1",
            "지역사회 참여",
            "지역주민과 함께하는 프로그램",
            vec![
                "지역주민이 기획 단계부터 참여하는 사업이 있다.",
                "주민 조직과 정기적으로 소통하는 창구가 있다.",
                "사업 결과를 지역사회에 공개하고 피드백을 받는다.",
            ],
        ),
        question(
            "S2-2",
            "지역사회 참여",
            "유관기관 및 기업과의 협력",
            vec![
                "사회복지 유관기관과 협력 네트워크를 운영한다.",
                "지역 기업과 사회공헌 협력 사업을 추진한다.",
            ],
        ),
        question(
            "S3-1",
            "이용자 권익",
            "이용자 안전과 개인정보 보호",
            vec![
                "시설 안전 점검을 정기적으로 실시하고 기록한다.",
                "개인정보 처리 방침을 마련하고 직원 교육을 실시한다.",
                "이용자 만족도 조사를 실시하고 개선에 반영한다.",
            ],
        ),
        question(
            "G1-1",
            "윤리 경영",
            "윤리강령 제정과 준수",
            vec![
                "기관 윤리강령이 제정되어 있고 직원이 숙지하고 있다.",
                "윤리 교육을 연 1회 이상 실시한다.",
            ],
        ),
        question(
            "G1-2",
            "윤리 경영",
            "부패 방지와 내부 신고 제도",
            vec![
                "내부 신고 창구가 운영되고 신고자 보호 원칙이 있다.",
                "이해충돌 방지 절차가 마련되어 있다.",
            ],
        ),
        question(
            "G2-1",
            "투명 경영",
            "재정 정보 공개",
            vec![
                "예산과 결산 정보를 홈페이지 등에 공개한다.",
                "후원금 사용 내역을 후원자에게 보고한다.",
            ],
        ),
        question(
            "G2-2",
            "투명 경영",
            "이해관계자 참여 의사결정",
            vec![
                "운영위원회에 지역주민과 이용자 대표가 참여한다.",
                "주요 의사결정 결과를 직원과 이해관계자에게 공유한다.",
                "ESG 경영 성과를 정기적으로 점검하고 보고한다.",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_covers_every_category() {
        let catalog = QuestionCatalog::standard();
        for category in Category::ordered() {
            assert!(
                catalog.count_for(category) > 0,
                "{category:?} must have at least one question"
            );
        }
        assert_eq!(catalog.count_for(Category::Environment), 4);
        assert_eq!(
            catalog.len(),
            Category::ordered()
                .into_iter()
                .map(|category| catalog.count_for(category))
                .sum::<usize>()
        );
    }

    #[test]
    fn catalog_ids_are_unique_and_prefix_matches_category() {
        let catalog = QuestionCatalog::standard();
        let mut seen = std::collections::HashSet::new();
        for question in catalog.questions() {
            assert!(seen.insert(question.id.clone()), "duplicate {}", question.id);
            assert_eq!(question.id.category(), question.category);
            assert!(!question.checks.is_empty());
        }
    }

    #[test]
    fn require_reports_unknown_questions() {
        let catalog = QuestionCatalog::standard();
        let missing = QuestionId::parse("G9-9").expect("valid id");
        assert_eq!(
            catalog.require(&missing).expect_err("unknown"),
            SurveyError::UnknownQuestion(missing)
        );
    }
}
