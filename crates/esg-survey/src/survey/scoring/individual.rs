use super::super::answers::AnswerStore;
use super::super::domain::Category;
use super::round_to;
use super::views::{CategoryAverageEntry, CategoryProfile};

/// Mean rating of the rated answers in `category`, one decimal; 0 when none are rated.
pub fn category_average(store: &AnswerStore, category: Category) -> f64 {
    let (sum, count) = store
        .rated_in(category)
        .fold((0u32, 0u32), |(sum, count), rating| {
            (sum + u32::from(rating.value()), count + 1)
        });

    if count == 0 {
        return 0.0;
    }
    round_to(f64::from(sum) / f64::from(count), 1)
}

pub fn category_profile(store: &AnswerStore) -> CategoryProfile {
    let entries = Category::ordered()
        .into_iter()
        .map(|category| CategoryAverageEntry {
            category,
            label: category.short_label(),
            average: category_average(store, category),
        })
        .collect();

    CategoryProfile { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::domain::{DetailTag, QuestionId, Rating};

    fn rate(store: &mut AnswerStore, raw: &str, value: i64) {
        store.set_rating(
            &QuestionId::parse(raw).expect("valid id"),
            Rating::new(value).expect("valid rating"),
        );
    }

    #[test]
    fn empty_category_averages_to_zero() {
        let mut store = AnswerStore::new();
        rate(&mut store, "E1-1", 4);
        store.toggle_detail(&QuestionId::parse("G1-1").expect("id"), 0, DetailTag::Aware);

        assert_eq!(category_average(&store, Category::Social), 0.0);
        assert_eq!(category_average(&store, Category::Governance), 0.0);
    }

    #[test]
    fn averages_round_to_one_decimal_and_stay_in_range() {
        let mut store = AnswerStore::new();
        rate(&mut store, "E1-1", 4);
        rate(&mut store, "E1-2", 3);
        rate(&mut store, "E2-1", 3);
        rate(&mut store, "S1-1", 1);

        let environment = category_average(&store, Category::Environment);
        assert_eq!(environment, 3.3);
        assert!((1.0..=4.0).contains(&environment));
        assert_eq!(category_average(&store, Category::Social), 1.0);
    }

    #[test]
    fn profile_lists_categories_in_order() {
        let mut store = AnswerStore::new();
        rate(&mut store, "G2-2", 2);

        let profile = category_profile(&store);
        let categories: Vec<Category> = profile.entries.iter().map(|e| e.category).collect();
        assert_eq!(categories, Category::ordered().to_vec());
        assert_eq!(profile.average(Category::Governance), 2.0);
    }
}
