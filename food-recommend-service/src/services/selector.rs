//! Meal plan selection.
//!
//! Candidates are filtered (allergies, vegetarian diet, recently eaten),
//! then each meal is built greedily from three category buckets. Items
//! picked for one meal are removed from the pool before the next meal is
//! built, so no food appears twice in a plan.

use crate::models::{FoodRecord, MealType, PlannedMeal};
use rand::Rng;

/// Diet tags containing any of these (case-insensitive) ask for a
/// plant-based plan.
pub const VEGETARIAN_SIGNALS: &[&str] = &["채식", "비건", "vegetarian", "vegan", "plant"];

/// Name fragments treated as meat when a plant-based plan is requested.
pub const MEAT_KEYWORDS: &[&str] = &[
    "고기", "돼지", "닭", "오리", "햄", "베이컨", "소시지", "갈비", "불고기", "삼겹", "제육",
    "차돌", "육포", "수육", "beef", "pork", "chicken", "bacon",
];

pub const RICE_CATEGORIES: &[&str] = &["밥", "죽", "곡"];
pub const SOUP_CATEGORIES: &[&str] = &["국", "탕", "찌개", "전골"];

pub const MAX_ITEMS_PER_MEAL: usize = 4;

/// What the user asked to avoid.
#[derive(Debug, Clone, Default)]
pub struct Preferences {
    pub allergies: Vec<String>,
    pub diets: Vec<String>,
    /// Exact food names eaten recently.
    pub recent_foods: Vec<String>,
}

#[derive(Debug, Default)]
pub struct Buckets {
    pub rice: Vec<FoodRecord>,
    pub soup: Vec<FoodRecord>,
    pub side: Vec<FoodRecord>,
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

pub fn is_vegetarian(diets: &[String]) -> bool {
    diets
        .iter()
        .any(|tag| contains_any(&tag.to_lowercase(), VEGETARIAN_SIGNALS))
}

fn is_meat(name: &str) -> bool {
    contains_any(&name.to_lowercase(), MEAT_KEYWORDS)
}

/// Drop foods matching an allergy keyword, meat for plant-based diets, and
/// anything eaten recently.
pub fn filter_candidates(foods: Vec<FoodRecord>, prefs: &Preferences) -> Vec<FoodRecord> {
    let allergies: Vec<String> = prefs
        .allergies
        .iter()
        .map(|a| a.trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .collect();
    let vegetarian = is_vegetarian(&prefs.diets);

    foods
        .into_iter()
        .filter(|food| {
            let name = food.name.to_lowercase();
            !allergies.iter().any(|a| name.contains(a.as_str()))
        })
        .filter(|food| !(vegetarian && is_meat(&food.name)))
        .filter(|food| !prefs.recent_foods.iter().any(|r| r == &food.name))
        .collect()
}

/// Split foods into rice/grain, soup/stew and side dishes by category name.
pub fn categorize(foods: &[FoodRecord]) -> Buckets {
    let mut buckets = Buckets::default();
    for food in foods {
        if contains_any(&food.category, RICE_CATEGORIES) {
            buckets.rice.push(food.clone());
        } else if contains_any(&food.category, SOUP_CATEGORIES) {
            buckets.soup.push(food.clone());
        } else {
            buckets.side.push(food.clone());
        }
    }
    buckets
}

fn take_random<R: Rng + ?Sized>(bucket: &mut Vec<FoodRecord>, rng: &mut R) -> Option<FoodRecord> {
    if bucket.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..bucket.len());
    Some(bucket.swap_remove(index))
}

/// One rice, one soup, then side dishes until the target is reached or the
/// meal is full.
pub fn build_meal<R: Rng + ?Sized>(
    pool: &[FoodRecord],
    meal_type: MealType,
    rng: &mut R,
) -> PlannedMeal {
    let mut buckets = categorize(pool);
    let target = meal_type.target_kcal();
    let mut items = Vec::with_capacity(MAX_ITEMS_PER_MEAL);

    items.extend(take_random(&mut buckets.rice, rng));
    items.extend(take_random(&mut buckets.soup, rng));

    let mut total: i64 = items.iter().map(|f| f.calories).sum();
    while total < target && items.len() < MAX_ITEMS_PER_MEAL {
        match take_random(&mut buckets.side, rng) {
            Some(food) => {
                total += food.calories;
                items.push(food);
            }
            None => break,
        }
    }

    PlannedMeal::new(meal_type, items)
}

/// Build breakfast, lunch and dinner from `candidates`.
pub fn plan_meals<R: Rng + ?Sized>(
    candidates: Vec<FoodRecord>,
    prefs: &Preferences,
    rng: &mut R,
) -> Vec<PlannedMeal> {
    let mut remaining = filter_candidates(candidates, prefs);

    MealType::ALL
        .iter()
        .map(|&meal_type| {
            let meal = build_meal(&remaining, meal_type, rng);
            remaining.retain(|food| !meal.items.iter().any(|picked| picked.id == food.id));
            meal
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn catalogue() -> Vec<FoodRecord> {
        vec![
            FoodRecord::new(1, "현미밥", 320, "밥류", "1공기 (210g)"),
            FoodRecord::new(2, "잡곡밥", 300, "밥류", "1공기 (210g)"),
            FoodRecord::new(3, "전복죽", 250, "죽 및 스프류", "1그릇"),
            FoodRecord::new(4, "미역국", 80, "국 및 탕류", "1그릇 (250ml)"),
            FoodRecord::new(5, "된장찌개", 120, "찌개 및 전골류", "1그릇"),
            FoodRecord::new(6, "갈비탕", 350, "국 및 탕류", "1그릇"),
            FoodRecord::new(7, "계란말이", 120, "구이류", "2조각 (80g)"),
            FoodRecord::new(8, "시금치나물", 40, "나물류", "1접시 (100g)"),
            FoodRecord::new(9, "닭가슴살 샐러드", 350, "샐러드류", "1인분 (250g)"),
            FoodRecord::new(10, "두부조림", 150, "조림류", "1접시"),
            FoodRecord::new(11, "제육볶음", 400, "볶음류", "1인분"),
            FoodRecord::new(12, "멸치볶음", 90, "볶음류", "1접시"),
            FoodRecord::new(13, "Bacon Salad", 280, "샐러드류", "1인분"),
            FoodRecord::new(14, "과일", 60, "과일류", "1접시"),
            FoodRecord::new(15, "김치", 20, "김치류", "1접시"),
        ]
    }

    fn all_ids(plan: &[PlannedMeal]) -> Vec<i64> {
        plan.iter()
            .flat_map(|m| m.items.iter().map(|f| f.id))
            .collect()
    }

    #[test]
    fn categorize_uses_category_priority() {
        let buckets = categorize(&catalogue());

        let names = |b: &[FoodRecord]| b.iter().map(|f| f.id).collect::<Vec<_>>();
        assert_eq!(names(&buckets.rice), vec![1, 2, 3]);
        assert_eq!(names(&buckets.soup), vec![4, 5, 6]);
        assert_eq!(buckets.side.len(), 9);
    }

    #[test]
    fn plan_has_three_meals_in_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let plan = plan_meals(catalogue(), &Preferences::default(), &mut rng);

        let meal_types: Vec<MealType> = plan.iter().map(|m| m.meal_type).collect();
        assert_eq!(meal_types, MealType::ALL.to_vec());
    }

    #[test]
    fn no_food_is_reused_and_totals_match() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = plan_meals(catalogue(), &Preferences::default(), &mut rng);

            let ids = all_ids(&plan);
            let unique: HashSet<i64> = ids.iter().copied().collect();
            assert_eq!(ids.len(), unique.len(), "seed {}", seed);

            for meal in &plan {
                let sum: i64 = meal.items.iter().map(|f| f.calories).sum();
                assert_eq!(meal.total_kcal, sum);
                assert!(meal.items.len() <= MAX_ITEMS_PER_MEAL);
            }
        }
    }

    #[test]
    fn each_meal_starts_with_rice_and_soup_when_available() {
        let mut rng = StdRng::seed_from_u64(3);
        let plan = plan_meals(catalogue(), &Preferences::default(), &mut rng);

        for meal in &plan {
            assert!(contains_any(&meal.items[0].category, RICE_CATEGORIES));
            assert!(contains_any(&meal.items[1].category, SOUP_CATEGORIES));
        }
    }

    #[test]
    fn side_dishes_stop_once_target_is_reached() {
        let pool = vec![
            FoodRecord::new(1, "현미밥", 300, "밥류", ""),
            FoodRecord::new(2, "미역국", 100, "국 및 탕류", ""),
            FoodRecord::new(3, "큰 반찬 A", 200, "구이류", ""),
            FoodRecord::new(4, "큰 반찬 B", 200, "구이류", ""),
        ];
        let mut rng = StdRng::seed_from_u64(11);
        let meal = build_meal(&pool, MealType::Breakfast, &mut rng);

        // 300 + 100 + 200 reaches 500 after one side dish
        assert_eq!(meal.items.len(), 3);
        assert_eq!(meal.total_kcal, 600);
    }

    #[test]
    fn allergy_matching_everything_empties_every_meal() {
        let foods = vec![
            FoodRecord::new(1, "땅콩밥", 300, "밥류", ""),
            FoodRecord::new(2, "땅콩국", 100, "국 및 탕류", ""),
            FoodRecord::new(3, "땅콩조림", 150, "조림류", ""),
        ];
        let prefs = Preferences {
            allergies: vec!["땅콩".to_string()],
            ..Preferences::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let plan = plan_meals(foods, &prefs, &mut rng);

        assert_eq!(plan.len(), 3);
        for meal in plan {
            assert!(meal.items.is_empty());
            assert_eq!(meal.total_kcal, 0);
        }
    }

    #[test]
    fn allergy_match_is_case_insensitive_and_blank_keywords_are_ignored() {
        let prefs = Preferences {
            allergies: vec!["BACON".to_string(), "  ".to_string(), String::new()],
            ..Preferences::default()
        };
        let kept = filter_candidates(catalogue(), &prefs);

        assert_eq!(kept.len(), catalogue().len() - 1);
        assert!(kept.iter().all(|f| f.id != 13));
    }

    #[test]
    fn vegetarian_diet_removes_meat() {
        let prefs = Preferences {
            diets: vec!["Vegetarian".to_string()],
            ..Preferences::default()
        };

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = plan_meals(catalogue(), &prefs, &mut rng);
            for food in plan.iter().flat_map(|m| &m.items) {
                assert!(!is_meat(&food.name), "{} is meat", food.name);
            }
        }
    }

    #[test]
    fn non_vegetarian_diet_keeps_meat() {
        let prefs = Preferences {
            diets: vec!["저염식".to_string()],
            ..Preferences::default()
        };
        let kept = filter_candidates(catalogue(), &prefs);
        assert_eq!(kept.len(), catalogue().len());
    }

    #[test]
    fn recently_eaten_foods_are_excluded() {
        let prefs = Preferences {
            recent_foods: vec!["미역국".to_string(), "현미밥".to_string()],
            ..Preferences::default()
        };

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = plan_meals(catalogue(), &prefs, &mut rng);
            for food in plan.iter().flat_map(|m| &m.items) {
                assert_ne!(food.name, "미역국");
                assert_ne!(food.name, "현미밥");
            }
        }
    }

    #[test]
    fn empty_buckets_are_skipped() {
        let pool = vec![
            FoodRecord::new(1, "계란말이", 120, "구이류", ""),
            FoodRecord::new(2, "시금치나물", 40, "나물류", ""),
        ];
        let mut rng = StdRng::seed_from_u64(5);
        let plan = plan_meals(pool, &Preferences::default(), &mut rng);

        assert_eq!(plan[0].items.len(), 2);
        assert_eq!(plan[0].total_kcal, 160);
        assert!(plan[1].items.is_empty());
        assert!(plan[2].items.is_empty());
    }
}
