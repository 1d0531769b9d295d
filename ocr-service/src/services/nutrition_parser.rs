//! Regex extraction of nutrition facts from OCR text.
//!
//! Each field is searched independently over the whole text and the first
//! match wins. A field whose number does not fit is left out, never the
//! whole result. `지방` is matched anywhere, so `포화지방 3g` appearing
//! before the total fat line is read as total fat.

use crate::models::{Carbohydrates, Fat, NutritionFacts, Quantity, Unit};
use once_cell::sync::Lazy;
use regex::Regex;

fn pattern(label: &str, unit: &str) -> Regex {
    // Labels and units are literals below, so the pattern always compiles.
    // `[0-9]` rather than `\d`: only ASCII digits parse as integers.
    Regex::new(&format!(r"{}\s*([0-9]+)\s*{}", label, unit)).expect("invalid nutrition pattern")
}

static CALORIES: Lazy<Regex> = Lazy::new(|| pattern("열량", "kcal"));
static SODIUM: Lazy<Regex> = Lazy::new(|| pattern("나트륨", "mg"));
static CARBOHYDRATES: Lazy<Regex> = Lazy::new(|| pattern("탄수화물", "g"));
static SUGARS: Lazy<Regex> = Lazy::new(|| pattern("당류", "g"));
static FAT: Lazy<Regex> = Lazy::new(|| pattern("지방", "g"));
static SATURATED_FAT: Lazy<Regex> = Lazy::new(|| pattern("포화지방", "g"));
static TRANS_FAT: Lazy<Regex> = Lazy::new(|| pattern("트랜스지방", "g"));
static CHOLESTEROL: Lazy<Regex> = Lazy::new(|| pattern("콜레스테롤", "mg"));
static PROTEIN: Lazy<Regex> = Lazy::new(|| pattern("단백질", "g"));

/// First match of `re` in `text`, or `None` if there is no match or its
/// number does not parse.
fn extract(re: &Regex, text: &str, unit: Unit) -> Option<Quantity> {
    let digits = re.captures(text)?.get(1)?.as_str();
    digits.parse().ok().map(|value| Quantity::new(value, unit))
}

pub fn parse_nutrition_text(text: &str) -> NutritionFacts {
    let carbohydrates = extract(&CARBOHYDRATES, text, Unit::G).map(|total| Carbohydrates {
        total,
        sugars: extract(&SUGARS, text, Unit::G),
    });

    let fat = extract(&FAT, text, Unit::G).map(|total| Fat {
        total,
        saturated_fat: extract(&SATURATED_FAT, text, Unit::G),
        trans_fat: extract(&TRANS_FAT, text, Unit::G),
    });

    NutritionFacts {
        calories: extract(&CALORIES, text, Unit::Kcal),
        sodium: extract(&SODIUM, text, Unit::Mg),
        carbohydrates,
        fat,
        cholesterol: extract(&CHOLESTEROL, text, Unit::Mg),
        protein: extract(&PROTEIN, text, Unit::G),
    }
}
