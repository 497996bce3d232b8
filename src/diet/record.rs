use crate::diet::MealSection;

/// One eaten item recovered from a day sheet. Macro values are passed through as read.
#[derive(Clone, Debug, PartialEq)]
pub struct FoodRecord {
    pub date: String,
    pub name: String,
    /// Empty when the sheet has no quantity row for the item
    pub quantity: String,
    pub section: MealSection,
    pub fat: Option<f64>,
    pub carb: Option<f64>,
    pub protein: Option<f64>,
    pub calories: Option<f64>,
}

impl FoodRecord {
    /// Macro values in output column order: fat, carb, protein, calories.
    pub fn macros(&self) -> [Option<f64>; 4] {
        [self.fat, self.carb, self.protein, self.calories]
    }

    pub fn has_macros(&self) -> bool {
        self.macros().iter().any(Option::is_some)
    }
}

/// Drops records whose four macro fields are all missing, keeping the order of the rest.
pub fn retain_with_macros(mut records: Vec<FoodRecord>) -> Vec<FoodRecord> {
    records.retain(FoodRecord::has_macros);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(name: &str, macros: [Option<f64>; 4]) -> FoodRecord {
        let [fat, carb, protein, calories] = macros;
        FoodRecord {
            date: "화요일 2025년 11월 11일".to_owned(),
            name: name.to_owned(),
            quantity: String::new(),
            section: MealSection::Lunch,
            fat,
            carb,
            protein,
            calories,
        }
    }

    #[test]
    fn any_single_macro_keeps_a_record() {
        assert!(record("a", [None, None, None, Some(0.0)]).has_macros());
        assert!(record("b", [Some(1.5), None, None, None]).has_macros());
        assert!(!record("c", [None; 4]).has_macros());
    }

    #[test]
    fn filter_drops_only_empty_records_in_order() {
        let records = vec![
            record("a", [Some(1.0), None, None, None]),
            record("b", [None; 4]),
            record("c", [None, None, Some(3.0), Some(40.0)]),
            record("d", [None; 4]),
        ];
        let kept = retain_with_macros(records.clone());

        let names: Vec<&str> = kept.iter().map(|record| record.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        for dropped in records.iter().filter(|record| !kept.contains(record)) {
            assert_eq!(dropped.macros(), [None; 4]);
        }
    }
}
