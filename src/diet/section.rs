use std::fmt::Display;

/// Meal period a food entry was logged under.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MealSection {
    Breakfast,
    Lunch,
    Dinner,
    SnackOther,
}

impl MealSection {
    /// Sections with the header keywords that select them, in matching order.
    const KEYWORDS: [(MealSection, &'static [&'static str]); 4] = [
        (MealSection::Breakfast, &["아침"]),
        (MealSection::Lunch, &["점심"]),
        (MealSection::Dinner, &["저녁"]),
        (MealSection::SnackOther, &["간식/기타", "간식기타"]),
    ];

    /// Finds the section whose keyword occurs in an already normalized header cell.
    /// Matching is by substring and case-sensitive.
    pub fn detect(header: &str) -> Option<MealSection> {
        Self::KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| header.contains(keyword)))
            .map(|(section, _)| *section)
    }

    /// Label written to the output file.
    pub const fn label(&self) -> &'static str {
        match self {
            MealSection::Breakfast => "아침 식사",
            MealSection::Lunch => "점심 식사",
            MealSection::Dinner => "저녁 식사",
            MealSection::SnackOther => "간식/기타",
        }
    }
}

impl Display for MealSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
