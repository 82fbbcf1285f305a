use std::collections::BTreeSet;

use super::model::RestaurantTable;

/// Split a comma-delimited cuisines field into trimmed, non-empty tokens,
/// in field order. Duplicates inside one field are kept.
pub fn tokenize(field: &str) -> Vec<&str> {
    field
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Sorted, deduplicated cuisines offered by the restaurants of `city`.
pub fn cuisine_universe(table: &RestaurantTable, city: &str) -> Vec<String> {
    let tokens: BTreeSet<&str> = table
        .in_city(city)
        .flat_map(|r| tokenize(&r.cuisines))
        .collect();
    tokens.into_iter().map(str::to_string).collect()
}

/// Whether any selected cuisine occurs in the raw `field`.
///
/// Containment is checked on the raw text, not on tokens: selecting
/// `"Indian"` also matches `"North Indian"`. A field with no usable text
/// never matches.
pub fn cuisine_matches(field: &str, selected: &BTreeSet<String>) -> bool {
    if field.trim().is_empty() {
        return false;
    }
    selected
        .iter()
        .any(|c| !c.is_empty() && field.contains(c.as_str()))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::data::fixtures::sample_table;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case::two("North Indian, Chinese", vec!["North Indian", "Chinese"])]
    #[case::single("Italian", vec!["Italian"])]
    #[case::padding_and_gaps(" Thai ,, Sushi,", vec!["Thai", "Sushi"])]
    #[case::duplicates("Cafe, Cafe", vec!["Cafe", "Cafe"])]
    #[case::blank("  ", vec![])]
    fn tokenizes_fields(#[case] field: &str, #[case] expected: Vec<&str>) {
        assert_eq!(tokenize(field), expected);
    }

    #[test]
    fn universe_is_per_city_sorted_and_unique() {
        let table = sample_table();
        assert_eq!(
            cuisine_universe(&table, "Delhi"),
            vec!["Chinese", "Italian", "Mughlai", "North Indian", "Thai"]
        );
        assert_eq!(
            cuisine_universe(&table, "Mumbai"),
            vec!["Chinese", "Seafood", "Street Food"]
        );
        assert!(cuisine_universe(&table, "Pune").is_empty());
    }

    #[rstest]
    #[case::token_hit("North Indian, Chinese", &["Chinese"], true)]
    #[case::substring_hit("North Indian, Chinese", &["Indian"], true)]
    #[case::any_of_many("Italian", &["Thai", "Italian"], true)]
    #[case::miss("North Indian, Chinese", &["Italian"], false)]
    #[case::case_sensitive("Chinese", &["chinese"], false)]
    #[case::empty_selection("Chinese", &[], false)]
    #[case::blank_field("   ", &["Chinese"], false)]
    fn matches_by_substring(#[case] field: &str, #[case] selected: &[&str], #[case] expected: bool) {
        assert_eq!(cuisine_matches(field, &set(selected)), expected);
    }
}
