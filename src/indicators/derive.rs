use std::collections::BTreeMap;
use std::str::FromStr;

use tracing::info;

use crate::dataset::Dataset;
use crate::indicators::{
    difference, parity_ratio, GenderParityRow, IndicatorSet, IndicatorTable, MeanAccumulator,
    TransitionDropoffRow, GENDER_PARITY_INDEX, TRANSITION_DROPOFF,
};
use crate::schema::{Column, EducationLevel, Gender};

pub fn derive_all_indicators(dataset: &Dataset) -> IndicatorSet {
    let mut indicators = IndicatorSet::new();
    indicators.insert(
        TRANSITION_DROPOFF.to_string(),
        IndicatorTable::TransitionDropoff(transition_dropoff(dataset)),
    );
    indicators.insert(
        GENDER_PARITY_INDEX.to_string(),
        IndicatorTable::GenderParity(gender_parity_index(dataset)),
    );
    info!(
        countries = indicators
            .get(TRANSITION_DROPOFF)
            .map(IndicatorTable::len)
            .unwrap_or(0),
        "indicators derived"
    );
    indicators
}

/// Mean completion per (country, level) pivoted to one row per country.
/// Countries with no numeric completion at all are left out.
pub fn transition_dropoff(dataset: &Dataset) -> Vec<TransitionDropoffRow> {
    let mut groups: BTreeMap<String, BTreeMap<EducationLevel, MeanAccumulator>> = BTreeMap::new();
    for row in 0..dataset.len() {
        let Some((country, level, completion)) = country_level_completion(dataset, row) else {
            continue;
        };
        groups
            .entry(country.to_string())
            .or_default()
            .entry(level)
            .or_default()
            .push(completion);
    }

    groups
        .into_iter()
        .map(|(country, levels)| {
            let mean = |level: EducationLevel| levels.get(&level).and_then(MeanAccumulator::mean);
            let primary = mean(EducationLevel::Primary);
            let lower_secondary = mean(EducationLevel::LowerSecondary);
            let higher_secondary = mean(EducationLevel::HigherSecondary);
            TransitionDropoffRow {
                country,
                primary,
                lower_secondary,
                higher_secondary,
                drop_primary_secondary: difference(primary, lower_secondary),
                drop_secondary_higher: difference(lower_secondary, higher_secondary),
            }
        })
        .collect()
}

pub fn gender_parity_index(dataset: &Dataset) -> Vec<GenderParityRow> {
    let mut groups: BTreeMap<(String, EducationLevel), BTreeMap<Gender, MeanAccumulator>> =
        BTreeMap::new();
    for row in 0..dataset.len() {
        let Some((country, level, completion)) = country_level_completion(dataset, row) else {
            continue;
        };
        let Some(gender) = dataset
            .text(row, Column::Gender.as_str())
            .and_then(|g| Gender::from_str(g).ok())
        else {
            continue;
        };
        groups
            .entry((country.to_string(), level))
            .or_default()
            .entry(gender)
            .or_default()
            .push(completion);
    }

    groups
        .into_iter()
        .map(|((country, education_level), genders)| {
            let female = genders.get(&Gender::Female).and_then(MeanAccumulator::mean);
            let male = genders.get(&Gender::Male).and_then(MeanAccumulator::mean);
            GenderParityRow {
                country,
                education_level,
                female,
                male,
                gpi: parity_ratio(female, male),
            }
        })
        .collect()
}

fn country_level_completion(dataset: &Dataset, row: usize) -> Option<(&str, EducationLevel, f64)> {
    let country = dataset.text(row, Column::Country.as_str())?;
    let level = dataset
        .text(row, Column::EducationLevel.as_str())
        .and_then(|l| EducationLevel::from_str(l).ok())?;
    let completion = dataset.numeric(row, Column::CompletionRate.as_str())?;
    Some((country, level, completion))
}

#[cfg(test)]
mod tests {
    use super::{derive_all_indicators, gender_parity_index, transition_dropoff};
    use crate::dataset::{Dataset, Value};
    use crate::indicators::{IndicatorTable, GENDER_PARITY_INDEX, TRANSITION_DROPOFF};
    use crate::schema::EducationLevel;

    fn survey(rows: &[(&str, &str, &str, Option<f64>)]) -> Dataset {
        Dataset::from_rows(
            ["country", "education_level", "gender", "completion_rate"],
            rows.iter()
                .map(|(country, level, gender, completion)| {
                    vec![
                        Value::text(*country),
                        Value::text(*level),
                        Value::text(*gender),
                        completion.map(Value::Float).unwrap_or(Value::Missing),
                    ]
                })
                .collect(),
        )
        .expect("dataset")
    }

    #[test]
    fn dropoff_pivots_levels_and_computes_differences() {
        let data = survey(&[
            ("Nepal", "Primary", "Male", Some(90.0)),
            ("Nepal", "Primary", "Female", Some(80.0)),
            ("Nepal", "Lower Secondary", "Male", Some(70.0)),
            ("Nepal", "Higher Secondary", "Male", Some(50.0)),
            ("Chad", "Primary", "Male", Some(60.0)),
        ]);
        let rows = transition_dropoff(&data);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].country, "Chad");
        assert_eq!(rows[0].lower_secondary, None);
        assert_eq!(rows[0].drop_primary_secondary, None);

        let nepal = &rows[1];
        assert_eq!(nepal.primary, Some(85.0));
        assert_eq!(nepal.drop_primary_secondary, Some(15.0));
        assert_eq!(nepal.drop_secondary_higher, Some(20.0));
    }

    #[test]
    fn missing_completion_is_skipped_in_means() {
        let data = survey(&[
            ("Chad", "Primary", "Male", Some(60.0)),
            ("Chad", "Primary", "Male", None),
            ("Mali", "Primary", "Male", None),
        ]);
        let rows = transition_dropoff(&data);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].primary, Some(60.0));
    }

    #[test]
    fn gpi_is_undefined_for_missing_or_zero_male_group() {
        let data = survey(&[
            ("Chad", "Primary", "Female", Some(60.0)),
            ("Chad", "Primary", "Male", Some(80.0)),
            ("Chad", "Lower Secondary", "Female", Some(40.0)),
            ("Chad", "Higher Secondary", "Female", Some(30.0)),
            ("Chad", "Higher Secondary", "Male", Some(0.0)),
        ]);
        let rows = gender_parity_index(&data);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].education_level, EducationLevel::Primary);
        assert_eq!(rows[0].gpi, Some(0.75));
        assert_eq!(rows[1].education_level, EducationLevel::LowerSecondary);
        assert_eq!(rows[1].male, None);
        assert_eq!(rows[1].gpi, None);
        assert_eq!(rows[2].gpi, None);
    }

    #[test]
    fn derives_both_named_tables() {
        let data = survey(&[("Chad", "Primary", "Male", Some(60.0))]);
        let set = derive_all_indicators(&data);
        assert_eq!(set.len(), 2);
        assert!(matches!(
            set.get(TRANSITION_DROPOFF),
            Some(IndicatorTable::TransitionDropoff(rows)) if rows.len() == 1
        ));
        let gpi = set.get(GENDER_PARITY_INDEX).expect("gpi table");
        assert_eq!(gpi.records(2)[0], vec!["Chad", "Primary", "undefined", "60.00", "undefined"]);
    }
}
