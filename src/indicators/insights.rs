use std::collections::BTreeMap;
use std::str::FromStr;

use crate::dataset::Dataset;
use crate::indicators::{difference, parity_ratio, LevelInsight, MeanAccumulator};
use crate::schema::{Column, EducationLevel, Gender};

#[derive(Debug, Default)]
struct LevelGroups {
    all: MeanAccumulator,
    urban: MeanAccumulator,
    rural: MeanAccumulator,
    stable: MeanAccumulator,
    fragile: MeanAccumulator,
    male: MeanAccumulator,
    female: MeanAccumulator,
}

pub fn derive_insights(dataset: &Dataset) -> Vec<LevelInsight> {
    let mut groups: BTreeMap<EducationLevel, LevelGroups> = BTreeMap::new();

    for row in 0..dataset.len() {
        let Some(level) = dataset
            .text(row, Column::EducationLevel.as_str())
            .and_then(|l| EducationLevel::from_str(l).ok())
        else {
            continue;
        };
        let Some(completion) = dataset.numeric(row, Column::CompletionRate.as_str()) else {
            continue;
        };
        let entry = groups.entry(level).or_default();
        entry.all.push(completion);

        match dataset
            .value(row, Column::Rural.as_str())
            .and_then(|v| v.as_bool())
        {
            Some(true) => entry.rural.push(completion),
            Some(false) => entry.urban.push(completion),
            None => {}
        }
        match dataset.numeric(row, Column::Fragility.as_str()) {
            Some(v) if v == 1.0 => entry.fragile.push(completion),
            Some(v) if v == 0.0 => entry.stable.push(completion),
            _ => {}
        }
        match dataset
            .text(row, Column::Gender.as_str())
            .and_then(|g| Gender::from_str(g).ok())
        {
            Some(Gender::Male) => entry.male.push(completion),
            Some(Gender::Female) => entry.female.push(completion),
            None => {}
        }
    }

    groups
        .into_iter()
        .map(|(education_level, g)| LevelInsight {
            education_level,
            mean_completion: g.all.mean(),
            rural_gap: difference(g.urban.mean(), g.rural.mean()),
            fragility_gap: difference(g.stable.mean(), g.fragile.mean()),
            gpi: parity_ratio(g.female.mean(), g.male.mean()),
        })
        .collect()
}
