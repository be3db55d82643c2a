//! Synthetic partner submissions for demos and end-to-end checks.

use rand::seq::index::sample;
use rand::Rng;
use tracing::debug;

use crate::dataset::{Dataset, DatasetError, Value};
use crate::schema::{Column, DevelopmentLevel, EducationLevel, Gender};

struct CountryProfile {
    name: &'static str,
    development: DevelopmentLevel,
    fragile: bool,
}

const fn country(
    name: &'static str,
    development: DevelopmentLevel,
    fragile: bool,
) -> CountryProfile {
    CountryProfile {
        name,
        development,
        fragile,
    }
}

const COUNTRIES: [CountryProfile; 19] = [
    country("Afghanistan", DevelopmentLevel::Least, true),
    country("South Sudan", DevelopmentLevel::Least, true),
    country("Chad", DevelopmentLevel::Least, true),
    country("Somalia", DevelopmentLevel::Least, true),
    country("Bangladesh", DevelopmentLevel::Less, false),
    country("Nepal", DevelopmentLevel::Less, false),
    country("Ethiopia", DevelopmentLevel::Least, false),
    country("Uganda", DevelopmentLevel::Least, false),
    country("India", DevelopmentLevel::Less, false),
    country("Bhutan", DevelopmentLevel::Less, false),
    country("Vietnam", DevelopmentLevel::Less, false),
    country("Philippines", DevelopmentLevel::Less, false),
    country("Morocco", DevelopmentLevel::Less, false),
    country("Egypt", DevelopmentLevel::Less, false),
    country("Bosnia and Herzegovina", DevelopmentLevel::More, false),
    country("Serbia", DevelopmentLevel::More, false),
    country("Poland", DevelopmentLevel::More, false),
    country("Chile", DevelopmentLevel::More, false),
    country("Malaysia", DevelopmentLevel::More, false),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorOptions {
    pub missing_attendance_fraction: f64,
    pub logic_defect_fraction: f64,
    pub attendance_bump_fraction: f64,
    pub out_of_range_fraction: f64,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            missing_attendance_fraction: 0.05,
            logic_defect_fraction: 0.02,
            attendance_bump_fraction: 0.01,
            out_of_range_fraction: 0.01,
        }
    }
}

impl GeneratorOptions {
    pub fn without_defects() -> Self {
        Self {
            missing_attendance_fraction: 0.0,
            logic_defect_fraction: 0.0,
            attendance_bump_fraction: 0.0,
            out_of_range_fraction: 0.0,
        }
    }
}

pub fn generate_dataset<R: Rng + ?Sized>(
    rng: &mut R,
    options: &GeneratorOptions,
) -> Result<Dataset, DatasetError> {
    let mut rows = Vec::with_capacity(COUNTRIES.len() * 6);
    for profile in &COUNTRIES {
        for level in EducationLevel::ALL {
            for gender in Gender::ALL {
                rows.push(generate_row(rng, profile, level, gender));
            }
        }
    }

    let total = rows.len();
    let attendance = column_position(Column::AttendanceRate);
    let completion = column_position(Column::CompletionRate);

    for idx in pick_rows(rng, total, options.missing_attendance_fraction) {
        rows[idx][attendance] = Value::Missing;
    }
    for idx in pick_rows(rng, total, options.logic_defect_fraction) {
        if let Some(ar) = rows[idx][attendance].as_f64() {
            rows[idx][completion] = Value::Float(round1(ar + rng.gen_range(1.0..5.0)));
        }
    }
    for idx in pick_rows(rng, total, options.attendance_bump_fraction) {
        if let Some(ar) = rows[idx][attendance].as_f64() {
            let bumped = (ar + rng.gen_range(5.0..10.0)).min(100.0);
            rows[idx][attendance] = Value::Float(round1(bumped));
        }
    }
    for idx in pick_rows(rng, total, options.out_of_range_fraction) {
        if rows[idx][attendance].as_f64().is_some() {
            rows[idx][attendance] = Value::Float(round1(100.0 + rng.gen_range(1.0..20.0)));
        }
    }

    debug!(rows = total, "generated synthetic dataset");
    Dataset::from_rows(Column::ALL.iter().map(|c| c.as_str()), rows)
}

fn generate_row<R: Rng + ?Sized>(
    rng: &mut R,
    profile: &CountryProfile,
    level: EducationLevel,
    gender: Gender,
) -> Vec<Value> {
    let rural = rng.gen_bool(0.5);
    let wealth: i64 = rng.gen_range(1..=5);

    let osr = out_of_school_rate(rng, profile, wealth, rural, gender);
    let attendance = attendance_rate(rng, profile, level).min(100.0 - osr);
    let completion = completion_rate(rng, profile, level, wealth, rural, gender).min(attendance);

    vec![
        Value::text(profile.name),
        Value::text(profile.development.as_str()),
        Value::Integer(i64::from(profile.fragile)),
        Value::text(level.as_str()),
        Value::text(gender.as_str()),
        Value::Bool(rural),
        Value::Integer(wealth),
        Value::Float(osr),
        Value::Float(round1(attendance)),
        Value::Float(round1(completion)),
    ]
}

fn out_of_school_rate<R: Rng + ?Sized>(
    rng: &mut R,
    profile: &CountryProfile,
    wealth: i64,
    rural: bool,
    gender: Gender,
) -> f64 {
    let (low, high) = match profile.development {
        DevelopmentLevel::Least => (20.0, 40.0),
        DevelopmentLevel::Less => (10.0, 25.0),
        DevelopmentLevel::More => (3.0, 12.0),
    };
    let mut osr: f64 = rng.gen_range(low..high);
    osr -= wealth as f64 * rng.gen_range(1.5..3.0);
    if rural {
        osr += rng.gen_range(5.0..15.0);
    }
    if gender == Gender::Female {
        osr += rng.gen_range(-2.0..6.0);
    }
    if profile.fragile {
        osr += rng.gen_range(5.0..15.0);
    }
    round1(osr.clamp(0.0, 100.0))
}

fn attendance_rate<R: Rng + ?Sized>(
    rng: &mut R,
    profile: &CountryProfile,
    level: EducationLevel,
) -> f64 {
    let (low, high) = match level {
        EducationLevel::Primary => (85.0, 98.0),
        EducationLevel::LowerSecondary => (70.0, 90.0),
        EducationLevel::HigherSecondary => (60.0, 85.0),
    };
    let mut ar: f64 = rng.gen_range(low..high);
    ar += rng.gen_range(-3.0..3.0);
    ar += rng.gen_range(-1.0..4.0);
    if profile.fragile {
        ar -= rng.gen_range(5.0..15.0);
    }
    ar += rng.gen_range(-2.0..2.0);
    round1(ar.clamp(50.0, 100.0))
}

fn completion_rate<R: Rng + ?Sized>(
    rng: &mut R,
    profile: &CountryProfile,
    level: EducationLevel,
    wealth: i64,
    rural: bool,
    gender: Gender,
) -> f64 {
    let (low, high) = match level {
        EducationLevel::Primary => (80.0, 95.0),
        EducationLevel::LowerSecondary => (60.0, 80.0),
        EducationLevel::HigherSecondary => (40.0, 70.0),
    };
    let mut cr: f64 = rng.gen_range(low..high);
    match profile.development {
        DevelopmentLevel::More => cr += rng.gen_range(5.0..10.0),
        DevelopmentLevel::Least => cr -= rng.gen_range(5.0..10.0),
        DevelopmentLevel::Less => {}
    }
    cr += wealth as f64 * rng.gen_range(2.0..5.0);
    if rural {
        cr -= rng.gen_range(10.0..25.0);
    }
    match (level, gender) {
        (EducationLevel::HigherSecondary, Gender::Female) => cr += rng.gen_range(2.0..6.0),
        (EducationLevel::LowerSecondary, _) => cr += rng.gen_range(-3.0..3.0),
        _ => {}
    }
    if profile.fragile {
        cr -= rng.gen_range(5.0..15.0);
    }
    round1(cr.clamp(30.0, 100.0))
}

fn pick_rows<R: Rng + ?Sized>(rng: &mut R, total: usize, fraction: f64) -> Vec<usize> {
    let amount = ((total as f64) * fraction.clamp(0.0, 1.0)).round() as usize;
    if amount == 0 {
        return Vec::new();
    }
    sample(rng, total, amount.min(total)).into_vec()
}

fn column_position(column: Column) -> usize {
    Column::ALL
        .iter()
        .position(|c| *c == column)
        .unwrap_or_default()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
