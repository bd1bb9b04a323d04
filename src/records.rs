use std::collections::HashMap;
use std::convert::TryFrom;
use std::fmt;

use lazy_static::lazy_static;
use polars::prelude::{DataFrame, NamedFrom, PolarsResult, Series};
use serde::{Deserialize, Serialize};

pub const AGE_COLUMN: &str = "edad";
pub const SEX_COLUMN: &str = "sexo";
pub const RISK_COLUMN: &str = "riesgo_hipertension";

lazy_static! {
    /// Display label for each sex code found in the survey.
    pub static ref SEX_LABELS: HashMap<u32, &'static str> = [Sex::Male, Sex::Female]
        .into_iter()
        .map(|sex| (sex.code(), sex.label()))
        .collect();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn code(self) -> u32 {
        match self {
            Sex::Male => 1,
            Sex::Female => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }

    pub fn from_label(label: &str) -> Option<Sex> {
        [Sex::Male, Sex::Female]
            .into_iter()
            .find(|sex| sex.label() == label)
    }
}

impl TryFrom<u32> for Sex {
    type Error = String;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Sex::Male),
            2 => Ok(Sex::Female),
            other => Err(format!("unknown sex code {}", other)),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One survey row. Columns besides these three are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HypertensionRecord {
    #[serde(rename = "edad")]
    pub age: u32,

    #[serde(rename = "sexo")]
    pub sex: Sex,

    /// Fraction of the cell diagnosed with hypertension, in [0, 1]
    #[serde(rename = "riesgo_hipertension")]
    pub hypertension_risk: f64,
}

impl HypertensionRecord {
    #[cfg(test)]
    pub fn new(age: u32, sex: Sex, hypertension_risk: f64) -> Self {
        HypertensionRecord {
            age,
            sex,
            hypertension_risk,
        }
    }

    pub fn required_columns() -> [&'static str; 3] {
        [AGE_COLUMN, SEX_COLUMN, RISK_COLUMN]
    }

    /// Builds a frame holding the raw columns under their source names.
    pub fn to_frame(records: &[HypertensionRecord]) -> PolarsResult<DataFrame> {
        let ages: Vec<u32> = records.iter().map(|r| r.age).collect();
        let sexes: Vec<u32> = records.iter().map(|r| r.sex.code()).collect();
        let risks: Vec<f64> = records.iter().map(|r| r.hypertension_risk).collect();

        DataFrame::new(vec![
            Series::new(AGE_COLUMN, ages),
            Series::new(SEX_COLUMN, sexes),
            Series::new(RISK_COLUMN, risks),
        ])
    }
}
