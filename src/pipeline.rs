use polars::prelude::*;
use serde::Serialize;

use crate::age_group::{classify_age, AgeGroup};
use crate::error::PipelineError;
use crate::records::{HypertensionRecord, Sex, AGE_COLUMN, RISK_COLUMN, SEX_COLUMN, SEX_LABELS};

pub const SEX_LABEL_COLUMN: &str = "sex_label";
pub const AGE_GROUP_COLUMN: &str = "age_group";
pub const RISK_PERCENT_COLUMN: &str = "risk_percent";

/// Mean hypertension risk of one (sex, age group) cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateRow {
    #[serde(rename = "sex_label")]
    pub sex: Sex,
    pub age_group: AgeGroup,
    #[serde(rename = "risk_percent")]
    pub mean_risk_percent: f64,
}

fn age_group_lazy(column: Series) -> Result<Option<Series>, PolarsError> {
    let ages = column.u32()?;
    let groups: Vec<Option<&str>> = ages
        .into_iter()
        .map(|age| age.map(|a| classify_age(a).label()))
        .collect();
    Ok(Some(Series::new(column.name(), groups)))
}

fn sex_label_lazy(column: Series) -> Result<Option<Series>, PolarsError> {
    let codes = column.u32()?;
    let labels: Vec<Option<&str>> = codes
        .into_iter()
        .map(|code| code.and_then(|c| SEX_LABELS.get(&c).copied()))
        .collect();
    Ok(Some(Series::new(column.name(), labels)))
}

/// Keeps the records whose age group was selected. No selection keeps everything.
pub fn filter_by_age_groups(
    records: &[HypertensionRecord],
    groups: &[AgeGroup],
) -> Vec<HypertensionRecord> {
    if groups.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| groups.contains(&classify_age(r.age)))
        .copied()
        .collect()
}

/// Silver table: the raw columns plus the derived age group and sex label.
pub fn classify(records: &[HypertensionRecord]) -> PolarsResult<DataFrame> {
    HypertensionRecord::to_frame(records)?
        .lazy()
        .with_columns([
            col(AGE_COLUMN)
                .map(age_group_lazy, GetOutput::from_type(DataType::Utf8))
                .alias(AGE_GROUP_COLUMN),
            col(SEX_COLUMN)
                .map(sex_label_lazy, GetOutput::from_type(DataType::Utf8))
                .alias(SEX_LABEL_COLUMN),
        ])
        .collect()
}

/// Gold table: mean risk percent per (sex, age group), in order of first appearance.
pub fn aggregate_frame(silver: &DataFrame) -> PolarsResult<DataFrame> {
    silver
        .clone()
        .lazy()
        .groupby_stable([col(SEX_LABEL_COLUMN), col(AGE_GROUP_COLUMN)])
        .agg([(col(RISK_COLUMN).mean() * lit(100.0)).alias(RISK_PERCENT_COLUMN)])
        .collect()
}

/// Reads a gold table back into typed rows. Tables built by `aggregate_frame`
/// always carry known labels; other tables (a gold CSV read back from disk,
/// say) may not, and an unknown label is an `Aggregate` error.
pub fn rows_from_frame(gold: &DataFrame) -> Result<Vec<AggregateRow>, PipelineError> {
    let sexes = gold.column(SEX_LABEL_COLUMN)?.utf8()?;
    let groups = gold.column(AGE_GROUP_COLUMN)?.utf8()?;
    let risks = gold.column(RISK_PERCENT_COLUMN)?.f64()?;

    sexes
        .into_iter()
        .zip(groups.into_iter())
        .zip(risks.into_iter())
        .map(|((sex, group), risk)| {
            let sex = sex
                .and_then(Sex::from_label)
                .ok_or_else(|| PipelineError::Aggregate(format!("bad sex label {:?}", sex)))?;
            let age_group = group
                .and_then(AgeGroup::from_label)
                .ok_or_else(|| PipelineError::Aggregate(format!("bad age group {:?}", group)))?;
            let mean_risk_percent = risk
                .ok_or_else(|| PipelineError::Aggregate("missing risk percent".to_string()))?;
            Ok(AggregateRow {
                sex,
                age_group,
                mean_risk_percent,
            })
        })
        .collect()
}

/// Rebuilds the gold table from typed rows.
pub fn rows_to_frame(rows: &[AggregateRow]) -> PolarsResult<DataFrame> {
    let sexes: Vec<&str> = rows.iter().map(|r| r.sex.label()).collect();
    let groups: Vec<&str> = rows.iter().map(|r| r.age_group.label()).collect();
    let risks: Vec<f64> = rows.iter().map(|r| r.mean_risk_percent).collect();

    DataFrame::new(vec![
        Series::new(SEX_LABEL_COLUMN, sexes),
        Series::new(AGE_GROUP_COLUMN, groups),
        Series::new(RISK_PERCENT_COLUMN, risks),
    ])
}

pub fn aggregate(records: &[HypertensionRecord]) -> Result<Vec<AggregateRow>, PipelineError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }
    let silver = classify(records)?;
    let gold = aggregate_frame(&silver)?;
    rows_from_frame(&gold)
}
