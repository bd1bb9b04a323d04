use std::collections::BTreeMap;

use serde::Serialize;

use crate::pipeline::{AggregateRow, AGE_GROUP_COLUMN, RISK_PERCENT_COLUMN, SEX_LABEL_COLUMN};
use crate::records::Sex;

pub const CHART_TITLE: &str = "Hypertension Risk by Sex and Age Group";

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub field: &'static str,
    pub label: &'static str,
}

/// Grouped bar chart handed to whatever renders the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct BarChart {
    pub title: &'static str,
    pub barmode: &'static str,
    pub x: Axis,
    pub y: Axis,
    pub color: &'static str,
    pub color_map: BTreeMap<&'static str, &'static str>,
    pub rows: Vec<AggregateRow>,
}

pub fn sex_color(sex: Sex) -> &'static str {
    match sex {
        Sex::Male => "blue",
        Sex::Female => "pink",
    }
}

impl BarChart {
    pub fn from_rows(rows: &[AggregateRow]) -> Self {
        let color_map = [Sex::Male, Sex::Female]
            .into_iter()
            .map(|sex| (sex.label(), sex_color(sex)))
            .collect();

        BarChart {
            title: CHART_TITLE,
            barmode: "group",
            x: Axis {
                field: AGE_GROUP_COLUMN,
                label: "Age Group",
            },
            y: Axis {
                field: RISK_PERCENT_COLUMN,
                label: "Hypertension Percentage",
            },
            color: SEX_LABEL_COLUMN,
            color_map,
            rows: rows.to_vec(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::age_group::AgeGroup;
    use serde_json::{json, Value};

    #[test]
    fn colors_are_fixed_per_sex() {
        let chart = BarChart::from_rows(&[]);
        assert_eq!(chart.color_map.get("Male"), Some(&"blue"));
        assert_eq!(chart.color_map.get("Female"), Some(&"pink"));
        assert_eq!(chart.color_map.len(), 2);
    }

    #[test]
    fn serializes_rows_with_display_labels() {
        let rows = vec![AggregateRow {
            sex: Sex::Female,
            age_group: AgeGroup::OlderAdults,
            mean_risk_percent: 60.0,
        }];
        let value: Value = serde_json::from_str(&BarChart::from_rows(&rows).to_json().unwrap()).unwrap();

        assert_eq!(value["barmode"], "group");
        assert_eq!(value["x"]["field"], "age_group");
        assert_eq!(value["y"]["field"], "risk_percent");
        assert_eq!(
            value["rows"],
            json!([{ "sex_label": "Female", "age_group": "Older Adults", "risk_percent": 60.0 }])
        );
    }
}
