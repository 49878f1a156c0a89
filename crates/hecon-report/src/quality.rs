//! Completeness and coercion metadata for a metrics run.

use chrono::NaiveDateTime;
use hecon_model::{ParseWarnings, Record};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQuality {
    pub records: usize,
    pub period_start: Option<NaiveDateTime>,
    pub period_end: Option<NaiveDateTime>,
    /// Percent of records with a billed cost.
    pub cost_completeness_pct: Option<f64>,
    pub age_completeness_pct: Option<f64>,
    pub region_completeness_pct: Option<f64>,
    pub parse_warnings: usize,
    pub parse_warnings_by_column: ParseWarnings,
}

pub fn data_quality(records: &[Record], warnings: &ParseWarnings) -> DataQuality {
    let ends = records.iter().filter_map(Record::episode_end);
    let (period_start, period_end) = ends.fold((None, None), |(lo, hi), end| {
        (
            Some(lo.map_or(end, |lo: NaiveDateTime| lo.min(end))),
            Some(hi.map_or(end, |hi: NaiveDateTime| hi.max(end))),
        )
    });
    let completeness = |present: usize| {
        (!records.is_empty()).then(|| present as f64 / records.len() as f64 * 100.0)
    };
    DataQuality {
        records: records.len(),
        period_start,
        period_end,
        cost_completeness_pct: completeness(
            records.iter().filter(|r| r.billed_cost.is_some()).count(),
        ),
        age_completeness_pct: completeness(records.iter().filter(|r| r.age.is_some()).count()),
        region_completeness_pct: completeness(
            records.iter().filter(|r| r.region.is_some()).count(),
        ),
        parse_warnings: warnings.total(),
        parse_warnings_by_column: warnings.clone(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use hecon_model::ParseWarningKind;

    use super::*;

    #[test]
    fn completeness_and_range() {
        let at = |day| NaiveDate::from_ymd_opt(2025, 2, day).and_then(|d| d.and_hms_opt(0, 0, 0));
        let records = vec![
            Record {
                closed_at: at(20),
                billed_cost: Some(1.0),
                ..Record::default()
            },
            Record {
                closed_at: at(3),
                region: Some("TLALPAN".to_string()),
                ..Record::default()
            },
        ];
        let mut warnings = ParseWarnings::default();
        warnings.record("edad", ParseWarningKind::OutOfRange);

        let quality = data_quality(&records, &warnings);
        assert_eq!(quality.period_start, at(3));
        assert_eq!(quality.period_end, at(20));
        assert_eq!(quality.cost_completeness_pct, Some(50.0));
        assert_eq!(quality.age_completeness_pct, Some(0.0));
        assert_eq!(quality.parse_warnings, 1);
    }

    #[test]
    fn empty_batch() {
        let quality = data_quality(&[], &ParseWarnings::default());
        assert_eq!(quality.period_start, None);
        assert_eq!(quality.cost_completeness_pct, None);
    }
}
