use chrono::NaiveDate;

use crate::formats::{HazardRow, JobRecord, RawJobForm};
use crate::profile::FieldDefaults;

/// Fields the HTML form marks as required.
pub const CORE_FIELDS: [&str; 3] = ["company", "job_title", "location"];

pub fn normalize(raw: &RawJobForm, defaults: &FieldDefaults, today: NaiveDate) -> JobRecord {
    let or_missing = |value: &Option<String>| or_default(value, &defaults.missing);

    let method_steps = match split_lines(raw.method_steps.as_deref().unwrap_or_default()) {
        steps if steps.is_empty() => defaults.method_steps.clone(),
        steps => steps,
    };
    let hazards = match parse_hazards(raw.hazards.as_deref().unwrap_or_default(), defaults) {
        rows if rows.is_empty() => defaults.hazards.clone(),
        rows => rows,
    };

    JobRecord {
        company: or_missing(&raw.company),
        job_title: or_missing(&raw.job_title),
        location: or_missing(&raw.location),
        job_date: or_default(&raw.job_date, &today.format("%Y-%m-%d").to_string()),
        workers: or_missing(&raw.workers),
        supervisor: or_missing(&raw.supervisor),
        site_contact: or_missing(&raw.site_contact),
        description: or_default(&raw.description, &defaults.description),
        ppe: or_default(&raw.ppe, &defaults.ppe),
        equipment: or_default(&raw.equipment, &defaults.equipment),
        emergency: or_default(&raw.emergency, &defaults.emergency),
        prepared_by: or_missing(&raw.prepared_by),
        method_steps,
        hazards,
    }
}

/// Names of the required form fields that were left blank.
pub fn missing_required(raw: &RawJobForm) -> Vec<&'static str> {
    [&raw.company, &raw.job_title, &raw.location]
        .into_iter()
        .zip(CORE_FIELDS)
        .filter(|(value, _)| is_blank(value))
        .map(|(_, name)| name)
        .collect()
}

pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .flat_map(|line| line.split('\r'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_hazards(text: &str, defaults: &FieldDefaults) -> Vec<HazardRow> {
    split_lines(text)
        .iter()
        .map(|line| parse_hazard_line(line, defaults))
        .collect()
}

/// `Hazard | Who might be harmed | Controls`, with positional fallback for
/// lines that carry fewer segments.
pub fn parse_hazard_line(line: &str, defaults: &FieldDefaults) -> HazardRow {
    let line = line.trim();
    let parts: Vec<&str> = line.split('|').map(str::trim).collect();
    match parts.as_slice() {
        [hazard, who, controls, ..] => HazardRow::new(*hazard, *who, *controls),
        [hazard, who] => HazardRow::new(*hazard, *who, defaults.hazard_controls.as_str()),
        _ => HazardRow::new(
            line,
            defaults.hazard_who.as_str(),
            defaults.hazard_controls.as_str(),
        ),
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

fn or_default(value: &Option<String>, default: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::profile::{DEFAULT_METHOD_STEPS, HAZARD_CONTROLS_FALLBACK, HAZARD_WHO_FALLBACK};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn form_with_hazards(hazards: &str) -> RawJobForm {
        RawJobForm {
            hazards: Some(hazards.to_string()),
            ..RawJobForm::default()
        }
    }

    #[test]
    fn full_hazard_line_is_kept_verbatim() {
        let record = normalize(
            &form_with_hazards("Wet floor | Staff | Mop and sign"),
            &FieldDefaults::default(),
            today(),
        );
        assert_eq!(
            record.hazards,
            vec![HazardRow::new("Wet floor", "Staff", "Mop and sign")]
        );
    }

    #[test]
    fn plain_hazard_line_gets_fallback_columns() {
        let record = normalize(
            &form_with_hazards("Loose cable"),
            &FieldDefaults::default(),
            today(),
        );
        assert_eq!(
            record.hazards,
            vec![HazardRow::new(
                "Loose cable",
                "Workers/others",
                "Review and add suitable controls for this site/task."
            )]
        );
    }

    #[test]
    fn two_segment_hazard_line_gets_fallback_controls() {
        let row = parse_hazard_line("Noise | Neighbours", &FieldDefaults::default());
        assert_eq!(
            row,
            HazardRow::new("Noise", "Neighbours", HAZARD_CONTROLS_FALLBACK)
        );
    }

    #[test]
    fn extra_hazard_segments_are_dropped() {
        let row = parse_hazard_line("Dust | Workers | Masks | extra | more", &FieldDefaults::default());
        assert_eq!(row, HazardRow::new("Dust", "Workers", "Masks"));
    }

    #[test]
    fn empty_segments_are_kept_positionally() {
        let row = parse_hazard_line("| |", &FieldDefaults::default());
        assert_eq!(row, HazardRow::new("", "", ""));
    }

    #[test]
    fn blank_form_is_fully_defaulted() {
        let defaults = FieldDefaults::default();
        let record = normalize(&RawJobForm::default(), &defaults, today());

        assert_eq!(record.company, "N/A");
        assert_eq!(record.workers, "N/A");
        assert_eq!(record.prepared_by, "N/A");
        assert_eq!(record.job_date, "2024-03-15");
        assert_eq!(record.ppe, crate::profile::DEFAULT_PPE);
        assert_eq!(record.method_steps, DEFAULT_METHOD_STEPS.map(String::from).to_vec());
        assert_eq!(record.hazards, defaults.hazards);
    }

    #[test]
    fn whitespace_only_fields_count_as_blank() {
        let raw = RawJobForm {
            company: Some("   ".to_string()),
            job_date: Some("\t".to_string()),
            method_steps: Some("\n  \n".to_string()),
            ..RawJobForm::default()
        };
        let record = normalize(&raw, &FieldDefaults::default(), today());
        assert_eq!(record.company, "N/A");
        assert_eq!(record.job_date, "2024-03-15");
        assert_eq!(record.method_steps.len(), 6);
    }

    #[test]
    fn supplied_values_are_trimmed() {
        let raw = RawJobForm {
            company: Some("  Acme Ltd ".to_string()),
            job_date: Some(" 2025-01-02 ".to_string()),
            method_steps: Some("  first \r\n\r\nsecond\rthird  ".to_string()),
            ..RawJobForm::default()
        };
        let record = normalize(&raw, &FieldDefaults::default(), today());
        assert_eq!(record.company, "Acme Ltd");
        assert_eq!(record.job_date, "2025-01-02");
        assert_eq!(record.method_steps, vec!["first", "second", "third"]);
    }

    #[test]
    fn missing_required_lists_blank_core_fields() {
        let raw = RawJobForm {
            company: Some("Acme".to_string()),
            location: Some(" ".to_string()),
            ..RawJobForm::default()
        };
        assert_eq!(missing_required(&raw), vec!["job_title", "location"]);
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(steps in ".{0,80}", hazards in ".{0,80}", company in ".{0,20}") {
            let raw = RawJobForm {
                company: Some(company),
                method_steps: Some(steps),
                hazards: Some(hazards),
                ..RawJobForm::default()
            };
            let defaults = FieldDefaults::default();
            prop_assert_eq!(normalize(&raw, &defaults, today()), normalize(&raw, &defaults, today()));
        }

        #[test]
        fn non_blank_steps_survive_in_order(lines in prop::collection::vec("[a-zA-Z0-9 ]{0,12}", 1..8)) {
            let raw = RawJobForm {
                method_steps: Some(lines.join("\n")),
                ..RawJobForm::default()
            };
            let expected: Vec<String> = lines
                .iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();
            let record = normalize(&raw, &FieldDefaults::default(), today());
            if expected.is_empty() {
                prop_assert_eq!(record.method_steps.len(), DEFAULT_METHOD_STEPS.len());
            } else {
                prop_assert_eq!(record.method_steps, expected);
            }
        }

        #[test]
        fn undelimited_hazard_lines_use_fallbacks(line in "[a-zA-Z][a-zA-Z ]{0,20}") {
            let row = parse_hazard_line(&line, &FieldDefaults::default());
            prop_assert_eq!(row, HazardRow::new(line.trim(), HAZARD_WHO_FALLBACK, HAZARD_CONTROLS_FALLBACK));
        }

        #[test]
        fn two_segment_lines_use_controls_fallback(a in "[a-z]{1,10}", b in "[a-z]{1,10}") {
            let row = parse_hazard_line(&format!("{a} | {b}"), &FieldDefaults::default());
            prop_assert_eq!(row.controls, HAZARD_CONTROLS_FALLBACK);
        }
    }
}
