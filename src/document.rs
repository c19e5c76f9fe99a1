use crate::formats::JobRecord;
use crate::profile::{DocumentProfile, SIGNATURE_PLACEHOLDER};

pub const HEADING_SCOPE: &str = "Scope of Works / Description";
pub const HEADING_PPE: &str = "PPE Required";
pub const HEADING_EQUIPMENT: &str = "Tools / Equipment / Materials";
pub const HEADING_METHOD: &str = "Method Statement (How the work will be done safely)";
pub const HEADING_RISK: &str = "Risk Assessment (Hazards & Control Measures)";
pub const HEADING_EMERGENCY: &str = "Emergency Arrangements";
pub const HEADING_COMPLIANCE: &str = "Compliance Notes";
pub const HEADING_DISCLAIMER: &str = "Disclaimer";

pub const RISK_HEADER: [&str; 3] = ["Hazard", "Who might be harmed", "Controls / precautions"];

const KEY_VALUE_WIDTHS: [f32; 2] = [160.0, 340.0];
const RISK_WIDTHS: [f32; 3] = [140.0, 140.0, 220.0];

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Heading(String),
    Paragraph(String),
    /// Vertical gap in points.
    Spacer(f32),
    Table(Table),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Inverted colours, bold text.
    Header,
    Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub text: String,
    pub bold: bool,
    /// Number of columns this cell covers.
    pub span: usize,
}

impl TableCell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            span: 1,
        }
    }

    fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub kind: RowKind,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub column_widths: Vec<f32>,
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Two-column table with a merged header row and bold keys.
    pub fn key_value(header: &str, rows: Vec<(&str, String)>) -> Self {
        let mut table_rows = vec![TableRow {
            kind: RowKind::Header,
            cells: vec![TableCell {
                span: 2,
                ..TableCell::bold(header)
            }],
        }];
        table_rows.extend(rows.into_iter().map(|(key, value)| TableRow {
            kind: RowKind::Body,
            cells: vec![TableCell::bold(key), TableCell::plain(value)],
        }));
        Self {
            column_widths: KEY_VALUE_WIDTHS.to_vec(),
            rows: table_rows,
        }
    }

    pub fn grid<const N: usize>(
        column_widths: [f32; N],
        header: [&str; N],
        rows: impl IntoIterator<Item = [String; N]>,
    ) -> Self {
        let mut table_rows = vec![TableRow {
            kind: RowKind::Header,
            cells: header.into_iter().map(TableCell::bold).collect(),
        }];
        table_rows.extend(rows.into_iter().map(|row| TableRow {
            kind: RowKind::Body,
            cells: row.into_iter().map(TableCell::plain).collect(),
        }));
        Self {
            column_widths: column_widths.to_vec(),
            rows: table_rows,
        }
    }

    pub fn width(&self) -> f32 {
        self.column_widths.iter().sum()
    }
}

pub fn numbered_steps(steps: &[String]) -> Vec<String> {
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {step}", i + 1))
        .collect()
}

/// Assembles the fixed section sequence for `record`.
pub fn build_document(record: &JobRecord, profile: &DocumentProfile) -> Document {
    let sections = &profile.sections;
    let mut blocks = vec![Block::Title(profile.title.clone()), Block::Spacer(10.0)];

    let mut job_rows = vec![
        ("Company", record.company.clone()),
        ("Job title", record.job_title.clone()),
        ("Location", record.location.clone()),
        ("Date", record.job_date.clone()),
        ("No. of workers", record.workers.clone()),
        ("Supervisor / Responsible person", record.supervisor.clone()),
    ];
    if sections.site_contact {
        job_rows.push(("Client / Site contact (optional)", record.site_contact.clone()));
    }
    blocks.push(Block::Table(Table::key_value("Job Details", job_rows)));
    blocks.push(Block::Spacer(12.0));

    let descriptive = [
        (sections.scope, HEADING_SCOPE, &record.description, 10.0),
        (sections.ppe, HEADING_PPE, &record.ppe, 8.0),
        (sections.equipment, HEADING_EQUIPMENT, &record.equipment, 12.0),
    ];
    for (_, heading, body, gap) in descriptive.into_iter().filter(|(on, ..)| *on) {
        push_section(&mut blocks, heading, body, gap);
    }

    blocks.push(Block::Heading(HEADING_METHOD.to_string()));
    blocks.extend(
        numbered_steps(&record.method_steps)
            .into_iter()
            .map(Block::Paragraph),
    );
    blocks.push(Block::Spacer(12.0));

    blocks.push(Block::Heading(HEADING_RISK.to_string()));
    blocks.push(Block::Table(Table::grid(
        RISK_WIDTHS,
        RISK_HEADER,
        record
            .hazards
            .iter()
            .map(|row| row.columns().map(str::to_string)),
    )));
    blocks.push(Block::Spacer(12.0));

    if sections.emergency {
        push_section(&mut blocks, HEADING_EMERGENCY, &record.emergency, 10.0);
    }
    push_section(&mut blocks, HEADING_COMPLIANCE, &profile.compliance_notes, 10.0);
    push_section(&mut blocks, HEADING_DISCLAIMER, &profile.disclaimer, 12.0);

    let mut sign_rows = vec![
        ("Prepared by (name)", record.prepared_by.clone()),
        ("Signature", SIGNATURE_PLACEHOLDER.to_string()),
        ("Date", record.job_date.clone()),
    ];
    if sections.reviewed_by {
        sign_rows.push(("Reviewed by (client/site)", SIGNATURE_PLACEHOLDER.to_string()));
    }
    blocks.push(Block::Table(Table::key_value("Sign-off", sign_rows)));

    Document {
        title: profile.title.clone(),
        blocks,
    }
}

fn push_section(blocks: &mut Vec<Block>, heading: &str, body: &str, gap: f32) {
    blocks.push(Block::Heading(heading.to_string()));
    blocks.push(Block::Paragraph(body.to_string()));
    blocks.push(Block::Spacer(gap));
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::formats::RawJobForm;
    use crate::normalize::normalize;
    use crate::profile::{DEFAULT_METHOD_STEPS, Variant};

    fn build(raw: &RawJobForm, variant: Variant) -> Document {
        let profile = DocumentProfile::for_variant(variant);
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        build_document(&normalize(raw, &profile.defaults, today), &profile)
    }

    fn headings(doc: &Document) -> Vec<&str> {
        doc.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Heading(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn paragraphs_under<'a>(doc: &'a Document, heading: &str) -> Vec<&'a str> {
        doc.blocks
            .iter()
            .skip_while(|block| !matches!(block, Block::Heading(h) if h == heading))
            .skip(1)
            .take_while(|block| matches!(block, Block::Paragraph(_)))
            .filter_map(|block| match block {
                Block::Paragraph(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn tables(doc: &Document) -> Vec<&Table> {
        doc.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Table(table) => Some(table),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn blank_input_renders_canned_steps_numbered_one_to_six() {
        let doc = build(&RawJobForm::default(), Variant::Standard);
        let expected: Vec<String> = DEFAULT_METHOD_STEPS
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {step}", i + 1))
            .collect();
        assert_eq!(paragraphs_under(&doc, HEADING_METHOD), expected);
    }

    #[test]
    fn supplied_steps_appear_once_in_order() {
        let raw = RawJobForm {
            method_steps: Some("  Isolate supply\n\nFit luminaire \n Test".to_string()),
            ..RawJobForm::default()
        };
        let doc = build(&raw, Variant::Standard);
        assert_eq!(
            paragraphs_under(&doc, HEADING_METHOD),
            vec!["1. Isolate supply", "2. Fit luminaire", "3. Test"]
        );
    }

    #[test]
    fn standard_sections_follow_fixed_order() {
        let doc = build(&RawJobForm::default(), Variant::Standard);
        assert_eq!(doc.blocks.first(), Some(&Block::Title(doc.title.clone())));
        assert_eq!(
            headings(&doc),
            vec![
                HEADING_SCOPE,
                HEADING_PPE,
                HEADING_EQUIPMENT,
                HEADING_METHOD,
                HEADING_RISK,
                HEADING_EMERGENCY,
                HEADING_COMPLIANCE,
                HEADING_DISCLAIMER,
            ]
        );
        assert!(matches!(doc.blocks.last(), Some(Block::Table(_))));
    }

    #[test]
    fn basic_variant_omits_disabled_sections_and_rows() {
        let doc = build(&RawJobForm::default(), Variant::Basic);
        assert!(!headings(&doc).contains(&HEADING_EQUIPMENT));

        let tables = tables(&doc);
        assert_eq!(tables.len(), 3);
        assert_eq!(tables[0].rows.len(), 1 + 6);
        assert_eq!(tables[1].rows.len(), 1 + 3);
        assert_eq!(tables[2].rows.len(), 1 + 3);
    }

    #[test]
    fn job_details_table_has_merged_inverted_header_and_bold_keys() {
        let doc = build(&RawJobForm::default(), Variant::Standard);
        let details = tables(&doc)[0];

        assert_eq!(details.column_widths, vec![160.0, 340.0]);
        let header = &details.rows[0];
        assert_eq!(header.kind, RowKind::Header);
        assert_eq!(header.cells.len(), 1);
        assert_eq!(header.cells[0].span, 2);
        assert_eq!(header.cells[0].text, "Job Details");
        assert!(details.rows[1..].iter().all(|row| row.cells[0].bold && !row.cells[1].bold));
        assert_eq!(details.rows.len(), 1 + 7);
    }

    #[test]
    fn risk_table_has_header_and_one_row_per_hazard() {
        let raw = RawJobForm {
            hazards: Some("Wet floor | Staff | Mop and sign\nLoose cable".to_string()),
            ..RawJobForm::default()
        };
        let doc = build(&raw, Variant::Standard);
        let risk = tables(&doc)[1];

        assert_eq!(risk.width(), 500.0);
        let texts: Vec<Vec<&str>> = risk
            .rows
            .iter()
            .map(|row| row.cells.iter().map(|c| c.text.as_str()).collect())
            .collect();
        assert_eq!(
            texts,
            vec![
                RISK_HEADER.to_vec(),
                vec!["Wet floor", "Staff", "Mop and sign"],
                vec![
                    "Loose cable",
                    "Workers/others",
                    "Review and add suitable controls for this site/task."
                ],
            ]
        );
        assert_eq!(risk.rows[0].kind, RowKind::Header);
    }

    #[test]
    fn sign_off_uses_placeholder_and_job_date() {
        let raw = RawJobForm {
            prepared_by: Some("J. Smith".to_string()),
            job_date: Some("2024-05-01".to_string()),
            ..RawJobForm::default()
        };
        let doc = build(&raw, Variant::Standard);
        let sign = *tables(&doc).last().unwrap();
        let values: Vec<&str> = sign.rows[1..]
            .iter()
            .map(|row| row.cells[1].text.as_str())
            .collect();
        assert_eq!(
            values,
            vec!["J. Smith", SIGNATURE_PLACEHOLDER, "2024-05-01", SIGNATURE_PLACEHOLDER]
        );
    }
}
