use chrono::NaiveDate;

use crate::profile::DocumentProfile;

const STYLE: &str = r#"    body { font-family: Arial, sans-serif; margin: 30px; max-width: 900px; }
    input, textarea { width: 100%; padding: 10px; margin: 6px 0 16px; }
    input[type=checkbox] { width: auto; }
    label { font-weight: bold; }
    button { padding: 12px 16px; font-weight: bold; cursor: pointer; }
    .row { display:flex; gap:12px; }
    .col { flex:1; }
    .hint { font-size: 0.95em; color:#444; }
    .gate { border: 1px solid #ccc; padding: 12px; margin-bottom: 16px; }
    code { background:#f2f2f2; padding:2px 6px; }
"#;

/// HTML form for `profile`. Fields the profile does not render are left out.
pub fn render_form_page(profile: &DocumentProfile, today: NaiveDate) -> String {
    let sections = &profile.sections;
    let mut html = String::new();

    html.push_str(&format!(
        r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>RAMS Generator</title>
  <style>
{STYLE}  </style>
</head>
<body>
  <h1>{heading}</h1>
  <p class="hint">
    Tip: For hazards use format <code>Hazard | Who might be harmed | Controls</code> (one per line).
  </p>

  <form method="post" action="/generate">
"#,
        heading = html_escape(&profile.form_heading),
    ));

    html.push_str(
        r#"    <label>Company</label>
    <input name="company" placeholder="e.g., Costa Coffee Ltd" required>

    <label>Job title</label>
    <input name="job_title" placeholder="e.g., Replace lighting in office" required>

"#,
    );

    html.push_str(&format!(
        r#"    <div class="row">
      <div class="col">
        <label>Location</label>
        <input name="location" placeholder="e.g., Milton Keynes" required>
      </div>
      <div class="col">
        <label>Date</label>
        <input name="job_date" value="{today}">
      </div>
      <div class="col">
        <label>Workers</label>
        <input name="workers" placeholder="e.g., 2">
      </div>
    </div>

"#,
        today = today.format("%Y-%m-%d"),
    ));

    html.push_str(
        r#"    <div class="row">
      <div class="col">
        <label>Supervisor / Responsible person</label>
        <input name="supervisor" placeholder="e.g., J. Smith">
      </div>
"#,
    );
    if sections.site_contact {
        html.push_str(
            r#"      <div class="col">
        <label>Client / Site contact (optional)</label>
        <input name="site_contact" placeholder="e.g., Site manager name">
      </div>
"#,
        );
    }
    html.push_str("    </div>\n\n");

    if sections.scope {
        html.push_str(
            r#"    <label>Scope / Description</label>
    <textarea name="description" rows="4" placeholder="Describe the work clearly..."></textarea>

"#,
        );
    }
    if sections.ppe {
        html.push_str(
            r#"    <label>PPE required</label>
    <input name="ppe" placeholder="e.g., Safety boots, gloves, eye protection, hi-vis">

"#,
        );
    }
    if sections.equipment {
        html.push_str(
            r#"    <label>Tools / Equipment / Materials</label>
    <textarea name="equipment" rows="3" placeholder="e.g., Step ladder, cordless drill, cable ties..."></textarea>

"#,
        );
    }

    html.push_str(
        r#"    <label>Method steps (one per line)</label>
    <textarea name="method_steps" rows="6" placeholder="Arrive and sign in...&#10;Set up work area..."></textarea>

    <label>Hazards (one per line: Hazard | Who | Controls)</label>
    <textarea name="hazards" rows="6" placeholder="Slips/trips | Workers/public | Keep area tidy; signage&#10;Manual handling | Workers | Use trolleys; team lift"></textarea>

"#,
    );

    if sections.emergency {
        html.push_str(
            r#"    <label>Emergency arrangements (site specific if known)</label>
    <textarea name="emergency" rows="3" placeholder="Assembly point: ... First aid: ... Nearest A&amp;E: ..."></textarea>

"#,
        );
    }

    html.push_str(
        r#"    <div class="row">
      <div class="col">
        <label>Prepared by (name)</label>
        <input name="prepared_by" placeholder="Your name / company rep">
      </div>
    </div>

"#,
    );

    if let Some(gate) = &profile.payment_gate {
        let link = match &gate.link {
            Some(link) => format!(
                r#"<a href="{href}" target="_blank" rel="noopener">Pay {price}</a>"#,
                href = html_escape(link),
                price = html_escape(&gate.price_label),
            ),
            None => format!("Price: {}", html_escape(&gate.price_label)),
        };
        html.push_str(&format!(
            r#"    <div class="gate">
      <p>{link}</p>
      <label><input type="checkbox" name="paid" value="yes" required> I have paid for this document</label>
    </div>

"#
        ));
    }

    html.push_str(
        r#"    <button type="submit">Generate RAMS PDF</button>
  </form>
</body>
</html>
"#,
    );
    html
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{PaymentGate, Variant};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn standard_form_marks_core_fields_required_and_prefills_date() {
        let html = render_form_page(&DocumentProfile::for_variant(Variant::Standard), today());
        for field in ["company", "job_title", "location"] {
            assert!(html.contains(&format!(r#"name="{field}" "#)));
        }
        assert_eq!(html.matches(" required>").count(), 3);
        assert!(html.contains(r#"value="2024-03-15""#));
        assert!(html.contains(r#"name="site_contact""#));
        assert!(!html.contains(r#"name="paid""#));
    }

    #[test]
    fn basic_form_omits_disabled_fields() {
        let html = render_form_page(&DocumentProfile::for_variant(Variant::Basic), today());
        assert!(!html.contains(r#"name="equipment""#));
        assert!(!html.contains(r#"name="site_contact""#));
        assert!(html.contains("RAMS Generator (Free)"));
    }

    #[test]
    fn gated_form_shows_escaped_payment_link() {
        let mut profile = DocumentProfile::for_variant(Variant::Pro);
        profile.payment_gate = Some(PaymentGate {
            price_label: "\u{a3}5".to_string(),
            link: Some("https://pay.invalid/?a=1&b=2".to_string()),
        });
        let html = render_form_page(&profile, today());
        assert!(html.contains(r#"href="https://pay.invalid/?a=1&amp;b=2""#));
        assert!(html.contains(r#"name="paid""#));
    }
}
