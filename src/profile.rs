use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::formats::HazardRow;

pub const MISSING: &str = "N/A";

pub const HAZARD_WHO_FALLBACK: &str = "Workers/others";

pub const HAZARD_CONTROLS_FALLBACK: &str = "Review and add suitable controls for this site/task.";

pub const DEFAULT_PPE: &str = "Safety boots, gloves, eye protection (edit as required).";

pub const DEFAULT_EMERGENCY: &str = "Follow site/client emergency plan. Call 999 in an emergency. \
Identify assembly point and first aid arrangements.";

pub const DISCLAIMER: &str = "Disclaimer: This RAMS document is generated for guidance only and does \
not constitute legal advice. The contractor/company is responsible for reviewing, amending, and \
ensuring the RAMS is suitable for the specific job, site rules, client requirements, and UK \
legislation before use.";

pub const UK_COMPLIANCE_NOTES: &str = "Typical UK context (review for your job): Health & Safety at \
Work etc. Act 1974, Management of Health and Safety at Work Regulations 1999, Personal Protective \
Equipment at Work Regulations 2022, COSHH 2002 (if chemicals), Work at Height Regulations 2005 \
(if applicable).";

pub const SIGNATURE_PLACEHOLDER: &str = "______________________________";

pub const DEFAULT_TITLE: &str = "RAMS \u{2013} Risk Assessment & Method Statement";

pub const DEFAULT_METHOD_STEPS: [&str; 6] = [
    "Arrive on site, sign in, review site rules, emergency arrangements, and permits (if required).",
    "Complete a site-specific check: access/egress, work area condition, nearby hazards and public interface.",
    "Set up work area: barriers/signage if needed; keep walkways clear; maintain good housekeeping.",
    "Inspect tools/equipment before use; do not use damaged equipment; follow manufacturer instructions.",
    "Carry out the work as described, communicate with others on site, and manage waste safely.",
    "Leave area clean, remove barriers when safe, sign out, and report any incidents/near misses.",
];

pub const DEFAULT_HAZARDS: [(&str, &str, &str); 5] = [
    (
        "Slips/trips/falls",
        "Workers / others",
        "Good housekeeping; clear walkways; suitable footwear; signage if needed.",
    ),
    (
        "Manual handling",
        "Workers",
        "Use safe lifting technique; team lift; use trolleys; avoid overloading.",
    ),
    (
        "Tools/equipment",
        "Workers",
        "Pre-use checks; correct tool for job; PPE; trained/competent users.",
    ),
    (
        "Electric shock (if applicable)",
        "Workers / others",
        "Isolate where required; competent person; test equipment; keep area dry.",
    ),
    (
        "Working at height (if applicable)",
        "Workers / others",
        "Suitable access equipment; secure footing; do not overreach; exclusion zone below.",
    ),
];

pub const PAYMENT_LINK_ENV: &str = "RAMS_PAYMENT_LINK";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Free tier: trimmed field set, three canned hazards.
    Basic,
    #[default]
    Standard,
    /// Standard content behind a (display-only) payment gate.
    Pro,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Pro => "pro",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionToggles {
    pub scope: bool,
    pub ppe: bool,
    pub equipment: bool,
    pub emergency: bool,
    /// "Client / Site contact" row in the job details table and form.
    pub site_contact: bool,
    /// "Reviewed by (client/site)" row in the sign-off table.
    pub reviewed_by: bool,
}

impl Default for SectionToggles {
    fn default() -> Self {
        Self {
            scope: true,
            ppe: true,
            equipment: true,
            emergency: true,
            site_contact: true,
            reviewed_by: true,
        }
    }
}

/// Canned values substituted for blank input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDefaults {
    pub missing: String,
    pub description: String,
    pub ppe: String,
    pub equipment: String,
    pub emergency: String,
    pub method_steps: Vec<String>,
    pub hazards: Vec<HazardRow>,
    pub hazard_who: String,
    pub hazard_controls: String,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            missing: MISSING.to_string(),
            description: MISSING.to_string(),
            ppe: DEFAULT_PPE.to_string(),
            equipment: MISSING.to_string(),
            emergency: DEFAULT_EMERGENCY.to_string(),
            method_steps: DEFAULT_METHOD_STEPS.iter().map(|s| s.to_string()).collect(),
            hazards: DEFAULT_HAZARDS
                .iter()
                .map(|(hazard, who, controls)| HazardRow::new(*hazard, *who, *controls))
                .collect(),
            hazard_who: HAZARD_WHO_FALLBACK.to_string(),
            hazard_controls: HAZARD_CONTROLS_FALLBACK.to_string(),
        }
    }
}

impl FieldDefaults {
    /// Blank steps and hazards are replaced by these lists, so they must not be empty.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.method_steps.iter().all(|step| step.trim().is_empty()) {
            anyhow::bail!("defaults.method_steps must list at least one step");
        }
        if self.hazards.is_empty() {
            anyhow::bail!("defaults.hazards must list at least one hazard");
        }
        Ok(())
    }
}

/// Display-only payment prompt. Nothing on the server checks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentGate {
    pub price_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentProfile {
    pub variant: Variant,
    pub title: String,
    pub form_heading: String,
    pub sections: SectionToggles,
    pub defaults: FieldDefaults,
    pub compliance_notes: String,
    pub disclaimer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_gate: Option<PaymentGate>,
    /// Reject submissions with blank company/job title/location at the HTTP boundary.
    pub require_core_fields: bool,
}

impl Default for DocumentProfile {
    fn default() -> Self {
        Self::for_variant(Variant::Standard)
    }
}

impl DocumentProfile {
    pub fn for_variant(variant: Variant) -> Self {
        let standard = Self {
            variant,
            title: DEFAULT_TITLE.to_string(),
            form_heading: "RAMS Generator (Business-ready MVP)".to_string(),
            sections: SectionToggles::default(),
            defaults: FieldDefaults::default(),
            compliance_notes: UK_COMPLIANCE_NOTES.to_string(),
            disclaimer: DISCLAIMER.to_string(),
            payment_gate: None,
            require_core_fields: false,
        };

        match variant {
            Variant::Standard => standard,
            Variant::Basic => {
                let mut defaults = standard.defaults;
                defaults.hazards.truncate(3);
                Self {
                    form_heading: "RAMS Generator (Free)".to_string(),
                    sections: SectionToggles {
                        equipment: false,
                        site_contact: false,
                        reviewed_by: false,
                        ..SectionToggles::default()
                    },
                    defaults,
                    ..standard
                }
            }
            Variant::Pro => Self {
                form_heading: "RAMS Generator (Pro)".to_string(),
                payment_gate: Some(PaymentGate {
                    price_label: "\u{a3}4.99 per document".to_string(),
                    link: None,
                }),
                ..standard
            },
        }
    }

    /// Loads a YAML profile. Keys absent from the file keep the values of `base`.
    pub fn load(path: &Path, base: &DocumentProfile) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("read profile: {}", path.display()))?;
        Self::from_yaml_over(&yaml, base)
            .with_context(|| format!("parse profile: {}", path.display()))
    }

    pub fn from_yaml_over(yaml: &str, base: &DocumentProfile) -> anyhow::Result<Self> {
        let overlay: serde_yaml::Value = serde_yaml::from_str(yaml).context("parse profile yaml")?;
        let mut merged = serde_yaml::to_value(base).context("serialize base profile")?;
        merge_yaml(&mut merged, overlay);
        let profile: Self = serde_yaml::from_value(merged).context("deserialize profile")?;
        profile.defaults.validate()?;
        Ok(profile)
    }

    /// Applies `RAMS_PAYMENT_LINK` to gated profiles.
    pub fn apply_env(&mut self) {
        let link = std::env::var(PAYMENT_LINK_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        if let (Some(gate), Some(link)) = (self.payment_gate.as_mut(), link) {
            gate.link = Some(link);
        }
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_yaml::to_string(self).context("serialize profile yaml")
    }
}

fn merge_yaml(base: &mut serde_yaml::Value, overlay: serde_yaml::Value) {
    match (base, overlay) {
        (serde_yaml::Value::Mapping(base), serde_yaml::Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_yaml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, serde_yaml::Value::Null) if !base.is_null() => {}
        (base, overlay) => *base = overlay,
    }
}
