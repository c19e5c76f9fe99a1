use serde::{Deserialize, Serialize};

/// Raw form submission. Every field is optional; blank and missing values are
/// treated the same by the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawJobForm {
    #[serde(deserialize_with = "scalar_text")]
    pub company: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub job_title: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub job_date: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub workers: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub supervisor: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub site_contact: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub ppe: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub equipment: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub method_steps: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub hazards: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub emergency: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub prepared_by: Option<String>,
    /// Client-side "payment confirmed" checkbox. Carried for completeness only.
    #[serde(deserialize_with = "scalar_text", skip_serializing_if = "Option::is_none")]
    pub paid: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

/// Accepts any scalar so that YAML such as `workers: 2` reads as text.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Integer(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardRow {
    pub hazard: String,
    pub who: String,
    pub controls: String,
}

impl HazardRow {
    pub fn new(hazard: impl Into<String>, who: impl Into<String>, controls: impl Into<String>) -> Self {
        Self {
            hazard: hazard.into(),
            who: who.into(),
            controls: controls.into(),
        }
    }

    pub fn columns(&self) -> [&str; 3] {
        [&self.hazard, &self.who, &self.controls]
    }
}

/// Fully-populated job record produced by [`crate::normalize::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub company: String,
    pub job_title: String,
    pub location: String,
    pub job_date: String,
    pub workers: String,
    pub supervisor: String,
    pub site_contact: String,
    pub description: String,
    pub ppe: String,
    pub equipment: String,
    pub emergency: String,
    pub prepared_by: String,
    pub method_steps: Vec<String>,
    pub hazards: Vec<HazardRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_yaml_values_read_as_text() {
        let form: RawJobForm =
            serde_yaml::from_str("workers: 2\njob_date: 2024-05-01\npaid: true\nppe: ~\n").unwrap();
        assert_eq!(form.workers.as_deref(), Some("2"));
        assert_eq!(form.job_date.as_deref(), Some("2024-05-01"));
        assert_eq!(form.paid.as_deref(), Some("true"));
        assert_eq!(form.ppe, None);
        assert_eq!(form.company, None);
    }
}
