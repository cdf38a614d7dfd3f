use crate::api::SearchError;
use crate::data::{Category, ResultBucket, ResultItem};
use serde::Deserialize;

/// Top-level search response.
///
/// The dashboard wraps results as `{ "success": true, "data": {...} }`, older
/// deployments return the buckets bare. Both are accepted.
#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<SearchPayload>,
    #[serde(flatten)]
    pub bare: SearchPayload,
}

impl SearchEnvelope {
    pub fn into_buckets(self) -> Result<Vec<ResultBucket>, SearchError> {
        if self.success == Some(false) {
            return Err(SearchError::Unavailable(
                self.message
                    .unwrap_or_else(|| "backend reported failure".to_string()),
            ));
        }
        Ok(self.data.unwrap_or(self.bare).into_buckets())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchPayload {
    #[serde(default)]
    pub patients: Vec<PatientHit>,
    #[serde(default)]
    pub appointments: Vec<AppointmentHit>,
}

impl SearchPayload {
    pub fn into_buckets(self) -> Vec<ResultBucket> {
        vec![
            ResultBucket::new(
                Category::Patient,
                self.patients.into_iter().map(PatientHit::into_item).collect(),
            ),
            ResultBucket::new(
                Category::Appointment,
                self.appointments
                    .into_iter()
                    .map(AppointmentHit::into_item)
                    .collect(),
            ),
        ]
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientHit {
    #[serde(default, alias = "_id")]
    pub id: String,
    pub display_name: Option<String>,
    pub display_info: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub constitution: Option<String>,
}

impl PatientHit {
    pub fn into_item(self) -> ResultItem {
        let display_name = self
            .display_name
            .or(self.name)
            .unwrap_or_else(|| "Unnamed patient".to_string());
        let display_info = self.display_info.unwrap_or_else(|| {
            join_present(&[
                self.email.as_deref(),
                self.phone.as_deref(),
                self.constitution.as_deref(),
            ])
        });
        ResultItem::new(self.id, display_name, display_info, Category::Patient)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentHit {
    #[serde(default, alias = "_id")]
    pub id: String,
    pub display_name: Option<String>,
    pub display_info: Option<String>,
    pub appointment_id: Option<String>,
    pub patient_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: Option<String>,
    pub consultation_type: Option<String>,
}

impl AppointmentHit {
    pub fn into_item(self) -> ResultItem {
        let display_name = self
            .display_name
            .or(self.patient_name)
            .or_else(|| self.appointment_id.clone())
            .unwrap_or_else(|| "Appointment".to_string());
        let display_info = self.display_info.unwrap_or_else(|| {
            let when = join_with(&[self.date.as_deref(), self.time.as_deref()], " ");
            let when = (!when.is_empty()).then_some(when);
            join_present(&[
                when.as_deref(),
                self.status.as_deref(),
                self.consultation_type.as_deref(),
            ])
        });
        ResultItem::new(self.id, display_name, display_info, Category::Appointment)
    }
}

fn join_present(parts: &[Option<&str>]) -> String {
    join_with(parts, " · ")
}

fn join_with(parts: &[Option<&str>], separator: &str) -> String {
    parts
        .iter()
        .flatten()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enveloped_response() {
        let json = r#"{
            "success": true,
            "data": {
                "patients": [
                    {"id": "p1", "name": "Anita Sharma", "email": "anita@example.com", "phone": "98200", "constitution": "Pitta"}
                ],
                "appointments": [
                    {"_id": "a1", "patientName": "Anita Sharma", "date": "3/14/2025", "time": "10:30", "status": "scheduled"}
                ]
            }
        }"#;
        let envelope: SearchEnvelope = serde_json::from_str(json).unwrap();
        let buckets = envelope.into_buckets().unwrap();

        assert_eq!(buckets[0].items[0].display_name, "Anita Sharma");
        assert_eq!(
            buckets[0].items[0].display_info,
            "anita@example.com · 98200 · Pitta"
        );
        assert_eq!(buckets[1].items[0].id, "a1");
        assert_eq!(buckets[1].items[0].display_info, "3/14/2025 10:30 · scheduled");
    }

    #[test]
    fn test_bare_response_with_display_fields() {
        let json = r#"{
            "patients": [{"_id": "p9", "displayName": "Ravi K", "displayInfo": "Vata"}]
        }"#;
        let envelope: SearchEnvelope = serde_json::from_str(json).unwrap();
        let buckets = envelope.into_buckets().unwrap();

        assert_eq!(buckets[0].items[0].id, "p9");
        assert_eq!(buckets[0].items[0].display_info, "Vata");
        assert!(buckets[1].is_empty());
    }

    #[test]
    fn test_unsuccessful_envelope() {
        let json = r#"{"success": false, "message": "Doctor ID is required"}"#;
        let envelope: SearchEnvelope = serde_json::from_str(json).unwrap();
        match envelope.into_buckets() {
            Err(SearchError::Unavailable(msg)) => assert_eq!(msg, "Doctor ID is required"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
