//! In-memory search collaborator
//!
//! Serves a small clinic dataset with the same matching rules as the
//! dashboard backend, so the widget can be demoed and tested without a
//! server. Latency and failures can be injected.

use crate::api::{SearchClient, SearchError};
use crate::data::{Category, ResultBucket, ResultItem};
use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PatientRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub constitution: Option<String>,
}

impl PatientRecord {
    fn to_item(&self) -> ResultItem {
        let constitution = self.constitution.as_deref().unwrap_or("Not assessed");
        ResultItem::new(
            self.id.clone(),
            self.name.clone(),
            format!("{} · {} · {}", self.email, self.phone, constitution),
            Category::Patient,
        )
    }

    fn matches(&self, pattern: &Regex) -> bool {
        [&self.name, &self.email, &self.phone]
            .iter()
            .any(|field| pattern.is_match(field))
    }
}

#[derive(Debug, Clone)]
pub struct AppointmentRecord {
    pub id: String,
    pub appointment_id: String,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub date: String,
    pub time: String,
    pub status: String,
    pub consultation_type: String,
    pub symptoms: String,
}

impl AppointmentRecord {
    fn to_item(&self) -> ResultItem {
        ResultItem::new(
            self.id.clone(),
            self.patient_name.clone(),
            format!(
                "{} {} · {} · {}",
                self.date, self.time, self.status, self.consultation_type
            ),
            Category::Appointment,
        )
    }

    fn matches(&self, pattern: &Regex) -> bool {
        [
            &self.patient_name,
            &self.patient_email,
            &self.patient_phone,
            &self.appointment_id,
            &self.status,
            &self.consultation_type,
            &self.symptoms,
        ]
        .iter()
        .any(|field| pattern.is_match(field))
    }
}

pub struct MemorySearchClient {
    patients: Vec<PatientRecord>,
    appointments: Vec<AppointmentRecord>,
    min_query_len: usize,
    latency_ms: AtomicU64,
    failing: AtomicBool,
}

impl MemorySearchClient {
    pub fn new(patients: Vec<PatientRecord>, appointments: Vec<AppointmentRecord>) -> Self {
        Self {
            patients,
            appointments,
            min_query_len: 2,
            latency_ms: AtomicU64::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// A small clinic roster used by the demo binary
    pub fn demo() -> Self {
        Self::new(demo_patients(), demo_appointments())
    }

    pub fn with_latency(self, latency: Duration) -> Self {
        self.set_latency(latency);
        self
    }

    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Make every subsequent search fail, as an unreachable backend would
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Synchronous core of the search, shared with the async trait impl
    pub fn search_now(&self, query: &str, limit: usize) -> Vec<ResultBucket> {
        let query = query.trim();
        if query.chars().count() < self.min_query_len {
            return vec![
                ResultBucket::empty(Category::Patient),
                ResultBucket::empty(Category::Appointment),
            ];
        }

        let pattern = match RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => pattern,
            // An escaped literal always compiles; be lenient anyway
            Err(_) => return Vec::new(),
        };

        let mut patients: Vec<ResultItem> = self
            .patients
            .iter()
            .filter(|p| p.matches(&pattern))
            .map(PatientRecord::to_item)
            .collect();

        if looks_like_object_id(query) {
            for patient in self.patients.iter().filter(|p| p.id.eq_ignore_ascii_case(query)) {
                if !patients.iter().any(|existing| existing.id == patient.id) {
                    patients.push(patient.to_item());
                }
            }
        }
        patients.truncate(limit);

        let appointments: Vec<ResultItem> = self
            .appointments
            .iter()
            .filter(|a| a.matches(&pattern))
            .take(limit)
            .map(AppointmentRecord::to_item)
            .collect();

        vec![
            ResultBucket::new(Category::Patient, patients),
            ResultBucket::new(Category::Appointment, appointments),
        ]
    }
}

#[async_trait]
impl SearchClient for MemorySearchClient {
    async fn search(
        &self,
        query: &str,
        limit_per_category: usize,
    ) -> Result<Vec<ResultBucket>, SearchError> {
        let latency = self.latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.failing.load(Ordering::Relaxed) {
            return Err(SearchError::Unavailable(
                "in-memory backend switched off".to_string(),
            ));
        }

        let buckets = self.search_now(query, limit_per_category);
        debug!(
            target: "api",
            "memory search '{}' -> {} patients, {} appointments",
            query,
            buckets.first().map(ResultBucket::len).unwrap_or(0),
            buckets.get(1).map(ResultBucket::len).unwrap_or(0)
        );
        Ok(buckets)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// 24 hex digits, the shape of a database object id
fn looks_like_object_id(query: &str) -> bool {
    query.len() == 24 && query.chars().all(|c| c.is_ascii_hexdigit())
}

fn patient(id: &str, name: &str, email: &str, phone: &str, dosha: Option<&str>) -> PatientRecord {
    PatientRecord {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        constitution: dosha.map(str::to_string),
    }
}

#[allow(clippy::too_many_arguments)]
fn appointment(
    id: &str,
    appointment_id: &str,
    who: &PatientRecord,
    date: &str,
    time: &str,
    status: &str,
    consultation_type: &str,
    symptoms: &str,
) -> AppointmentRecord {
    AppointmentRecord {
        id: id.to_string(),
        appointment_id: appointment_id.to_string(),
        patient_name: who.name.clone(),
        patient_email: who.email.clone(),
        patient_phone: who.phone.clone(),
        date: date.to_string(),
        time: time.to_string(),
        status: status.to_string(),
        consultation_type: consultation_type.to_string(),
        symptoms: symptoms.to_string(),
    }
}

fn demo_patients() -> Vec<PatientRecord> {
    vec![
        patient("64f1a2b3c4d5e6f708192a3b", "Anita Sharma", "anita.sharma@example.com", "+91 98200 11223", Some("Pitta")),
        patient("64f1a2b3c4d5e6f708192a3c", "Arjun Patel", "arjun.patel@example.com", "+91 98200 44556", Some("Vata")),
        patient("64f1a2b3c4d5e6f708192a3d", "Meera Iyer", "meera.iyer@example.com", "+91 98450 77889", Some("Kapha")),
        patient("64f1a2b3c4d5e6f708192a3e", "Patrick Dsouza", "patrick.d@example.com", "+91 99670 12121", None),
        patient("64f1a2b3c4d5e6f708192a3f", "Kavya Nair", "kavya.nair@example.com", "+91 94470 33445", Some("Pitta")),
        patient("64f1a2b3c4d5e6f708192a40", "Rohan Mehta", "rohan.mehta@example.com", "+91 98190 55667", Some("Vata")),
        patient("64f1a2b3c4d5e6f708192a41", "Sanya Kapoor", "sanya.k@example.com", "+91 98110 99001", Some("Kapha")),
        patient("64f1a2b3c4d5e6f708192a42", "Vikram Rao", "vikram.rao@example.com", "+91 98860 24680", None),
    ]
}

fn demo_appointments() -> Vec<AppointmentRecord> {
    let patients = demo_patients();
    vec![
        appointment("65a0c1d2e3f4a5b6c7d8e901", "APT-1001", &patients[0], "2025-03-14", "10:30", "scheduled", "follow-up", "acidity, heat rash"),
        appointment("65a0c1d2e3f4a5b6c7d8e902", "APT-1002", &patients[1], "2025-03-14", "11:15", "completed", "initial", "insomnia, dry skin"),
        appointment("65a0c1d2e3f4a5b6c7d8e903", "APT-1003", &patients[3], "2025-03-15", "09:00", "scheduled", "general", "joint stiffness"),
        appointment("65a0c1d2e3f4a5b6c7d8e904", "APT-1004", &patients[2], "2025-03-15", "16:45", "cancelled", "diet review", "weight gain, lethargy"),
        appointment("65a0c1d2e3f4a5b6c7d8e905", "APT-1005", &patients[4], "2025-03-16", "12:00", "scheduled", "follow-up", "migraine"),
        appointment("65a0c1d2e3f4a5b6c7d8e906", "APT-1006", &patients[0], "2025-03-21", "10:30", "pending", "diet review", "acidity"),
    ]
}
