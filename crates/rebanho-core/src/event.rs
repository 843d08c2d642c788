use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Kind of a recorded occurrence. The serialized tokens are the legacy
/// Portuguese values already present in stored data and must stay verbatim
/// for compatibility with existing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "VACINA")]
    Vaccination,
    #[serde(rename = "PESAGEM")]
    Weighing,
    #[serde(rename = "CONSULTA")]
    Consultation,
    #[serde(rename = "MEDICACAO")]
    Medication,
    #[serde(rename = "REPRODUCAO")]
    Reproduction,
    #[serde(rename = "OCORRENCIA")]
    Occurrence,
    #[serde(rename = "NASCIMENTO")]
    Birth,
    #[serde(rename = "BAIXA")]
    WriteOff,
}

impl EventType {
    pub const ALL: [EventType; 8] = [
        EventType::Vaccination,
        EventType::Weighing,
        EventType::Consultation,
        EventType::Medication,
        EventType::Reproduction,
        EventType::Occurrence,
        EventType::Birth,
        EventType::WriteOff,
    ];

    /// The legacy wire token for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Vaccination => "VACINA",
            EventType::Weighing => "PESAGEM",
            EventType::Consultation => "CONSULTA",
            EventType::Medication => "MEDICACAO",
            EventType::Reproduction => "REPRODUCAO",
            EventType::Occurrence => "OCORRENCIA",
            EventType::Birth => "NASCIMENTO",
            EventType::WriteOff => "BAIXA",
        }
    }

    pub fn is_vaccination(&self) -> bool {
        matches!(self, EventType::Vaccination)
    }
}

impl FromStr for EventType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| ValidationError::InvalidType(s.to_string()))
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dated occurrence recorded against an animal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Absent until persisted; assigned by the store.
    pub id: Option<i64>,
    /// Owning animal. Immutable after creation.
    pub animal_id: String,
    pub event_type: EventType,
    /// Calendar date, canonical `YYYY-MM-DD` once serialized.
    pub event_date: NaiveDate,
    pub description: Option<String>,
}

impl EventRecord {
    pub fn new(
        animal_id: String,
        event_type: EventType,
        event_date: NaiveDate,
        description: Option<String>,
    ) -> Self {
        Self {
            id: None,
            animal_id,
            event_type,
            event_date,
            description,
        }
    }
}

/// Partial update for an event. `None` fields are left unchanged.
/// A blank `description` clears the stored text, matching the form
/// where a blank free-text field means "no note".
/// `animal_id` is deliberately absent: ownership never moves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    pub event_type: Option<EventType>,
    pub event_date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.event_type.is_none() && self.event_date.is_none() && self.description.is_none()
    }

    /// Apply this patch on top of an existing record.
    pub fn apply(&self, record: &EventRecord) -> EventRecord {
        let description = match self.description.as_deref().map(str::trim) {
            None => record.description.clone(),
            Some("") => None,
            Some(text) => Some(text.to_string()),
        };
        EventRecord {
            id: record.id,
            animal_id: record.animal_id.clone(),
            event_type: self.event_type.unwrap_or(record.event_type),
            event_date: self.event_date.unwrap_or(record.event_date),
            description,
        }
    }
}

/// Vaccine-specific side record created alongside a VACINA event.
///
/// `event_id` is the explicit link to the parent event. Legacy rows were
/// linked only by animal and application date, so it stays optional when
/// reading migrated data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationDetail {
    pub id: Option<i64>,
    pub event_id: Option<i64>,
    pub animal_id: String,
    pub vaccine_name: String,
    pub batch_number: Option<String>,
    pub application_date: NaiveDate,
    /// Whole days until expiry, clamped at zero. Absent when no expiry
    /// date was given; absence is not the same as zero.
    pub validity_days: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_tokens_round_trip() {
        for t in EventType::ALL {
            assert_eq!(t.as_str().parse::<EventType>().unwrap(), t);
        }
        assert_eq!("VACINA".parse::<EventType>().unwrap(), EventType::Vaccination);
        assert_eq!("BAIXA".parse::<EventType>().unwrap(), EventType::WriteOff);
    }

    #[test]
    fn unknown_token_is_invalid_type() {
        let err = "VACCINE".parse::<EventType>().unwrap_err();
        assert_eq!(err, ValidationError::InvalidType("VACCINE".to_string()));
    }

    #[test]
    fn event_type_serializes_as_wire_token() {
        let json = serde_json::to_string(&EventType::Reproduction).unwrap();
        assert_eq!(json, "\"REPRODUCAO\"");
    }

    #[test]
    fn patch_apply_keeps_unset_fields() {
        let record = EventRecord::new(
            "animal-1".to_string(),
            EventType::Weighing,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            Some("450kg".to_string()),
        );

        let patch = EventPatch {
            event_date: NaiveDate::from_ymd_opt(2024, 3, 2),
            ..Default::default()
        };
        let updated = patch.apply(&record);

        assert_eq!(updated.event_type, EventType::Weighing);
        assert_eq!(
            updated.event_date,
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
        assert_eq!(updated.description, Some("450kg".to_string()));
    }

    #[test]
    fn patch_apply_blank_description_clears_it() {
        let record = EventRecord::new(
            "animal-1".to_string(),
            EventType::Weighing,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            Some("450kg".to_string()),
        );

        let patch = EventPatch {
            description: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(patch.apply(&record).description, None);

        let patch = EventPatch {
            description: Some("  452kg  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            patch.apply(&record).description,
            Some("452kg".to_string())
        );
    }
}
