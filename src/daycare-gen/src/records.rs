use bson::oid::ObjectId;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use enum_iterator::Sequence;
use fake::Dummy;
use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;

pub const MAX_ALLERGIES: usize = 3;
pub const MAX_CREDENTIALS: usize = 4;
pub const DETAILS_MAX_CHARS: usize = 50;
pub const NOTES_MAX_CHARS: usize = 100;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Sequence, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Allergy {
    Nuts,
    Dairy,
    Gluten,
    Soy,
    Eggs,
    Fish,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Sequence, Serialize, Deserialize,
)]
pub enum Credential {
    #[strum(serialize = "CPR")]
    #[serde(rename = "CPR")]
    Cpr,
    #[strum(serialize = "First Aid")]
    #[serde(rename = "First Aid")]
    FirstAid,
    #[strum(serialize = "ECE")]
    #[serde(rename = "ECE")]
    Ece,
    #[strum(serialize = "CDA")]
    #[serde(rename = "CDA")]
    Cda,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Sequence, Dummy, Serialize, Deserialize,
)]
pub enum Relationship {
    Parent,
    Grandparent,
    Guardian,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Sequence, Dummy, Serialize, Deserialize,
)]
pub enum Role {
    Teacher,
    Assistant,
    Director,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Sequence, Dummy, Serialize, Deserialize,
)]
pub enum EventType {
    Arrival,
    Nap,
    Meal,
    Activity,
    Departure,
    #[strum(serialize = "Diaper Change")]
    #[serde(rename = "Diaper Change")]
    DiaperChange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relationship: Relationship,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "date_as_bson_datetime")]
    pub date_of_birth: NaiveDate,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub enrollment_date: DateTime<Utc>,
    pub allergies: Vec<Allergy>,
    pub emergency_contact: EmergencyContact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "date_as_bson_datetime")]
    pub hire_date: NaiveDate,
    pub role: Role,
    pub credentials: Vec<Credential>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub child_id: ObjectId,
    pub staff_id: ObjectId,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    pub details: String,
    pub notes: String,
}

// the store has no date type, calendar dates go in as midnight UTC
mod date_as_bson_datetime {
    use chrono::NaiveDate;
    use chrono::NaiveTime;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serialize;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        let midnight = date.and_time(NaiveTime::MIN).and_utc();
        bson::DateTime::from_chrono(midnight).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let dt = bson::DateTime::deserialize(deserializer)?;
        Ok(dt.to_chrono().date_naive())
    }
}
