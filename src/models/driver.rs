use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub vehicle_number: String,
    pub contact: String,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

/// Public driver details handed to patients; never carries the credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriverSummary {
    pub name: String,
    pub vehicle_number: String,
    pub contact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverProfile {
    pub id: Uuid,
    #[serde(flatten)]
    pub summary: DriverSummary,
}

impl Driver {
    pub fn summary(&self) -> DriverSummary {
        DriverSummary {
            name: self.name.clone(),
            vehicle_number: self.vehicle_number.clone(),
            contact: self.contact.clone(),
        }
    }

    pub fn profile(&self) -> DriverProfile {
        DriverProfile {
            id: self.id,
            summary: self.summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::Driver;

    #[test]
    fn credential_is_never_serialized() {
        let driver = Driver {
            id: Uuid::new_v4(),
            name: "John Raj".to_string(),
            vehicle_number: "TN 05 AB 1234".to_string(),
            contact: "+91 9876543210".to_string(),
            password_hash: Some("$2b$04$secret".to_string()),
            available: true,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&driver).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["vehicleNumber"], "TN 05 AB 1234");
        assert_eq!(json["available"], true);

        let profile = serde_json::to_value(driver.profile()).unwrap();
        assert_eq!(profile["id"], driver.id.to_string());
        assert_eq!(profile["name"], "John Raj");
        assert!(profile.get("passwordHash").is_none());
    }
}
