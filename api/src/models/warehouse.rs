use super::WarehouseId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::validation::{self, FormErrors};
use validator::Validate;

/// Warehouse operating status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarehouseStatus {
    /// Operating
    #[default]
    Active,
    /// Closed
    Inactive,
    /// Temporarily unavailable
    Maintenance,
}

wire_enum!(WarehouseStatus, "warehouse status", {
    Active => "ACTIVE",
    Inactive => "INACTIVE",
    Maintenance => "MAINTENANCE",
});

/// A warehouse as the backend returns it.
///
/// Capacity figures are informational; the client never enforces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    /// Server-assigned id
    pub id: WarehouseId,
    /// Display name
    pub name: String,
    /// Street address
    #[serde(default)]
    pub address: String,
    /// City
    pub city: Option<String>,
    /// District
    pub district: Option<String>,
    /// Latitude
    pub latitude: Option<f64>,
    /// Longitude
    pub longitude: Option<f64>,
    /// Total capacity in units
    #[serde(default)]
    pub capacity: u32,
    /// Units currently stored
    #[serde(default)]
    pub current_usage: u32,
    /// Units still free
    pub available_capacity: Option<u32>,
    /// Usage as a percentage of capacity
    pub usage_percentage: Option<f64>,
    /// Operating status
    #[serde(default)]
    pub status: WarehouseStatus,
    /// Contact phone
    pub phone_number: Option<String>,
    /// Manager display name
    pub manager_name: Option<String>,
    /// Free-form description
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: Option<NaiveDateTime>,
}

impl Warehouse {
    /// The writable fields of this warehouse, as an edit form starts out.
    #[must_use]
    pub fn draft(&self) -> WarehouseDraft {
        WarehouseDraft {
            name: self.name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            district: self.district.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            capacity: self.capacity,
            phone_number: self.phone_number.clone(),
            manager_name: self.manager_name.clone(),
            description: self.description.clone(),
            status: self.status,
        }
    }

    /// Usage percentage, derived from capacity when the backend omits it.
    #[must_use]
    pub fn usage(&self) -> f64 {
        self.usage_percentage.unwrap_or_else(|| {
            if self.capacity == 0 {
                0.0
            } else {
                f64::from(self.current_usage) * 100.0 / f64::from(self.capacity)
            }
        })
    }
}

/// Writable warehouse fields submitted on create and update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseDraft {
    /// Display name
    #[validate(length(min = 1, message = "Warehouse name is required"))]
    pub name: String,
    /// Street address
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    /// City
    pub city: Option<String>,
    /// District
    pub district: Option<String>,
    /// Latitude
    pub latitude: Option<f64>,
    /// Longitude
    pub longitude: Option<f64>,
    /// Total capacity in units
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: u32,
    /// Contact phone
    pub phone_number: Option<String>,
    /// Manager display name
    pub manager_name: Option<String>,
    /// Free-form description
    pub description: Option<String>,
    /// Operating status
    pub status: WarehouseStatus,
}

impl WarehouseDraft {
    /// Run the form checks, including coordinate presence and ranges.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrors`] listing every rejected field.
    pub fn check(&self) -> Result<(), FormErrors> {
        validation::check_with(self, |errors| {
            let coordinates = [
                (
                    "latitude",
                    self.latitude,
                    90.0,
                    "Latitude is required",
                    "Latitude must be between -90 and 90",
                ),
                (
                    "longitude",
                    self.longitude,
                    180.0,
                    "Longitude is required",
                    "Longitude must be between -180 and 180",
                ),
            ];
            for (field, value, bound, missing, out_of_range) in coordinates {
                match value {
                    None => errors.add(field, missing),
                    Some(v) if !(-bound..=bound).contains(&v) => errors.add(field, out_of_range),
                    Some(_) => {},
                }
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_draft() -> WarehouseDraft {
        WarehouseDraft {
            name: "North Hub".to_string(),
            address: "12 Le Loi".to_string(),
            latitude: Some(21.03),
            longitude: Some(105.85),
            capacity: 5000,
            ..WarehouseDraft::default()
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(valid_draft().check().is_ok());
    }

    #[test]
    fn rejects_missing_coordinates_and_zero_capacity() {
        let draft = WarehouseDraft {
            latitude: None,
            capacity: 0,
            ..valid_draft()
        };
        let errors = draft.check().unwrap_err();

        assert_eq!(errors.message_for("latitude"), Some("Latitude is required"));
        assert_eq!(errors.message_for("capacity"), Some("Capacity must be at least 1"));
        assert_eq!(errors.message_for("longitude"), None);
    }

    #[test]
    fn blank_form_reports_each_required_field() {
        let errors = WarehouseDraft::default().check().unwrap_err();
        let fields: Vec<_> = errors.fields.iter().map(|f| f.field.as_str()).collect();

        assert_eq!(fields, ["address", "capacity", "latitude", "longitude", "name"]);
        assert_eq!(errors.message_for("longitude"), Some("Longitude is required"));
        assert_eq!(errors.message_for("name"), Some("Warehouse name is required"));
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        let draft = WarehouseDraft {
            longitude: Some(200.0),
            ..valid_draft()
        };
        let errors = draft.check().unwrap_err();
        assert_eq!(
            errors.message_for("longitude"),
            Some("Longitude must be between -180 and 180")
        );
    }

    #[test]
    fn usage_falls_back_to_capacity_ratio() {
        let warehouse: Warehouse = serde_json::from_str(
            r#"{"id":1,"name":"A","address":"x","capacity":200,"currentUsage":50,"status":"MAINTENANCE"}"#,
        )
        .unwrap();

        assert_eq!(warehouse.status, WarehouseStatus::Maintenance);
        assert!((warehouse.usage() - 25.0).abs() < f64::EPSILON);
        assert_eq!(warehouse.draft().capacity, 200);
    }
}
