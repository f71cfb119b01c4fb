use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub year: i32,
    #[serde(skip)]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

/// Validated vehicle fields, used for both create and update.
#[derive(Debug, Clone)]
pub struct VehicleData {
    pub name: String,
    pub brand: String,
    pub year: i32,
}

/// Case-insensitive substring filters for the vehicle listing.
///
/// Filter text has no wildcards; `%` and `_` match themselves.
#[derive(Debug, Clone, Default)]
pub struct VehicleFilter {
    pub name: Option<String>,
    pub brand: Option<String>,
}

impl VehicleFilter {
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            match needle {
                Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
                None => true,
            }
        }
        contains(&vehicle.name, &self.name) && contains(&vehicle.brand, &self.brand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(name: &str, brand: &str) -> Vehicle {
        Vehicle {
            id: 1,
            name: name.to_string(),
            brand: brand.to_string(),
            year: 2020,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
            created_by: None,
            updated_by: None,
        }
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let filter = VehicleFilter {
            name: Some("CIV".into()),
            brand: Some("hon".into()),
        };
        assert!(filter.matches(&vehicle("Civic", "Honda")));
        assert!(!filter.matches(&vehicle("Corolla", "Toyota")));
    }

    #[test]
    fn test_filter_has_no_wildcards() {
        let filter = VehicleFilter {
            name: Some("%".into()),
            brand: None,
        };
        assert!(!filter.matches(&vehicle("Civic", "Honda")));
        assert!(filter.matches(&vehicle("100% Electric", "Honda")));

        let filter = VehicleFilter {
            name: Some("e_v".into()),
            brand: None,
        };
        assert!(!filter.matches(&vehicle("Leva", "Honda")));
        assert!(filter.matches(&vehicle("E_V One", "Honda")));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(VehicleFilter::default().matches(&vehicle("Uno", "Fiat")));
    }
}
