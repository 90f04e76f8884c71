//! Cross-system vehicle matching.

use crate::maintenance_log::LogVehicle;

/// Map a Trip Source VIN to its Maintenance Log vehicle id.
///
/// Linear scan; the first vehicle whose tag collection contains the VIN as
/// an exact member wins. `None` means the vehicle is not tracked in the
/// Maintenance Log.
pub fn match_vehicle(vin: &str, log_vehicles: &[LogVehicle]) -> Option<i64> {
    log_vehicles
        .iter()
        .find(|vehicle| vehicle.tags.iter().any(|tag| tag == vin))
        .map(|vehicle| vehicle.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_vehicle(id: i64, tags: &[&str]) -> LogVehicle {
        LogVehicle {
            id,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn empty_list_matches_nothing() {
        assert_eq!(match_vehicle("VIN123", &[]), None);
    }

    #[test]
    fn matches_by_tag_membership() {
        let vehicles = [log_vehicle(1, &["VIN123"])];
        assert_eq!(match_vehicle("VIN123", &vehicles), Some(1));
        assert_eq!(match_vehicle("OTHER", &vehicles), None);
    }

    #[test]
    fn membership_is_exact_not_substring() {
        let vehicles = [log_vehicle(1, &["VIN12345"])];
        assert_eq!(match_vehicle("VIN123", &vehicles), None);
    }

    #[test]
    fn first_match_wins() {
        let vehicles = [
            log_vehicle(1, &["daily-driver"]),
            log_vehicle(2, &["VIN123", "truck"]),
            log_vehicle(3, &["VIN123"]),
        ];
        assert_eq!(match_vehicle("VIN123", &vehicles), Some(2));
    }
}
