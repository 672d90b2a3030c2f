use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::features::Row;

/// A single ride to price. Field names on the wire match the columns the
/// pipeline was trained with.
///
/// Validation here is structural only: types and presence. Semantic checks
/// (e.g. negative rider counts) are left to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideRequest {
    #[serde(rename = "Number_of_Riders")]
    pub number_of_riders: i64,
    #[serde(rename = "Number_of_Drivers")]
    pub number_of_drivers: i64,
    #[serde(rename = "Location_Category")]
    pub location_category: String,
    #[serde(rename = "Customer_Loyalty_Status")]
    pub customer_loyalty_status: String,
    #[serde(rename = "Number_of_Past_Rides")]
    pub number_of_past_rides: i64,
    #[serde(rename = "Average_Ratings")]
    pub average_ratings: f64,
    #[serde(rename = "Time_of_Booking")]
    pub time_of_booking: String,
    #[serde(rename = "Vehicle_Type")]
    pub vehicle_type: String,
    #[serde(rename = "Expected_Ride_Duration")]
    pub expected_ride_duration: i64,
}

impl RideRequest {
    /// Flatten into the row shape the pipeline consumes.
    pub fn into_row(self) -> Row {
        let mut row = Row::new();
        row.insert("Number_of_Riders".into(), self.number_of_riders.into());
        row.insert("Number_of_Drivers".into(), self.number_of_drivers.into());
        row.insert(
            "Location_Category".into(),
            Value::String(self.location_category),
        );
        row.insert(
            "Customer_Loyalty_Status".into(),
            Value::String(self.customer_loyalty_status),
        );
        row.insert(
            "Number_of_Past_Rides".into(),
            self.number_of_past_rides.into(),
        );
        row.insert("Average_Ratings".into(), self.average_ratings.into());
        row.insert("Time_of_Booking".into(), Value::String(self.time_of_booking));
        row.insert("Vehicle_Type".into(), Value::String(self.vehicle_type));
        row.insert(
            "Expected_Ride_Duration".into(),
            self.expected_ride_duration.into(),
        );
        row
    }
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub predicted_price: f64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
}
