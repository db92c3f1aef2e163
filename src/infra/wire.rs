//! Request bodies sent to the prediction service.

use serde::Serialize;

use crate::domain::{hour_label, Amenity, QueryModel};

/// `/estimate` body: the query's raw fields.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest<'a> {
    pub location: &'a str,
    pub room_type: &'static str,
    pub check_in: u8,
    pub check_out: u8,
    pub amenities: Vec<&'static str>,
}

impl<'a> From<&'a QueryModel> for EstimateRequest<'a> {
    fn from(query: &'a QueryModel) -> Self {
        Self {
            location: query.location(),
            room_type: query.room_type().as_str(),
            check_in: query.check_in_hour(),
            check_out: query.check_out_hour(),
            amenities: query.amenities().iter().map(Amenity::as_str).collect(),
        }
    }
}

/// `/predict-price` and `/predict-today` body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PredictionPayload<'a> {
    pub hotel_name: &'a str,
    pub distance_from_city_center: f64,
    /// Comma-joined amenity values.
    pub amenities: String,
    pub location: &'a str,
    pub type_of_room: &'static str,
    pub check_in_time: String,
    pub check_out_time: String,
}

impl<'a> From<&'a QueryModel> for PredictionPayload<'a> {
    fn from(query: &'a QueryModel) -> Self {
        Self {
            hotel_name: query.hotel_name(),
            distance_from_city_center: query.distance_from_city_center(),
            amenities: query
                .amenities()
                .iter()
                .map(Amenity::as_str)
                .collect::<Vec<_>>()
                .join(","),
            location: query.location(),
            type_of_room: query.room_type().as_str(),
            check_in_time: hour_label(query.check_in_hour()),
            check_out_time: hour_label(query.check_out_hour()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldValue, QueryDraft, RoomType};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn jaipur() -> QueryModel {
        let mut draft = QueryDraft::new();
        draft.set_field(FieldValue::Location("Jaipur".into()));
        draft.set_field(FieldValue::RoomType(Some(RoomType::Deluxe)));
        draft.set_field(FieldValue::CheckInHour(14));
        draft.set_field(FieldValue::CheckOutHour(11));
        draft.set_field(FieldValue::AddAmenity(Amenity::Wifi));
        draft.set_field(FieldValue::AddAmenity(Amenity::Pool));
        draft.set_field(FieldValue::DistanceFromCityCenter(2.5));
        draft.finalize().unwrap()
    }

    #[test]
    fn prediction_payload_maps_every_field() {
        let query = jaipur();
        let payload = serde_json::to_value(PredictionPayload::from(&query)).unwrap();
        assert_eq!(
            payload,
            json!({
                "location": "Jaipur",
                "type_of_room": "Deluxe",
                "check_in_time": "14:00",
                "check_out_time": "11:00",
                "amenities": "wifi,pool",
                "distance_from_city_center": 2.5,
                "hotel_name": ""
            })
        );
    }

    #[test]
    fn midnight_is_formatted_not_dropped() {
        let mut draft = QueryDraft::new();
        draft.set_field(FieldValue::Location("Pune".into()));
        draft.set_field(FieldValue::RoomType(Some(RoomType::Standard)));
        draft.set_field(FieldValue::CheckInHour(0));
        let query = draft.finalize().unwrap();
        let payload = PredictionPayload::from(&query);
        assert_eq!(payload.check_in_time, "0:00");
        assert_eq!(payload.amenities, "");
        assert_eq!(payload.distance_from_city_center, 0.0);
    }

    #[test]
    fn estimate_request_sends_raw_fields() {
        let query = jaipur();
        let body = serde_json::to_value(EstimateRequest::from(&query)).unwrap();
        assert_eq!(
            body,
            json!({
                "location": "Jaipur",
                "roomType": "Deluxe",
                "checkIn": 14,
                "checkOut": 11,
                "amenities": ["wifi", "pool"]
            })
        );
    }
}
