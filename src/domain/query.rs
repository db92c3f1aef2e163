//! Hotel attributes entered by the operator.
//!
//! The form layer mutates a [`QueryDraft`] field by field; [`QueryDraft::finalize`]
//! is the only way to obtain a [`QueryModel`], so a partially valid query never
//! reaches the orchestrator.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_HOUR: u8 = 23;
const DEFAULT_CHECK_IN_HOUR: u8 = 12;
const DEFAULT_CHECK_OUT_HOUR: u8 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Standard,
    Deluxe,
    Suite,
}

impl RoomType {
    pub const ALL: [RoomType; 3] = [RoomType::Standard, RoomType::Deluxe, RoomType::Suite];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Standard => "Standard",
            RoomType::Deluxe => "Deluxe",
            RoomType::Suite => "Suite",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        RoomType::ALL
            .into_iter()
            .find(|room| room.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                ValidationError::new(QueryField::RoomType, format!("unknown room type '{value}'"))
            })
    }
}

/// Fixed amenity vocabulary offered by the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Amenity {
    Wifi,
    Pool,
    Ac,
    Tv,
    Parking,
    Breakfast,
}

impl Amenity {
    pub const ALL: [Amenity; 6] = [
        Amenity::Wifi,
        Amenity::Pool,
        Amenity::Ac,
        Amenity::Tv,
        Amenity::Parking,
        Amenity::Breakfast,
    ];

    /// Wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Amenity::Wifi => "wifi",
            Amenity::Pool => "pool",
            Amenity::Ac => "ac",
            Amenity::Tv => "tv",
            Amenity::Parking => "parking",
            Amenity::Breakfast => "breakfast",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Amenity::Wifi => "Wi-Fi",
            Amenity::Pool => "Pool",
            Amenity::Ac => "AC",
            Amenity::Tv => "TV",
            Amenity::Parking => "Parking",
            Amenity::Breakfast => "Breakfast",
        }
    }
}

impl FromStr for Amenity {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Amenity::ALL
            .into_iter()
            .find(|amenity| amenity.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                ValidationError::new(QueryField::Amenities, format!("unknown amenity '{value}'"))
            })
    }
}

/// Names of the editable fields, as the form refers to them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryField {
    HotelName,
    Location,
    RoomType,
    CheckInHour,
    CheckOutHour,
    DistanceFromCityCenter,
    Amenities,
}

impl QueryField {
    pub fn name(&self) -> &'static str {
        match self {
            QueryField::HotelName => "hotelName",
            QueryField::Location => "location",
            QueryField::RoomType => "roomType",
            QueryField::CheckInHour => "checkInHour",
            QueryField::CheckOutHour => "checkOutHour",
            QueryField::DistanceFromCityCenter => "distanceFromCityCenter",
            QueryField::Amenities => "amenities",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        [
            QueryField::HotelName,
            QueryField::Location,
            QueryField::RoomType,
            QueryField::CheckInHour,
            QueryField::CheckOutHour,
            QueryField::DistanceFromCityCenter,
            QueryField::Amenities,
        ]
        .into_iter()
        .find(|field| field.name() == name)
    }
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field}: {message}")]
    Field { field: QueryField, message: String },
    #[error("unknown field '{0}'")]
    UnknownField(String),
}

impl ValidationError {
    pub fn new(field: QueryField, message: impl Into<String>) -> Self {
        Self::Field {
            field,
            message: message.into(),
        }
    }

    /// The offending field, when the error names one.
    pub fn field(&self) -> Option<QueryField> {
        match self {
            ValidationError::Field { field, .. } => Some(*field),
            ValidationError::UnknownField(_) => None,
        }
    }
}

/// A single typed edit applied to a [`QueryDraft`].
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    HotelName(String),
    Location(String),
    RoomType(Option<RoomType>),
    CheckInHour(i64),
    CheckOutHour(i64),
    DistanceFromCityCenter(f64),
    AddAmenity(Amenity),
    RemoveAmenity(Amenity),
}

/// Mutable form state. Clamping happens on write so the draft always holds
/// in-range hours and distance.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryDraft {
    hotel_name: String,
    location: String,
    room_type: Option<RoomType>,
    check_in_hour: u8,
    check_out_hour: u8,
    distance_from_city_center: f64,
    amenities: Vec<Amenity>,
}

impl Default for QueryDraft {
    fn default() -> Self {
        Self {
            hotel_name: String::new(),
            location: String::new(),
            room_type: None,
            check_in_hour: DEFAULT_CHECK_IN_HOUR,
            check_out_hour: DEFAULT_CHECK_OUT_HOUR,
            distance_from_city_center: 0.0,
            amenities: Vec::new(),
        }
    }
}

impl QueryDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, value: FieldValue) {
        match value {
            FieldValue::HotelName(name) => self.hotel_name = name,
            FieldValue::Location(location) => self.location = location,
            FieldValue::RoomType(room_type) => self.room_type = room_type,
            FieldValue::CheckInHour(hour) => self.check_in_hour = clamp_hour(hour),
            FieldValue::CheckOutHour(hour) => self.check_out_hour = clamp_hour(hour),
            FieldValue::DistanceFromCityCenter(distance) => {
                self.distance_from_city_center = clamp_distance(distance)
            }
            FieldValue::AddAmenity(amenity) => {
                if !self.amenities.contains(&amenity) {
                    self.amenities.push(amenity);
                }
            }
            FieldValue::RemoveAmenity(amenity) => self.amenities.retain(|a| *a != amenity),
        }
    }

    /// Applies a raw string value as produced by a form input.
    ///
    /// `amenities` accepts a comma-separated list and replaces the current
    /// selection; every other field maps onto one [`FieldValue`].
    pub fn set_raw(&mut self, name: &str, raw: &str) -> Result<(), ValidationError> {
        let field = QueryField::from_name(name)
            .ok_or_else(|| ValidationError::UnknownField(name.to_string()))?;

        let value = match field {
            QueryField::HotelName => FieldValue::HotelName(raw.to_string()),
            QueryField::Location => FieldValue::Location(raw.to_string()),
            QueryField::RoomType => {
                if raw.trim().is_empty() {
                    FieldValue::RoomType(None)
                } else {
                    FieldValue::RoomType(Some(raw.parse()?))
                }
            }
            QueryField::CheckInHour => FieldValue::CheckInHour(parse_hour(field, raw)?),
            QueryField::CheckOutHour => FieldValue::CheckOutHour(parse_hour(field, raw)?),
            QueryField::DistanceFromCityCenter => {
                let distance = raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|distance| distance.is_finite())
                    .ok_or_else(|| ValidationError::new(field, "distance must be a number"))?;
                FieldValue::DistanceFromCityCenter(distance)
            }
            QueryField::Amenities => {
                let parsed = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(Amenity::from_str)
                    .collect::<Result<Vec<_>, _>>()?;
                self.amenities.clear();
                for amenity in parsed {
                    self.set_field(FieldValue::AddAmenity(amenity));
                }
                return Ok(());
            }
        };

        self.set_field(value);
        Ok(())
    }

    pub fn toggle_amenity(&mut self, amenity: Amenity) {
        if self.has_amenity(amenity) {
            self.set_field(FieldValue::RemoveAmenity(amenity));
        } else {
            self.set_field(FieldValue::AddAmenity(amenity));
        }
    }

    pub fn has_amenity(&self, amenity: Amenity) -> bool {
        self.amenities.contains(&amenity)
    }

    pub fn hotel_name(&self) -> &str {
        &self.hotel_name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn room_type(&self) -> Option<RoomType> {
        self.room_type
    }

    pub fn check_in_hour(&self) -> u8 {
        self.check_in_hour
    }

    pub fn check_out_hour(&self) -> u8 {
        self.check_out_hour
    }

    pub fn distance_from_city_center(&self) -> f64 {
        self.distance_from_city_center
    }

    pub fn amenities(&self) -> &[Amenity] {
        &self.amenities
    }

    pub fn finalize(&self) -> Result<QueryModel, ValidationError> {
        let location = self.location.trim();
        if location.is_empty() {
            return Err(ValidationError::new(QueryField::Location, "location is required"));
        }
        let room_type = self
            .room_type
            .ok_or_else(|| ValidationError::new(QueryField::RoomType, "room type is required"))?;

        Ok(QueryModel {
            hotel_name: self.hotel_name.trim().to_string(),
            location: location.to_string(),
            room_type,
            check_in_hour: self.check_in_hour,
            check_out_hour: self.check_out_hour,
            distance_from_city_center: self.distance_from_city_center,
            amenities: self.amenities.clone(),
        })
    }
}

/// Re-opens a submitted query for editing, e.g. after a failed attempt.
impl From<&QueryModel> for QueryDraft {
    fn from(query: &QueryModel) -> Self {
        Self {
            hotel_name: query.hotel_name.clone(),
            location: query.location.clone(),
            room_type: Some(query.room_type),
            check_in_hour: query.check_in_hour,
            check_out_hour: query.check_out_hour,
            distance_from_city_center: query.distance_from_city_center,
            amenities: query.amenities.clone(),
        }
    }
}

/// Validated, immutable query handed by value to the orchestrator.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryModel {
    hotel_name: String,
    location: String,
    room_type: RoomType,
    check_in_hour: u8,
    check_out_hour: u8,
    distance_from_city_center: f64,
    amenities: Vec<Amenity>,
}

impl QueryModel {
    pub fn hotel_name(&self) -> &str {
        &self.hotel_name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn room_type(&self) -> RoomType {
        self.room_type
    }

    pub fn check_in_hour(&self) -> u8 {
        self.check_in_hour
    }

    pub fn check_out_hour(&self) -> u8 {
        self.check_out_hour
    }

    pub fn distance_from_city_center(&self) -> f64 {
        self.distance_from_city_center
    }

    /// Amenities in the order they were picked.
    pub fn amenities(&self) -> &[Amenity] {
        &self.amenities
    }

    pub fn summary(&self) -> QuerySummary {
        let amenities = if self.amenities.is_empty() {
            "None".to_string()
        } else {
            self.amenities
                .iter()
                .map(Amenity::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        QuerySummary {
            location: self.location.clone(),
            room_type: self.room_type.to_string(),
            check_in: hour_label(self.check_in_hour),
            check_out: hour_label(self.check_out_hour),
            amenities,
        }
    }
}

/// Display strings for the dashboard's hotel summary card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuerySummary {
    pub location: String,
    pub room_type: String,
    pub check_in: String,
    pub check_out: String,
    pub amenities: String,
}

pub fn hour_label(hour: u8) -> String {
    format!("{hour}:00")
}

fn clamp_hour(hour: i64) -> u8 {
    hour.clamp(0, MAX_HOUR as i64) as u8
}

fn clamp_distance(distance: f64) -> f64 {
    if distance.is_nan() {
        0.0
    } else {
        distance.clamp(0.0, f64::MAX)
    }
}

fn parse_hour(field: QueryField, raw: &str) -> Result<i64, ValidationError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::new(field, "hour must be a whole number"))
}
