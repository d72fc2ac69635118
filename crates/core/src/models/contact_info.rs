//! The contact-info singleton shown on the contact page.

use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::types::ContactInfoId;

/// Opening hours, free text per day group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    #[serde(default)]
    pub weekdays: String,
    #[serde(default)]
    pub saturday: String,
    #[serde(default)]
    pub sunday: String,
}

/// Social profile URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub facebook: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub twitter: String,
}

impl SocialLinks {
    /// Non-blank links as `(label, url)` pairs.
    #[must_use]
    pub fn present(&self) -> Vec<(&'static str, &str)> {
        [
            ("Facebook", self.facebook.as_str()),
            ("Instagram", self.instagram.as_str()),
            ("Twitter", self.twitter.as_str()),
        ]
        .into_iter()
        .filter(|(_, url)| !url.trim().is_empty())
        .collect()
    }
}

/// The single `contact_info` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub id: ContactInfoId,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub map_lat: Option<f64>,
    #[serde(default)]
    pub map_lng: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub working_hours: WorkingHours,
    #[serde(default, deserialize_with = "null_as_default")]
    pub social_links: SocialLinks,
}

impl ContactInfo {
    /// Address, city and country joined with commas, skipping blanks.
    #[must_use]
    pub fn full_address(&self) -> String {
        [&self.address, &self.city, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref().map(str::trim))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Map embed URL when both coordinates are set.
    #[must_use]
    pub fn map_embed_url(&self) -> Option<String> {
        match (self.map_lat, self.map_lng) {
            (Some(lat), Some(lng)) => Some(format!(
                "https://maps.google.com/maps?q={lat},{lng}&z=15&output=embed"
            )),
            _ => None,
        }
    }

    /// The editable fields of this row, for the admin form.
    #[must_use]
    pub fn to_update(&self) -> ContactInfoUpdate {
        ContactInfoUpdate {
            phone: self.phone.clone(),
            whatsapp: self.whatsapp.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            map_lat: self.map_lat,
            map_lng: self.map_lng,
            working_hours: self.working_hours.clone(),
            social_links: self.social_links.clone(),
        }
    }
}

/// Whole-row update payload. Every field is written, blanks as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactInfoUpdate {
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub map_lat: Option<f64>,
    pub map_lng: Option<f64>,
    pub working_hours: WorkingHours,
    pub social_links: SocialLinks,
}

/// Errors when parsing the contact form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactFormError {
    #[error("{field} must be a number")]
    InvalidCoordinate { field: &'static str },
    #[error("{field} is out of range")]
    CoordinateOutOfRange { field: &'static str },
}

/// Parse an optional coordinate input. Blank means unset.
///
/// # Errors
///
/// Returns an error when the input is not a finite number or lies outside
/// `-limit..=limit`.
pub fn parse_coordinate(
    field: &'static str,
    input: &str,
    limit: f64,
) -> Result<Option<f64>, ContactFormError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let value: f64 = input
        .parse()
        .map_err(|_| ContactFormError::InvalidCoordinate { field })?;
    if !value.is_finite() || value.abs() > limit {
        return Err(ContactFormError::CoordinateOutOfRange { field });
    }
    Ok(Some(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> ContactInfo {
        serde_json::from_value(serde_json::json!({
            "id": "0c6a3b0e-5a43-4c0f-9f7e-1e2d3c4b5a69",
            "phone": "+254 700 000 000",
            "whatsapp": "+254700000000",
            "email": "hello@furnitureco.com",
            "address": "Mombasa Road",
            "city": "Nairobi",
            "country": null,
            "map_lat": -1.3,
            "map_lng": 36.8,
            "working_hours": {"weekdays": "9-6", "saturday": "10-4", "sunday": "Closed"},
            "social_links": null
        }))
        .unwrap()
    }

    #[test]
    fn test_decode_null_social_links() {
        let info = sample();
        assert_eq!(info.social_links, SocialLinks::default());
        assert!(info.social_links.present().is_empty());
        assert_eq!(info.working_hours.sunday, "Closed");
    }

    #[test]
    fn test_full_address_skips_blanks() {
        assert_eq!(sample().full_address(), "Mombasa Road, Nairobi");
    }

    #[test]
    fn test_map_embed_requires_both_coordinates() {
        let mut info = sample();
        assert_eq!(
            info.map_embed_url().unwrap(),
            "https://maps.google.com/maps?q=-1.3,36.8&z=15&output=embed"
        );
        info.map_lng = None;
        assert!(info.map_embed_url().is_none());
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("Latitude", "  ", 90.0), Ok(None));
        assert_eq!(parse_coordinate("Latitude", "-1.29", 90.0), Ok(Some(-1.29)));
        assert_eq!(
            parse_coordinate("Latitude", "north", 90.0),
            Err(ContactFormError::InvalidCoordinate { field: "Latitude" })
        );
        assert_eq!(
            parse_coordinate("Latitude", "91", 90.0),
            Err(ContactFormError::CoordinateOutOfRange { field: "Latitude" })
        );
    }
}
