//! Request parameters, parsed explicitly from form fields.
//!
//! Every numeric field is parsed on its own and reported by name when it is
//! missing or malformed, before any covering work starts.

use std::collections::HashMap;

use crate::cell::MAX_LEVEL;
use crate::error::{CoverError, Result};
use crate::hex::MAX_RESOLUTION;

/// Form fields of a request, by name.
pub type FormFields = HashMap<String, String>;

/// Parameters of a hierarchical covering request.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverParams {
    pub geojson: String,
    pub max_level: u8,
    pub min_level: u8,
}

impl CoverParams {
    pub fn from_form(form: &FormFields) -> Result<Self> {
        Ok(Self {
            geojson: field(form, "geojson")?.to_string(),
            max_level: level(form, "max_level_geojson")?,
            min_level: level(form, "min_level_geojson")?,
        })
    }
}

/// Parameters of a hexagonal covering request.
#[derive(Debug, Clone, PartialEq)]
pub struct HexParams {
    pub geojson: String,
    pub resolution: u8,
}

impl HexParams {
    pub fn from_form(form: &FormFields) -> Result<Self> {
        let value = integer(form, "h3_resolution")?;
        if !(0..=MAX_RESOLUTION as i64).contains(&value) {
            return Err(CoverError::InvalidResolution(value));
        }
        Ok(Self {
            geojson: field(form, "geojson")?.to_string(),
            resolution: value as u8,
        })
    }
}

/// Parameters of an intersection request.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectParams {
    pub geojson: String,
    pub lat: f64,
    pub lng: f64,
    /// Circle radius in metres.
    pub radius: f64,
    pub max_level: u8,
    pub min_level: u8,
    pub max_level_circle: u8,
}

impl IntersectParams {
    pub fn from_form(form: &FormFields) -> Result<Self> {
        Ok(Self {
            geojson: field(form, "geojson")?.to_string(),
            lat: float(form, "lat")?,
            lng: float(form, "lng")?,
            radius: float(form, "radius")?,
            max_level: level(form, "max_level_geojson")?,
            min_level: level(form, "min_level_geojson")?,
            max_level_circle: level(form, "max_level_circle")?,
        })
    }
}

fn field<'a>(form: &'a FormFields, name: &str) -> Result<&'a str> {
    form.get(name)
        .map(String::as_str)
        .ok_or_else(|| CoverError::parameter(name, ""))
}

fn integer(form: &FormFields, name: &str) -> Result<i64> {
    let raw = field(form, name)?;
    raw.trim()
        .parse()
        .map_err(|_| CoverError::parameter(name, raw))
}

fn float(form: &FormFields, name: &str) -> Result<f64> {
    let raw = field(form, name)?;
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CoverError::parameter(name, raw)),
    }
}

fn level(form: &FormFields, name: &str) -> Result<u8> {
    let value = integer(form, name)?;
    if !(0..=MAX_LEVEL as i64).contains(&value) {
        return Err(CoverError::InvalidLevel(value));
    }
    Ok(value as u8)
}
