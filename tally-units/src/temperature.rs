//! Affine temperature conversions between Celsius, Fahrenheit and Kelvin

use std::fmt;
use std::str::FromStr;

const KELVIN_OFFSET: f64 = 273.15;

/// The closed set of temperature scales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureScale {
    pub fn name(&self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "Celsius",
            TemperatureScale::Fahrenheit => "Fahrenheit",
            TemperatureScale::Kelvin => "Kelvin",
        }
    }
}

impl fmt::Display for TemperatureScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemperatureScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "°C" | "C" => return Ok(TemperatureScale::Celsius),
            "°F" | "F" => return Ok(TemperatureScale::Fahrenheit),
            "K" => return Ok(TemperatureScale::Kelvin),
            _ => {}
        }
        match s.trim().to_lowercase().as_str() {
            "celsius" | "centigrade" => Ok(TemperatureScale::Celsius),
            "fahrenheit" => Ok(TemperatureScale::Fahrenheit),
            "kelvin" => Ok(TemperatureScale::Kelvin),
            _ => Err(format!("unknown temperature scale '{}'", s)),
        }
    }
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

pub fn celsius_to_kelvin(c: f64) -> f64 {
    c + KELVIN_OFFSET
}

pub fn kelvin_to_celsius(k: f64) -> f64 {
    k - KELVIN_OFFSET
}

pub fn fahrenheit_to_kelvin(f: f64) -> f64 {
    celsius_to_kelvin(fahrenheit_to_celsius(f))
}

pub fn kelvin_to_fahrenheit(k: f64) -> f64 {
    celsius_to_fahrenheit(kelvin_to_celsius(k))
}

/// Convert between two scales. Identical scales return the input untouched.
pub fn convert_temperature(value: f64, from: TemperatureScale, to: TemperatureScale) -> f64 {
    use TemperatureScale::*;
    match (from, to) {
        (Celsius, Fahrenheit) => celsius_to_fahrenheit(value),
        (Fahrenheit, Celsius) => fahrenheit_to_celsius(value),
        (Celsius, Kelvin) => celsius_to_kelvin(value),
        (Kelvin, Celsius) => kelvin_to_celsius(value),
        (Fahrenheit, Kelvin) => fahrenheit_to_kelvin(value),
        (Kelvin, Fahrenheit) => kelvin_to_fahrenheit(value),
        _ => value,
    }
}
