// SPDX-License-Identifier: MPL-2.0
//! Length conversion through meters as the common base unit.
//!
//! Every conversion goes `value * factor(from) / factor(to)`, so adding a
//! unit only means adding its factor to [`LengthUnit::meters_per_unit`].

use crate::config::MAX_FRACTION_DIGITS;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported length units, in selector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LengthUnit {
    Feet,
    Inches,
    Centimeters,
    Meters,
    Yards,
}

impl LengthUnit {
    /// All units in the order they appear in a selector.
    pub const ALL: [LengthUnit; 5] = [
        LengthUnit::Feet,
        LengthUnit::Inches,
        LengthUnit::Centimeters,
        LengthUnit::Meters,
        LengthUnit::Yards,
    ];

    /// How many meters one of this unit is.
    pub const fn meters_per_unit(self) -> f64 {
        match self {
            LengthUnit::Feet => 0.3048,
            LengthUnit::Inches => 0.0254,
            LengthUnit::Centimeters => 0.01,
            LengthUnit::Meters => 1.0,
            LengthUnit::Yards => 0.9144,
        }
    }

    /// Display name used in the result line.
    pub const fn display_name(self) -> &'static str {
        match self {
            LengthUnit::Feet => "Feet",
            LengthUnit::Inches => "Inches",
            LengthUnit::Centimeters => "Centimeters",
            LengthUnit::Meters => "Meters",
            LengthUnit::Yards => "Yards",
        }
    }

    /// Looks up a unit by its selector position.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for LengthUnit {
    type Err = Error;

    /// Accepts display names, common abbreviations and selector indices,
    /// case-insensitively.
    fn from_str(raw: &str) -> Result<Self> {
        let lowered = raw.trim().to_lowercase();
        let unit = match lowered.as_str() {
            "feet" | "foot" | "ft" => LengthUnit::Feet,
            "inches" | "inch" | "in" => LengthUnit::Inches,
            "centimeters" | "centimeter" | "cm" => LengthUnit::Centimeters,
            "meters" | "meter" | "m" => LengthUnit::Meters,
            "yards" | "yard" | "yd" => LengthUnit::Yards,
            other => other
                .parse::<usize>()
                .ok()
                .and_then(Self::from_index)
                .ok_or_else(|| Error::UnknownUnit(raw.to_string()))?,
        };
        Ok(unit)
    }
}

/// Converts `value` from one unit to another.
pub fn convert(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
    let meters = value * from.meters_per_unit();
    meters / to.meters_per_unit()
}

/// Parses user input into a finite number.
///
/// Surrounding whitespace is ignored. An empty field and text that is not a
/// finite decimal number are distinct errors so the caller can show the
/// matching prompt.
pub fn parse_value(input: &str) -> Result<f64> {
    if input.is_empty() {
        return Err(Error::EmptyInput);
    }
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::InvalidInput(input.to_string())),
    }
}

/// Formats a number with at most five fractional digits and no trailing
/// zeros (`3.048`, `36`, `0.33333`).
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// A completed conversion, ready to be shown as a result line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub value: f64,
    pub from: LengthUnit,
    pub to: LengthUnit,
    pub result: f64,
}

impl Conversion {
    pub fn new(value: f64, from: LengthUnit, to: LengthUnit) -> Self {
        Self {
            value,
            from,
            to,
            result: convert(value, from, to),
        }
    }

    /// The result as shown to the user.
    pub fn formatted_result(&self) -> String {
        format_value(self.result)
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} = {} {}",
            format_value(self.value),
            self.from,
            format_value(self.result),
            self.to
        )
    }
}

/// Parses raw input and converts it in one step.
pub fn convert_input(input: &str, from: LengthUnit, to: LengthUnit) -> Result<Conversion> {
    let value = parse_value(input)?;
    Ok(Conversion::new(value, from, to))
}
