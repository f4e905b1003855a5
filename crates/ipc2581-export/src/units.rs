use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal places kept for every length written to the document
pub const DECIMALS: u32 = 6;

const SCALE: f64 = 1_000_000.0;

/// Output units of an IPC-2581 document
///
/// All geometry is held in meters while the document is assembled and is
/// converted to one of these units only when it is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Millimeter,
    #[serde(alias = "micron", alias = "um")]
    Micrometer,
    #[serde(alias = "mil")]
    Mils,
    Inch,
    Centimeter,
}

impl Units {
    pub const ALL: [Units; 5] = [
        Units::Millimeter,
        Units::Micrometer,
        Units::Mils,
        Units::Inch,
        Units::Centimeter,
    ];

    /// Keyword used for the `units` attribute
    pub fn keyword(self) -> &'static str {
        match self {
            Units::Millimeter => "MILLIMETER",
            Units::Micrometer => "MICRON",
            Units::Mils => "MILS",
            Units::Inch => "INCH",
            Units::Centimeter => "CENTIMETER",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Units::Millimeter => "millimeter",
            Units::Micrometer => "micrometer",
            Units::Mils => "mils",
            Units::Inch => "inch",
            Units::Centimeter => "centimeter",
        })
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mm" | "millimeter" => Ok(Units::Millimeter),
            "um" | "micron" | "micrometer" => Ok(Units::Micrometer),
            "mil" | "mils" => Ok(Units::Mils),
            "in" | "inch" => Ok(Units::Inch),
            "cm" | "centimeter" => Ok(Units::Centimeter),
            _ => Err(format!("Unknown units: {}", s)),
        }
    }
}

/// Convert a value in meters to the given output units
pub fn from_meters(value: f64, to_units: Units) -> f64 {
    match to_units {
        Units::Millimeter => value * 1e3,
        Units::Micrometer => value * 1e6,
        Units::Mils => value / 25.4e-6,
        Units::Inch => value / 0.0254,
        Units::Centimeter => value * 1e2,
    }
}

/// Convert a value in the given units back to meters
///
/// Inverse of [`from_meters`].
pub fn to_meters(value: f64, from_units: Units) -> f64 {
    match from_units {
        Units::Millimeter => value / 1e3,
        Units::Micrometer => value / 1e6,
        Units::Mils => value * 25.4e-6,
        Units::Inch => value * 0.0254,
        Units::Centimeter => value / 1e2,
    }
}

/// Round a value to the document precision as an integer count of 1e-6 steps
pub fn quantize(value: f64) -> i64 {
    (value * SCALE).round() as i64
}

/// Format a quantized value as a plain decimal string
///
/// Never produces scientific notation or a negative zero, and drops
/// trailing zeros after the decimal point.
pub fn format_quantized(q: i64) -> String {
    let sign = if q < 0 { "-" } else { "" };
    let abs = q.unsigned_abs();
    let scale = 10u64.pow(DECIMALS);
    let int = abs / scale;
    let frac = abs % scale;
    if frac == 0 {
        return format!("{sign}{int}");
    }
    let frac = format!("{:0width$}", frac, width = DECIMALS as usize);
    format!("{sign}{int}.{}", frac.trim_end_matches('0'))
}

/// Format a plain (already converted) number for an attribute value
pub fn format_number(value: f64) -> String {
    format_quantized(quantize(value))
}

/// Convert a length in meters and format it for the document
pub fn format_length(meters: f64, units: Units) -> String {
    format_number(from_meters(meters, units))
}

/// Wrap an angle in degrees into `[0, 360)` at document precision
///
/// Rounding happens before wrapping so a value just below a full turn
/// becomes 0 instead of printing as 360.
pub fn normalize_degrees(angle: f64) -> f64 {
    quantize_degrees(angle) as f64 / SCALE
}

/// Format an angle for an attribute value, always in `[0, 360)`
pub fn format_degrees(angle: f64) -> String {
    format_quantized(quantize_degrees(angle))
}

fn quantize_degrees(angle: f64) -> i64 {
    quantize(angle).rem_euclid(quantize(360.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_to_mm() {
        assert_eq!(from_meters(0.001, Units::Millimeter), 1.0);
        assert_eq!(to_meters(1.0, Units::Millimeter), 0.001);
    }

    #[test]
    fn test_meters_to_inch() {
        assert!((from_meters(0.0254, Units::Inch) - 1.0).abs() < 1e-12);
        assert!((from_meters(0.0254, Units::Mils) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_meters_to_micron_and_cm() {
        assert!((from_meters(1e-6, Units::Micrometer) - 1.0).abs() < 1e-12);
        assert!((from_meters(0.01, Units::Centimeter) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_roundtrip() {
        for original in [42.0, 1.5e-4, -0.0123, 0.0] {
            for units in Units::ALL {
                let converted = from_meters(original, units);
                let back = to_meters(converted, units);
                assert!(
                    (back - original).abs() <= 1e-12 * original.abs().max(1.0),
                    "Roundtrip failed for {:?}",
                    units
                );
            }
        }
    }

    #[test]
    fn test_format_plain_decimals() {
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(1e-7), "0");
        assert_eq!(format_number(-0.0000001), "0");
        assert_eq!(format_number(-1.25), "-1.25");
        assert_eq!(format_number(0.30000000000000004), "0.3");
        assert_eq!(format_number(123456.000001), "123456.000001");
    }

    #[test]
    fn test_format_length() {
        assert_eq!(format_length(0.0005, Units::Millimeter), "0.5");
        assert_eq!(format_length(0.0005, Units::Micrometer), "500");
        assert_eq!(format_length(0.000254, Units::Mils), "10");
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(359.99999999), 0.0);
        assert_eq!(normalize_degrees(-0.00000001), 0.0);
        assert_eq!(normalize_degrees(359.999999), 359.999999);
    }

    #[test]
    fn test_format_degrees_never_reaches_full_turn() {
        assert_eq!(format_degrees(359.99999999), "0");
        assert_eq!(format_degrees(-0.00000001), "0");
        assert_eq!(format_degrees(359.9999994), "359.999999");
        assert_eq!(format_degrees(-90.0), "270");
        assert_eq!(format_degrees(720.5), "0.5");
    }

    #[test]
    fn test_units_from_str() {
        assert_eq!("mm".parse::<Units>(), Ok(Units::Millimeter));
        assert_eq!("MILS".parse::<Units>(), Ok(Units::Mils));
        assert_eq!("micron".parse::<Units>(), Ok(Units::Micrometer));
        assert!("furlong".parse::<Units>().is_err());
    }
}
