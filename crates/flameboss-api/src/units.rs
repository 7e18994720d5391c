// Unit conversions between the controller's raw integer encodings and
// display units.
//
// The controller reports temperatures in tenths of a degree Celsius and fan
// duty in hundredths of a percent. Rounding is half-to-even throughout.

/// Convert a raw temperature (tenths of °C) to whole °F.
///
/// Negative results are reported as `None`: the API uses large negative
/// sentinels for disconnected probes, so a sub-zero display value is never
/// a real reading.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn raw_to_fahrenheit(raw: i32) -> Option<i32> {
    let fahrenheit = (0.18 * f64::from(raw) + 32.0).round_ties_even();
    if fahrenheit < 0.0 {
        None
    } else {
        Some(fahrenheit as i32)
    }
}

/// Convert whole °F to the raw tenths-of-°C encoding used for writes.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn fahrenheit_to_raw(temp_f: i32) -> i32 {
    ((f64::from(temp_f) - 32.0) / 0.18).round_ties_even() as i32
}

/// Convert raw fan duty (percent × 100) to a whole percentage.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn raw_fan_to_percent(raw: i32) -> i32 {
    (f64::from(raw) / 100.0).round_ties_even() as i32
}
