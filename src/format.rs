//! Display strings for distances and durations.

use num::ToPrimitive;

/// Format meters: whole meters below one kilometer, otherwise kilometers to one decimal.
pub fn format_distance<T: ToPrimitive>(meters: T) -> String {
    let meters = meters.to_f64().unwrap_or(::std::f64::NAN);
    if meters < 1000.0 {
        format!("{} m", round_half_up(meters))
    } else {
        // Ties go up: 1250 m is "1.3 km".
        format!("{:.1} km", round_half_up(meters / 100.0) / 10.0)
    }
}

/// Format seconds as seconds, minutes, or hours plus minutes. The unit is picked after
/// rounding, so a value never shows as 60 of a smaller unit.
pub fn format_duration<T: ToPrimitive>(seconds: T) -> String {
    let seconds = seconds.to_f64().unwrap_or(::std::f64::NAN);
    let whole_seconds = round_half_up(seconds);
    if whole_seconds < 60.0 {
        return format!("{} seg", whole_seconds);
    }
    let whole_minutes = round_half_up(seconds / 60.0);
    if whole_minutes < 60.0 {
        return format!("{} min", whole_minutes);
    }
    let mut hours = (seconds / 3600.0).floor();
    let mut mins = round_half_up((seconds % 3600.0) / 60.0);
    if mins >= 60.0 {
        hours += 1.0;
        mins = 0.0;
    }
    format!("{} h {} min", hours, mins)
}

#[inline]
fn round_half_up(v: f64) -> f64 {
    // Adding 0.0 turns -0 into 0 so it never prints as "-0".
    (v + 0.5).floor() + 0.0
}

/// A quantity in base units (meters or seconds) together with its display string.
///
/// The text is always derived from the value it is stored with; the only way to build one is
/// through [`Measurement::distance`] or [`Measurement::duration`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    value: f64,
    text: String,
}

impl Measurement {
    pub fn distance<T: ToPrimitive>(meters: T) -> Measurement {
        let value = meters.to_f64().unwrap_or(::std::f64::NAN);
        Measurement {
            value: value,
            text: format_distance(value),
        }
    }

    pub fn duration<T: ToPrimitive>(seconds: T) -> Measurement {
        let value = seconds.to_f64().unwrap_or(::std::f64::NAN);
        Measurement {
            value: value,
            text: format_duration(value),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
