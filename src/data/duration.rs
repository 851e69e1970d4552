use std::time::Duration;

/// Divisors to step from one unit to the next (minutes onward).
const DIVISORS: [u64; 5] = [60, 24, 7, 52, 9_999_999];

/// Unit suffixes, seconds first.
const UNITS: [&str; 6] = ["s", "m", "h", "d", "w", "y"];

/// Format an age compactly using its two most significant units,
/// e.g. "5s", "2m5s", "1h1m", "3d4h".
pub fn format_ago(age: Duration) -> String {
    let secs = age.as_secs() + u64::from(age.subsec_millis() >= 500);

    let (mut low, mut high) = (secs % 60, secs / 60);
    let mut unit = 1;
    for div in DIVISORS {
        if high < div {
            break;
        }
        (low, high) = (high % div, high / div);
        unit += 1;
    }

    if high > 0 {
        format!("{}{}{}{}", high, UNITS[unit], low, UNITS[unit - 1])
    } else {
        format!("{}{}", low, UNITS[unit - 1])
    }
}
