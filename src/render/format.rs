//! Number formatting for labels, tooltips and axis ticks.
//! Display only: nothing here feeds back into stored values.

/// Thousands-grouped with up to three fraction digits, e.g. `1,234,567.891`.
pub fn grouped(value: f64) -> String {
    if !value.is_finite() { return value.to_string() }

    let text = format!("{:.3}", value.abs());
    let (int, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac = frac.trim_end_matches('0');
    let negative = value < 0.0 && (!frac.is_empty() || int.bytes().any(|b| b != b'0'));

    let mut out = String::with_capacity(text.len() + int.len() / 3 + 1);
    if negative { out.push('-') }
    for (i, digit) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 { out.push(',') }
        out.push(digit);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Fixed number of fraction digits.
pub fn fixed(value: f64, digits: usize) -> String {
    format!("{value:.digits$}")
}

/// Compact axis tick: `1.5M`, `12.0K`, or the plain value below a thousand.
pub fn compact_tick(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        value.to_string()
    }
}
