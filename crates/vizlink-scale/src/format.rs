//! Number formatting for tooltips and axis ticks.

/// Format with thousands separators and at most three fraction digits,
/// the way an en-US locale prints numbers (`1234567.891 → "1,234,567.891"`).
pub fn format_grouped(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let rounded = (v.abs() * 1000.0).round() / 1000.0;
    let text = format!("{rounded:.3}");
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(text.len() + text.len() / 3 + 1);
    if v < 0.0 && rounded != 0.0 {
        out.push('-');
    }
    let digits = int_part.as_bytes();
    for (i, &d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(char::from(d));
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// Format with `precision` significant digits and an SI prefix
/// (`1500 → "1.5k"`, `2e6 → "2.0M"`, `500 → "500"`), as used for axis ticks.
pub fn format_si(v: f64, precision: usize) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let precision = precision.max(1);
    let (coefficient, exponent) = decimal_parts(v.abs(), precision);
    let prefix_exp = (exponent.div_euclid(3)).clamp(-8, 8);
    let i = exponent - prefix_exp * 3 + 1;
    let n = coefficient.len() as i32;

    let body = if i == n {
        coefficient
    } else if i > n {
        let mut s = coefficient;
        s.extend(std::iter::repeat('0').take((i - n) as usize));
        s
    } else if i > 0 {
        let (a, b) = coefficient.split_at(i as usize);
        format!("{a}.{b}")
    } else {
        let p = (precision as i32 + i - 1).max(0) as usize;
        let (digits, _) = decimal_parts(v.abs(), p.max(1));
        format!("0.{}{}", "0".repeat((-i) as usize), digits)
    };
    let sign = if v < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{body}{}", SI_PREFIXES[(prefix_exp + 8) as usize])
}

/// Significant digits (no decimal point) and decimal exponent of `v`
/// rounded to `precision` significant digits.
fn decimal_parts(v: f64, precision: usize) -> (String, i32) {
    let text = format!("{:.*e}", precision - 1, v);
    let (mantissa, exp) = text.split_once('e').unwrap_or((text.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    (digits, exp.parse().unwrap_or(0))
}
