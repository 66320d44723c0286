//! Number formatting helpers shared by the renderers.

//-----------------------------------------------------------------------------

/// Formats a number with at most `precision` significant digits, like `%g` in C.
///
/// Trailing zeros are removed.
/// Scientific notation is used when the decimal exponent is below -4 or at least `precision`.
///
/// # Examples
///
/// ```
/// use mglook::format::format_significant;
///
/// assert_eq!(format_significant(0.05 * 5.0_f64.sqrt(), 4), "0.1118");
/// assert_eq!(format_significant(0.2, 4), "0.2");
/// assert_eq!(format_significant(12346.0, 4), "1.235e+04");
/// ```
pub fn format_significant(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if value == 0.0 {
        return String::from("0");
    }
    if !value.is_finite() {
        return value.to_string();
    }

    // The exponent must come from the rounded value.
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        let fixed = format!("{:.*}", decimals, value);
        trim_fraction(&fixed).to_string()
    }
}

// Removes trailing zeros after the decimal point, and the point itself if nothing remains.
fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

//-----------------------------------------------------------------------------

/// Returns the display character for a repeat count: the digit itself, or `*` for counts of 10 or more.
pub fn repeat_count_char(repeat_count: usize) -> char {
    if repeat_count < 10 {
        char::from(b'0' + repeat_count as u8)
    } else {
        '*'
    }
}

/// Renders repeat counts as a string of digits, with `*` for counts of 10 or more.
pub fn repeat_count_string<I>(repeat_counts: I) -> String
where
    I: IntoIterator,
    I::Item: Into<usize>,
{
    repeat_counts.into_iter().map(|count| repeat_count_char(count.into())).collect()
}

/// Run-length decodes `(character, count)` pairs into a string without separators.
pub fn expand_runs<I>(runs: I) -> String
where
    I: IntoIterator<Item = (char, usize)>,
{
    let mut result = String::new();
    for (c, count) in runs {
        result.extend(std::iter::repeat(c).take(count));
    }
    result
}

//-----------------------------------------------------------------------------
