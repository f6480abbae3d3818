// ---------------------------------------------------------------------------
// Display text for metric values
// ---------------------------------------------------------------------------

/// Group digits in threes with `sep`: `group_digits(1234567, '.') == "1.234.567"`.
pub fn group_digits(value: u64, sep: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// Currency-styled text for a whole amount, Colombian-Spanish style
/// (`.` thousands, `,` decimals): `"AUD 3.292.679,00"`.
///
/// Display only; the dashboard shows rental totals, not money.
pub fn format_currency(value: u64, code: &str) -> String {
    format!("{code} {},00", group_digits(value, '.'))
}
