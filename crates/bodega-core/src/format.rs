// ── Display formatting ──
//
// Amounts, percentages, and dates the way the dashboard renders them:
// Colombian pesos without decimals, Spanish short dates.

use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

/// `1234567.4` → `$ 1.234.567`.
pub fn format_price(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}$ {grouped}")
}

/// One decimal, as the dashboard cards show shares.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Spanish short date, `d/m/yyyy`, in `tz`.
pub fn format_date<Tz>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.with_timezone(tz).format("%-d/%-m/%Y").to_string()
}

/// Spanish time of day, `H:MM:SS`, in `tz`.
pub fn format_time<Tz>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.with_timezone(tz).format("%-H:%M:%S").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::FixedOffset;

    use super::*;

    #[test]
    fn prices_group_thousands_with_dots() {
        assert_eq!(format_price(0.0), "$ 0");
        assert_eq!(format_price(999.0), "$ 999");
        assert_eq!(format_price(1000.0), "$ 1.000");
        assert_eq!(format_price(1_234_567.4), "$ 1.234.567");
        assert_eq!(format_price(-2500.0), "-$ 2.500");
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(66.666), "66.7%");
    }

    #[test]
    fn dates_follow_the_given_zone() {
        let at = Utc.with_ymd_and_hms(2026, 3, 5, 2, 4, 9).unwrap();
        assert_eq!(format_date(&at, &Utc), "5/3/2026");
        assert_eq!(format_time(&at, &Utc), "2:04:09");

        let bogota = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(format_date(&at, &bogota), "4/3/2026");
        assert_eq!(format_time(&at, &bogota), "21:04:09");
    }
}
