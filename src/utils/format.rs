use chrono::{DateTime, Local, TimeZone};
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Keeps `start` leading and `end` trailing characters of long identifiers.
/// Identifiers not longer than `start + end` come back unchanged.
pub fn shorten_id(id: &str, start: usize, end: usize) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= start + end {
        return id.to_string();
    }
    let head: String = chars[..start].iter().collect();
    let tail: String = chars[chars.len() - end..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Shortens a hash to roughly `length` visible characters split evenly.
pub fn truncate_hash(hash: &str, length: usize) -> String {
    shorten_id(hash, length / 2, length / 2)
}

fn plural(n: u64, word: &str, suffix: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}{}", n, word, suffix)
    }
}

/// Human readable duration in four tiers: seconds, minutes, hours, days.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        return format!("{} segundos", seconds.round());
    }
    let (major, remainder, word, minor_word) = if seconds < 3_600.0 {
        ((seconds / 60.0).floor(), (seconds % 60.0).round(), "min", "seg")
    } else if seconds < 86_400.0 {
        ((seconds / 3_600.0).floor(), ((seconds % 3_600.0) / 60.0).round(), "hr", "min")
    } else {
        ((seconds / 86_400.0).floor(), ((seconds % 86_400.0) / 3_600.0).round(), "día", "hr")
    };
    let mut out = plural(major as u64, word, "s");
    if remainder > 0.0 {
        out.push_str(&format!(" {} {}", remainder as u64, minor_word));
    }
    out
}

/// Random alphanumeric string, used for synthetic transaction addresses.
pub fn random_address(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Groups digits with `.` the way the es-AR locale prints counts.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < u64::MAX as f64 {
        let sign = if amount < 0.0 { "-" } else { "" };
        format!("{}{}", sign, format_count(amount.abs() as u64))
    } else {
        format!("{:.2}", amount)
    }
}

pub fn format_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// Epoch seconds rendered in the server's local timezone.
pub fn format_timestamp(epoch_seconds: i64) -> String {
    match Local.timestamp_opt(epoch_seconds, 0).single() {
        Some(dt) => format_datetime(&dt),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorten_id_keeps_head_and_tail() {
        assert_eq!(shorten_id("abcdefghij1234567890", 6, 6), "abcdef...567890");
    }

    #[test]
    fn shorten_id_leaves_short_ids_alone() {
        assert_eq!(shorten_id("abcdef123456", 6, 6), "abcdef123456");
        assert_eq!(shorten_id("abc", 6, 6), "abc");
        assert_eq!(shorten_id("", 6, 6), "");
    }

    #[test]
    fn truncate_hash_splits_length() {
        assert_eq!(truncate_hash("0000abcdef0123456789ffff", 12), "0000ab...89ffff");
    }

    #[test]
    fn duration_tiers() {
        assert_eq!(format_duration(45.0), "45 segundos");
        assert_eq!(format_duration(125.0), "2 mins 5 seg");
        assert_eq!(format_duration(7_300.0), "2 hrs 2 min");
        assert_eq!(format_duration(90_000.0), "1 día 1 hr");
    }

    #[test]
    fn duration_drops_zero_remainders() {
        assert_eq!(format_duration(60.0), "1 min");
        assert_eq!(format_duration(7_200.0), "2 hrs");
        assert_eq!(format_duration(172_800.0), "2 días");
    }

    #[test]
    fn random_address_is_alphanumeric() {
        let address = random_address(10);
        assert_eq!(address.len(), 10);
        assert!(address.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn counts_are_grouped() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234), "1.234");
        assert_eq!(format_count(12_345_678), "12.345.678");
        assert_eq!(format_amount(25.0), "25");
        assert_eq!(format_amount(2.5), "2.50");
    }
}
