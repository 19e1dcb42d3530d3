//! Display formatting for phone numbers, verification codes and timers.

/// Strip everything but ASCII digits.
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// `01012345678` → `010 1234 5678`, tolerating partial input while typing.
pub fn format_phone(text: &str) -> String {
    let digits = digits_only(text);
    let mut groups = Vec::with_capacity(3);
    let (head, rest) = digits.split_at(digits.len().min(3));
    groups.push(head);
    let (mid, tail) = rest.split_at(rest.len().min(4));
    groups.push(mid);
    groups.push(&tail[..tail.len().min(4)]);
    groups
        .into_iter()
        .filter(|g| !g.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `01012345678` → `010-1234-5678`; other lengths are returned as digits.
pub fn hyphenate_phone(text: &str) -> String {
    let digits = digits_only(text);
    if digits.len() != 11 {
        return digits;
    }
    format!("{}-{}-{}", &digits[..3], &digits[3..7], &digits[7..])
}

/// `123456` → `1 2 3 4 5 6`.
pub fn format_auth_code(text: &str) -> String {
    let digits = digits_only(text);
    let mut out = String::with_capacity(digits.len() * 2);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Seconds as `m : ss` for the verification timer.
pub fn format_remaining(seconds: u32) -> String {
    format!("{} : {:02}", seconds / 60, seconds % 60)
}
