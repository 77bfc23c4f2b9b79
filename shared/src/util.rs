/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate an order ID of the form `ORD-{millis}-{suffix}`.
///
/// The millisecond timestamp keeps IDs roughly sortable by creation time;
/// the 6-character random suffix avoids collisions when two orders land in
/// the same millisecond.
pub fn generate_order_id() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("ORD-{}-{}", now_millis(), suffix)
}

/// Normalize a phone number to international format (254...).
///
/// Strips everything but digits, then either keeps an existing 254 prefix
/// or drops leading zeros and prepends 254.
pub fn to_intl_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.starts_with("254") {
        digits
    } else {
        format!("254{}", digits.trim_start_matches('0'))
    }
}

/// Format a shilling amount as `KSh 1,234` with thousands separators
pub fn format_kes(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("KSh {}{}", sign, grouped)
}
