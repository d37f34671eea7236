//! Difficulty estimation for prefix filters

/// Expected number of keys to generate before one matches.
///
/// Each filter constraining `b` bits accepts a random key with probability
/// `2^-b`; overlap between filters is ignored, so the estimate is slightly
/// optimistic for sets that were not deduplicated.
pub fn expected_attempts(bit_lengths: impl IntoIterator<Item = u32>) -> f64 {
    let hit_rate: f64 = bit_lengths
        .into_iter()
        .map(|bits| 0.5f64.powi(bits as i32))
        .sum();
    if hit_rate > 0.0 {
        1.0 / hit_rate
    } else {
        f64::INFINITY
    }
}

/// Format difficulty as human-readable string
pub fn format_difficulty(difficulty: f64) -> String {
    if !difficulty.is_finite() {
        "never".to_string()
    } else if difficulty >= 1e15 {
        format!("{:.2}P", difficulty / 1e15)
    } else if difficulty >= 1e12 {
        format!("{:.2}T", difficulty / 1e12)
    } else if difficulty >= 1e9 {
        format!("{:.2}G", difficulty / 1e9)
    } else if difficulty >= 1e6 {
        format!("{:.2}M", difficulty / 1e6)
    } else if difficulty >= 1e3 {
        format!("{:.2}K", difficulty / 1e3)
    } else {
        format!("{:.0}", difficulty)
    }
}

/// Estimate time to 50% probability of finding a match
pub fn estimate_time_50pct(difficulty: f64, keys_per_second: f64) -> f64 {
    // For large difficulty, ln(0.5) / ln(1 - 1/difficulty) approaches difficulty * ln(2)
    (difficulty * std::f64::consts::LN_2) / keys_per_second
}

/// Format duration in human-readable format
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() {
        "forever".to_string()
    } else if seconds < 1.0 {
        format!("{:.0}ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        format!("{:.1}s", seconds)
    } else if seconds < 3600.0 {
        format!("{:.1}m", seconds / 60.0)
    } else if seconds < 86400.0 {
        format!("{:.1}h", seconds / 3600.0)
    } else if seconds < 86400.0 * 365.0 {
        format!("{:.1}d", seconds / 86400.0)
    } else {
        format!("{:.1}y", seconds / (86400.0 * 365.0))
    }
}
