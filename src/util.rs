//! Small utility helpers used across modules.

/// Integer ceiling division; `0 / n` is 0. A zero divisor yields 0.
pub fn ceil_div(total: u64, size: u64) -> u64 {
  if size == 0 { 0 } else { total.div_ceil(size) }
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}
