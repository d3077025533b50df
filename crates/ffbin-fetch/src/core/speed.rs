use std::time::Duration;

const UNITS: [&str; 4] = ["B/s", "KB/s", "MB/s", "GB/s"];

/// Render bytes per second with binary prefixes and two decimals.
pub fn format_speed(bytes_per_second: f64) -> String {
    if !bytes_per_second.is_finite() || bytes_per_second <= 0.0 {
        return "0 B/s".to_string();
    }
    let exponent = (bytes_per_second.log(1024.0).floor() as i32).clamp(0, UNITS.len() as i32 - 1);
    let scaled = bytes_per_second / 1024f64.powi(exponent);
    format!("{scaled:.2} {}", UNITS[exponent as usize])
}

/// Bytes per second over `elapsed`, treating sub-microsecond spans as one microsecond.
pub fn throughput(bytes: u64, elapsed: Duration) -> f64 {
    bytes as f64 / elapsed.as_secs_f64().max(1e-6)
}
