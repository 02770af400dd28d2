use crate::cpuprofile::CallFrame;

/// Format a microsecond duration for display.
pub fn format_time(us: f64) -> String {
    if us >= 1_000_000.0 {
        format!("{:.2}s", us / 1_000_000.0)
    } else if us >= 1_000.0 {
        format!("{:.1}ms", us / 1_000.0)
    } else {
        format!("{:.0}µs", us)
    }
}

/// `url:line:column`, or an empty string for frames without a script.
pub fn source_location(frame: &CallFrame) -> String {
    if frame.url.is_empty() {
        return String::new();
    }
    format!("{}:{}:{}", frame.url, frame.line_number, frame.column_number)
}
