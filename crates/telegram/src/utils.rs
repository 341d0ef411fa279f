//! Utility functions for formatting and parsing

/// Format file size in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let bytes = bytes as f64;
    let unit_index = (bytes.ln() / 1024_f64.ln()).floor() as usize;
    let unit_index = unit_index.min(UNITS.len() - 1);

    let size = bytes / 1024_f64.powi(unit_index as i32);
    format!("{:.2} {}", size, UNITS[unit_index])
}

/// Group digits with commas, e.g. `1,234,567`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format seconds as `HH:MM:SS`
pub fn format_duration(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Parse command arguments from message text
pub fn parse_args(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Split into at most `n` whitespace separated arguments; the last one keeps
/// the rest of the text
pub fn split_args(text: &str, n: usize) -> Vec<&str> {
    let mut args = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        if args.len() + 1 == n {
            args.push(rest);
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                args.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                args.push(rest);
                break;
            }
        }
    }

    args
}

/// Escape special characters for MarkdownV2
///
/// Escapes: _*[]()~`>#+-=|{}.!
pub fn escape_markdown_v2(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '=' | '|' | '{' | '}' | '.' | '!' => {
                format!("\\{}", c)
            }
            _ => c.to_string(),
        })
        .collect()
}

/// Make `name` safe to use as a single path component
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let cleaned = cleaned.trim().trim_matches('.').trim();
    if cleaned.is_empty() {
        crate::constants::FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Last non-empty path segment of a URL
pub fn file_name_from_url(url: &url::Url) -> Option<String> {
    url.path_segments()?
        .rev()
        .find(|segment| !segment.is_empty())
        .map(|segment| sanitize_file_name(segment))
}
