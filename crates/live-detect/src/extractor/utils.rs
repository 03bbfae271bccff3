use regex::Regex;

#[inline]
pub fn capture_group_1<'a>(re: &Regex, input: &'a str) -> Option<&'a str> {
    re.captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[inline]
pub fn capture_group_1_owned(re: &Regex, input: &str) -> Option<String> {
    capture_group_1(re, input).map(ToOwned::to_owned)
}

/// Largest char boundary at or below `index`.
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest char boundary at or above `index`.
pub fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Slice of `s` spanning `radius` bytes either side of `start..end`, clamped to char boundaries.
pub fn window(s: &str, start: usize, end: usize, radius: usize) -> &str {
    let lo = floor_char_boundary(s, start.saturating_sub(radius));
    let hi = ceil_char_boundary(s, end.saturating_add(radius));
    &s[lo..hi]
}

/// Decode the body of a JSON string literal (`\uXXXX`, `\"`, `\/`, ...).
///
/// Falls back to the raw input when the escapes are malformed.
pub fn decode_json_escapes(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_owned();
    }
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_owned())
}

/// Decode the handful of HTML entities that show up in meta attributes.
pub fn decode_html_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_owned();
    }
    raw.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_clamps_to_char_boundaries() {
        let s = "ééé\"isLive\":trueééé";
        let start = s.find("\"isLive\"").unwrap();
        let w = window(s, start, start + 8, 3);
        assert!(w.contains("\"isLive\""));
    }

    #[test]
    fn test_decode_json_escapes() {
        assert_eq!(decode_json_escapes(r"Caf\u00e9 \u0026 more"), "Café & more");
        assert_eq!(decode_json_escapes(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(decode_json_escapes("plain"), "plain");
        // malformed escape keeps the raw text
        assert_eq!(decode_json_escapes(r"bad \u12"), r"bad \u12");
    }

    #[test]
    fn test_decode_html_entities() {
        assert_eq!(decode_html_entities("Tom &amp; Jerry&#39;s"), "Tom & Jerry's");
    }
}
