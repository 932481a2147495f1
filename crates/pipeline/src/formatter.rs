//! Paragraph layout for synthesized answers.
//!
//! Models tend to run labeled sections together (`...text**Concluzii**: ...`).
//! Every `**Label**:` marker is moved onto its own paragraph, separated from
//! the preceding text by exactly one blank line.

/// Insert a blank line before each `**Label**:` marker and drop leading blank
/// lines. Applying it twice gives the same result as applying it once.
pub fn format_answer(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 32);
    let mut rest = raw;

    while let Some(start) = rest.find("**") {
        match marker_len(&rest[start..]) {
            Some(len) => {
                out.push_str(&rest[..start]);
                let kept = out.trim_end_matches([' ', '\t', '\r', '\n']).len();
                out.truncate(kept);
                if !out.is_empty() {
                    out.push_str("\n\n");
                }
                out.push_str(&rest[start..start + len]);
                rest = &rest[start + len..];
            }
            None => {
                // Step over one `*` so `***Label**:` still finds its marker.
                out.push_str(&rest[..=start]);
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);

    strip_leading_blank_lines(&out).to_string()
}

/// Byte length of a `**Label**:` marker at the start of `s`, if there is one.
fn marker_len(s: &str) -> Option<usize> {
    let body = s.strip_prefix("**")?;
    let close = body.find("**")?;
    let label = &body[..close];
    if label.trim().is_empty() || label.contains(['*', '\n']) {
        return None;
    }
    body[close + 2..]
        .starts_with(':')
        .then_some(2 + close + 2 + 1)
}

fn strip_leading_blank_lines(text: &str) -> &str {
    let mut rest = text;
    while let Some(newline) = rest.find('\n') {
        if rest[..newline].trim().is_empty() {
            rest = &rest[newline + 1..];
        } else {
            break;
        }
    }
    rest
}
