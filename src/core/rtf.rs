//! RTF adapter: property extraction and regenerating writer
//!
//! Structural validation and text extraction go through the rtf-parser
//! crate. Page geometry, font table, and info-group metadata live in
//! control words the crate does not expose, so those are scanned from the
//! raw content. Saving regenerates a minimal RTF document: the format has
//! no way to patch properties in place without rewriting the stream.

use regex_lite::Regex;

use super::document::DocumentProps;
use super::error::DocumentError;

/// Parse the editable properties out of an RTF byte buffer.
pub(crate) fn read_props(bytes: &[u8]) -> Result<DocumentProps, DocumentError> {
    // RTF is 7-bit ASCII by specification; tolerate stray high bytes
    let content = String::from_utf8_lossy(bytes).into_owned();

    if !content.trim_start().starts_with("{\\rtf") {
        return Err(DocumentError::Corrupt("missing RTF header".to_string()));
    }

    let parsed = rtf_parser::RtfDocument::try_from(content.as_str())
        .map_err(|e| DocumentError::Corrupt(format!("RTF parse failed: {e}")))?;

    // Prefer the raw-stream extraction for counts; fall back to the
    // parser's text if it comes up empty
    let paragraphs = extract_paragraphs(&content);
    let plain_text = if paragraphs.is_empty() {
        parsed
            .body
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        paragraphs.join("\n")
    };

    let mut props = DocumentProps::default();

    props.word_count = plain_text.split_whitespace().count();
    props.paragraph_count = if paragraphs.is_empty() {
        usize::from(!plain_text.trim().is_empty())
    } else {
        paragraphs.len()
    };
    props.table_count = count_control_word(&content, "trowd");

    if let Some(width) = scan_numeric(&content, r"\\paperw(\d+)") {
        props.page_width = width;
    }
    if let Some(height) = scan_numeric(&content, r"\\paperh(\d+)") {
        props.page_height = height;
    }
    if let Some(top) = scan_numeric(&content, r"\\margt(\d+)") {
        props.margins.top = top;
    }
    if let Some(bottom) = scan_numeric(&content, r"\\margb(\d+)") {
        props.margins.bottom = bottom;
    }
    if let Some(left) = scan_numeric(&content, r"\\margl(\d+)") {
        props.margins.left = left;
    }
    if let Some(right) = scan_numeric(&content, r"\\margr(\d+)") {
        props.margins.right = right;
    }

    // \fsN is already in half-points, like w:sz
    props.font_size_half_points =
        scan_numeric(&content, r"\\fs(\d+)").and_then(|v| u32::try_from(v).ok());
    props.line_spacing = scan_numeric(&content, r"\\sl(\d+)")
        .filter(|v| *v > 0)
        .map(|v| v as f32 / 240.0);

    let font_table = parse_font_table(&content);
    let default_font_id = scan_numeric(&content, r"\\deff(\d+)").unwrap_or(0);
    props.font_family = font_table
        .iter()
        .find(|(id, _)| *id == default_font_id)
        .or_else(|| font_table.first())
        .map(|(_, name)| name.clone());
    props.fonts_used = font_table.into_iter().map(|(_, name)| name).collect();

    props.title = scan_info_group(&content, "title");
    props.author = scan_info_group(&content, "author");

    Ok(props)
}

fn scan_numeric(content: &str, pattern: &str) -> Option<i32> {
    let re = Regex::new(pattern).unwrap();
    re.captures(content)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn count_control_word(content: &str, word: &str) -> usize {
    // \b keeps \par from matching \pard
    let re = Regex::new(&format!(r"\\{word}\b")).unwrap();
    re.find_iter(content).count()
}

fn scan_info_group(content: &str, property: &str) -> Option<String> {
    let re = Regex::new(&format!(r"\\{property}\s+([^\\{{}}]+)")).unwrap();
    re.captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extract (id, name) pairs from the `\fonttbl` group.
fn parse_font_table(content: &str) -> Vec<(i32, String)> {
    let Some(table) = brace_group(content, "\\fonttbl") else {
        return Vec::new();
    };

    let entry_re = Regex::new(r"\\f(\d+)(?:\\[a-z]+-?\d*)*\s*([^;{}\\]+);").unwrap();
    entry_re
        .captures_iter(&table)
        .filter_map(|c| {
            let id = c.get(1)?.as_str().parse().ok()?;
            let name = c.get(2)?.as_str().trim().to_string();
            (!name.is_empty()).then_some((id, name))
        })
        .collect()
}

/// Return the contents of the brace group starting at `marker`, tracking
/// nesting depth.
fn brace_group(content: &str, marker: &str) -> Option<String> {
    let start = content.find(marker)? + marker.len();
    let mut depth = 0i32;
    let mut out = String::new();
    for ch in content[start..].chars() {
        match ch {
            '{' => depth += 1,
            '}' => {
                if depth == 0 {
                    return Some(out);
                }
                depth -= 1;
            }
            _ => {}
        }
        out.push(ch);
    }
    None
}

/// Split the raw stream on the `\par` control word and strip control codes
/// from each segment, skipping nested groups (font table, color table,
/// info). The boundary match keeps `\pard` and friends intact.
fn extract_paragraphs(content: &str) -> Vec<String> {
    let par_re = Regex::new(r"\\par\b").unwrap();
    par_re
        .split(content)
        .map(strip_control_codes)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn strip_control_codes(segment: &str) -> String {
    let mut out = String::new();
    let chars: Vec<char> = segment.chars().collect();
    let mut i = 0;
    let mut depth = 0i32;

    while i < chars.len() {
        match chars[i] {
            '{' => {
                depth += 1;
                i += 1;
            }
            '}' => {
                depth -= 1;
                i += 1;
            }
            '\\' => {
                // Escaped delimiters are literal text
                if let Some(&next) = chars.get(i + 1) {
                    if matches!(next, '\\' | '{' | '}') {
                        if depth <= 1 {
                            out.push(next);
                        }
                        i += 2;
                        continue;
                    }
                }
                // Skip the control word and its optional numeric parameter
                i += 1;
                while i < chars.len() && chars[i].is_ascii_alphabetic() {
                    i += 1;
                }
                if i < chars.len() && (chars[i] == '-' || chars[i].is_ascii_digit()) {
                    i += 1;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                // A single trailing space is part of the control word
                if i < chars.len() && chars[i] == ' ' {
                    i += 1;
                }
            }
            '\n' | '\r' => i += 1,
            ch if depth <= 1 => {
                out.push(ch);
                i += 1;
            }
            _ => i += 1,
        }
    }

    out
}

fn escape_rtf(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '\\' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            c if c.is_ascii() => out.push(c),
            c => {
                // \uN takes a signed 16-bit value; non-BMP falls back to '?'
                let code = c as u32;
                if code <= 0xFFFF {
                    let signed = if code > 0x7FFF {
                        code as i32 - 0x10000
                    } else {
                        code as i32
                    };
                    out.push_str(&format!("\\u{signed}?"));
                } else {
                    out.push('?');
                }
            }
        }
    }
}

/// Regenerate an RTF document carrying the current properties and the
/// original text content.
pub(crate) fn render(original: &[u8], props: &DocumentProps) -> Result<Vec<u8>, DocumentError> {
    let content = String::from_utf8_lossy(original).into_owned();
    let paragraphs = extract_paragraphs(&content);

    let family = props.font_family.as_deref().unwrap_or("Arial");
    let mut family_escaped = String::new();
    escape_rtf(family, &mut family_escaped);

    let mut out = String::new();
    out.push_str("{\\rtf1\\ansi\\deff0\n");
    out.push_str(&format!("{{\\fonttbl{{\\f0 {family_escaped};}}}}\n"));
    out.push_str("{\\colortbl;\\red0\\green0\\blue0;}\n");

    if props.title.is_some() || props.author.is_some() {
        out.push_str("{\\info");
        if let Some(ref title) = props.title {
            out.push_str("{\\title ");
            escape_rtf(title, &mut out);
            out.push('}');
        }
        if let Some(ref author) = props.author {
            out.push_str("{\\author ");
            escape_rtf(author, &mut out);
            out.push('}');
        }
        out.push_str("}\n");
    }

    out.push_str(&format!(
        "\\paperw{}\\paperh{}\\margl{}\\margr{}\\margt{}\\margb{}\n",
        props.page_width,
        props.page_height,
        props.margins.left,
        props.margins.right,
        props.margins.top,
        props.margins.bottom
    ));

    out.push_str("\\f0");
    if let Some(half_points) = props.font_size_half_points {
        out.push_str(&format!("\\fs{half_points}"));
    }
    if let Some(spacing) = props.line_spacing {
        let sl = (spacing * 240.0).round() as i32;
        out.push_str(&format!("\\sl{sl}\\slmult1"));
    }
    out.push('\n');

    for (i, paragraph) in paragraphs.iter().enumerate() {
        if i > 0 {
            out.push_str("\\par\n");
        }
        escape_rtf(paragraph, &mut out);
    }
    out.push_str("\n}");

    Ok(out.into_bytes())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const FIXTURE: &str = concat!(
        r"{\rtf1\ansi\deff0",
        "\n",
        r"{\fonttbl{\f0\froman\fcharset0 Times New Roman;}{\f1\fswiss Helvetica;}}",
        "\n",
        r"{\info{\title Meeting Notes}{\author Sam Okafor}}",
        "\n",
        r"\paperw11906\paperh16838\margl720\margr720\margt1440\margb1440",
        "\n",
        r"\f0\fs24\sl360\slmult1",
        "\n",
        r"First paragraph of the notes.\par",
        "\n",
        r"Second paragraph with more words.",
        "\n",
        r"}"
    );

    #[test]
    fn test_read_props_from_fixture() {
        let props = read_props(FIXTURE.as_bytes()).unwrap();

        assert_eq!(props.page_width, 11906);
        assert_eq!(props.page_height, 16838);
        assert_eq!(props.margins.left, 720);
        assert_eq!(props.margins.top, 1440);
        assert_eq!(props.font_family.as_deref(), Some("Times New Roman"));
        assert_eq!(props.font_size_half_points, Some(24));
        assert_eq!(props.line_spacing, Some(1.5));
        assert_eq!(props.paragraph_count, 2);
        assert_eq!(props.word_count, 10);
        assert_eq!(
            props.fonts_used,
            vec!["Times New Roman".to_string(), "Helvetica".to_string()]
        );
        assert_eq!(props.title.as_deref(), Some("Meeting Notes"));
        assert_eq!(props.author.as_deref(), Some("Sam Okafor"));
    }

    #[test]
    fn test_read_props_rejects_non_rtf() {
        assert!(matches!(
            read_props(b"just some plain text"),
            Err(DocumentError::Corrupt(_))
        ));
    }

    #[test]
    fn test_extract_paragraphs_skips_header_groups() {
        let paragraphs = extract_paragraphs(FIXTURE);
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0], "First paragraph of the notes.");
        assert_eq!(paragraphs[1], "Second paragraph with more words.");
    }

    #[test]
    fn test_extract_paragraphs_keeps_pard_intact() {
        // Word and WordPad reset paragraph formatting with \pard at each
        // paragraph start; the trailing d must not leak into the text
        let content = concat!(
            r"{\rtf1\ansi\deff0{\fonttbl{\f0 Arial;}}",
            "\n",
            r"\pard\fs24 Hello world\par\pard\fs24 Second line}"
        );
        let paragraphs = extract_paragraphs(content);
        assert_eq!(paragraphs, vec!["Hello world", "Second line"]);

        let props = read_props(content.as_bytes()).unwrap();
        assert_eq!(props.paragraph_count, 2);
        assert_eq!(props.word_count, 4);

        let rendered = render(content.as_bytes(), &props).unwrap();
        let text = String::from_utf8(rendered).unwrap();
        assert!(text.contains("Hello world"));
        assert!(!text.contains("dHello"));
        assert!(!text.contains("dSecond"));
    }

    #[test]
    fn test_render_roundtrips_font_change() {
        let baseline = read_props(FIXTURE.as_bytes()).unwrap();

        let mut modified = baseline.clone();
        modified.font_family = Some("Georgia".to_string());
        modified.font_size_half_points = Some(28);
        modified.line_spacing = Some(2.0);

        let rendered = render(FIXTURE.as_bytes(), &modified).unwrap();
        let reread = read_props(&rendered).unwrap();

        assert_eq!(reread.font_family.as_deref(), Some("Georgia"));
        assert_eq!(reread.font_size_half_points, Some(28));
        assert_eq!(reread.line_spacing, Some(2.0));
        assert_eq!(reread.paragraph_count, baseline.paragraph_count);
        assert_eq!(reread.word_count, baseline.word_count);
        assert_eq!(reread.title.as_deref(), Some("Meeting Notes"));
    }

    #[test]
    fn test_render_roundtrips_geometry() {
        let baseline = read_props(FIXTURE.as_bytes()).unwrap();

        let mut modified = baseline.clone();
        // US Letter with one-inch margins
        modified.page_width = 12240;
        modified.page_height = 15840;
        modified.margins.left = 1440;
        modified.margins.right = 1440;

        let rendered = render(FIXTURE.as_bytes(), &modified).unwrap();
        let reread = read_props(&rendered).unwrap();

        assert_eq!(reread.page_width, 12240);
        assert_eq!(reread.page_height, 15840);
        assert_eq!(reread.margins.left, 1440);
    }

    #[test]
    fn test_escape_rtf_delimiters_and_unicode() {
        let mut out = String::new();
        escape_rtf("a{b}c\\d é", &mut out);
        assert_eq!(out, "a\\{b\\}c\\\\d \\u233?");
    }
}
