//! DOCX adapter: property extraction and property-level rewriting
//!
//! A .docx file is a ZIP archive of XML parts. Reading streams
//! `word/document.xml` (body geometry, paragraph/word/table counts, run
//! fonts), `word/styles.xml` (document-wide defaults) and
//! `docProps/core.xml` (title/author) with quick-xml. Saving copies the
//! original archive entry-by-entry, rewriting only the parts whose
//! properties actually changed.

use std::collections::BTreeSet;
use std::io::{Cursor, Read, Write};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex_lite::Regex;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use super::document::DocumentProps;
use super::error::DocumentError;

/// Extract an attribute value by key from an element
fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .find(|a| a.as_ref().ok().map(|x| x.key.as_ref()) == Some(key))
        .and_then(Result::ok)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Extract an attribute value by key and parse as i32
fn get_attr_i32(e: &BytesStart, key: &[u8]) -> Option<i32> {
    get_attr(e, key).and_then(|s| s.parse().ok())
}

fn read_member(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Option<String> {
    let mut file = archive.by_name(name).ok()?;
    let mut content = String::new();
    file.read_to_string(&mut content).ok()?;
    Some(content)
}

/// Parse the editable properties out of a DOCX byte buffer.
pub(crate) fn read_props(bytes: &[u8]) -> Result<DocumentProps, DocumentError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DocumentError::Corrupt(format!("not a DOCX archive: {e}")))?;

    let document_xml = read_member(&mut archive, "word/document.xml")
        .ok_or_else(|| DocumentError::Corrupt("missing word/document.xml".to_string()))?;

    let mut props = DocumentProps::default();
    parse_document_xml(&document_xml, &mut props)?;

    if let Some(styles_xml) = read_member(&mut archive, "word/styles.xml") {
        parse_styles_xml(&styles_xml, &mut props)?;
    }

    if let Some(core_xml) = read_member(&mut archive, "docProps/core.xml") {
        parse_core_xml(&core_xml, &mut props);
    }

    Ok(props)
}

/// Walk `word/document.xml`: counts, body text, section geometry, run fonts.
fn parse_document_xml(xml: &str, props: &mut DocumentProps) -> Result<(), DocumentError> {
    let mut reader = Reader::from_str(xml);

    let mut in_text = false;
    let mut body_text = String::new();
    let mut fonts = BTreeSet::new();
    let mut page_size_seen = false;
    let mut margins_seen = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DocumentError::Corrupt(format!("malformed document.xml: {e}")))?;
        match event {
            Event::Start(ref e) => match e.name().as_ref() {
                b"w:p" => props.paragraph_count += 1,
                b"w:tbl" => props.table_count += 1,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(ref e) => {
                handle_geometry_element(e, props, &mut page_size_seen, &mut margins_seen);
                match e.name().as_ref() {
                    b"w:rFonts" => {
                        if let Some(family) = get_attr(e, b"w:ascii") {
                            fonts.insert(family);
                        }
                    }
                    b"w:pStyle" => {
                        if let Some(level) =
                            get_attr(e, b"w:val").as_deref().and_then(heading_level)
                        {
                            props.heading_counts[level - 1] += 1;
                        }
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => {
                if e.name().as_ref() == b"w:t" {
                    in_text = false;
                    body_text.push(' ');
                }
            }
            Event::Text(ref t) => {
                if in_text {
                    if let Ok(text) = t.unescape() {
                        body_text.push_str(&text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    props.word_count = body_text.split_whitespace().count();
    props.fonts_used = fonts.into_iter().collect();
    Ok(())
}

/// Map a paragraph style id to its heading level, if it is one of the
/// built-in Heading1 through Heading6 styles.
fn heading_level(style_id: &str) -> Option<usize> {
    let level: usize = style_id.strip_prefix("Heading")?.parse().ok()?;
    (1..=6).contains(&level).then_some(level)
}

/// Record the first `w:pgSz` / `w:pgMar` seen (the first section's geometry).
fn handle_geometry_element(
    e: &BytesStart,
    props: &mut DocumentProps,
    page_size_seen: &mut bool,
    margins_seen: &mut bool,
) {
    match e.name().as_ref() {
        b"w:pgSz" if !*page_size_seen => {
            if let (Some(w), Some(h)) = (get_attr_i32(e, b"w:w"), get_attr_i32(e, b"w:h")) {
                props.page_width = w;
                props.page_height = h;
                *page_size_seen = true;
            }
        }
        b"w:pgMar" if !*margins_seen => {
            if let Some(top) = get_attr_i32(e, b"w:top") {
                props.margins.top = top;
            }
            if let Some(bottom) = get_attr_i32(e, b"w:bottom") {
                props.margins.bottom = bottom;
            }
            if let Some(left) = get_attr_i32(e, b"w:left") {
                props.margins.left = left;
            }
            if let Some(right) = get_attr_i32(e, b"w:right") {
                props.margins.right = right;
            }
            if let Some(header) = get_attr_i32(e, b"w:header") {
                props.header_distance = header;
            }
            if let Some(footer) = get_attr_i32(e, b"w:footer") {
                props.footer_distance = footer;
            }
            if let Some(gutter) = get_attr_i32(e, b"w:gutter") {
                props.gutter = gutter;
            }
            *margins_seen = true;
        }
        _ => {}
    }
}

/// Pull the document-wide defaults out of `word/styles.xml` docDefaults.
fn parse_styles_xml(xml: &str, props: &mut DocumentProps) -> Result<(), DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut in_doc_defaults = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DocumentError::Corrupt(format!("malformed styles.xml: {e}")))?;
        match event {
            Event::Start(ref e) if e.name().as_ref() == b"w:docDefaults" => {
                in_doc_defaults = true;
            }
            Event::End(ref e) if e.name().as_ref() == b"w:docDefaults" => {
                // Defaults never appear past this point
                break;
            }
            Event::Empty(ref e) if in_doc_defaults => match e.name().as_ref() {
                b"w:rFonts" => {
                    if props.font_family.is_none() {
                        props.font_family = get_attr(e, b"w:ascii");
                    }
                }
                b"w:sz" => {
                    if props.font_size_half_points.is_none() {
                        props.font_size_half_points =
                            get_attr(e, b"w:val").and_then(|v| v.parse().ok());
                    }
                }
                b"w:spacing" => {
                    // w:line is in 240ths of a line when lineRule is "auto"
                    if props.line_spacing.is_none()
                        && get_attr(e, b"w:lineRule").as_deref() == Some("auto")
                    {
                        props.line_spacing = get_attr_i32(e, b"w:line")
                            .filter(|line| *line > 0)
                            .map(|line| line as f32 / 240.0);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(())
}

/// Title and author from `docProps/core.xml`. Best effort, never fails.
fn parse_core_xml(xml: &str, props: &mut DocumentProps) {
    let mut reader = Reader::from_str(xml);
    let mut current: Option<&'static str> = None;

    while let Ok(event) = reader.read_event() {
        match event {
            Event::Start(ref e) => {
                current = match e.name().as_ref() {
                    b"dc:title" => Some("title"),
                    b"dc:creator" => Some("creator"),
                    _ => None,
                };
            }
            Event::Text(ref t) => {
                if let (Some(field), Ok(text)) = (current, t.unescape()) {
                    let text = text.trim().to_string();
                    if !text.is_empty() {
                        match field {
                            "title" => props.title = Some(text),
                            "creator" => props.author = Some(text),
                            _ => {}
                        }
                    }
                }
            }
            Event::End(_) => current = None,
            Event::Eof => break,
            _ => {}
        }
    }
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the archive with the in-memory properties applied.
///
/// Only the parts whose properties differ from the parsed baseline are
/// rewritten; an unmodified handle renders byte-identical output.
pub(crate) fn render(
    original: &[u8],
    baseline: &DocumentProps,
    props: &DocumentProps,
) -> Result<Vec<u8>, DocumentError> {
    let geometry_changed = props.page_width != baseline.page_width
        || props.page_height != baseline.page_height
        || props.margins != baseline.margins;
    let font_changed = props.font_family != baseline.font_family
        || props.font_size_half_points != baseline.font_size_half_points;
    let spacing_changed = props.line_spacing != baseline.line_spacing;

    if !geometry_changed && !font_changed && !spacing_changed {
        return Ok(original.to_vec());
    }

    let mut archive = ZipArchive::new(Cursor::new(original))
        .map_err(|e| DocumentError::Apply(format!("cannot reopen archive: {e}")))?;

    let document_xml = read_member(&mut archive, "word/document.xml")
        .ok_or_else(|| DocumentError::Apply("missing word/document.xml".to_string()))?;
    let new_document_xml =
        rewrite_document_xml(&document_xml, props, geometry_changed, font_changed, spacing_changed);

    // A package without word/styles.xml gets one synthesized, so a font or
    // spacing change always lands in docDefaults instead of being dropped
    let mut styles_missing = false;
    let new_styles_xml = if font_changed || spacing_changed {
        match read_member(&mut archive, "word/styles.xml") {
            Some(xml) => Some(rewrite_styles_xml(&xml, props)),
            None => {
                styles_missing = true;
                Some(rewrite_styles_xml(EMPTY_STYLES_XML, props))
            }
        }
    } else {
        None
    };

    let mut out = Vec::new();
    {
        let mut writer = ZipWriter::new(Cursor::new(&mut out));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| DocumentError::Apply(format!("cannot read archive entry: {e}")))?;
            let name = file.name().to_string();

            writer
                .start_file(name.clone(), options)
                .map_err(|e| DocumentError::Apply(format!("cannot write archive entry: {e}")))?;

            let write_result = if name == "word/document.xml" {
                writer.write_all(new_document_xml.as_bytes())
            } else if name == "word/styles.xml" && new_styles_xml.is_some() {
                writer.write_all(new_styles_xml.as_deref().unwrap_or_default().as_bytes())
            } else if name == "[Content_Types].xml" && styles_missing {
                let mut buf = String::new();
                file.read_to_string(&mut buf)
                    .map_err(|e| DocumentError::Apply(format!("cannot read archive entry: {e}")))?;
                writer.write_all(register_styles_part(&buf).as_bytes())
            } else if name == "word/_rels/document.xml.rels" && styles_missing {
                let mut buf = String::new();
                file.read_to_string(&mut buf)
                    .map_err(|e| DocumentError::Apply(format!("cannot read archive entry: {e}")))?;
                writer.write_all(register_styles_relationship(&buf).as_bytes())
            } else {
                let mut buf = Vec::new();
                file.read_to_end(&mut buf)
                    .map_err(|e| DocumentError::Apply(format!("cannot read archive entry: {e}")))?;
                writer.write_all(&buf)
            };
            write_result
                .map_err(|e| DocumentError::Apply(format!("cannot write archive entry: {e}")))?;
        }

        if styles_missing {
            if let Some(ref xml) = new_styles_xml {
                writer
                    .start_file("word/styles.xml", options)
                    .map_err(|e| DocumentError::Apply(format!("cannot write archive entry: {e}")))?;
                writer
                    .write_all(xml.as_bytes())
                    .map_err(|e| DocumentError::Apply(format!("cannot write archive entry: {e}")))?;
            }
        }

        writer
            .finish()
            .map_err(|e| DocumentError::Apply(format!("cannot finish archive: {e}")))?;
    }

    Ok(out)
}

/// Rewrite section geometry in place and strip run/paragraph-level overrides
/// for fields the user changed, so the new styles.xml defaults take effect
/// across the whole body.
fn rewrite_document_xml(
    xml: &str,
    props: &DocumentProps,
    geometry_changed: bool,
    font_changed: bool,
    spacing_changed: bool,
) -> String {
    let mut xml = xml.to_string();

    if font_changed {
        for pattern in ["<w:rFonts[^>]*/>", "<w:sz [^>]*/>", "<w:szCs[^>]*/>"] {
            let re = Regex::new(pattern).unwrap();
            xml = re.replace_all(&xml, "").into_owned();
        }
    }
    if spacing_changed {
        let re = Regex::new("<w:spacing[^>]*/>").unwrap();
        xml = re.replace_all(&xml, "").into_owned();
    }

    if geometry_changed {
        let pg_sz = format!(
            "<w:pgSz w:w=\"{}\" w:h=\"{}\"/>",
            props.page_width, props.page_height
        );
        let pg_mar = format!(
            "<w:pgMar w:top=\"{}\" w:bottom=\"{}\" w:left=\"{}\" w:right=\"{}\" w:header=\"{}\" w:footer=\"{}\" w:gutter=\"{}\"/>",
            props.margins.top,
            props.margins.bottom,
            props.margins.left,
            props.margins.right,
            props.header_distance,
            props.footer_distance,
            props.gutter
        );

        let sz_re = Regex::new("<w:pgSz[^>]*/>").unwrap();
        let mar_re = Regex::new("<w:pgMar[^>]*/>").unwrap();

        if sz_re.is_match(&xml) || mar_re.is_match(&xml) {
            xml = sz_re.replace_all(&xml, pg_sz.as_str()).into_owned();
            xml = mar_re.replace_all(&xml, pg_mar.as_str()).into_owned();
        } else if let Some(pos) = xml.rfind("</w:body>") {
            // Body has no sectPr at all: insert one
            let sect_pr = format!("<w:sectPr>{pg_sz}{pg_mar}</w:sectPr>");
            xml.insert_str(pos, &sect_pr);
        }
    }

    xml
}

/// Skeleton for a synthesized word/styles.xml part.
const EMPTY_STYLES_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<w:styles xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"></w:styles>";

/// Add the styles part to the package manifest if it is not listed.
fn register_styles_part(content_types: &str) -> String {
    if content_types.contains("/word/styles.xml") {
        return content_types.to_string();
    }
    let mut out = content_types.to_string();
    if let Some(pos) = out.rfind("</Types>") {
        out.insert_str(
            pos,
            "<Override PartName=\"/word/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml\"/>",
        );
    }
    out
}

/// Point document.xml at the styles part if no styles relationship exists.
fn register_styles_relationship(rels: &str) -> String {
    if rels.contains("relationships/styles") {
        return rels.to_string();
    }
    let mut out = rels.to_string();
    if let Some(pos) = out.rfind("</Relationships>") {
        out.insert_str(
            pos,
            "<Relationship Id=\"rIdStyles1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>",
        );
    }
    out
}

/// Replace the styles.xml docDefaults block with one built from the
/// current properties.
fn rewrite_styles_xml(xml: &str, props: &DocumentProps) -> String {
    let mut r_pr = String::new();
    if let Some(ref family) = props.font_family {
        let family = xml_escape(family);
        r_pr.push_str(&format!(
            "<w:rFonts w:ascii=\"{family}\" w:hAnsi=\"{family}\" w:cs=\"{family}\"/>"
        ));
    }
    if let Some(half_points) = props.font_size_half_points {
        r_pr.push_str(&format!(
            "<w:sz w:val=\"{half_points}\"/><w:szCs w:val=\"{half_points}\"/>"
        ));
    }

    let mut p_pr = String::new();
    if let Some(spacing) = props.line_spacing {
        let line = (spacing * 240.0).round() as i32;
        p_pr.push_str(&format!(
            "<w:spacing w:line=\"{line}\" w:lineRule=\"auto\"/>"
        ));
    }

    let doc_defaults = format!(
        "<w:docDefaults><w:rPrDefault><w:rPr>{r_pr}</w:rPr></w:rPrDefault>\
         <w:pPrDefault><w:pPr>{p_pr}</w:pPr></w:pPrDefault></w:docDefaults>"
    );

    let mut xml = xml.to_string();
    if let Some(start) = xml.find("<w:docDefaults") {
        if let Some(end_rel) = xml[start..].find("</w:docDefaults>") {
            let end = start + end_rel + "</w:docDefaults>".len();
            xml.replace_range(start..end, &doc_defaults);
            return xml;
        }
    }

    // No docDefaults yet: insert right after the styles root open tag
    if let Some(root) = xml.find("<w:styles") {
        if let Some(close_rel) = xml[root..].find('>') {
            xml.insert_str(root + close_rel + 1, &doc_defaults);
        }
    }
    xml
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:r>
        <w:rPr><w:rFonts w:ascii="Calibri"/><w:sz w:val="22"/></w:rPr>
        <w:t>Quarterly report for the board.</w:t>
      </w:r>
    </w:p>
    <w:p>
      <w:pPr><w:pStyle w:val="Heading1"/></w:pPr>
      <w:r><w:t>Overview</w:t></w:r>
    </w:p>
    <w:p>
      <w:pPr><w:spacing w:line="240" w:lineRule="auto"/></w:pPr>
      <w:r><w:t>Second paragraph here.</w:t></w:r>
    </w:p>
    <w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
    <w:sectPr>
      <w:pgSz w:w="12240" w:h="15840"/>
      <w:pgMar w:top="1440" w:bottom="1440" w:left="1440" w:right="1440" w:header="851" w:footer="992" w:gutter="113"/>
    </w:sectPr>
  </w:body>
</w:document>"#;

    const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults>
    <w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri"/><w:sz w:val="24"/></w:rPr></w:rPrDefault>
    <w:pPrDefault><w:pPr><w:spacing w:line="276" w:lineRule="auto"/></w:pPr></w:pPrDefault>
  </w:docDefaults>
</w:styles>"#;

    const CORE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <dc:title>Quarterly Report</dc:title>
  <dc:creator>Jordan Reyes</dc:creator>
</cp:coreProperties>"#;

    /// Assemble a minimal valid .docx archive in memory.
    pub(crate) fn build_fixture() -> Vec<u8> {
        build_archive(true)
    }

    fn build_archive(include_styles: bool) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut writer = ZipWriter::new(Cursor::new(&mut out));
            let options = SimpleFileOptions::default();

            let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;
            let rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

            let mut parts = vec![
                ("[Content_Types].xml", content_types),
                ("_rels/.rels", rels),
                ("word/document.xml", DOCUMENT_XML),
                ("docProps/core.xml", CORE_XML),
            ];
            if include_styles {
                parts.push(("word/styles.xml", STYLES_XML));
            }
            for (name, content) in parts {
                writer.start_file(name, options).unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        out
    }

    #[test]
    fn test_read_props_from_fixture() {
        let props = read_props(&build_fixture()).unwrap();

        assert_eq!(props.page_width, 12240);
        assert_eq!(props.page_height, 15840);
        assert_eq!(props.margins.top, 1440);
        assert_eq!(props.margins.right, 1440);
        assert_eq!(props.font_family.as_deref(), Some("Calibri"));
        assert_eq!(props.font_size_half_points, Some(24));
        assert_eq!(props.line_spacing, Some(1.15));
        // Three body paragraphs plus one inside the table cell
        assert_eq!(props.paragraph_count, 4);
        assert_eq!(props.table_count, 1);
        assert_eq!(props.word_count, 10);
        assert_eq!(props.heading_counts, [1, 0, 0, 0, 0, 0]);
        assert_eq!(props.header_distance, 851);
        assert_eq!(props.footer_distance, 992);
        assert_eq!(props.gutter, 113);
        assert_eq!(props.fonts_used, vec!["Calibri".to_string()]);
        assert_eq!(props.title.as_deref(), Some("Quarterly Report"));
        assert_eq!(props.author.as_deref(), Some("Jordan Reyes"));
    }

    #[test]
    fn test_read_props_rejects_garbage() {
        assert!(matches!(
            read_props(b"not a zip"),
            Err(DocumentError::Corrupt(_))
        ));
    }

    #[test]
    fn test_render_unmodified_is_verbatim() {
        let bytes = build_fixture();
        let props = read_props(&bytes).unwrap();
        let rendered = render(&bytes, &props, &props).unwrap();
        assert_eq!(rendered, bytes);
    }

    #[test]
    fn test_render_roundtrips_geometry() {
        let bytes = build_fixture();
        let baseline = read_props(&bytes).unwrap();

        let mut modified = baseline.clone();
        // A4 with half-inch margins
        modified.page_width = 11906;
        modified.page_height = 16838;
        modified.margins.top = 720;
        modified.margins.bottom = 720;
        modified.margins.left = 720;
        modified.margins.right = 720;

        let rendered = render(&bytes, &baseline, &modified).unwrap();
        let reread = read_props(&rendered).unwrap();

        assert_eq!(reread.page_width, 11906);
        assert_eq!(reread.page_height, 16838);
        assert_eq!(reread.margins.left, 720);
        // Body content untouched
        assert_eq!(reread.paragraph_count, baseline.paragraph_count);
        assert_eq!(reread.word_count, baseline.word_count);
        // Header/footer/gutter distances echoed back, not reset
        assert_eq!(reread.header_distance, 851);
        assert_eq!(reread.footer_distance, 992);
        assert_eq!(reread.gutter, 113);
    }

    #[test]
    fn test_render_roundtrips_font_and_spacing() {
        let bytes = build_fixture();
        let baseline = read_props(&bytes).unwrap();

        let mut modified = baseline.clone();
        modified.font_family = Some("Georgia".to_string());
        modified.font_size_half_points = Some(28);
        modified.line_spacing = Some(2.0);

        let rendered = render(&bytes, &baseline, &modified).unwrap();
        let reread = read_props(&rendered).unwrap();

        assert_eq!(reread.font_family.as_deref(), Some("Georgia"));
        assert_eq!(reread.font_size_half_points, Some(28));
        assert_eq!(reread.line_spacing, Some(2.0));
        // Run-level font overrides were stripped so the default wins
        assert!(reread.fonts_used.is_empty());
    }

    #[test]
    fn test_render_synthesizes_styles_part_when_absent() {
        let bytes = build_archive(false);
        let baseline = read_props(&bytes).unwrap();
        assert_eq!(baseline.font_family, None);

        let mut modified = baseline.clone();
        modified.font_family = Some("Georgia".to_string());
        modified.font_size_half_points = Some(28);

        let rendered = render(&bytes, &baseline, &modified).unwrap();
        let reread = read_props(&rendered).unwrap();
        assert_eq!(reread.font_family.as_deref(), Some("Georgia"));
        assert_eq!(reread.font_size_half_points, Some(28));

        let mut archive = ZipArchive::new(Cursor::new(rendered.as_slice())).unwrap();
        let styles = read_member(&mut archive, "word/styles.xml").unwrap();
        assert!(styles.contains("w:ascii=\"Georgia\""));
        let manifest = read_member(&mut archive, "[Content_Types].xml").unwrap();
        assert!(manifest.contains("PartName=\"/word/styles.xml\""));
    }

    #[test]
    fn test_rewrite_inserts_sect_pr_when_absent() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>hi</w:t></w:r></w:p></w:body></w:document>"#;
        let mut props = DocumentProps::default();
        props.page_width = 11906;
        props.page_height = 16838;

        let rewritten = rewrite_document_xml(xml, &props, true, false, false);
        assert!(rewritten.contains("<w:sectPr>"));
        assert!(rewritten.contains("w:w=\"11906\""));
    }
}
