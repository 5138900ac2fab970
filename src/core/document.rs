//! Uniform document model over DOCX and RTF files
//!
//! A [`DocumentHandle`] owns the original file bytes plus the editable
//! property set parsed from them. Property mutation happens purely in
//! memory; nothing touches the disk until [`DocumentHandle::save`].

use std::fs;
use std::path::{Path, PathBuf};

use super::error::DocumentError;
use super::{docx, rtf};

/// Twentieths of a point, the native length unit of both OOXML and RTF.
pub const TWIPS_PER_INCH: f32 = 1440.0;

pub fn twips_to_inches(twips: i32) -> f32 {
    twips as f32 / TWIPS_PER_INCH
}

pub fn inches_to_twips(inches: f32) -> i32 {
    (inches * TWIPS_PER_INCH).round() as i32
}

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Docx,
    Rtf,
}

impl DocumentFormat {
    /// Detect the format from a file extension, if supported.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("docx") => Some(Self::Docx),
            Some("rtf") => Some(Self::Rtf),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Docx => "DOCX",
            Self::Rtf => "RTF",
        }
    }
}

/// Page margins in twips
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl Default for Margins {
    /// One inch on every side, the Word default.
    fn default() -> Self {
        Self {
            top: 1440,
            bottom: 1440,
            left: 1440,
            right: 1440,
        }
    }
}

/// Editable document properties, all lengths in twips.
///
/// `font_family` / `font_size_half_points` / `line_spacing` are `None` when
/// the source document does not state an explicit document-wide default.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentProps {
    pub page_width: i32,
    pub page_height: i32,
    pub margins: Margins,
    pub font_family: Option<String>,
    pub font_size_half_points: Option<u32>,
    /// Line spacing as a multiple of single spacing
    pub line_spacing: Option<f32>,
    pub paragraph_count: usize,
    pub word_count: usize,
    pub table_count: usize,
    /// Paragraphs styled Heading 1 through Heading 6, by level
    pub heading_counts: [usize; 6],
    /// Font families referenced anywhere in the document body
    pub fonts_used: Vec<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    /// Header/footer/gutter distances from `w:pgMar`, echoed back on save
    pub(crate) header_distance: i32,
    pub(crate) footer_distance: i32,
    pub(crate) gutter: i32,
}

impl Default for DocumentProps {
    /// US Letter with one-inch margins.
    fn default() -> Self {
        Self {
            page_width: 12240,
            page_height: 15840,
            margins: Margins::default(),
            font_family: None,
            font_size_half_points: None,
            line_spacing: None,
            paragraph_count: 0,
            word_count: 0,
            table_count: 0,
            heading_counts: [0; 6],
            fonts_used: Vec::new(),
            title: None,
            author: None,
            header_distance: 720,
            footer_distance: 720,
            gutter: 0,
        }
    }
}

/// Read-only, user-facing view of a document in inches and points.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    pub file_name: String,
    pub format: DocumentFormat,
    pub title: Option<String>,
    pub author: Option<String>,
    pub page_width_in: f32,
    pub page_height_in: f32,
    pub margin_top_in: f32,
    pub margin_bottom_in: f32,
    pub margin_left_in: f32,
    pub margin_right_in: f32,
    pub font_family: Option<String>,
    pub font_size_pt: Option<f32>,
    pub line_spacing: Option<f32>,
    pub paragraph_count: usize,
    pub word_count: usize,
    pub table_count: usize,
    pub heading_counts: [usize; 6],
    pub fonts_used: Vec<String>,
}

/// A loaded document: original bytes plus the editable property set.
///
/// At most one handle is active at a time; the controller replaces it
/// wholesale when a new file is opened.
#[derive(Debug, Clone)]
pub struct DocumentHandle {
    pub path: PathBuf,
    pub format: DocumentFormat,
    pub(crate) bytes: Vec<u8>,
    /// Properties as parsed from the file
    pub(crate) baseline: DocumentProps,
    /// Current (possibly modified) properties
    pub(crate) props: DocumentProps,
}

impl DocumentHandle {
    /// Load a document from disk.
    ///
    /// Fails with `NotFound` if the path does not point at a regular file,
    /// `UnsupportedFormat` unless the extension is .docx or .rtf, and
    /// `Corrupt` if the bytes cannot be parsed as the detected format.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        if !path.is_file() {
            return Err(DocumentError::NotFound(path.to_path_buf()));
        }

        let format = DocumentFormat::from_path(path).ok_or_else(|| {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_default();
            DocumentError::UnsupportedFormat(ext)
        })?;

        let bytes =
            fs::read(path).map_err(|e| DocumentError::Corrupt(format!("read failed: {e}")))?;

        let props = match format {
            DocumentFormat::Docx => docx::read_props(&bytes)?,
            DocumentFormat::Rtf => rtf::read_props(&bytes)?,
        };

        tracing::info!(
            "Loaded {} document: {} ({} paragraphs, {} words)",
            format.label(),
            path.display(),
            props.paragraph_count,
            props.word_count
        );

        Ok(Self {
            path: path.to_path_buf(),
            format,
            bytes,
            baseline: props.clone(),
            props,
        })
    }

    /// Pure read of the current in-memory properties.
    pub fn describe(&self) -> DocumentSummary {
        let p = &self.props;
        DocumentSummary {
            file_name: self
                .path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "Untitled".to_string()),
            format: self.format,
            title: p.title.clone(),
            author: p.author.clone(),
            page_width_in: twips_to_inches(p.page_width),
            page_height_in: twips_to_inches(p.page_height),
            margin_top_in: twips_to_inches(p.margins.top),
            margin_bottom_in: twips_to_inches(p.margins.bottom),
            margin_left_in: twips_to_inches(p.margins.left),
            margin_right_in: twips_to_inches(p.margins.right),
            font_family: p.font_family.clone(),
            font_size_pt: p.font_size_half_points.map(|hp| hp as f32 / 2.0),
            line_spacing: p.line_spacing,
            paragraph_count: p.paragraph_count,
            word_count: p.word_count,
            table_count: p.table_count,
            heading_counts: p.heading_counts,
            fonts_used: p.fonts_used.clone(),
        }
    }

    /// Whether the in-memory properties differ from what was parsed.
    pub fn is_modified(&self) -> bool {
        self.props != self.baseline
    }

    /// Default output location: a `_modified` copy next to the original.
    pub fn default_output_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());
        let ext = match self.format {
            DocumentFormat::Docx => "docx",
            DocumentFormat::Rtf => "rtf",
        };
        self.path
            .with_file_name(format!("{stem}_modified.{ext}"))
    }

    /// Write the current in-memory state to `output`.
    ///
    /// The document is rendered fully in memory first, then written to a
    /// temporary sibling file and renamed into place, so a failed write
    /// never leaves a truncated output file behind.
    pub fn save(&self, output: &Path) -> Result<(), DocumentError> {
        let rendered = match self.format {
            DocumentFormat::Docx => docx::render(&self.bytes, &self.baseline, &self.props)?,
            DocumentFormat::Rtf => rtf::render(&self.bytes, &self.props)?,
        };

        let tmp = output.with_extension("tmp");
        fs::write(&tmp, &rendered).map_err(|e| DocumentError::Write {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, output).map_err(|e| DocumentError::Write {
            path: output.to_path_buf(),
            source: e,
        })?;

        tracing::info!("Saved modified document to: {}", output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("report.docx")),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("letter.RTF")),
            Some(DocumentFormat::Rtf)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let err = DocumentHandle::load(Path::new("/nonexistent/report.docx")).unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(_)));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "plain text").unwrap();

        let err = DocumentHandle::load(&path).unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_garbage_docx_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, b"this is not a zip archive").unwrap();

        let err = DocumentHandle::load(&path).unwrap_err();
        assert!(matches!(err, DocumentError::Corrupt(_)));
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(inches_to_twips(1.0), 1440);
        assert_eq!(inches_to_twips(8.5), 12240);
        assert!((twips_to_inches(15840) - 11.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_docx_disk_roundtrip() {
        use crate::core::modify::{self, ModificationRequest, PageSize};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.docx");
        std::fs::write(&path, crate::core::docx::tests::build_fixture()).unwrap();

        let mut handle = DocumentHandle::load(&path).unwrap();
        let request = ModificationRequest {
            page_size: Some(PageSize::A4),
            ..Default::default()
        };
        let validated = request.validate(&handle.props).unwrap();
        modify::apply(&mut handle, &validated).unwrap();

        let output = handle.default_output_path();
        handle.save(&output).unwrap();
        assert_eq!(output, dir.path().join("report_modified.docx"));

        let reloaded = DocumentHandle::load(&output).unwrap();
        let summary = reloaded.describe();
        assert!((summary.page_width_in - 8.268).abs() < 0.01);
        assert!((summary.page_height_in - 11.693).abs() < 0.01);
        assert_eq!(summary.word_count, handle.describe().word_count);
    }

    #[test]
    fn test_rtf_disk_roundtrip() {
        use crate::core::modify::{self, FontSpec, ModificationRequest};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.rtf");
        std::fs::write(&path, crate::core::rtf::tests::FIXTURE).unwrap();

        let mut handle = DocumentHandle::load(&path).unwrap();
        let request = ModificationRequest {
            font: Some(FontSpec {
                family: Some("Verdana".to_string()),
                size_pt: Some(14.0),
            }),
            ..Default::default()
        };
        let validated = request.validate(&handle.props).unwrap();
        modify::apply(&mut handle, &validated).unwrap();

        let output = handle.default_output_path();
        handle.save(&output).unwrap();

        let reloaded = DocumentHandle::load(&output).unwrap();
        let summary = reloaded.describe();
        assert_eq!(summary.font_family.as_deref(), Some("Verdana"));
        assert_eq!(summary.font_size_pt, Some(14.0));
        assert_eq!(summary.paragraph_count, 2);
    }

    #[test]
    fn test_default_output_path() {
        let handle = DocumentHandle {
            path: PathBuf::from("/tmp/report.docx"),
            format: DocumentFormat::Docx,
            bytes: Vec::new(),
            baseline: DocumentProps::default(),
            props: DocumentProps::default(),
        };
        assert_eq!(
            handle.default_output_path(),
            PathBuf::from("/tmp/report_modified.docx")
        );
    }
}
