//! Modification engine: request validation and atomic in-memory apply
//!
//! The underlying formats expose no transaction support, so correctness is
//! defended here: every field is validated before the document is touched,
//! and `apply` mutates a clone of the properties and commits it only when
//! every mutation succeeded. A failure leaves the handle exactly as it was.

use super::document::{inches_to_twips, DocumentHandle, DocumentProps};
use super::error::DocumentError;

/// Validation bounds, in inches / points / multiples
const MAX_PAGE_DIMENSION_IN: f32 = 30.0;
const MAX_MARGIN_IN: f32 = 5.0;
const MAX_FONT_SIZE_PT: f32 = 300.0;
const MIN_LINE_SPACING: f32 = 0.25;
const MAX_LINE_SPACING: f32 = 10.0;

/// Page size, as a preset or custom dimensions in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageSize {
    A4,
    Letter,
    Legal,
    Custom { width_in: f32, height_in: f32 },
}

impl PageSize {
    /// (width, height) in twips.
    pub fn dimensions_twips(&self) -> (i32, i32) {
        match self {
            Self::A4 => (11906, 16838),
            Self::Letter => (12240, 15840),
            Self::Legal => (12240, 20160),
            Self::Custom {
                width_in,
                height_in,
            } => (inches_to_twips(*width_in), inches_to_twips(*height_in)),
        }
    }

    /// Match existing dimensions to a preset within a tenth of an inch,
    /// used to seed the form from a freshly loaded document.
    pub fn from_dimensions(width_twips: i32, height_twips: i32) -> Self {
        const TOLERANCE: i32 = 144;
        for preset in [Self::A4, Self::Letter, Self::Legal] {
            let (w, h) = preset.dimensions_twips();
            if (width_twips - w).abs() <= TOLERANCE && (height_twips - h).abs() <= TOLERANCE {
                return preset;
            }
        }
        Self::Custom {
            width_in: width_twips as f32 / 1440.0,
            height_in: height_twips as f32 / 1440.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::Letter => "Letter",
            Self::Legal => "Legal",
            Self::Custom { .. } => "Custom",
        }
    }
}

/// Requested margin changes in inches; absent sides stay untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarginsSpec {
    pub top: Option<f32>,
    pub bottom: Option<f32>,
    pub left: Option<f32>,
    pub right: Option<f32>,
}

/// Requested font changes; absent parts stay untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontSpec {
    pub family: Option<String>,
    pub size_pt: Option<f32>,
}

/// The subset of properties the user wants changed. Built fresh per Apply
/// action; every field optional (partial update semantics).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModificationRequest {
    pub page_size: Option<PageSize>,
    pub margins: Option<MarginsSpec>,
    pub font: Option<FontSpec>,
    pub line_spacing: Option<f32>,
}

/// A request that passed [`ModificationRequest::validate`]; the only input
/// `apply` accepts.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    request: ModificationRequest,
}

impl ModificationRequest {
    pub fn is_empty(&self) -> bool {
        self.page_size.is_none()
            && self.margins.map_or(true, |m| {
                m.top.is_none() && m.bottom.is_none() && m.left.is_none() && m.right.is_none()
            })
            && self
                .font
                .as_ref()
                .map_or(true, |f| f.family.is_none() && f.size_pt.is_none())
            && self.line_spacing.is_none()
    }

    /// Check every present field independently, then the combined page
    /// geometry against `props` (with the requested page size, if any).
    pub fn validate(&self, props: &DocumentProps) -> Result<ValidatedRequest, DocumentError> {
        if let Some(PageSize::Custom {
            width_in,
            height_in,
        }) = self.page_size
        {
            check_dimension("page width", width_in)?;
            check_dimension("page height", height_in)?;
        }

        if let Some(margins) = self.margins {
            for (field, value) in [
                ("top margin", margins.top),
                ("bottom margin", margins.bottom),
                ("left margin", margins.left),
                ("right margin", margins.right),
            ] {
                if let Some(value) = value {
                    check_margin(field, value)?;
                }
            }
        }

        if let Some(ref font) = self.font {
            if let Some(ref family) = font.family {
                if family.trim().is_empty() {
                    return Err(DocumentError::validation(
                        "font family",
                        "must not be empty",
                    ));
                }
            }
            if let Some(size) = font.size_pt {
                if !size.is_finite() || size <= 0.0 {
                    return Err(DocumentError::validation(
                        "font size",
                        format!("must be positive, got {size}"),
                    ));
                }
                if size > MAX_FONT_SIZE_PT {
                    return Err(DocumentError::validation(
                        "font size",
                        format!("must be at most {MAX_FONT_SIZE_PT} pt, got {size}"),
                    ));
                }
            }
        }

        if let Some(spacing) = self.line_spacing {
            if !spacing.is_finite()
                || !(MIN_LINE_SPACING..=MAX_LINE_SPACING).contains(&spacing)
            {
                return Err(DocumentError::validation(
                    "line spacing",
                    format!(
                        "must be between {MIN_LINE_SPACING} and {MAX_LINE_SPACING}, got {spacing}"
                    ),
                ));
            }
        }

        // Combined check: margins must leave printable area on the page
        // the document will end up with
        let projected = project(props, self);
        if let Err(reason) = check_geometry(&projected) {
            return Err(DocumentError::validation("margins", reason));
        }

        Ok(ValidatedRequest {
            request: self.clone(),
        })
    }
}

fn check_dimension(field: &'static str, value: f32) -> Result<(), DocumentError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DocumentError::validation(
            field,
            format!("must be positive, got {value}"),
        ));
    }
    if value > MAX_PAGE_DIMENSION_IN {
        return Err(DocumentError::validation(
            field,
            format!("must be at most {MAX_PAGE_DIMENSION_IN} in, got {value}"),
        ));
    }
    Ok(())
}

fn check_margin(field: &'static str, value: f32) -> Result<(), DocumentError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DocumentError::validation(
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    if value > MAX_MARGIN_IN {
        return Err(DocumentError::validation(
            field,
            format!("must be at most {MAX_MARGIN_IN} in, got {value}"),
        ));
    }
    Ok(())
}

/// The properties as they would look with the request applied.
fn project(props: &DocumentProps, request: &ModificationRequest) -> DocumentProps {
    let mut next = props.clone();

    if let Some(page_size) = request.page_size {
        let (width, height) = page_size.dimensions_twips();
        next.page_width = width;
        next.page_height = height;
    }
    if let Some(margins) = request.margins {
        if let Some(top) = margins.top {
            next.margins.top = inches_to_twips(top);
        }
        if let Some(bottom) = margins.bottom {
            next.margins.bottom = inches_to_twips(bottom);
        }
        if let Some(left) = margins.left {
            next.margins.left = inches_to_twips(left);
        }
        if let Some(right) = margins.right {
            next.margins.right = inches_to_twips(right);
        }
    }
    if let Some(ref font) = request.font {
        if let Some(ref family) = font.family {
            next.font_family = Some(family.trim().to_string());
        }
        if let Some(size) = font.size_pt {
            next.font_size_half_points = Some((size * 2.0).round() as u32);
        }
    }
    if let Some(spacing) = request.line_spacing {
        next.line_spacing = Some(spacing);
    }

    next
}

fn check_geometry(props: &DocumentProps) -> Result<(), String> {
    if props.margins.left + props.margins.right >= props.page_width {
        return Err("left and right margins leave no printable width".to_string());
    }
    if props.margins.top + props.margins.bottom >= props.page_height {
        return Err("top and bottom margins leave no printable height".to_string());
    }
    Ok(())
}

/// Apply a validated request to the handle's in-memory properties.
///
/// Snapshot-or-rollback: the combined geometry is re-checked against the
/// handle the request is being applied to, and the properties are replaced
/// in one assignment only after everything passed.
pub fn apply(
    handle: &mut DocumentHandle,
    validated: &ValidatedRequest,
) -> Result<(), DocumentError> {
    let next = project(&handle.props, &validated.request);

    check_geometry(&next).map_err(DocumentError::Apply)?;

    handle.props = next;
    tracing::debug!("Applied modifications to: {}", handle.path.display());
    Ok(())
}
