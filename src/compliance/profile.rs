//! The active conformance profile and the checks it imposes.
//!
//! Each `verify_*` method returns `Ok(())` when the construct is allowed and
//! an [`Error::Conformance`] naming the violated profile otherwise. Callers
//! run the checks at the point where the construct enters the document, so
//! the violation aborts generation before any output is produced.

use super::types::{PdfALevel, PdfVtLevel, PdfXLevel};
use crate::config::PdfVersion;
use crate::error::{ConformanceError, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of actions the profile may restrict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// `/S /GoTo`
    GoTo,
    /// `/S /GoToR`
    GoToRemote,
    /// `/S /Launch`
    Launch,
    /// `/S /JavaScript`
    JavaScript,
    /// `/S /SetOCGState`
    SetOcgState,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::GoTo => "GoTo",
            ActionKind::GoToRemote => "GoToR",
            ActionKind::Launch => "Launch",
            ActionKind::JavaScript => "JavaScript",
            ActionKind::SetOcgState => "SetOCGState",
        };
        write!(f, "{}", name)
    }
}

/// PDF/A, PDF/X and PDF/VT modes of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pdfa: Option<PdfALevel>,
    pdfx: Option<PdfXLevel>,
    pdfvt: Option<PdfVtLevel>,
}

impl Profile {
    /// No conformance restrictions.
    pub fn none() -> Self {
        Self::default()
    }

    /// A combined profile. PDF/VT is only valid on top of PDF/X-4.
    pub fn new(
        pdfa: Option<PdfALevel>,
        pdfx: Option<PdfXLevel>,
        pdfvt: Option<PdfVtLevel>,
    ) -> Result<Self> {
        let profile = Self { pdfa, pdfx, pdfvt };
        profile.validate()?;
        Ok(profile)
    }

    /// PDF/A only.
    pub fn pdfa(level: PdfALevel) -> Self {
        Self {
            pdfa: Some(level),
            ..Self::default()
        }
    }

    /// PDF/X only.
    pub fn pdfx(level: PdfXLevel) -> Self {
        Self {
            pdfx: Some(level),
            ..Self::default()
        }
    }

    /// Check that the combination of modes is consistent.
    pub fn validate(&self) -> Result<()> {
        if let Some(vt) = self.pdfvt {
            if self.pdfx != Some(PdfXLevel::X4) {
                return Err(violation(
                    vt,
                    format!("{} requires PDF/X-4 to be enabled", vt),
                ));
            }
        }
        Ok(())
    }

    /// The PDF/A level, if enabled.
    pub fn pdfa_level(&self) -> Option<PdfALevel> {
        self.pdfa
    }

    /// The PDF/X level, if enabled.
    pub fn pdfx_level(&self) -> Option<PdfXLevel> {
        self.pdfx
    }

    /// The PDF/VT level, if enabled.
    pub fn pdfvt_level(&self) -> Option<PdfVtLevel> {
        self.pdfvt
    }

    /// Whether any mode is enabled.
    pub fn is_enabled(&self) -> bool {
        self.pdfa.is_some() || self.pdfx.is_some() || self.pdfvt.is_some()
    }

    /// PDF/A and PDF/X require every font program to be embedded.
    pub fn verify_font_embedding(&self, font_name: &str, embedded: bool) -> Result<()> {
        if embedded {
            return Ok(());
        }
        if let Some(level) = self.pdfa {
            return Err(violation(
                level,
                format!("all fonts must be embedded; offending font: {}", font_name),
            ));
        }
        if let Some(level) = self.pdfx {
            return Err(violation(
                level,
                format!("all fonts must be embedded; offending font: {}", font_name),
            ));
        }
        Ok(())
    }

    /// PDF/A and PDF/X forbid encryption.
    pub fn verify_encryption_allowed(&self) -> Result<()> {
        if let Some(level) = self.pdfa {
            return Err(violation(level, "encryption is not allowed"));
        }
        if let Some(level) = self.pdfx {
            return Err(violation(level, "encryption is not allowed"));
        }
        Ok(())
    }

    /// Embedded files are only allowed by PDF/A-3, and never by PDF/X.
    pub fn verify_embedded_files_allowed(&self) -> Result<()> {
        if let Some(level) = self.pdfa {
            if !level.allows_embedded_files() {
                return Err(violation(level, "embedded files are not allowed"));
            }
        }
        if let Some(level) = self.pdfx {
            return Err(violation(level, "embedded files are not allowed"));
        }
        Ok(())
    }

    /// PDF/A forbids Launch and JavaScript actions.
    pub fn verify_action_allowed(&self, kind: ActionKind) -> Result<()> {
        if let Some(level) = self.pdfa {
            if matches!(kind, ActionKind::Launch | ActionKind::JavaScript) {
                return Err(violation(level, format!("{} actions are not allowed", kind)));
            }
        }
        Ok(())
    }

    /// PDF/A-1 is bound to PDF 1.4; PDF/X needs at least its base version.
    pub fn verify_pdf_version(&self, version: PdfVersion) -> Result<()> {
        if let Some(level) = self.pdfa {
            if level.part() == super::types::PdfAPart::Part1 && version != PdfVersion::V1_4 {
                return Err(violation(
                    level,
                    format!("PDF version must be 1.4, found {}", version),
                ));
            }
        }
        if let Some(level) = self.pdfx {
            let required = level.required_pdf_version();
            if version < required {
                return Err(violation(
                    level,
                    format!("PDF version must be {} or newer, found {}", required, version),
                ));
            }
        }
        Ok(())
    }

    /// PDF/A level A requires a structure tree.
    pub fn verify_tagged_pdf(&self, tagged: bool) -> Result<()> {
        match self.pdfa {
            Some(level) if level.requires_structure() && !tagged => Err(violation(
                level,
                "the document must be tagged (enable accessibility)",
            )),
            _ => Ok(()),
        }
    }

    /// PDF/X requires a document title.
    pub fn verify_title_present(&self, has_title: bool) -> Result<()> {
        match self.pdfx {
            Some(level) if !has_title => Err(violation(level, "a document title is required")),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(level) = self.pdfa {
            parts.push(level.to_string());
        }
        if let Some(level) = self.pdfx {
            parts.push(level.to_string());
        }
        if let Some(level) = self.pdfvt {
            parts.push(level.to_string());
        }
        if parts.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", parts.join(" + "))
        }
    }
}

fn violation(profile: impl fmt::Display, message: impl Into<String>) -> Error {
    let error = ConformanceError::new(profile.to_string(), message);
    log::debug!("{}", error);
    Error::Conformance(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_profile_allows_everything() {
        let profile = Profile::none();
        assert!(!profile.is_enabled());
        assert!(profile.verify_font_embedding("Helvetica", false).is_ok());
        assert!(profile.verify_encryption_allowed().is_ok());
        assert!(profile.verify_embedded_files_allowed().is_ok());
        assert!(profile.verify_action_allowed(ActionKind::Launch).is_ok());
        assert!(profile.verify_pdf_version(PdfVersion::V1_3).is_ok());
    }

    #[test]
    fn test_pdfa_font_embedding() {
        let profile = Profile::pdfa(PdfALevel::A1b);
        let err = profile.verify_font_embedding("Helvetica", false).unwrap_err();
        assert!(err.is_conformance());
        assert!(err.to_string().contains("PDF/A-1b"));
        assert!(profile.verify_font_embedding("Helvetica", true).is_ok());
    }

    #[test]
    fn test_vt_requires_x4() {
        assert!(Profile::new(None, None, Some(PdfVtLevel::Vt1)).is_err());
        assert!(Profile::new(None, Some(PdfXLevel::X32003), Some(PdfVtLevel::Vt1)).is_err());
        assert!(Profile::new(None, Some(PdfXLevel::X4), Some(PdfVtLevel::Vt1)).is_ok());
    }

    #[test]
    fn test_embedded_files_by_part() {
        assert!(Profile::pdfa(PdfALevel::A2b).verify_embedded_files_allowed().is_err());
        assert!(Profile::pdfa(PdfALevel::A3b).verify_embedded_files_allowed().is_ok());
        assert!(Profile::pdfx(PdfXLevel::X4).verify_embedded_files_allowed().is_err());
    }

    #[test]
    fn test_pdf_version_rules() {
        let a1 = Profile::pdfa(PdfALevel::A1a);
        assert!(a1.verify_pdf_version(PdfVersion::V1_4).is_ok());
        assert!(a1.verify_pdf_version(PdfVersion::V1_7).is_err());

        let x4 = Profile::pdfx(PdfXLevel::X4);
        assert!(x4.verify_pdf_version(PdfVersion::V1_4).is_err());
        assert!(x4.verify_pdf_version(PdfVersion::V1_7).is_ok());
    }

    #[test]
    fn test_tagged_and_title() {
        assert!(Profile::pdfa(PdfALevel::A2a).verify_tagged_pdf(false).is_err());
        assert!(Profile::pdfa(PdfALevel::A2b).verify_tagged_pdf(false).is_ok());
        assert!(Profile::pdfx(PdfXLevel::X1a2003).verify_title_present(false).is_err());
        assert!(Profile::pdfx(PdfXLevel::X1a2003).verify_title_present(true).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(Profile::none().to_string(), "none");
        let combined = Profile::new(Some(PdfALevel::A2b), Some(PdfXLevel::X4), None).unwrap();
        assert_eq!(combined.to_string(), "PDF/A-2b + PDF/X-4");
    }
}
