//! Conformance levels for PDF/A, PDF/X and PDF/VT.

use crate::config::PdfVersion;
use serde::{Deserialize, Serialize};
use std::fmt;

/// PDF/A conformance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PdfALevel {
    /// PDF/A-1a: Full conformance with logical structure
    A1a,
    /// PDF/A-1b: Basic conformance (visual preservation)
    A1b,
    /// PDF/A-2a: PDF 1.7 based, full conformance
    A2a,
    /// PDF/A-2b: PDF 1.7 based, basic conformance
    A2b,
    /// PDF/A-2u: PDF/A-2b plus Unicode mapping
    A2u,
    /// PDF/A-3a: PDF/A-2a plus embedded files
    A3a,
    /// PDF/A-3b: PDF/A-2b plus embedded files
    A3b,
    /// PDF/A-3u: PDF/A-3b plus Unicode mapping
    A3u,
}

impl PdfALevel {
    /// Get the PDF/A part (1, 2, or 3).
    pub fn part(&self) -> PdfAPart {
        match self {
            PdfALevel::A1a | PdfALevel::A1b => PdfAPart::Part1,
            PdfALevel::A2a | PdfALevel::A2b | PdfALevel::A2u => PdfAPart::Part2,
            PdfALevel::A3a | PdfALevel::A3b | PdfALevel::A3u => PdfAPart::Part3,
        }
    }

    /// Get the conformance level letter.
    pub fn conformance(&self) -> char {
        match self {
            PdfALevel::A1a | PdfALevel::A2a | PdfALevel::A3a => 'A',
            PdfALevel::A1b | PdfALevel::A2b | PdfALevel::A3b => 'B',
            PdfALevel::A2u | PdfALevel::A3u => 'U',
        }
    }

    /// Level A requires a logical structure (Tagged PDF).
    pub fn requires_structure(&self) -> bool {
        self.conformance() == 'A'
    }

    /// Only part 3 allows arbitrary embedded files.
    pub fn allows_embedded_files(&self) -> bool {
        self.part() == PdfAPart::Part3
    }
}

impl fmt::Display for PdfALevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.part(), self.conformance().to_ascii_lowercase())
    }
}

/// PDF/A part (version).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PdfAPart {
    /// PDF/A-1 (based on PDF 1.4)
    Part1,
    /// PDF/A-2 (based on PDF 1.7)
    Part2,
    /// PDF/A-3 (based on PDF 1.7, with embedded files)
    Part3,
}

impl fmt::Display for PdfAPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfAPart::Part1 => write!(f, "PDF/A-1"),
            PdfAPart::Part2 => write!(f, "PDF/A-2"),
            PdfAPart::Part3 => write!(f, "PDF/A-3"),
        }
    }
}

/// PDF/X conformance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PdfXLevel {
    /// PDF/X-1a:2003 (ISO 15930-4)
    X1a2003,
    /// PDF/X-3:2003 (ISO 15930-6)
    X32003,
    /// PDF/X-4 (ISO 15930-7)
    X4,
}

impl PdfXLevel {
    /// Oldest PDF version the level is based on.
    pub fn required_pdf_version(&self) -> PdfVersion {
        match self {
            Self::X1a2003 | Self::X32003 => PdfVersion::V1_4,
            Self::X4 => PdfVersion::V1_6,
        }
    }

    /// Value of `/GTS_PDFXVersion` in the document information dictionary.
    pub fn gts_pdfx_version(&self) -> &'static str {
        match self {
            Self::X1a2003 => "PDF/X-1a:2003",
            Self::X32003 => "PDF/X-3:2003",
            Self::X4 => "PDF/X-4",
        }
    }
}

impl fmt::Display for PdfXLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gts_pdfx_version())
    }
}

/// PDF/VT conformance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PdfVtLevel {
    /// PDF/VT-1 (ISO 16612-2), layered on PDF/X-4
    Vt1,
}

impl fmt::Display for PdfVtLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfVtLevel::Vt1 => write!(f, "PDF/VT-1"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdfa_display() {
        assert_eq!(PdfALevel::A1b.to_string(), "PDF/A-1b");
        assert_eq!(PdfALevel::A3u.to_string(), "PDF/A-3u");
    }

    #[test]
    fn test_pdfa_capabilities() {
        assert!(PdfALevel::A2a.requires_structure());
        assert!(!PdfALevel::A2b.requires_structure());
        assert!(PdfALevel::A3b.allows_embedded_files());
        assert!(!PdfALevel::A2u.allows_embedded_files());
    }

    #[test]
    fn test_pdfx_versions() {
        assert_eq!(PdfXLevel::X1a2003.required_pdf_version(), PdfVersion::V1_4);
        assert_eq!(PdfXLevel::X4.required_pdf_version(), PdfVersion::V1_6);
        assert_eq!(PdfXLevel::X32003.to_string(), "PDF/X-3:2003");
    }
}
