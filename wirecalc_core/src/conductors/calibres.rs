//! Standard Conductor Calibres
//!
//! AWG and kcmil conductor designations with their metric dimensions per
//! NOM-001-SEDE Chapter 10 (Tables 5 and 8).
//!
//! ## Dimensions
//!
//! - **Section**: bare metal cross-section (mm²), used for ampacity and
//!   resistance tables
//! - **Outer diameter**: insulated conductor diameter (mm) for THHN/THHW-LS
//!   building wire, used for tray widths
//! - **Insulated area**: π·d²/4 of the outer diameter, used for conduit fill

use serde::{Deserialize, Serialize};

/// Standard conductor calibre
///
/// Ordered from smallest to largest, so `Ord` follows conductor size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Calibre {
    #[serde(rename = "14 AWG")]
    Awg14,
    #[serde(rename = "12 AWG")]
    Awg12,
    #[serde(rename = "10 AWG")]
    Awg10,
    #[serde(rename = "8 AWG")]
    Awg8,
    #[serde(rename = "6 AWG")]
    Awg6,
    #[serde(rename = "4 AWG")]
    Awg4,
    #[serde(rename = "3 AWG")]
    Awg3,
    #[serde(rename = "2 AWG")]
    Awg2,
    #[serde(rename = "1 AWG")]
    Awg1,
    #[serde(rename = "1/0 AWG")]
    Awg1_0,
    #[serde(rename = "2/0 AWG")]
    Awg2_0,
    #[serde(rename = "3/0 AWG")]
    Awg3_0,
    #[serde(rename = "4/0 AWG")]
    Awg4_0,
    #[serde(rename = "250 kcmil")]
    Kcmil250,
    #[serde(rename = "300 kcmil")]
    Kcmil300,
    #[serde(rename = "350 kcmil")]
    Kcmil350,
    #[serde(rename = "400 kcmil")]
    Kcmil400,
    #[serde(rename = "500 kcmil")]
    Kcmil500,
    #[serde(rename = "600 kcmil")]
    Kcmil600,
    #[serde(rename = "750 kcmil")]
    Kcmil750,
    #[serde(rename = "1000 kcmil")]
    Kcmil1000,
}

impl Calibre {
    /// All calibres, smallest first
    pub const ALL: [Calibre; 21] = [
        Calibre::Awg14,
        Calibre::Awg12,
        Calibre::Awg10,
        Calibre::Awg8,
        Calibre::Awg6,
        Calibre::Awg4,
        Calibre::Awg3,
        Calibre::Awg2,
        Calibre::Awg1,
        Calibre::Awg1_0,
        Calibre::Awg2_0,
        Calibre::Awg3_0,
        Calibre::Awg4_0,
        Calibre::Kcmil250,
        Calibre::Kcmil300,
        Calibre::Kcmil350,
        Calibre::Kcmil400,
        Calibre::Kcmil500,
        Calibre::Kcmil600,
        Calibre::Kcmil750,
        Calibre::Kcmil1000,
    ];

    /// Get the metric dimensions (section mm², insulated outer diameter mm)
    ///
    /// Returns (section_mm2, outer_diameter_mm)
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            Calibre::Awg14 => (2.08, 2.819),
            Calibre::Awg12 => (3.31, 3.302),
            Calibre::Awg10 => (5.26, 4.166),
            Calibre::Awg8 => (8.37, 5.486),
            Calibre::Awg6 => (13.3, 6.452),
            Calibre::Awg4 => (21.2, 8.230),
            Calibre::Awg3 => (26.7, 8.941),
            Calibre::Awg2 => (33.6, 9.754),
            Calibre::Awg1 => (42.4, 11.33),
            Calibre::Awg1_0 => (53.5, 12.34),
            Calibre::Awg2_0 => (67.4, 13.51),
            Calibre::Awg3_0 => (85.0, 14.83),
            Calibre::Awg4_0 => (107.2, 16.31),
            Calibre::Kcmil250 => (126.7, 18.06),
            Calibre::Kcmil300 => (152.0, 19.46),
            Calibre::Kcmil350 => (177.3, 20.75),
            Calibre::Kcmil400 => (202.7, 21.95),
            Calibre::Kcmil500 => (253.4, 24.10),
            Calibre::Kcmil600 => (304.0, 26.70),
            Calibre::Kcmil750 => (380.0, 29.36),
            Calibre::Kcmil1000 => (506.7, 33.73),
        }
    }

    /// Get display name (e.g., "1/0 AWG")
    pub fn display_name(&self) -> &'static str {
        match self {
            Calibre::Awg14 => "14 AWG",
            Calibre::Awg12 => "12 AWG",
            Calibre::Awg10 => "10 AWG",
            Calibre::Awg8 => "8 AWG",
            Calibre::Awg6 => "6 AWG",
            Calibre::Awg4 => "4 AWG",
            Calibre::Awg3 => "3 AWG",
            Calibre::Awg2 => "2 AWG",
            Calibre::Awg1 => "1 AWG",
            Calibre::Awg1_0 => "1/0 AWG",
            Calibre::Awg2_0 => "2/0 AWG",
            Calibre::Awg3_0 => "3/0 AWG",
            Calibre::Awg4_0 => "4/0 AWG",
            Calibre::Kcmil250 => "250 kcmil",
            Calibre::Kcmil300 => "300 kcmil",
            Calibre::Kcmil350 => "350 kcmil",
            Calibre::Kcmil400 => "400 kcmil",
            Calibre::Kcmil500 => "500 kcmil",
            Calibre::Kcmil600 => "600 kcmil",
            Calibre::Kcmil750 => "750 kcmil",
            Calibre::Kcmil1000 => "1000 kcmil",
        }
    }

    /// Bare metal cross-section in mm²
    pub fn section_mm2(&self) -> f64 {
        self.dimensions().0
    }

    /// Insulated outer diameter in mm
    pub fn outer_diameter_mm(&self) -> f64 {
        self.dimensions().1
    }

    /// Insulated total area (π·d²/4) in mm², used for conduit fill
    pub fn insulated_area_mm2(&self) -> f64 {
        let d = self.outer_diameter_mm();
        std::f64::consts::PI * d * d / 4.0
    }

    /// Parse a designation such as "2", "2 AWG", "1/0" or "250 kcmil"
    pub fn from_designation(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        let bare = normalized
            .trim_end_matches("awg")
            .trim_end_matches("kcmil")
            .trim_end_matches("mcm")
            .trim();
        Self::ALL.iter().copied().find(|c| {
            let name = c.display_name().to_ascii_lowercase();
            name.split_whitespace().next() == Some(bare)
        })
    }
}

impl std::fmt::Display for Calibre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_increase_with_calibre() {
        for pair in Calibre::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].section_mm2() < pair[1].section_mm2());
            assert!(pair[0].outer_diameter_mm() < pair[1].outer_diameter_mm());
        }
    }

    #[test]
    fn test_insulated_area() {
        // 2 AWG THHN: d = 9.754 mm, area ≈ 74.7 mm²
        assert!((Calibre::Awg2.insulated_area_mm2() - 74.72).abs() < 0.1);
    }

    #[test]
    fn test_from_designation() {
        assert_eq!(Calibre::from_designation("1/0"), Some(Calibre::Awg1_0));
        assert_eq!(Calibre::from_designation("2 AWG"), Some(Calibre::Awg2));
        assert_eq!(Calibre::from_designation("250 kcmil"), Some(Calibre::Kcmil250));
        assert_eq!(Calibre::from_designation("250 MCM"), Some(Calibre::Kcmil250));
        assert_eq!(Calibre::from_designation("7"), None);
    }

    #[test]
    fn test_serialization_uses_designation() {
        let json = serde_json::to_string(&Calibre::Awg4_0).unwrap();
        assert_eq!(json, "\"4/0 AWG\"");
        let back: Calibre = serde_json::from_str("\"500 kcmil\"").unwrap();
        assert_eq!(back, Calibre::Kcmil500);
    }
}
