//! Clinical coordinations.
//!
//! A coordination is the administrative grouping a specialty is displayed
//! under. The set is closed; anything the catalog cannot place lands in
//! [`Coordination::Otras`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coordination bucket.
///
/// Declaration order is display order: therapy units first, then the
/// keyword-catalog coordinations, then the fallback bucket.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Coordination {
    /// High-acuity therapy units (coronary unit, pediatric ICU, ...).
    #[serde(alias = "UNIDADES_DE_TERAPIA")]
    Terapias,
    #[serde(alias = "COORD_MEDICINA")]
    Medicina,
    #[serde(alias = "COORD_CIRUGIA")]
    Cirugia,
    #[serde(alias = "COORD_MODULARES")]
    Modulares,
    #[serde(alias = "COORD_PEDIATRIA")]
    Pediatria,
    #[serde(alias = "COORD_GINECOLOGIA")]
    Ginecologia,
    /// Fallback for specialties no rule recognises.
    #[serde(alias = "OTRAS_ESPECIALIDADES")]
    Otras,
}

impl Coordination {
    /// Every coordination in display order.
    pub const ALL: [Coordination; 7] = [
        Coordination::Terapias,
        Coordination::Medicina,
        Coordination::Cirugia,
        Coordination::Modulares,
        Coordination::Pediatria,
        Coordination::Ginecologia,
        Coordination::Otras,
    ];

    /// Returns the administrative code used in census exports.
    pub fn code(&self) -> &'static str {
        match self {
            Coordination::Terapias => "TERAPIAS",
            Coordination::Medicina => "COORD_MEDICINA",
            Coordination::Cirugia => "COORD_CIRUGIA",
            Coordination::Modulares => "COORD_MODULARES",
            Coordination::Pediatria => "COORD_PEDIATRIA",
            Coordination::Ginecologia => "COORD_GINECOLOGIA",
            Coordination::Otras => "OTRAS_ESPECIALIDADES",
        }
    }

    /// Returns the short name (code without the `COORD_` prefix).
    pub fn short_name(&self) -> &'static str {
        match self {
            Coordination::Terapias => "TERAPIAS",
            Coordination::Medicina => "MEDICINA",
            Coordination::Cirugia => "CIRUGIA",
            Coordination::Modulares => "MODULARES",
            Coordination::Pediatria => "PEDIATRIA",
            Coordination::Ginecologia => "GINECOLOGIA",
            Coordination::Otras => "OTRAS",
        }
    }

    /// Returns the heading shown above the coordination's bucket.
    pub fn title(&self) -> &'static str {
        match self {
            Coordination::Terapias => "UNIDADES DE TERAPIA",
            Coordination::Otras => "OTRAS ESPECIALIDADES",
            other => other.short_name(),
        }
    }

    /// True for the therapy-unit display bucket.
    pub fn is_therapy(&self) -> bool {
        matches!(self, Coordination::Terapias)
    }
}

impl fmt::Display for Coordination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Coordination {
    type Err = String;

    /// Parse a coordination name, accepting both `COORD_MEDICINA` and `MEDICINA`
    /// (case-insensitive, spaces or underscores).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(' ', "_");
        let name = normalized.strip_prefix("COORD_").unwrap_or(&normalized);

        match name {
            "TERAPIAS" | "TERAPIA" | "UNIDADES_DE_TERAPIA" => Ok(Coordination::Terapias),
            "MEDICINA" => Ok(Coordination::Medicina),
            "CIRUGIA" | "CIRUGÍA" => Ok(Coordination::Cirugia),
            "MODULARES" => Ok(Coordination::Modulares),
            "PEDIATRIA" | "PEDIATRÍA" => Ok(Coordination::Pediatria),
            "GINECOLOGIA" | "GINECOLOGÍA" => Ok(Coordination::Ginecologia),
            "OTRAS" | "OTRAS_ESPECIALIDADES" => Ok(Coordination::Otras),
            _ => Err(format!("Unknown coordination: {s}")),
        }
    }
}
