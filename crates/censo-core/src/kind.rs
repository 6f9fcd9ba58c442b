use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which workbook to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// General epidemiology census, one table.
    Census,
    /// Supplies report, one sheet per specialty.
    Supplies,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Census => "census",
            ReportKind::Supplies => "supplies",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "census" | "censo" => Ok(ReportKind::Census),
            "supplies" | "insumos" => Ok(ReportKind::Supplies),
            _ => Err(format!("Unknown report kind: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_english_and_spanish_names() {
        assert_eq!("census".parse::<ReportKind>(), Ok(ReportKind::Census));
        assert_eq!("INSUMOS".parse::<ReportKind>(), Ok(ReportKind::Supplies));
        assert!("xpt".parse::<ReportKind>().is_err());
    }
}
