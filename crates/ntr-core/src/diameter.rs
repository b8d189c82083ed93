//! Nominal-diameter ("DN") definitions.
//!
//! A nominal diameter is a named pipe-size class. Files define the classes
//! they use with `DN` records; elements refer to them by code.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Nominal-diameter definitions keyed by normalized code, in definition order.
pub type DiameterTable = IndexMap<String, NominalDiameter>;

/// Physical dimensions of one nominal-diameter class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NominalDiameter {
    /// Outside diameter (`DA`).
    pub outside_diameter: f64,
    /// Wall thickness (`S`).
    pub thickness: Option<f64>,
}

impl NominalDiameter {
    pub fn new(outside_diameter: f64, thickness: Option<f64>) -> Self {
        Self {
            outside_diameter,
            thickness,
        }
    }
}

/// Normalizes a diameter code for use as a table key.
///
/// Whitespace is removed and letters are upper-cased, so `" dn 150"` and
/// `"DN150"` name the same class.
///
/// ```
/// # use ntr_core::diameter::normalize_code;
/// assert_eq!(normalize_code(" dn 150 "), "DN150");
/// ```
pub fn normalize_code(code: &str) -> String {
    code.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Looks up a code in `table`, normalizing it first.
pub fn lookup<'a>(table: &'a DiameterTable, code: &str) -> Option<&'a NominalDiameter> {
    table.get(&normalize_code(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("DN150"), "DN150");
        assert_eq!(normalize_code("dn150"), "DN150");
        assert_eq!(normalize_code("  DN 150\t"), "DN150");
        assert_eq!(normalize_code(""), "");
    }

    #[test]
    fn test_lookup_normalizes_query() {
        let mut table = DiameterTable::new();
        table.insert("DN150".to_string(), NominalDiameter::new(168.3, Some(4.5)));

        assert_eq!(
            lookup(&table, "dn 150").map(|d| d.outside_diameter),
            Some(168.3)
        );
        assert!(lookup(&table, "DN100").is_none());
    }
}
