use serde::{Deserialize, Serialize};

/// Diameter of the base assumed for models without a base descriptor.
pub const DEFAULT_BASE_MM: f64 = 25.0;

/// Physical base descriptor as printed on a datasheet, in millimeters.
///
/// ```toml
/// base = { shape = "oval", length_mm = 60.0, width_mm = 35.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum BaseSize {
    Circle { diameter_mm: f64 },
    Oval { length_mm: f64, width_mm: f64 },
    Rectangle { length_mm: f64, width_mm: f64 },
}

impl BaseSize {
    /// Round base of the given diameter.
    #[must_use]
    pub fn round(diameter_mm: f64) -> Self {
        Self::Circle { diameter_mm }
    }
}

impl Default for BaseSize {
    fn default() -> Self {
        Self::round(DEFAULT_BASE_MM)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Entry {
        base: BaseSize,
    }

    #[test]
    fn parses_tagged_descriptor() {
        let e: Entry =
            toml::from_str(r#"base = { shape = "oval", length_mm = 60.0, width_mm = 35.0 }"#)
                .unwrap();
        assert_eq!(
            e.base,
            BaseSize::Oval {
                length_mm: 60.0,
                width_mm: 35.0
            }
        );
    }

    #[test]
    fn default_is_small_round_base() {
        assert_eq!(BaseSize::default(), BaseSize::round(25.0));
    }
}
