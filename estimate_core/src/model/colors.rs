//! Panel color selections.
//!
//! Colors are stored as free-form codes (normally `#RRGGBB`). Any string is
//! accepted; the named palette is only used to show a friendly name.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::EstimateResult;
use crate::patch::Validate;

/// Stock panel colors: (code, name)
pub const PALETTE: [(&str, &str); 12] = [
    ("#FFFFFF", "Polar White"),
    ("#E8E4D8", "Light Stone"),
    ("#C2B280", "Sandstone"),
    ("#8B7355", "Tan"),
    ("#6F4E37", "Burnished Slate"),
    ("#3B3B3B", "Charcoal"),
    ("#000000", "Black"),
    ("#8B0000", "Barn Red"),
    ("#1F4E79", "Gallery Blue"),
    ("#2F4F2F", "Hunter Green"),
    ("#A9A9A9", "Pewter Gray"),
    ("#B87333", "Copper Metallic"),
];

static PALETTE_NAMES: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    PALETTE
        .iter()
        .map(|(code, name)| (code.to_ascii_uppercase(), *name))
        .collect()
});

/// Friendly name for a color code, or "Custom" when it is not a stock color.
pub fn palette_name(code: &str) -> &'static str {
    PALETTE_NAMES
        .get(&code.trim().to_ascii_uppercase())
        .copied()
        .unwrap_or("Custom")
}

/// Roof, wall and trim colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorConfig {
    pub roof: String,
    pub walls: String,
    pub trim: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        ColorConfig {
            roof: "#3B3B3B".to_string(),
            walls: "#E8E4D8".to_string(),
            trim: "#3B3B3B".to_string(),
        }
    }
}

impl ColorConfig {
    pub fn apply(&mut self, patch: ColorPatch) {
        if let Some(roof) = patch.roof {
            self.roof = roof;
        }
        if let Some(walls) = patch.walls {
            self.walls = walls;
        }
        if let Some(trim) = patch.trim {
            self.trim = trim;
        }
    }
}

/// Partial update for [`ColorConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorPatch {
    pub roof: Option<String>,
    pub walls: Option<String>,
    pub trim: Option<String>,
}

impl Validate for ColorPatch {
    fn validate(&self) -> EstimateResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_lookup() {
        assert_eq!(palette_name("#8b0000"), "Barn Red");
        assert_eq!(palette_name("#123456"), "Custom");
        assert_eq!(palette_name("teal"), "Custom");
    }

    #[test]
    fn test_any_code_accepted() {
        let mut colors = ColorConfig::default();
        colors.apply(ColorPatch {
            trim: Some("not-a-color".to_string()),
            ..Default::default()
        });
        assert_eq!(colors.trim, "not-a-color");
        assert_eq!(colors.roof, ColorConfig::default().roof);
    }
}
