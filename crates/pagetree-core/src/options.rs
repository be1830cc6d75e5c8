//! Layout options shared by configuration, events and the CLI.
//!
//! - [`LayoutDirection`] - Primary axis ranks grow along
//! - [`LayoutEngine`] - Algorithm used to assign positions
//!
//! Both serialize as the short lowercase names used in configuration files
//! and event scripts.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Direction in which hierarchy ranks are stacked.
///
/// # Variants
///
/// - `TopToBottom` (`"tb"`): roots at the top, children below.
/// - `LeftToRight` (`"lr"`): roots on the left, children to the right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutDirection {
    #[default]
    #[serde(rename = "tb", alias = "TB")]
    TopToBottom,
    #[serde(rename = "lr", alias = "LR")]
    LeftToRight,
}

impl LayoutDirection {
    /// Returns true for [`LayoutDirection::LeftToRight`].
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftToRight)
    }
}

impl FromStr for LayoutDirection {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tb" | "TB" => Ok(Self::TopToBottom),
            "lr" | "LR" => Ok(Self::LeftToRight),
            _ => Err("Unsupported layout direction"),
        }
    }
}

impl From<LayoutDirection> for &'static str {
    fn from(val: LayoutDirection) -> Self {
        match val {
            LayoutDirection::TopToBottom => "tb",
            LayoutDirection::LeftToRight => "lr",
        }
    }
}

impl Display for LayoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Available layout engines.
///
/// # Variants
///
/// - `Sugiyama` (default): layered drawing with crossing minimization.
/// - `Basic`: tidy tree, leaves packed in id order and parents centered
///   over their children. Also the fallback when the layered engine fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutEngine {
    #[default]
    Sugiyama,
    Basic,
}

impl FromStr for LayoutEngine {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sugiyama" => Ok(Self::Sugiyama),
            "basic" => Ok(Self::Basic),
            _ => Err("Unsupported layout engine"),
        }
    }
}

impl From<LayoutEngine> for &'static str {
    fn from(val: LayoutEngine) -> Self {
        match val {
            LayoutEngine::Sugiyama => "sugiyama",
            LayoutEngine::Basic => "basic",
        }
    }
}

impl Display for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_round_trips_through_str() {
        for direction in [LayoutDirection::TopToBottom, LayoutDirection::LeftToRight] {
            let parsed: LayoutDirection = direction.to_string().parse().unwrap();
            assert_eq!(parsed, direction);
        }
        assert!("diagonal".parse::<LayoutDirection>().is_err());
    }

    #[test]
    fn test_direction_accepts_uppercase_alias() {
        let direction: LayoutDirection = serde_json::from_str("\"LR\"").unwrap();
        assert!(direction.is_horizontal());
        assert_eq!(serde_json::to_string(&direction).unwrap(), "\"lr\"");
    }

    #[test]
    fn test_engine_names() {
        assert_eq!(LayoutEngine::default(), LayoutEngine::Sugiyama);
        assert_eq!("basic".parse::<LayoutEngine>(), Ok(LayoutEngine::Basic));
        assert_eq!(
            serde_json::from_str::<LayoutEngine>("\"sugiyama\"").unwrap(),
            LayoutEngine::Sugiyama
        );
    }
}
