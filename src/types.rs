/// Whether solder mask lies over a board feature.
///
/// Resolved once, when an element is ingested, so that call sites never have to interpret a missing
/// flag themselves.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Option<bool>"))]
pub enum Coverage {
    /// Solder mask lies over the feature, no opening is needed.
    Covered,
    /// The feature is left bare, an opening must be cut. Also used when the flag is absent.
    #[default]
    Exposed,
    /// The feature can never be covered, e.g. a via always exposes its metal barrel.
    AlwaysExposed,
}

impl Coverage {
    pub fn is_covered(&self) -> bool {
        matches!(self, Coverage::Covered)
    }

    /// True when an opening has to be cut into the mask for this feature.
    pub fn needs_opening(&self) -> bool {
        !self.is_covered()
    }
}

impl From<bool> for Coverage {
    fn from(value: bool) -> Self {
        match value {
            true => Coverage::Covered,
            false => Coverage::Exposed,
        }
    }
}

impl From<Option<bool>> for Coverage {
    fn from(value: Option<bool>) -> Self {
        value
            .map(Coverage::from)
            .unwrap_or_default()
    }
}

/// The two outer copper sides a solder mask can be rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
        }
    }
}
