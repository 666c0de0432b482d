use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Fake,
    Real,
    Unknown,
}

impl Label {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fake => "FAKE",
            Self::Real => "REAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Fixed mapping from the trained model's output index.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Fake,
            _ => Self::Real,
        }
    }
}

impl TryFrom<&str> for Label {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "FAKE" => Ok(Self::Fake),
            "REAL" => Ok(Self::Real),
            "UNKNOWN" => Ok(Self::Unknown),
            _ => anyhow::bail!("Unknown label: {value}"),
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::Label;

    #[test]
    fn index_zero_maps_to_fake() {
        assert_eq!(Label::from_index(0), Label::Fake);
        assert_eq!(Label::from_index(1), Label::Real);
        assert_eq!(Label::from_index(7), Label::Real);
    }

    #[test]
    fn names_round_trip() {
        for label in [Label::Fake, Label::Real, Label::Unknown] {
            assert_eq!(Label::try_from(label.name()).unwrap(), label);
        }
        assert!(Label::try_from("MAYBE").is_err());
    }
}
