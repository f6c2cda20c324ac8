//! Move-quality classification tiers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Brilliant,
    Critical,
    Best,
    Excellent,
    Okay,
    Inaccuracy,
    Mistake,
    Blunder,
    Forced,
    Theory,
    Risky,
}

impl Classification {
    /// PGN NAG annotation token, where one exists for the tier.
    pub fn nag(self) -> Option<&'static str> {
        match self {
            Classification::Brilliant => Some("$3"),
            Classification::Critical => Some("$1"),
            Classification::Risky => Some("$5"),
            Classification::Inaccuracy => Some("$6"),
            Classification::Mistake => Some("$2"),
            Classification::Blunder => Some("$4"),
            _ => None,
        }
    }

    /// Tiers that, once assigned, must not be overwritten by later
    /// incremental reclassification.
    pub fn is_inalterable(self) -> bool {
        matches!(
            self,
            Classification::Brilliant
                | Classification::Critical
                | Classification::Best
                | Classification::Forced
                | Classification::Theory
        )
    }

    /// Relative ordering of the point-loss tiers, highest first.
    pub fn merit(self) -> u8 {
        match self {
            Classification::Brilliant => 10,
            Classification::Critical => 9,
            Classification::Best => 8,
            Classification::Excellent => 7,
            Classification::Okay => 6,
            Classification::Inaccuracy => 5,
            Classification::Mistake => 4,
            Classification::Blunder => 3,
            Classification::Forced => 2,
            Classification::Theory => 1,
            Classification::Risky => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inalterable_subset() {
        assert!(Classification::Brilliant.is_inalterable());
        assert!(Classification::Critical.is_inalterable());
        assert!(Classification::Best.is_inalterable());
        assert!(Classification::Forced.is_inalterable());
        assert!(Classification::Theory.is_inalterable());

        assert!(!Classification::Excellent.is_inalterable());
        assert!(!Classification::Blunder.is_inalterable());
        assert!(!Classification::Risky.is_inalterable());
    }

    #[test]
    fn test_nag_tokens() {
        assert_eq!(Classification::Brilliant.nag(), Some("$3"));
        assert_eq!(Classification::Blunder.nag(), Some("$4"));
        assert_eq!(Classification::Best.nag(), None);
        assert_eq!(Classification::Theory.nag(), None);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&Classification::Inaccuracy).unwrap(),
            "\"inaccuracy\""
        );
        assert_eq!(
            serde_json::from_str::<Classification>("\"brilliant\"").unwrap(),
            Classification::Brilliant
        );
    }
}
