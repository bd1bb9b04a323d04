use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Lower bounds (inclusive) of the young adult, adult and older adult buckets.
pub const YOUNG_ADULT_AGE: u32 = 18;
pub const ADULT_AGE: u32 = 36;
pub const OLDER_ADULT_AGE: u32 = 61;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AgeGroup {
    #[serde(rename = "Children")]
    Children,
    #[serde(rename = "Young Adults")]
    YoungAdults,
    #[serde(rename = "Adults")]
    Adults,
    #[serde(rename = "Older Adults")]
    OlderAdults,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Children,
        AgeGroup::YoungAdults,
        AgeGroup::Adults,
        AgeGroup::OlderAdults,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Children => "Children",
            AgeGroup::YoungAdults => "Young Adults",
            AgeGroup::Adults => "Adults",
            AgeGroup::OlderAdults => "Older Adults",
        }
    }

    pub fn from_label(label: &str) -> Option<AgeGroup> {
        AgeGroup::ALL.into_iter().find(|group| group.label() == label)
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts `young-adults`, `young_adults`, `Young Adults` and so on.
impl FromStr for AgeGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "children" => Ok(AgeGroup::Children),
            "youngadults" => Ok(AgeGroup::YoungAdults),
            "adults" => Ok(AgeGroup::Adults),
            "olderadults" => Ok(AgeGroup::OlderAdults),
            _ => Err(format!(
                "unknown age group `{}` (expected children, young-adults, adults or older-adults)",
                s
            )),
        }
    }
}

pub fn classify_age(age: u32) -> AgeGroup {
    if age < YOUNG_ADULT_AGE {
        AgeGroup::Children
    } else if age < ADULT_AGE {
        AgeGroup::YoungAdults
    } else if age < OLDER_ADULT_AGE {
        AgeGroup::Adults
    } else {
        AgeGroup::OlderAdults
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_belong_to_the_upper_bucket() {
        assert_eq!(classify_age(0), AgeGroup::Children);
        assert_eq!(classify_age(17), AgeGroup::Children);
        assert_eq!(classify_age(18), AgeGroup::YoungAdults);
        assert_eq!(classify_age(35), AgeGroup::YoungAdults);
        assert_eq!(classify_age(36), AgeGroup::Adults);
        assert_eq!(classify_age(60), AgeGroup::Adults);
        assert_eq!(classify_age(61), AgeGroup::OlderAdults);
        assert_eq!(classify_age(u32::MAX), AgeGroup::OlderAdults);
    }

    #[test]
    fn buckets_partition_ages_in_order() {
        // classification is monotone, so each bucket is one contiguous run
        let groups: Vec<AgeGroup> = (0..=150).map(classify_age).collect();
        assert!(groups.windows(2).all(|w| w[0] <= w[1]));

        for group in AgeGroup::ALL {
            assert!(groups.contains(&group));
        }
        assert_eq!(groups.iter().filter(|g| **g == AgeGroup::Children).count(), 18);
        assert_eq!(groups.iter().filter(|g| **g == AgeGroup::YoungAdults).count(), 18);
        assert_eq!(groups.iter().filter(|g| **g == AgeGroup::Adults).count(), 25);
        assert_eq!(groups.iter().filter(|g| **g == AgeGroup::OlderAdults).count(), 90);
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("children".parse::<AgeGroup>(), Ok(AgeGroup::Children));
        assert_eq!("young-adults".parse::<AgeGroup>(), Ok(AgeGroup::YoungAdults));
        assert_eq!("Older Adults".parse::<AgeGroup>(), Ok(AgeGroup::OlderAdults));
        assert_eq!("ADULTS".parse::<AgeGroup>(), Ok(AgeGroup::Adults));
        assert!("teens".parse::<AgeGroup>().is_err());
    }

    #[test]
    fn labels_round_trip() {
        for group in AgeGroup::ALL {
            assert_eq!(AgeGroup::from_label(group.label()), Some(group));
        }
    }
}
