use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::GeneratorError;

/// Target operating systems for platform-specific artifact variants.
///
/// Ordering follows declaration order, so iterating a sorted set of tags is
/// always Windows, Mac, Linux.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OsTag {
    #[serde(rename = "win")]
    Windows,
    Mac,
    Linux,
}

impl OsTag {
    pub const ALL: [OsTag; 3] = [OsTag::Windows, OsTag::Mac, OsTag::Linux];

    /// Classifier used in artifact filenames and repository paths.
    pub fn short_name(self) -> &'static str {
        match self {
            OsTag::Windows => "win",
            OsTag::Mac => "mac",
            OsTag::Linux => "linux",
        }
    }

    pub fn from_short_name(name: &str) -> Option<Self> {
        OsTag::ALL.into_iter().find(|os| os.short_name() == name)
    }
}

impl fmt::Display for OsTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for OsTag {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OsTag::from_short_name(s)
            .ok_or_else(|| GeneratorError::InvalidCoordinate(format!("unknown OS classifier '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn short_names_round_trip() {
        for os in OsTag::ALL {
            assert_eq!(OsTag::from_short_name(os.short_name()), Some(os));
        }
        assert_eq!(OsTag::from_short_name("osx"), None);
    }

    #[test]
    fn sorted_iteration_is_stable() {
        let set: BTreeSet<OsTag> = [OsTag::Linux, OsTag::Windows, OsTag::Mac].into();
        let ordered: Vec<_> = set.into_iter().collect();
        assert_eq!(ordered, vec![OsTag::Windows, OsTag::Mac, OsTag::Linux]);
    }
}
