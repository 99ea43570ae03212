//! The per-region record and the names of the statistics derived from it.

use std::fmt;
use std::str::FromStr;

/// One region's time-series snapshot.
///
/// Mirrors the dashboard's JSON: every field is optional and a missing count
/// reads as zero.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RegionData {
    /// Population and freshness metadata.
    pub meta: Meta,
    /// Cumulative counts.
    pub total: Option<Counts>,
    /// Counts for the latest day.
    pub delta: Option<Counts>,
    /// Counts summed over the latest seven days.
    pub delta7: Option<Counts>,
}

impl RegionData {
    /// The counts for one kind of series, if the record has them.
    pub fn series(&self, kind: SeriesKind) -> Option<&Counts> {
        match kind {
            SeriesKind::Total => self.total.as_ref(),
            SeriesKind::Delta => self.delta.as_ref(),
            SeriesKind::Delta7 => self.delta7.as_ref(),
        }
    }
}

/// Metadata attached to a region.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Meta {
    /// Head count used for per-capita figures.
    pub population: Option<f64>,
    /// When the region's data as a whole was last updated.
    pub last_updated: Option<String>,
    /// Freshness of the testing figures.
    pub tested: Option<TestedMeta>,
}

/// Freshness of a region's testing figures.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TestedMeta {
    /// Date (`YYYY-MM-DD`) of the latest test count.
    pub last_updated: Option<String>,
}

/// Raw counts for one series.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Counts {
    /// Confirmed cases.
    pub confirmed: Option<f64>,
    /// Deaths.
    pub deceased: Option<f64>,
    /// Recoveries.
    pub recovered: Option<f64>,
    /// Migrated or otherwise closed cases.
    pub other: Option<f64>,
    /// Samples tested.
    pub tested: Option<f64>,
    /// People with a first dose.
    pub vaccinated1: Option<f64>,
    /// People with a second dose.
    pub vaccinated2: Option<f64>,
}

impl Counts {
    /// The raw count behind `statistic`.
    ///
    /// Derived statistics such as [`Statistic::Active`] have no raw count and
    /// return `None`.
    pub fn get(&self, statistic: Statistic) -> Option<f64> {
        match statistic {
            Statistic::Confirmed => self.confirmed,
            Statistic::Deceased => self.deceased,
            Statistic::Recovered => self.recovered,
            Statistic::Other => self.other,
            Statistic::Tested => self.tested,
            Statistic::Vaccinated1 => self.vaccinated1,
            Statistic::Vaccinated2 => self.vaccinated2,
            _ => None,
        }
    }

    /// Like [`get`](Self::get), with missing counts read as zero.
    pub fn count(&self, statistic: Statistic) -> f64 {
        self.get(statistic).unwrap_or(0.0)
    }
}

/// Which series of a region to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SeriesKind {
    /// Cumulative counts.
    #[default]
    Total,
    /// Counts for the latest day.
    Delta,
    /// Counts over the latest seven days.
    Delta7,
}

/// A statistic the dashboard can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Statistic {
    /// Confirmed cases.
    Confirmed,
    /// Confirmed minus deceased, recovered and other.
    Active,
    /// Active as a percentage of confirmed.
    ActiveRatio,
    /// Recoveries.
    Recovered,
    /// Recovered as a percentage of confirmed.
    RecoveryRatio,
    /// Deaths.
    Deceased,
    /// Case fatality ratio: deceased as a percentage of confirmed.
    Cfr,
    /// Migrated or otherwise closed cases.
    Other,
    /// Samples tested.
    Tested,
    /// Test positivity ratio: confirmed as a percentage of tested.
    Tpr,
    /// First and second doses together.
    Vaccinated,
    /// First doses.
    Vaccinated1,
    /// Second doses.
    Vaccinated2,
    /// Head count, only meaningful for the total series.
    Population,
}

impl Statistic {
    /// Every statistic, in display order.
    pub const ALL: [Statistic; 14] = [
        Self::Confirmed,
        Self::Active,
        Self::ActiveRatio,
        Self::Recovered,
        Self::RecoveryRatio,
        Self::Deceased,
        Self::Cfr,
        Self::Other,
        Self::Tested,
        Self::Tpr,
        Self::Vaccinated,
        Self::Vaccinated1,
        Self::Vaccinated2,
        Self::Population,
    ];

    /// The dashboard's name for this statistic.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Active => "active",
            Self::ActiveRatio => "activeRatio",
            Self::Recovered => "recovered",
            Self::RecoveryRatio => "recoveryRatio",
            Self::Deceased => "deceased",
            Self::Cfr => "cfr",
            Self::Other => "other",
            Self::Tested => "tested",
            Self::Tpr => "tpr",
            Self::Vaccinated => "vaccinated",
            Self::Vaccinated1 => "vaccinated1",
            Self::Vaccinated2 => "vaccinated2",
            Self::Population => "population",
        }
    }

    /// True when a zero for this statistic means "not reported" rather than
    /// an actual zero.
    pub fn zero_is_missing(self) -> bool {
        matches!(
            self,
            Self::Tested
                | Self::Tpr
                | Self::Vaccinated
                | Self::Vaccinated1
                | Self::Vaccinated2
                | Self::Population
        )
    }

    /// True for statistics whose freshness follows the testing data.
    pub fn depends_on_testing(self) -> bool {
        matches!(self, Self::Tested | Self::Tpr)
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown statistic name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatisticError {
    name: String,
}

impl fmt::Display for ParseStatisticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown statistic: {:?}", self.name)
    }
}

impl std::error::Error for ParseStatisticError {}

impl FromStr for Statistic {
    type Err = ParseStatisticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stat| stat.as_str() == s)
            .ok_or_else(|| ParseStatisticError {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistic_names_parse_back() {
        for stat in Statistic::ALL {
            assert_eq!(stat.as_str().parse::<Statistic>(), Ok(stat));
        }
        let err = "deaths".parse::<Statistic>().unwrap_err();
        assert_eq!(err.to_string(), "unknown statistic: \"deaths\"");
    }

    #[test]
    fn raw_counts() {
        let counts = Counts {
            confirmed: Some(10.0),
            vaccinated2: Some(3.0),
            ..Counts::default()
        };
        assert_eq!(counts.get(Statistic::Confirmed), Some(10.0));
        assert_eq!(counts.get(Statistic::Deceased), None);
        assert_eq!(counts.count(Statistic::Deceased), 0.0);
        assert_eq!(counts.get(Statistic::Vaccinated2), Some(3.0));
        assert_eq!(counts.get(Statistic::Active), None);
    }

    #[test]
    fn series_lookup() {
        let data = RegionData {
            delta7: Some(Counts::default()),
            ..RegionData::default()
        };
        assert!(data.series(SeriesKind::Delta7).is_some());
        assert!(data.series(SeriesKind::Total).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_names_match_dashboard() {
        assert_eq!(
            serde_json::to_string(&Statistic::ActiveRatio).unwrap(),
            "\"activeRatio\""
        );
        assert_eq!(
            serde_json::from_str::<SeriesKind>("\"delta7\"").unwrap(),
            SeriesKind::Delta7
        );
    }
}
