//! # Address Labels
//!
//! The closed label vocabulary used for annotation and training. Every
//! entity span in a corpus carries exactly one of these labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AddrnerError;

/// Entity categories for US postal address components.
///
/// Serialized as the exact registry string, e.g. `"AddressNumber"` or
/// `"USPSBoxGroupID"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    AddressNumber,
    AddressNumberPrefix,
    AddressNumberSuffix,
    BuildingName,
    CornerOf,
    CountryName,
    IntersectionSeparator,
    LandmarkName,
    NotAddress,
    OccupancyIdentifier,
    OccupancyType,
    PlaceName,
    Recipient,
    StateName,
    StreetName,
    StreetNamePostDirectional,
    StreetNamePostModifier,
    StreetNamePostType,
    StreetNamePreDirectional,
    StreetNamePreModifier,
    StreetNamePreType,
    SubaddressIdentifier,
    SubaddressType,
    #[serde(rename = "USPSBoxGroupID")]
    UspsBoxGroupId,
    #[serde(rename = "USPSBoxGroupType")]
    UspsBoxGroupType,
    #[serde(rename = "USPSBoxID")]
    UspsBoxId,
    #[serde(rename = "USPSBoxType")]
    UspsBoxType,
    ZipCode,
    ZipPlus4,
}

impl Label {
    /// Total number of distinct labels.
    pub const NUM_LABELS: usize = 29;

    /// All labels in registry order.
    pub const ALL: [Label; Self::NUM_LABELS] = [
        Label::AddressNumber,
        Label::AddressNumberPrefix,
        Label::AddressNumberSuffix,
        Label::BuildingName,
        Label::CornerOf,
        Label::CountryName,
        Label::IntersectionSeparator,
        Label::LandmarkName,
        Label::NotAddress,
        Label::OccupancyIdentifier,
        Label::OccupancyType,
        Label::PlaceName,
        Label::Recipient,
        Label::StateName,
        Label::StreetName,
        Label::StreetNamePostDirectional,
        Label::StreetNamePostModifier,
        Label::StreetNamePostType,
        Label::StreetNamePreDirectional,
        Label::StreetNamePreModifier,
        Label::StreetNamePreType,
        Label::SubaddressIdentifier,
        Label::SubaddressType,
        Label::UspsBoxGroupId,
        Label::UspsBoxGroupType,
        Label::UspsBoxId,
        Label::UspsBoxType,
        Label::ZipCode,
        Label::ZipPlus4,
    ];

    /// The registry string for this label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::AddressNumber => "AddressNumber",
            Label::AddressNumberPrefix => "AddressNumberPrefix",
            Label::AddressNumberSuffix => "AddressNumberSuffix",
            Label::BuildingName => "BuildingName",
            Label::CornerOf => "CornerOf",
            Label::CountryName => "CountryName",
            Label::IntersectionSeparator => "IntersectionSeparator",
            Label::LandmarkName => "LandmarkName",
            Label::NotAddress => "NotAddress",
            Label::OccupancyIdentifier => "OccupancyIdentifier",
            Label::OccupancyType => "OccupancyType",
            Label::PlaceName => "PlaceName",
            Label::Recipient => "Recipient",
            Label::StateName => "StateName",
            Label::StreetName => "StreetName",
            Label::StreetNamePostDirectional => "StreetNamePostDirectional",
            Label::StreetNamePostModifier => "StreetNamePostModifier",
            Label::StreetNamePostType => "StreetNamePostType",
            Label::StreetNamePreDirectional => "StreetNamePreDirectional",
            Label::StreetNamePreModifier => "StreetNamePreModifier",
            Label::StreetNamePreType => "StreetNamePreType",
            Label::SubaddressIdentifier => "SubaddressIdentifier",
            Label::SubaddressType => "SubaddressType",
            Label::UspsBoxGroupId => "USPSBoxGroupID",
            Label::UspsBoxGroupType => "USPSBoxGroupType",
            Label::UspsBoxId => "USPSBoxID",
            Label::UspsBoxType => "USPSBoxType",
            Label::ZipCode => "ZipCode",
            Label::ZipPlus4 => "ZipPlus4",
        }
    }

    /// A short example of the address component this label marks.
    pub fn description(&self) -> &'static str {
        match self {
            Label::AddressNumber => r#"e.g. "123" in "123 Main St"."#,
            Label::AddressNumberPrefix => {
                r##"e.g. "#" in "#123 Main St" or "Mi" in "Mi 32 Richardson Hwy"."##
            }
            Label::AddressNumberSuffix => r#"e.g. "1/2" in "123 1/2 Main St"."#,
            Label::BuildingName => r#"e.g. "Tower A" in "Tower A, 123 Main St"."#,
            Label::CornerOf => {
                r#"e.g. "Corner of" in "Corner of Main St and Elm St" or "Junction of" in "Junction of Main St and Elm St"."#
            }
            Label::CountryName => r#"e.g. "Canada" in "Toronto, Canada"."#,
            Label::IntersectionSeparator => r#"e.g. "&" in "Main St & Elm St"."#,
            Label::LandmarkName => r#"e.g. "Union Station" in "Union Station, Washington, DC"."#,
            Label::NotAddress => r#"e.g. "(east side)" in "123 Main St (east side), Chicago IL"."#,
            Label::OccupancyIdentifier => r#"e.g. "101" in "Suite 101"."#,
            Label::OccupancyType => r#"e.g. "Suite" in "Suite 101"."#,
            Label::PlaceName => r#"e.g. "Anchorage" in "4321 Elm St, Anchorage, AK"."#,
            Label::Recipient => r#"e.g. "C/O John Doe" in "C/O John Doe, 123 Main St"."#,
            Label::StateName => r#"e.g. "Alaska" in "4321 Elm St, Anchorage, Alaska"."#,
            Label::StreetName => r#"e.g. "Main" in "123 Main St"."#,
            Label::StreetNamePostDirectional => r#"e.g. "NW" in "123 Main St NW"."#,
            Label::StreetNamePostModifier => r#"e.g. "Ext" in "123 Main St Ext"."#,
            Label::StreetNamePostType => r#"e.g. "St" in "123 Main St"."#,
            Label::StreetNamePreDirectional => r#"e.g. "NW" in "NW 123 Main St"."#,
            Label::StreetNamePreModifier => r#"e.g. "Old" in "Old Elm St"."#,
            Label::StreetNamePreType => r#"e.g. "US Hwy" in "US Hwy 101"."#,
            Label::SubaddressIdentifier => {
                r#"e.g. "304" in "203 Elm St, Building 304, Honolulu Hawaii" or "22" in "55 5th Ave, PMB 22, New York NY"."#
            }
            Label::SubaddressType => {
                r#"e.g. "Building" in "203 Elm St, Building 304, Honolulu Hawaii" or "PMB" in "55 5th Ave, PMB 22, New York NY"."#
            }
            Label::UspsBoxGroupId => r#"e.g. "1" in "Rural Route 1 Box 2"."#,
            Label::UspsBoxGroupType => r#"e.g. "Rural Route" in "Rural Route 1 Box 2"."#,
            Label::UspsBoxId => r#"e.g. "2" in "Rural Route 1 Box 2"."#,
            Label::UspsBoxType => r#"e.g. "Box" in "Rural Route 1 Box 2"."#,
            Label::ZipCode => r#"e.g. "12345" in "12345"."#,
            Label::ZipPlus4 => r#"e.g. "6789" in "12345-6789"."#,
        }
    }

    /// Position of this label in [`Label::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = AddrnerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| AddrnerError::UnknownLabel(s.to_string()))
    }
}
