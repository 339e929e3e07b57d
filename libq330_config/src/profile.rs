use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::net::Ipv4Addr;

use super::error::{GeneratorError, ProfileError};

/// GPS power policy of a Q330.
///
/// The database stores this as free text. Only `On` (any case) keeps the GPS powered
/// continuously; everything else, including empty or legacy values, is treated as cycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GpsConfig {
    On,
    #[default]
    Cycled,
}

impl From<&str> for GpsConfig {
    fn from(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("on") {
            Self::On
        } else {
            Self::Cycled
        }
    }
}

impl From<String> for GpsConfig {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<GpsConfig> for String {
    fn from(value: GpsConfig) -> Self {
        value.to_string()
    }
}

impl Display for GpsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => write!(f, "On"),
            Self::Cycled => write!(f, "Cycled"),
        }
    }
}

/// Which of the (at most two) Q330s at a station is being configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitPort {
    /// The standard rate (SR) unit, index 0
    Primary,
    /// The high rate (HR) unit, index 1
    Secondary,
}

impl TryFrom<usize> for UnitPort {
    type Error = GeneratorError;
    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Primary),
            1 => Ok(Self::Secondary),
            _ => Err(GeneratorError::InvalidPortIndex(value)),
        }
    }
}

impl UnitPort {
    pub fn index(&self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
        }
    }
}

/// Station level metadata shared by every Q330 at the station.
///
/// The three per-unit vectors are parallel: entry `i` of each describes unit `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationProfile {
    pub q330_stations: Vec<String>,
    pub q330_inet_address: Vec<Ipv4Addr>,
    pub q330_nat_address: Vec<Ipv4Addr>,
    pub tcp_station_code: String,
}

impl StationProfile {
    /// Check that every unit tag has exactly one public and one NAT address, and that
    /// every tag can name an output file
    pub fn validate(&self) -> Result<(), ProfileError> {
        let tags = self.q330_stations.len();
        let inet = self.q330_inet_address.len();
        let nat = self.q330_nat_address.len();
        if tags != inet || tags != nat {
            return Err(ProfileError::AddressCountMismatch {
                station: self.tcp_station_code.clone(),
                tags,
                inet,
                nat,
            });
        }
        match self.q330_stations.iter().find(|tag| !is_file_safe_tag(tag)) {
            Some(tag) => Err(ProfileError::BadUnitTag {
                station: self.tcp_station_code.clone(),
                tag: tag.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn unit_count(&self) -> usize {
        self.q330_stations.len()
    }

    pub fn unit_tag(&self, index: usize) -> Result<&str, ProfileError> {
        self.q330_stations
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| self.missing_unit(index))
    }

    /// Public ("POC") address of a unit
    pub fn inet_address(&self, index: usize) -> Result<Ipv4Addr, ProfileError> {
        self.q330_inet_address
            .get(index)
            .copied()
            .ok_or_else(|| self.missing_unit(index))
    }

    /// Private address of a unit
    pub fn nat_address(&self, index: usize) -> Result<Ipv4Addr, ProfileError> {
        self.q330_nat_address
            .get(index)
            .copied()
            .ok_or_else(|| self.missing_unit(index))
    }

    /// Station label used on the data ports; `%` is a wildcard marker in the database
    pub fn data_port_station(&self) -> String {
        self.tcp_station_code.replace('%', "")
    }

    fn missing_unit(&self, index: usize) -> ProfileError {
        ProfileError::MissingUnit(self.tcp_station_code.clone(), index)
    }
}

/// Unit tags become file name components, so they may not be empty, be `.` or `..`, or
/// contain a path separator
pub fn is_file_safe_tag(tag: &str) -> bool {
    !(tag.is_empty() || tag == "." || tag == ".." || tag.contains(['/', '\\']))
}

/// Per-unit hardware profile (the "DAS Parms" record).
///
/// Missing fields fall back to their defaults so that a partially filled record still
/// produces a draft configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelProfile {
    pub gps_config: GpsConfig,
    pub seed_network: String,
    pub seismometer_model: String,
    pub cal_enable: String,
    pub cont40: i32,
    pub cont20: i32,
    pub has_auxad: bool,
    pub aux_ch2_is_battery: bool,
    pub has_low_gain: bool,
    pub has_high_gain: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station() -> StationProfile {
        StationProfile {
            q330_stations: vec![String::from("ANMO"), String::from("ANMOHR")],
            q330_inet_address: vec![Ipv4Addr::new(136, 177, 1, 10), Ipv4Addr::new(136, 177, 1, 11)],
            q330_nat_address: vec![Ipv4Addr::new(192, 168, 1, 10), Ipv4Addr::new(192, 168, 1, 11)],
            tcp_station_code: String::from("AN%MO"),
        }
    }

    #[test]
    fn test_gps_config_parsing() {
        assert_eq!(GpsConfig::from("On"), GpsConfig::On);
        assert_eq!(GpsConfig::from(" ON "), GpsConfig::On);
        assert_eq!(GpsConfig::from("Cycled"), GpsConfig::Cycled);
        assert_eq!(GpsConfig::from(""), GpsConfig::Cycled);
        assert_eq!(GpsConfig::from("whenever"), GpsConfig::Cycled);
    }

    #[test]
    fn test_unit_port() {
        assert_eq!(UnitPort::try_from(0usize), Ok(UnitPort::Primary));
        assert_eq!(UnitPort::try_from(1usize), Ok(UnitPort::Secondary));
        assert_eq!(
            UnitPort::try_from(2usize),
            Err(GeneratorError::InvalidPortIndex(2))
        );
        assert_eq!(UnitPort::Secondary.index(), 1);
    }

    #[test]
    fn test_station_validate() {
        let mut st = station();
        assert!(st.validate().is_ok());
        st.q330_nat_address.pop();
        match st.validate() {
            Err(ProfileError::AddressCountMismatch { tags, inet, nat, .. }) => {
                assert_eq!((tags, inet, nat), (2, 2, 1));
            }
            _ => panic!(),
        }
    }

    #[test]
    fn test_station_validate_tags() {
        let mut st = station();
        st.q330_stations[1] = String::from("../ESCAPE");
        assert_eq!(
            st.validate(),
            Err(ProfileError::BadUnitTag {
                station: String::from("AN%MO"),
                tag: String::from("../ESCAPE"),
            })
        );
        st.q330_stations[1] = String::from("..");
        assert!(st.validate().is_err());
        st.q330_stations[1] = String::new();
        assert!(st.validate().is_err());
        st.q330_stations[1] = String::from("ANMO.HR");
        assert!(st.validate().is_ok());
    }

    #[test]
    fn test_station_lookups() {
        let st = station();
        assert_eq!(st.data_port_station(), "ANMO");
        assert_eq!(st.unit_tag(1), Ok("ANMOHR"));
        assert_eq!(st.nat_address(0), Ok(Ipv4Addr::new(192, 168, 1, 10)));
        assert_eq!(
            st.unit_tag(2),
            Err(ProfileError::MissingUnit(String::from("AN%MO"), 2))
        );
    }

    #[test]
    fn test_partial_channel_profile_yaml() {
        let profile: ChannelProfile =
            serde_yaml::from_str("gps_config: on\nseed_network: IU\ncont40: 1\n").unwrap();
        assert_eq!(profile.gps_config, GpsConfig::On);
        assert_eq!(profile.seed_network, "IU");
        assert_eq!(profile.cont40, 1);
        assert!(!profile.has_high_gain);
        assert!(profile.seismometer_model.is_empty());
    }
}
