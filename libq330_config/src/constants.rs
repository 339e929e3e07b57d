// Q330 supplemental configuration constants

pub const GPS_MAX_ON_TIME: u32 = 30; // minutes
pub const END_OF_CONFIG: &str = "# <End-of-Config>";

pub const NUMBER_OF_DATA_PORTS: u8 = 4;
/// Data ports that carry channel declarations (one per analog output of the unit)
pub const CHANNEL_DATA_PORTS: [u8; 2] = [1, 4];
pub const NUMBER_OF_SENSOR_CONTROLS: usize = 8;

// Location codes
pub const SR_STATUS_LOCATION: &str = "91";
pub const HR_STATUS_LOCATION: &str = "92";
pub const SR_MAIN_LOCATION: &str = "00";
pub const HR_MAIN_LOCATION: &str = "10";
pub const LOW_GAIN_LOCATION: &str = "20";
pub const LDO_LOCATION: &str = "30";

// First analog input of the main sensor
pub const SR_MAIN_OFFSET: u8 = 4;
pub const HR_MAIN_OFFSET: u8 = 1;
pub const LOW_GAIN_OFFSET: u8 = 1;

// Clock quality channel input
pub const SR_BC_SOURCE: u8 = 1;
pub const HR_BC_SOURCE: u8 = 4;
pub const HR_BC_TRAILER: &str = "BC1";

pub const LDO_SOURCE: u8 = 4;

// Rates that are not the continuous broadband rate
pub const LONG_PERIOD_RATE: &str = "1";
pub const VERY_LONG_PERIOD_RATE: &str = "";
pub const MASS_POSITION_RATE: &str = "0.1";
pub const ENGINEERING_RATE: &str = "0.1";
pub const STATUS_RATE: &str = "1";

/// (channel, source) pairs of the engineering channels sampled at ENGINEERING_RATE
pub const ENGINEERING_CHANNELS: [(&str, &str); 4] = [
    ("VKI", "TEMPERATURE"),
    ("VEA", "ANTENNA_CURRENT"),
    ("VEP", "INPUT_VOLTAGE"),
    ("VEC", "MAIN_CURRENT"),
];

/// (channel, source) pairs of the clock/log status channels sampled at STATUS_RATE
pub const STATUS_CHANNELS: [(&str, &str); 3] = [
    ("ACP", "GPS_PHASE"),
    ("ACQ", "CLOCK_QUALITY"),
    ("ACO", "OPAQUE"),
];

/// Aux AD channels shared by both data ports, after the port specific leading channels
pub const AUX_COMMON_CHANNELS: [(&str, &str); 3] =
    [("VKO", "AUX03"), ("VII", "AUX04"), ("VEK", "AUX05")];

pub const CONFIG_FILE_PREFIX: &str = "supplemental.config";
pub const CHANNEL_TABLE_PREFIX: &str = "channels";
