use std::fmt::Display;

use super::constants::*;
use super::error::GeneratorError;
use super::profile::{ChannelProfile, GpsConfig, StationProfile, UnitPort};
use super::sensor::{classify, Polarity, SensorClass};

const BROADBAND_AXES: [char; 3] = ['Z', '1', '2'];

/// The continuous broadband sample rate of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuousRate {
    Forty,
    Twenty,
}

impl ContinuousRate {
    /// Resolve the rate from the `cont40` database flag.
    ///
    /// Exactly one of `cont40`/`cont20` is expected to be set. If both or neither are,
    /// 40 Hz wins when `cont40` is set and 20 Hz is used otherwise, so `cont40` alone
    /// decides. The choice is made once so that every channel in a document carries the
    /// same rate.
    pub fn resolve(cont40: i32) -> Self {
        if cont40 != 0 {
            Self::Forty
        } else {
            Self::Twenty
        }
    }

    /// True when the flags do not select exactly one rate
    pub fn is_ambiguous(cont40: i32, cont20: i32) -> bool {
        (cont40 != 0) == (cont20 != 0)
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::Forty => "40",
            Self::Twenty => "20",
        }
    }
}

/// Location codes and analog inputs that differ between the SR and HR unit
#[derive(Debug, Clone, Copy)]
struct PortLayout {
    port: UnitPort,
    status_location: &'static str,
    main_location: &'static str,
    main_offset: u8,
    bc_source: u8,
    bc_trailer: Option<&'static str>,
}

impl From<UnitPort> for PortLayout {
    fn from(port: UnitPort) -> Self {
        match port {
            UnitPort::Primary => Self {
                port,
                status_location: SR_STATUS_LOCATION,
                main_location: SR_MAIN_LOCATION,
                main_offset: SR_MAIN_OFFSET,
                bc_source: SR_BC_SOURCE,
                bc_trailer: None,
            },
            UnitPort::Secondary => Self {
                port,
                status_location: HR_STATUS_LOCATION,
                main_location: HR_MAIN_LOCATION,
                main_offset: HR_MAIN_OFFSET,
                bc_source: HR_BC_SOURCE,
                bc_trailer: Some(HR_BC_TRAILER),
            },
        }
    }
}

/// Line oriented builder for the stanza document
#[derive(Debug, Default)]
struct ConfigDocument {
    text: String,
}

impl ConfigDocument {
    fn raw(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    fn comment(&mut self, comment: impl Display) {
        self.raw(&format!("# {comment}"));
    }

    fn line(&mut self, key: impl Display, value: impl Display) {
        self.raw(&format!("{key}={value}"));
    }

    fn lcq(
        &mut self,
        data_port: u8,
        location: &str,
        channel: impl Display,
        source: impl Display,
        rate: &str,
    ) {
        self.line(
            format!("DP{data_port}_LCQ"),
            format!("{location},{channel},{source},{rate}"),
        );
    }

    fn finish(self) -> String {
        self.text
    }
}

/// Everything the data port emitters need, resolved once per call
struct UnitRules<'a> {
    layout: PortLayout,
    profile: &'a ChannelProfile,
    sensor: SensorClass,
    rate: ContinuousRate,
}

/// Generate the supplemental configuration of one Q330.
///
/// `port_index` is 0 for the SR unit and 1 for the HR unit. The output depends only on
/// the arguments, so two calls with the same inputs produce identical text.
pub fn generate(
    station: &StationProfile,
    channel: &ChannelProfile,
    port_index: usize,
) -> Result<String, GeneratorError> {
    let port = UnitPort::try_from(port_index)?;
    generate_unit(station, channel, port)
}

/// Same as [`generate`] with an already validated port
pub fn generate_unit(
    station: &StationProfile,
    channel: &ChannelProfile,
    port: UnitPort,
) -> Result<String, GeneratorError> {
    let index = port.index();
    let tag = station.unit_tag(index)?;
    let nat = station.nat_address(index)?;
    let inet = station.inet_address(index)?;

    if ContinuousRate::is_ambiguous(channel.cont40, channel.cont20) {
        log::warn!(
            "Unit {tag} has cont40={} and cont20={}; using {} Hz as the continuous rate",
            channel.cont40,
            channel.cont20,
            ContinuousRate::resolve(channel.cont40).token()
        );
    }

    let sensor = classify(&channel.seismometer_model);
    let enable = Polarity::resolve(&channel.cal_enable, &sensor);
    let rules = UnitRules {
        layout: PortLayout::from(port),
        profile: channel,
        rate: ContinuousRate::resolve(channel.cont40),
        sensor,
    };

    let mut doc = ConfigDocument::default();
    doc.comment("Q330 supplemental configuration");
    doc.comment(format!("Unit: {tag}"));

    let (gps_mode, baler_mode) = match channel.gps_config {
        GpsConfig::On => ("CONTINUOUS", "CONTINUOUS"),
        GpsConfig::Cycled => ("MAX_TIME_OR_PLL_LOCK", "DTR_CONTROL"),
    };
    doc.line("GPS_Power_Mode", gps_mode);
    doc.line("GPS_Max_On_Time", GPS_MAX_ON_TIME);

    doc.line("Eth_IP_Address", nat);
    doc.line("Eth_POC_IP_Address", inet);

    doc.line("S2_Baler_Power_Mode", baler_mode);

    let station_code = station.data_port_station();
    for dp in 1..=NUMBER_OF_DATA_PORTS {
        doc.line(format!("DP{dp}_Network"), &channel.seed_network);
        doc.line(format!("DP{dp}_Station"), &station_code);
    }

    for (slot, control) in sensor_controls(port, &enable, rules.sensor.lockable)
        .iter()
        .enumerate()
    {
        doc.line(format!("Sensor_Control_{}", slot + 1), control);
    }

    for dp in CHANNEL_DATA_PORTS {
        emit_data_port(&mut doc, dp, &rules);
    }

    doc.raw(END_OF_CONFIG);
    Ok(doc.finish())
}

/// The eight sensor control lines. Unused lines are empty.
fn sensor_controls(
    port: UnitPort,
    enable: &Polarity,
    lockable: bool,
) -> [String; NUMBER_OF_SENSOR_CONTROLS] {
    let mut controls: [String; NUMBER_OF_SENSOR_CONTROLS] = Default::default();
    match port {
        UnitPort::Primary => {
            controls[0] = String::from("A,HIGH,CENTERING");
            controls[3] = String::from("A,HIGH,CALIBRATION");
            controls[4] = format!("B,{enable},CENTERING");
            if lockable {
                controls[5] = String::from("B,HIGH,LOCK");
                controls[6] = String::from("B,HIGH,UNLOCK");
            }
            controls[7] = format!("B,{enable},CALIBRATION");
        }
        UnitPort::Secondary => {
            controls[0] = format!("A,{enable},CENTERING");
            controls[3] = format!("A,{enable},CALIBRATION");
        }
    }
    controls
}

/// Channel declarations for one data port
fn emit_data_port(doc: &mut ConfigDocument, dp: u8, rules: &UnitRules) {
    let layout = &rules.layout;
    let profile = rules.profile;
    let rate = rules.rate.token();
    let status = layout.status_location;
    let primary = layout.port == UnitPort::Primary;

    doc.line(format!("DP{dp}_MsgLog"), format!("{status},LOG"));
    doc.line(format!("DP{dp}_TimeLog"), format!("{status},ACE"));
    doc.line(format!("DP{dp}_CfgStream"), format!("{status},OCF"));

    // High gain takes the broadband band code whenever it is present
    let broadband = if profile.has_high_gain {
        Some("BH")
    } else if profile.has_low_gain {
        Some("BN")
    } else {
        None
    };
    if let Some(band) = broadband {
        for (source, axis) in (layout.main_offset..).zip(BROADBAND_AXES) {
            doc.lcq(dp, layout.main_location, format!("{band}{axis}"), source, rate);
        }
    }

    if profile.has_high_gain {
        for (band, band_rate) in [("LH", LONG_PERIOD_RATE), ("VH", VERY_LONG_PERIOD_RATE)] {
            for (source, axis) in (layout.main_offset..).zip(BROADBAND_AXES) {
                doc.lcq(dp, layout.main_location, format!("{band}{axis}"), source, band_rate);
            }
        }
    }

    let bc_source = match layout.bc_trailer {
        Some(trailer) => format!("{},{rate},{trailer}", layout.bc_source),
        None => format!("{},{rate}", layout.bc_source),
    };
    doc.line(format!("DP{dp}_LCQ"), format!(",BC,{bc_source}"));

    let low_gain_only = profile.has_low_gain && !profile.has_high_gain;
    let mass_location = if primary && low_gain_only {
        LOW_GAIN_LOCATION
    } else {
        layout.main_location
    };
    for (boom, axis) in (layout.main_offset..).zip(rules.sensor.mass_positions.axes()) {
        doc.lcq(
            dp,
            mass_location,
            format!("VM{axis}"),
            format!("BOOM{boom}"),
            MASS_POSITION_RATE,
        );
    }

    if primary && low_gain_only {
        for (source, axis) in (LOW_GAIN_OFFSET..).zip(BROADBAND_AXES) {
            doc.lcq(dp, LOW_GAIN_LOCATION, format!("LN{axis}"), source, LONG_PERIOD_RATE);
        }
    }

    if !primary {
        doc.lcq(dp, LDO_LOCATION, "LDO", LDO_SOURCE, LONG_PERIOD_RATE);
    }

    for (chan, source) in ENGINEERING_CHANNELS {
        doc.lcq(dp, status, chan, source, ENGINEERING_RATE);
    }
    for (chan, source) in STATUS_CHANNELS {
        doc.lcq(dp, status, chan, source, STATUS_RATE);
    }

    if primary && profile.has_auxad {
        for (chan, source) in aux_channels(dp, profile.aux_ch2_is_battery) {
            doc.lcq(dp, status, chan, source, ENGINEERING_RATE);
        }
    }
}

/// (channel, source) pairs of the aux AD group on a data port
fn aux_channels(dp: u8, ch2_is_battery: bool) -> Vec<(&'static str, &'static str)> {
    let mut channels = if dp == 1 {
        vec![
            ("VE1", "AUX01"),
            (if ch2_is_battery { "VE2" } else { "VKV" }, "AUX02"),
        ]
    } else {
        vec![
            ("VEB", if ch2_is_battery { "AUX02" } else { "AUX01" }),
            ("VKV", "AUX02"),
        ]
    };
    channels.extend(AUX_COMMON_CHANNELS);
    channels
}
