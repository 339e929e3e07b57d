// Seismometer classification.
//
// The model name in the database is free text. Everything the generator needs to know
// about the sensor is derived here from a single rule table, so the generator itself
// never looks at the model string.
use std::fmt::Display;

/// Sensor enable polarity written into the sensor control mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Polarity {
    High,
    Low,
    /// Any explicit policy other than HIGH/LOW, uppercased
    Other(String),
}

impl Polarity {
    /// Resolve the enable policy of a unit.
    ///
    /// A policy of `SEISMOMETER` (any case) defers to the sensor class; anything else is
    /// taken literally and only uppercased, surrounding whitespace included.
    pub fn resolve(cal_enable: &str, class: &SensorClass) -> Self {
        let policy = cal_enable.to_uppercase();
        match policy.as_str() {
            "SEISMOMETER" => class.enable.clone(),
            "HIGH" => Self::High,
            "LOW" => Self::Low,
            _ => Self::Other(policy),
        }
    }
}

impl Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "HIGH"),
            Self::Low => write!(f, "LOW"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Naming of the three mass position channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MassPositions {
    #[default]
    Z12,
    Uvw,
}

impl MassPositions {
    pub fn axes(&self) -> [char; 3] {
        match self {
            Self::Z12 => ['Z', '1', '2'],
            Self::Uvw => ['U', 'V', 'W'],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorClass {
    pub enable: Polarity,
    pub mass_positions: MassPositions,
    /// Sensor has a mass lock that is driven from sensor control lines 6 and 7
    pub lockable: bool,
}

impl Default for SensorClass {
    fn default() -> Self {
        Self {
            enable: Polarity::High,
            mass_positions: MassPositions::Z12,
            lockable: false,
        }
    }
}

enum Pattern {
    Exact(&'static str),
    Contains(&'static str),
}

impl Pattern {
    fn matches(&self, model: &str) -> bool {
        match self {
            Self::Exact(name) => model == *name,
            Self::Contains(part) => model.contains(part),
        }
    }
}

enum Effect {
    EnableLow,
    EnableHigh,
    UvwMassPositions,
    Lockable,
}

// Applied in order; later enable rules win over earlier ones.
const SENSOR_RULES: &[(Pattern, Effect)] = &[
    (Pattern::Exact("STS-1"), Effect::EnableLow),
    (Pattern::Exact("STS-1V"), Effect::EnableLow),
    (Pattern::Exact("KS-54000"), Effect::EnableLow),
    (Pattern::Exact("KS-36000"), Effect::EnableLow),
    (Pattern::Exact("GS-13"), Effect::EnableLow),
    (Pattern::Exact("ENABLE ON LOW"), Effect::EnableLow),
    (Pattern::Exact("ENABLE ON HIGH"), Effect::EnableHigh),
    (Pattern::Contains("STS-2"), Effect::UvwMassPositions),
    (Pattern::Contains("NSN-3T"), Effect::Lockable),
    (Pattern::Contains("CMG3T"), Effect::Lockable),
    (Pattern::Contains("CMG3ESP"), Effect::Lockable),
];

/// Classify a seismometer by model name.
///
/// Matching is case-insensitive and ignores surrounding whitespace. Unknown or empty
/// models get the default class (HIGH enable, Z12 mass positions, no lock).
pub fn classify(model: &str) -> SensorClass {
    let model = model.trim().to_uppercase();
    let mut class = SensorClass::default();
    for (pattern, effect) in SENSOR_RULES {
        if !pattern.matches(&model) {
            continue;
        }
        match effect {
            Effect::EnableLow => class.enable = Polarity::Low,
            Effect::EnableHigh => class.enable = Polarity::High,
            Effect::UvwMassPositions => class.mass_positions = MassPositions::Uvw,
            Effect::Lockable => class.lockable = true,
        }
    }
    class
}
