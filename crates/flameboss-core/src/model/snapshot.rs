use chrono::{DateTime, Utc};
use serde::Serialize;

/// The latest known state of a cook, in display units.
///
/// Built fresh from each successful poll and never mutated. While
/// `online` is false every measurement, the timestamp and the probe names
/// are `None`: an offline controller never reports a stale number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub title: String,
    pub online: bool,
    /// When the controller took the sample.
    pub timestamp: Option<DateTime<Utc>>,
    /// Pit temperature, °F.
    pub pit_temp: Option<i32>,
    /// Pit set-point, °F.
    pub pit_set_temp: Option<i32>,
    /// Meat probe temperatures, °F.
    pub meat_temp1: Option<i32>,
    pub meat_temp2: Option<i32>,
    pub meat_temp3: Option<i32>,
    /// Blower duty cycle, 0–100.
    pub fan_duty_percent: Option<i32>,
    /// User-assigned names of the four probe slots.
    pub probe_names: [Option<String>; 4],
}

impl Snapshot {
    /// A snapshot for a controller that is not reporting.
    pub fn offline(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            online: false,
            timestamp: None,
            pit_temp: None,
            pit_set_temp: None,
            meat_temp1: None,
            meat_temp2: None,
            meat_temp3: None,
            fan_duty_percent: None,
            probe_names: [None, None, None, None],
        }
    }

    pub fn meat_temps(&self) -> [Option<i32>; 3] {
        [self.meat_temp1, self.meat_temp2, self.meat_temp3]
    }

    /// Whether any measurement field carries a value.
    pub fn has_measurements(&self) -> bool {
        self.timestamp.is_some()
            || self.pit_temp.is_some()
            || self.pit_set_temp.is_some()
            || self.meat_temps().iter().any(Option::is_some)
            || self.fan_duty_percent.is_some()
    }
}
