// ── API-to-domain conversion ──
//
// Shapes a raw `CookDetail` into a `Snapshot`. Pure: no I/O, no state, so it
// is tested directly against literal JSON.

use chrono::{DateTime, Utc};

use flameboss_api::models::{CookDetail, CookSample};
use flameboss_api::units;

use crate::model::Snapshot;

/// Convert an optional epoch-seconds timestamp to `DateTime<Utc>`.
fn epoch_to_datetime(epoch: Option<i64>) -> Option<DateTime<Utc>> {
    epoch.and_then(|ts| DateTime::from_timestamp(ts, 0))
}

fn temperature(sample: Option<&CookSample>, field: fn(&CookSample) -> Option<i32>) -> Option<i32> {
    sample.and_then(field).and_then(units::raw_to_fahrenheit)
}

/// Normalize the latest sample of a cook into a [`Snapshot`].
///
/// Offline cooks yield [`Snapshot::offline`] whatever their sample holds.
/// A cook with no samples at all is online with every measurement `None`.
pub fn normalize(payload: &CookDetail) -> Snapshot {
    let title = payload.title.clone().unwrap_or_default();
    if !payload.online {
        return Snapshot::offline(title);
    }

    let sample = payload.latest_sample();

    Snapshot {
        title,
        online: true,
        timestamp: epoch_to_datetime(sample.and_then(|s| s.sec)),
        pit_temp: temperature(sample, |s| s.pit_temp),
        pit_set_temp: temperature(sample, |s| s.set_temp),
        meat_temp1: temperature(sample, |s| s.meat_temp1),
        meat_temp2: temperature(sample, |s| s.meat_temp2),
        meat_temp3: temperature(sample, |s| s.meat_temp3),
        fan_duty_percent: sample
            .and_then(|s| s.fan_dc)
            .map(units::raw_fan_to_percent),
        probe_names: payload.probe_names().map(|name| name.map(str::to_owned)),
    }
}

impl From<&CookDetail> for Snapshot {
    fn from(payload: &CookDetail) -> Self {
        normalize(payload)
    }
}
