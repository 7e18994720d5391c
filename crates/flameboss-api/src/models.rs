// Flame Boss API response types
//
// Fields use `#[serde(default)]` liberally: the API omits or nulls fields
// depending on controller firmware and whether the cook is live.

use serde::{Deserialize, Serialize};

// ── Sessions ─────────────────────────────────────────────────────────

/// Body of a successful `POST /api/v4/sessions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: i64,
    pub auth_token: String,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// `GET /api/v4/devices`
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceList {
    #[serde(default)]
    pub ip_devices: Vec<DeviceSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Cooks ────────────────────────────────────────────────────────────

/// `GET /api/v4/cooks`
#[derive(Debug, Clone, Deserialize)]
pub struct CookList {
    #[serde(default)]
    pub cooks: Vec<CookSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookSummary {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Full cook detail from `GET /api/v4/cooks/{id}`.
///
/// `data` holds the whole sample history of the cook; only the entry at
/// `data_cnt - 1` is of interest to consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookDetail {
    #[serde(default)]
    pub id: Option<i64>,
    /// `null` for cooks that were never named.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub data: Vec<CookSample>,
    #[serde(default)]
    pub data_cnt: usize,
    #[serde(default)]
    pub probe_name_0: Option<String>,
    #[serde(default)]
    pub probe_name_1: Option<String>,
    #[serde(default)]
    pub probe_name_2: Option<String>,
    #[serde(default)]
    pub probe_name_3: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CookDetail {
    /// The most recent sample: index `data_cnt - 1`, falling back to the
    /// last array entry when the count and the array disagree.
    pub fn latest_sample(&self) -> Option<&CookSample> {
        self.data_cnt
            .checked_sub(1)
            .and_then(|idx| self.data.get(idx))
            .or_else(|| self.data.last())
    }

    /// Probe names in slot order.
    pub fn probe_names(&self) -> [Option<&str>; 4] {
        [
            self.probe_name_0.as_deref(),
            self.probe_name_1.as_deref(),
            self.probe_name_2.as_deref(),
            self.probe_name_3.as_deref(),
        ]
    }
}

/// One sample of a cook's time series, in raw device encoding.
///
/// Temperatures are tenths of a degree Celsius, `fan_dc` is percent × 100
/// and `sec` is epoch seconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CookSample {
    #[serde(default)]
    pub sec: Option<i64>,
    #[serde(default)]
    pub set_temp: Option<i32>,
    #[serde(default)]
    pub pit_temp: Option<i32>,
    #[serde(default)]
    pub meat_temp1: Option<i32>,
    #[serde(default)]
    pub meat_temp2: Option<i32>,
    #[serde(default)]
    pub meat_temp3: Option<i32>,
    #[serde(default)]
    pub fan_dc: Option<i32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Writes ───────────────────────────────────────────────────────────

/// Form body for `POST /api/v1/devices/{id}/set_set_temp`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SetTempForm {
    pub temp_tdc: i32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample(pit: i32) -> serde_json::Value {
        json!({ "sec": 1_700_000_000, "pit_temp": pit })
    }

    #[test]
    fn latest_sample_uses_data_cnt() {
        let detail: CookDetail = serde_json::from_value(json!({
            "title": "Brisket",
            "online": true,
            "data_cnt": 2,
            "data": [sample(10), sample(20), sample(30)],
        }))
        .unwrap();

        assert_eq!(detail.latest_sample().unwrap().pit_temp, Some(20));
    }

    #[test]
    fn latest_sample_falls_back_to_last_entry() {
        let detail: CookDetail = serde_json::from_value(json!({
            "data_cnt": 9,
            "data": [sample(10), sample(30)],
        }))
        .unwrap();

        assert_eq!(detail.latest_sample().unwrap().pit_temp, Some(30));
    }

    #[test]
    fn latest_sample_of_empty_cook() {
        let detail: CookDetail = serde_json::from_value(json!({ "data_cnt": 0 })).unwrap();
        assert!(detail.latest_sample().is_none());
    }

    #[test]
    fn null_title_deserializes() {
        let detail: CookDetail =
            serde_json::from_value(json!({ "title": null, "online": true })).unwrap();
        assert_eq!(detail.title, None);
        assert!(detail.online);
    }

    #[test]
    fn null_sample_fields_deserialize() {
        let s: CookSample = serde_json::from_value(json!({
            "sec": 1,
            "meat_temp2": null,
            "amb_temp": 210,
        }))
        .unwrap();
        assert_eq!(s.meat_temp2, None);
        assert_eq!(s.extra.get("amb_temp"), Some(&json!(210)));
    }
}
