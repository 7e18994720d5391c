// Device endpoints
//
// Discovery reads the account's device list; the pit set-point write goes
// to a per-device endpoint on the v1 API.

use tracing::debug;

use crate::client::FlameBossClient;
use crate::error::Error;
use crate::models::{DeviceList, SetTempForm};
use crate::units;

impl FlameBossClient {
    /// Find the account's controller and remember its id for later writes.
    ///
    /// `GET /api/v4/devices`. The first listed device is taken; the API
    /// documents no ordering, so accounts with several controllers get
    /// whichever the server lists first.
    pub async fn discover_device(&self) -> Result<String, Error> {
        let url = self.api_url("devices")?;
        let list: DeviceList = self.get(url).await?;

        let device = list.ip_devices.first().ok_or_else(|| Error::NotFound {
            what: "no devices registered to this account".into(),
        })?;
        let device_id = device.id.to_string();

        debug!(
            device_id,
            listed = list.ip_devices.len(),
            "selected first listed device"
        );
        self.set_device_id(device_id.clone());
        Ok(device_id)
    }

    /// Change the pit set-point.
    ///
    /// `POST /api/v1/devices/{device_id}/set_set_temp` with `temp_tdc` in
    /// tenths of °C. The response body is not inspected; only a transport
    /// failure or non-success status is reported.
    pub async fn set_target_temperature(&self, temp_f: i32) -> Result<(), Error> {
        let device_id = self.device_id().ok_or_else(|| Error::Configuration {
            message: "no device id; run device discovery first".into(),
        })?;

        let form = SetTempForm {
            temp_tdc: units::fahrenheit_to_raw(temp_f),
        };
        let url = self.write_url(&format!("devices/{device_id}/set_set_temp"))?;
        debug!(temp_f, temp_tdc = form.temp_tdc, "setting pit target");

        self.post_form(url, &form).await
    }
}
