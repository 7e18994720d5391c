// Cook session endpoints

use tracing::debug;

use crate::client::FlameBossClient;
use crate::error::Error;
use crate::models::{CookDetail, CookList, CookSummary};

impl FlameBossClient {
    /// List the account's cook sessions.
    ///
    /// `GET /api/v4/cooks`
    pub async fn list_cooks(&self) -> Result<Vec<CookSummary>, Error> {
        let url = self.api_url("cooks")?;
        let list: CookList = self.get(url).await?;
        Ok(list.cooks)
    }

    /// Full detail of one cook, including its sample history.
    ///
    /// `GET /api/v4/cooks/{id}`
    pub async fn get_cook(&self, cook_id: i64) -> Result<CookDetail, Error> {
        let url = self.api_url(&format!("cooks/{cook_id}"))?;
        self.get(url).await
    }

    /// Fetch the current cook: the first entry of the cook list, in full.
    ///
    /// The server lists cooks newest first in practice, but this ordering
    /// is not documented.
    pub async fn fetch_cook_snapshot(&self) -> Result<CookDetail, Error> {
        let cooks = self.list_cooks().await?;
        let current = cooks.first().ok_or_else(|| Error::NotFound {
            what: "no cook sessions on this account".into(),
        })?;

        debug!(cook_id = current.id, listed = cooks.len(), "fetching current cook");
        self.get_cook(current.id).await
    }
}
