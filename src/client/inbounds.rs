//! Inbound message endpoints.

use reqwest::Method;

use crate::client::{ApiConnection, PagedFetcher, XmsError};
use crate::domain::{InboundsFilter, MoSms};
use crate::transport::paged::INBOUNDS;
use crate::transport::query;

impl ApiConnection {
    /// List inbound messages matching `filter`.
    pub fn fetch_inbounds(&self, filter: InboundsFilter) -> PagedFetcher<MoSms> {
        let conn = self.clone();
        PagedFetcher::new(move |page| {
            let conn = conn.clone();
            let params = query::encode_inbounds_filter(&filter, page);
            async move { conn.fetch_page(&[INBOUNDS], params, INBOUNDS).await }
        })
    }

    /// Fetch a single inbound message by id.
    pub async fn fetch_inbound(&self, id: &str) -> Result<MoSms, XmsError> {
        self.send_json(Method::GET, &[INBOUNDS, id], Vec::new(), None)
            .await
    }
}
