//! Batch, delivery report and batch tag endpoints.

use reqwest::Method;

use crate::client::{ApiConnection, PagedFetcher, XmsError};
use crate::domain::{
    BatchDeliveryReport, BatchDeliveryReportParams, BatchFilter, BatchId, DeliveryFeedback,
    DeliveryReportFilter, MtBatchCreate, MtBatchDryRunResult, MtBatchResult, MtBatchUpdate,
    RecipientDeliveryReport, Tags, TagsUpdate,
};
use crate::transport::paged::{BATCHES, DELIVERY_REPORTS};
use crate::transport::query;

const DRY_RUN: &str = "dry_run";
const DELIVERY_REPORT: &str = "delivery_report";
const DELIVERY_FEEDBACK: &str = "delivery_feedback";
const TAGS: &str = "tags";

impl ApiConnection {
    /// Create and send a batch.
    pub async fn create_batch(
        &self,
        batch: impl Into<MtBatchCreate>,
    ) -> Result<MtBatchResult, XmsError> {
        let body = self.encode(&batch.into())?;
        self.send_json(Method::POST, &[BATCHES], Vec::new(), Some(body))
            .await
    }

    /// Compute how a batch would be split into messages without sending it.
    ///
    /// `per_recipient` asks for a per recipient breakdown, limited to
    /// `number_of_recipients` entries when given.
    pub async fn create_batch_dry_run(
        &self,
        batch: impl Into<MtBatchCreate>,
        per_recipient: Option<bool>,
        number_of_recipients: Option<u32>,
    ) -> Result<MtBatchDryRunResult, XmsError> {
        let body = self.encode(&batch.into())?;
        let params = query::encode_dry_run_params(per_recipient, number_of_recipients);
        self.send_json(Method::POST, &[BATCHES, DRY_RUN], params, Some(body))
            .await
    }

    /// Replace a batch that has not been sent yet.
    pub async fn replace_batch(
        &self,
        id: &BatchId,
        batch: impl Into<MtBatchCreate>,
    ) -> Result<MtBatchResult, XmsError> {
        let body = self.encode(&batch.into())?;
        self.send_json(Method::PUT, &[BATCHES, id.as_str()], Vec::new(), Some(body))
            .await
    }

    /// Apply a partial update to a batch.
    pub async fn update_batch(
        &self,
        id: &BatchId,
        update: impl Into<MtBatchUpdate>,
    ) -> Result<MtBatchResult, XmsError> {
        let update = update.into();
        update.validate()?;
        let body = self.encode(&update)?;
        self.send_json(
            Method::POST,
            &[BATCHES, id.as_str()],
            Vec::new(),
            Some(body),
        )
        .await
    }

    /// Fetch a batch by id.
    pub async fn fetch_batch(&self, id: &BatchId) -> Result<MtBatchResult, XmsError> {
        self.send_json(Method::GET, &[BATCHES, id.as_str()], Vec::new(), None)
            .await
    }

    /// Cancel a batch. The returned batch has `canceled` set.
    pub async fn cancel_batch(&self, id: &BatchId) -> Result<MtBatchResult, XmsError> {
        self.send_json(Method::DELETE, &[BATCHES, id.as_str()], Vec::new(), None)
            .await
    }

    /// List batches matching `filter`.
    pub fn fetch_batches(&self, filter: BatchFilter) -> PagedFetcher<MtBatchResult> {
        let conn = self.clone();
        PagedFetcher::new(move |page| {
            let conn = conn.clone();
            let params = query::encode_batch_filter(&filter, page);
            async move { conn.fetch_page(&[BATCHES], params, BATCHES).await }
        })
    }

    /// Delivery report summarizing every message of a batch.
    pub async fn fetch_delivery_report(
        &self,
        id: &BatchId,
        params: &BatchDeliveryReportParams,
    ) -> Result<BatchDeliveryReport, XmsError> {
        let params = query::encode_batch_delivery_report_params(params);
        self.send_json(
            Method::GET,
            &[BATCHES, id.as_str(), DELIVERY_REPORT],
            params,
            None,
        )
        .await
    }

    /// Delivery report for one recipient of a batch.
    pub async fn fetch_recipient_delivery_report(
        &self,
        id: &BatchId,
        recipient: &str,
    ) -> Result<RecipientDeliveryReport, XmsError> {
        self.send_json(
            Method::GET,
            &[BATCHES, id.as_str(), DELIVERY_REPORT, recipient],
            Vec::new(),
            None,
        )
        .await
    }

    /// List recipient delivery reports across all batches.
    pub fn fetch_delivery_reports(
        &self,
        filter: DeliveryReportFilter,
    ) -> PagedFetcher<RecipientDeliveryReport> {
        let conn = self.clone();
        PagedFetcher::new(move |page| {
            let conn = conn.clone();
            let params = query::encode_delivery_report_filter(&filter, page);
            async move {
                conn.fetch_page(&[DELIVERY_REPORTS], params, DELIVERY_REPORTS)
                    .await
            }
        })
    }

    /// Report which recipients received a batch sent with `feedback_enabled`.
    pub async fn create_delivery_feedback(
        &self,
        id: &BatchId,
        feedback: &DeliveryFeedback,
    ) -> Result<(), XmsError> {
        let body = self.encode(feedback)?;
        self.send_empty(
            Method::POST,
            &[BATCHES, id.as_str(), DELIVERY_FEEDBACK],
            Some(body),
        )
        .await
    }

    /// Tags attached to a batch.
    pub async fn fetch_batch_tags(&self, id: &BatchId) -> Result<Tags, XmsError> {
        self.send_json(Method::GET, &[BATCHES, id.as_str(), TAGS], Vec::new(), None)
            .await
    }

    /// Replace every tag of a batch.
    pub async fn replace_batch_tags(&self, id: &BatchId, tags: &Tags) -> Result<Tags, XmsError> {
        let body = self.encode(tags)?;
        self.send_json(
            Method::PUT,
            &[BATCHES, id.as_str(), TAGS],
            Vec::new(),
            Some(body),
        )
        .await
    }

    /// Add and remove batch tags in one request.
    pub async fn update_batch_tags(
        &self,
        id: &BatchId,
        update: &TagsUpdate,
    ) -> Result<Tags, XmsError> {
        let body = self.encode(update)?;
        self.send_json(
            Method::POST,
            &[BATCHES, id.as_str(), TAGS],
            Vec::new(),
            Some(body),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;
    use serde_json::json;

    use crate::client::test_support::{FakeTransport, make_connection};
    use crate::domain::{
        BatchOptions, DeliveryStatus, MtBatchTextCreate, MtBatchTextUpdate, ReportType,
        UpdateValue, ValidationError,
    };

    use super::*;

    const TEXT_BATCH: &str = r#"{
        "type": "mt_text",
        "id": "b1",
        "to": ["46701234567"],
        "from": "12345",
        "body": "hello",
        "canceled": false,
        "created_at": "2016-12-01T11:03:13.964Z",
        "modified_at": "2016-12-01T11:03:13.964Z",
        "unknown_field": 1
    }"#;

    fn batch_id() -> BatchId {
        BatchId::new("b1").unwrap()
    }

    fn batches_page(page: u32) -> String {
        format!(r#"{{"page":{page},"page_size":1,"count":2,"batches":[{TEXT_BATCH}]}}"#)
    }

    fn text_batch() -> MtBatchTextCreate {
        let options = BatchOptions {
            from: Some("12345".to_owned()),
            ..Default::default()
        };
        MtBatchTextCreate::new(["46701234567"], "hello", options).unwrap()
    }

    #[tokio::test]
    async fn create_batch_posts_tagged_json() {
        let transport = FakeTransport::new(201, TEXT_BATCH);
        let conn = make_connection(transport.clone());

        let batch = conn.create_batch(text_batch()).await.unwrap();

        assert_eq!(batch.id().as_str(), "b1");
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(transport.last_target().unwrap(), "/xms/v1/plan/batches");
        assert_eq!(
            transport.last_json().unwrap(),
            json!({
                "type": "mt_text",
                "to": ["46701234567"],
                "from": "12345",
                "body": "hello"
            })
        );
    }

    #[tokio::test]
    async fn dry_run_sends_its_parameters() {
        let transport = FakeTransport::new(
            200,
            r#"{"number_of_recipients":1,"number_of_messages":2,"per_recipient":[
                {"recipient":"46701234567","number_of_parts":2,"body":"hello",
                 "encoding":"text"}]}"#,
        );
        let conn = make_connection(transport.clone());

        let result = conn
            .create_batch_dry_run(text_batch(), Some(true), Some(10))
            .await
            .unwrap();

        assert_eq!(result.number_of_messages, 2);
        assert_eq!(result.per_recipient[0].number_of_parts, 2);
        assert_eq!(
            transport.last_target().unwrap(),
            "/xms/v1/plan/batches/dry_run?per_recipient=true&number_of_recipients=10"
        );
    }

    #[tokio::test]
    async fn batch_lifecycle_uses_the_right_methods() {
        let transport = FakeTransport::new(200, TEXT_BATCH);
        let conn = make_connection(transport.clone());
        let id = batch_id();

        conn.fetch_batch(&id).await.unwrap();
        conn.replace_batch(&id, text_batch()).await.unwrap();
        conn.update_batch(
            &id,
            MtBatchTextUpdate {
                body: Some("changed".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        conn.cancel_batch(&id).await.unwrap();

        let methods: Vec<_> = transport
            .requests()
            .into_iter()
            .map(|request| (request.method, request.url.path().to_owned()))
            .collect();
        let path = "/xms/v1/plan/batches/b1".to_owned();
        assert_eq!(
            methods,
            vec![
                (Method::GET, path.clone()),
                (Method::PUT, path.clone()),
                (Method::POST, path.clone()),
                (Method::DELETE, path),
            ]
        );
    }

    #[tokio::test]
    async fn update_sends_reset_values_as_null() {
        let transport = FakeTransport::new(200, TEXT_BATCH);
        let conn = make_connection(transport.clone());

        let mut update = MtBatchTextUpdate::default();
        update.options.send_at = Some(UpdateValue::Unset);
        conn.update_batch(&batch_id(), update).await.unwrap();

        assert_eq!(
            transport.last_json().unwrap(),
            json!({ "type": "mt_text", "send_at": null })
        );
    }

    #[tokio::test]
    async fn invalid_update_is_rejected_before_sending() {
        let transport = FakeTransport::new(200, TEXT_BATCH);
        let conn = make_connection(transport.clone());

        let mut update = MtBatchTextUpdate::default();
        update.options.from = Some(String::new());
        let err = conn.update_batch(&batch_id(), update).await.unwrap_err();

        assert!(matches!(err, XmsError::Validation(ValidationError::Empty { .. })));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn fetch_batches_walks_every_page() {
        let transport = FakeTransport::sequence([(200, batches_page(0)), (200, batches_page(1))]);
        let conn = make_connection(transport.clone());
        let filter = BatchFilter::builder().page_size(1).build().unwrap();

        let batches: Vec<_> = conn
            .fetch_batches(filter)
            .elements()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(batches.len(), 2);
        let queries: Vec<_> = transport
            .requests()
            .iter()
            .map(|request| request.url.query().unwrap_or_default().to_owned())
            .collect();
        assert_eq!(queries, vec!["page=0&page_size=1", "page=1&page_size=1"]);
    }

    #[tokio::test]
    async fn delivery_reports() {
        let transport = FakeTransport::new(
            200,
            r#"{"type":"delivery_report_sms","batch_id":"b1","total_message_count":2,
                "statuses":[{"code":0,"status":"Delivered","count":2,"recipients":["a","b"]}]}"#,
        );
        let conn = make_connection(transport.clone());
        let params = BatchDeliveryReportParams::builder()
            .report_type(ReportType::Full)
            .status(DeliveryStatus::Delivered)
            .build()
            .unwrap();

        let report = conn
            .fetch_delivery_report(&batch_id(), &params)
            .await
            .unwrap();

        assert_eq!(report.total_message_count, 2);
        assert_eq!(report.statuses[0].status, DeliveryStatus::Delivered);
        assert_eq!(
            transport.last_target().unwrap(),
            "/xms/v1/plan/batches/b1/delivery_report?type=full&status=Delivered"
        );

        let transport = FakeTransport::new(
            200,
            r#"{"type":"recipient_delivery_report_sms","batch_id":"b1","recipient":"+46701234567",
                "code":0,"status":"Delivered","at":"2016-12-05T16:24:23.318+01:00"}"#,
        );
        let conn = make_connection(transport.clone());

        let report = conn
            .fetch_recipient_delivery_report(&batch_id(), "+46701234567")
            .await
            .unwrap();

        assert_eq!(report.recipient, "+46701234567");
        assert_eq!(report.at.offset().local_minus_utc(), 3600);
        assert_eq!(
            transport.last_target().unwrap(),
            "/xms/v1/plan/batches/b1/delivery_report/+46701234567"
        );
    }

    #[tokio::test]
    async fn delivery_report_listing_uses_its_own_endpoint() {
        let transport = FakeTransport::new(
            200,
            r#"{"page":0,"page_size":1,"count":1,"delivery_reports":[
                {"type":"recipient_delivery_report_sms","batch_id":"b1","recipient":"123",
                 "code":401,"status":"Dispatched","at":"2016-12-05T16:24:23.318Z"}]}"#,
        );
        let conn = make_connection(transport.clone());

        let page = conn
            .fetch_delivery_reports(DeliveryReportFilter::default())
            .fetch(0)
            .await
            .unwrap();

        assert_eq!(page.content()[0].code, 401);
        assert_eq!(
            transport.last_target().unwrap(),
            "/xms/v1/plan/delivery_reports?page=0"
        );
    }

    #[tokio::test]
    async fn delivery_feedback_expects_no_content() {
        let transport = FakeTransport::new(202, "");
        let conn = make_connection(transport.clone());

        conn.create_delivery_feedback(&batch_id(), &DeliveryFeedback::new(["123"]))
            .await
            .unwrap();

        assert_eq!(
            transport.last_target().unwrap(),
            "/xms/v1/plan/batches/b1/delivery_feedback"
        );
        assert_eq!(
            transport.last_json().unwrap(),
            json!({ "recipients": ["123"] })
        );
    }

    #[tokio::test]
    async fn batch_tags() {
        let transport = FakeTransport::new(200, r#"{"tags":["a","b"]}"#);
        let conn = make_connection(transport.clone());
        let id = batch_id();

        let tags = conn.fetch_batch_tags(&id).await.unwrap();
        assert_eq!(tags, Tags::new(["a", "b"]).unwrap());

        conn.replace_batch_tags(&id, &tags).await.unwrap();
        assert_eq!(transport.last_request().unwrap().method, Method::PUT);
        assert_eq!(
            transport.last_json().unwrap(),
            json!({ "tags": ["a", "b"] })
        );

        let update = TagsUpdate::new(["c"], ["a"]).unwrap();
        conn.update_batch_tags(&id, &update).await.unwrap();
        assert_eq!(transport.last_request().unwrap().method, Method::POST);
        assert_eq!(
            transport.last_json().unwrap(),
            json!({ "add": ["c"], "remove": ["a"] })
        );
        assert_eq!(
            transport.last_target().unwrap(),
            "/xms/v1/plan/batches/b1/tags"
        );
    }

    #[tokio::test]
    async fn api_errors_are_typed() {
        let conn = make_connection(FakeTransport::new(
            400,
            r#"{"code":"syntax_constraint_violation","text":"to must not be empty"}"#,
        ));

        match conn.create_batch(text_batch()).await.unwrap_err() {
            XmsError::ErrorResponse { code, text } => {
                assert_eq!(code, "syntax_constraint_violation");
                assert_eq!(text, "to must not be empty");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
