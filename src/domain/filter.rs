//! Filters for the listing endpoints.
//!
//! Multi-value fields are sent as one comma-joined query parameter, so every
//! builder rejects values containing a comma when [`build`](BatchFilterBuilder::build)
//! is called.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::domain::report::{DeliveryStatus, ReportType};
use crate::domain::validation::{ValidationError, reject_commas};

fn reject_status_commas(statuses: &BTreeSet<DeliveryStatus>) -> Result<(), ValidationError> {
    match statuses.iter().find(|status| status.as_str().contains(',')) {
        Some(status) => Err(ValidationError::ContainsComma {
            field: "status",
            value: status.as_str().to_owned(),
        }),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Filter for listing batches.
pub struct BatchFilter {
    page_size: u32,
    start_date: Option<DateTime<FixedOffset>>,
    end_date: Option<DateTime<FixedOffset>>,
    senders: BTreeSet<String>,
    tags: BTreeSet<String>,
    client_reference: Option<String>,
}

impl BatchFilter {
    pub fn builder() -> BatchFilterBuilder {
        BatchFilterBuilder::default()
    }

    /// Requested page size; `0` leaves the choice to the server.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn start_date(&self) -> Option<&DateTime<FixedOffset>> {
        self.start_date.as_ref()
    }

    pub fn end_date(&self) -> Option<&DateTime<FixedOffset>> {
        self.end_date.as_ref()
    }

    pub fn senders(&self) -> &BTreeSet<String> {
        &self.senders
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn client_reference(&self) -> Option<&str> {
        self.client_reference.as_deref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchFilterBuilder {
    filter: BatchFilter,
}

impl BatchFilterBuilder {
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.filter.page_size = page_size;
        self
    }

    pub fn start_date(mut self, start_date: DateTime<FixedOffset>) -> Self {
        self.filter.start_date = Some(start_date);
        self
    }

    pub fn end_date(mut self, end_date: DateTime<FixedOffset>) -> Self {
        self.filter.end_date = Some(end_date);
        self
    }

    /// Only batches sent from this sender.
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.filter.senders.insert(sender.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.filter.tags.insert(tag.into());
        self
    }

    pub fn client_reference(mut self, client_reference: impl Into<String>) -> Self {
        self.filter.client_reference = Some(client_reference.into());
        self
    }

    pub fn build(self) -> Result<BatchFilter, ValidationError> {
        reject_commas("from", &self.filter.senders)?;
        reject_commas("tags", &self.filter.tags)?;
        Ok(self.filter)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Filter for listing groups.
pub struct GroupFilter {
    page_size: u32,
    tags: BTreeSet<String>,
}

impl GroupFilter {
    pub fn builder() -> GroupFilterBuilder {
        GroupFilterBuilder::default()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupFilterBuilder {
    filter: GroupFilter,
}

impl GroupFilterBuilder {
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.filter.page_size = page_size;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.filter.tags.insert(tag.into());
        self
    }

    pub fn build(self) -> Result<GroupFilter, ValidationError> {
        reject_commas("tags", &self.filter.tags)?;
        Ok(self.filter)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Filter for listing inbound messages.
pub struct InboundsFilter {
    page_size: u32,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    recipients: BTreeSet<String>,
    client_reference: Option<String>,
}

impl InboundsFilter {
    pub fn builder() -> InboundsFilterBuilder {
        InboundsFilterBuilder::default()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn recipients(&self) -> &BTreeSet<String> {
        &self.recipients
    }

    pub fn client_reference(&self) -> Option<&str> {
        self.client_reference.as_deref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InboundsFilterBuilder {
    filter: InboundsFilter,
}

impl InboundsFilterBuilder {
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.filter.page_size = page_size;
        self
    }

    pub fn start_date(mut self, start_date: NaiveDate) -> Self {
        self.filter.start_date = Some(start_date);
        self
    }

    pub fn end_date(mut self, end_date: NaiveDate) -> Self {
        self.filter.end_date = Some(end_date);
        self
    }

    /// Only messages sent to this number or short code.
    pub fn recipient(mut self, recipient: impl Into<String>) -> Self {
        self.filter.recipients.insert(recipient.into());
        self
    }

    pub fn client_reference(mut self, client_reference: impl Into<String>) -> Self {
        self.filter.client_reference = Some(client_reference.into());
        self
    }

    pub fn build(self) -> Result<InboundsFilter, ValidationError> {
        reject_commas("to", &self.filter.recipients)?;
        Ok(self.filter)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Filter for listing recipient delivery reports across batches.
pub struct DeliveryReportFilter {
    page_size: u32,
    start_date: Option<DateTime<FixedOffset>>,
    end_date: Option<DateTime<FixedOffset>>,
    statuses: BTreeSet<DeliveryStatus>,
    codes: BTreeSet<i32>,
    client_reference: Option<String>,
}

impl DeliveryReportFilter {
    pub fn builder() -> DeliveryReportFilterBuilder {
        DeliveryReportFilterBuilder::default()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn start_date(&self) -> Option<&DateTime<FixedOffset>> {
        self.start_date.as_ref()
    }

    pub fn end_date(&self) -> Option<&DateTime<FixedOffset>> {
        self.end_date.as_ref()
    }

    pub fn statuses(&self) -> &BTreeSet<DeliveryStatus> {
        &self.statuses
    }

    pub fn codes(&self) -> &BTreeSet<i32> {
        &self.codes
    }

    pub fn client_reference(&self) -> Option<&str> {
        self.client_reference.as_deref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeliveryReportFilterBuilder {
    filter: DeliveryReportFilter,
}

impl DeliveryReportFilterBuilder {
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.filter.page_size = page_size;
        self
    }

    pub fn start_date(mut self, start_date: DateTime<FixedOffset>) -> Self {
        self.filter.start_date = Some(start_date);
        self
    }

    pub fn end_date(mut self, end_date: DateTime<FixedOffset>) -> Self {
        self.filter.end_date = Some(end_date);
        self
    }

    pub fn status(mut self, status: DeliveryStatus) -> Self {
        self.filter.statuses.insert(status);
        self
    }

    pub fn code(mut self, code: i32) -> Self {
        self.filter.codes.insert(code);
        self
    }

    pub fn client_reference(mut self, client_reference: impl Into<String>) -> Self {
        self.filter.client_reference = Some(client_reference.into());
        self
    }

    pub fn build(self) -> Result<DeliveryReportFilter, ValidationError> {
        reject_status_commas(&self.filter.statuses)?;
        Ok(self.filter)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Query parameters for a batch delivery report.
pub struct BatchDeliveryReportParams {
    report_type: Option<ReportType>,
    statuses: BTreeSet<DeliveryStatus>,
    codes: BTreeSet<i32>,
}

impl BatchDeliveryReportParams {
    pub fn builder() -> BatchDeliveryReportParamsBuilder {
        BatchDeliveryReportParamsBuilder::default()
    }

    /// A summary report without status or code restrictions.
    pub fn summary() -> Self {
        Self {
            report_type: Some(ReportType::Summary),
            ..Default::default()
        }
    }

    /// A full report, including the recipients of each status.
    pub fn full() -> Self {
        Self {
            report_type: Some(ReportType::Full),
            ..Default::default()
        }
    }

    pub fn report_type(&self) -> Option<&ReportType> {
        self.report_type.as_ref()
    }

    pub fn statuses(&self) -> &BTreeSet<DeliveryStatus> {
        &self.statuses
    }

    pub fn codes(&self) -> &BTreeSet<i32> {
        &self.codes
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchDeliveryReportParamsBuilder {
    params: BatchDeliveryReportParams,
}

impl BatchDeliveryReportParamsBuilder {
    pub fn report_type(mut self, report_type: ReportType) -> Self {
        self.params.report_type = Some(report_type);
        self
    }

    pub fn status(mut self, status: DeliveryStatus) -> Self {
        self.params.statuses.insert(status);
        self
    }

    pub fn code(mut self, code: i32) -> Self {
        self.params.codes.insert(code);
        self
    }

    pub fn build(self) -> Result<BatchDeliveryReportParams, ValidationError> {
        reject_status_commas(&self.params.statuses)?;
        Ok(self.params)
    }
}
