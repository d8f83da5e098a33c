//! Domain layer: strong types with validation and invariants (no I/O).

mod api_error;
mod batch;
pub(crate) mod codec;
mod filter;
mod group;
mod inbound;
mod page;
mod report;
mod validation;
mod value;

pub use api_error::{ApiError, BadRequestError};
pub use batch::{
    BatchMetadata, BatchOptions, BatchUpdateOptions, DryRunPerRecipient, MAX_BINARY_LENGTH,
    MediaBody, MtBatchBinaryCreate, MtBatchBinaryResult, MtBatchBinaryUpdate, MtBatchCreate,
    MtBatchDryRunResult, MtBatchMediaCreate, MtBatchMediaResult, MtBatchMediaUpdate,
    MtBatchResult, MtBatchTextCreate, MtBatchTextResult, MtBatchTextUpdate, MtBatchUpdate,
    ParameterValues, Parameters,
};
pub use filter::{
    BatchDeliveryReportParams, BatchDeliveryReportParamsBuilder, BatchFilter, BatchFilterBuilder,
    DeliveryReportFilter, DeliveryReportFilterBuilder, GroupFilter, GroupFilterBuilder,
    InboundsFilter, InboundsFilterBuilder,
};
pub use group::{
    AutoUpdate, GroupCreate, GroupCreateBuilder, GroupResult, GroupUpdate, KeywordPair, Tags,
    TagsUpdate,
};
pub use inbound::{
    MediaStatus, MoBinary, MoMedia, MoMediaBody, MoMediaItem, MoMetadata, MoSms, MoText,
};
pub use page::Page;
pub use report::{
    BatchDeliveryReport, BatchDeliveryReportKind, DeliveryFeedback, DeliveryStatus,
    DeliveryStatusCount, RecipientDeliveryReport, RecipientDeliveryReportKind, ReportType,
};
pub use validation::ValidationError;
pub use value::{BatchId, GroupId, PhoneNumber, ServicePlanId, Token, UpdateValue};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_reports_its_own_size() {
        let page = Page::new(2, 10, vec!["a", "b", "c"]);
        assert_eq!(page.page(), 2);
        assert_eq!(page.size(), 3);
        assert_eq!(page.total_size(), 10);
        assert!(!page.is_empty());
        assert_eq!((&page).into_iter().count(), 3);
        assert_eq!(page.into_iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);

        let empty = Page::<u8>::new(0, 0, Vec::new());
        assert!(empty.is_empty());
    }

    #[test]
    fn phone_numbers_feed_recipient_lists() {
        let phone = PhoneNumber::parse(None, "+46 70 123 45 67").unwrap();
        let batch = MtBatchTextCreate::new([phone], "hi", BatchOptions::default()).unwrap();
        assert_eq!(batch.to().to_vec(), vec!["+46701234567".to_owned()]);
    }
}
