//! Query parameter encoding for filters and report parameters.

use crate::domain::{
    BatchDeliveryReportParams, BatchFilter, DeliveryReportFilter, DeliveryStatus, GroupFilter,
    InboundsFilter,
};

type Params = Vec<(String, String)>;

fn push_page(params: &mut Params, page: u32, page_size: u32) {
    params.push(("page".to_owned(), page.to_string()));
    if page_size > 0 {
        params.push(("page_size".to_owned(), page_size.to_string()));
    }
}

fn push_joined<'a, I>(params: &mut Params, key: &str, values: I)
where
    I: IntoIterator<Item = &'a str>,
{
    let joined = values.into_iter().collect::<Vec<_>>().join(",");
    if !joined.is_empty() {
        params.push((key.to_owned(), joined));
    }
}

fn push_statuses<'a, I>(params: &mut Params, statuses: I)
where
    I: IntoIterator<Item = &'a DeliveryStatus>,
{
    push_joined(
        params,
        "status",
        statuses.into_iter().map(DeliveryStatus::as_str),
    );
}

fn push_codes<'a, I>(params: &mut Params, codes: I)
where
    I: IntoIterator<Item = &'a i32>,
{
    let joined = codes
        .into_iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(",");
    if !joined.is_empty() {
        params.push(("code".to_owned(), joined));
    }
}

pub(crate) fn encode_batch_filter(filter: &BatchFilter, page: u32) -> Params {
    let mut params = Params::new();
    push_page(&mut params, page, filter.page_size());
    if let Some(start) = filter.start_date() {
        params.push(("start_date".to_owned(), start.to_rfc3339()));
    }
    if let Some(end) = filter.end_date() {
        params.push(("end_date".to_owned(), end.to_rfc3339()));
    }
    push_joined(
        &mut params,
        "from",
        filter.senders().iter().map(String::as_str),
    );
    push_joined(
        &mut params,
        "tags",
        filter.tags().iter().map(String::as_str),
    );
    if let Some(client_reference) = filter.client_reference() {
        params.push(("client_reference".to_owned(), client_reference.to_owned()));
    }
    params
}

pub(crate) fn encode_group_filter(filter: &GroupFilter, page: u32) -> Params {
    let mut params = Params::new();
    push_page(&mut params, page, filter.page_size());
    push_joined(
        &mut params,
        "tags",
        filter.tags().iter().map(String::as_str),
    );
    params
}

pub(crate) fn encode_inbounds_filter(filter: &InboundsFilter, page: u32) -> Params {
    let mut params = Params::new();
    push_page(&mut params, page, filter.page_size());
    if let Some(start) = filter.start_date() {
        params.push(("start_date".to_owned(), start.to_string()));
    }
    if let Some(end) = filter.end_date() {
        params.push(("end_date".to_owned(), end.to_string()));
    }
    push_joined(
        &mut params,
        "to",
        filter.recipients().iter().map(String::as_str),
    );
    if let Some(client_reference) = filter.client_reference() {
        params.push(("client_reference".to_owned(), client_reference.to_owned()));
    }
    params
}

pub(crate) fn encode_delivery_report_filter(filter: &DeliveryReportFilter, page: u32) -> Params {
    let mut params = Params::new();
    push_page(&mut params, page, filter.page_size());
    push_statuses(&mut params, filter.statuses());
    push_codes(&mut params, filter.codes());
    if let Some(start) = filter.start_date() {
        params.push(("start_date".to_owned(), start.to_rfc3339()));
    }
    if let Some(end) = filter.end_date() {
        params.push(("end_date".to_owned(), end.to_rfc3339()));
    }
    if let Some(client_reference) = filter.client_reference() {
        params.push(("client_reference".to_owned(), client_reference.to_owned()));
    }
    params
}

pub(crate) fn encode_batch_delivery_report_params(params: &BatchDeliveryReportParams) -> Params {
    let mut encoded = Params::new();
    if let Some(report_type) = params.report_type() {
        encoded.push(("type".to_owned(), report_type.as_str().to_owned()));
    }
    push_statuses(&mut encoded, params.statuses());
    push_codes(&mut encoded, params.codes());
    encoded
}

pub(crate) fn encode_dry_run_params(
    per_recipient: Option<bool>,
    number_of_recipients: Option<u32>,
) -> Params {
    let mut params = Params::new();
    if let Some(per_recipient) = per_recipient {
        params.push(("per_recipient".to_owned(), per_recipient.to_string()));
    }
    if let Some(number_of_recipients) = number_of_recipients {
        params.push((
            "number_of_recipients".to_owned(),
            number_of_recipients.to_string(),
        ));
    }
    params
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate};
    use url::Url;

    use crate::domain::ReportType;

    use super::*;

    fn pairs(params: &[(&str, &str)]) -> Params {
        params
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn default_filters_only_send_the_page() {
        assert_eq!(
            encode_batch_filter(&BatchFilter::default(), 0),
            pairs(&[("page", "0")])
        );
        assert_eq!(
            encode_group_filter(&GroupFilter::default(), 4),
            pairs(&[("page", "4")])
        );
        assert_eq!(
            encode_inbounds_filter(&InboundsFilter::default(), 1),
            pairs(&[("page", "1")])
        );
        assert_eq!(
            encode_delivery_report_filter(&DeliveryReportFilter::default(), 2),
            pairs(&[("page", "2")])
        );
    }

    #[test]
    fn batch_filter_joins_multi_values() {
        let filter = BatchFilter::builder()
            .page_size(50)
            .start_date(DateTime::parse_from_rfc3339("2016-12-01T00:00:00+01:00").unwrap())
            .sender("12345")
            .sender("6789")
            .tag("tag1")
            .tag("таг2")
            .client_reference("my-ref")
            .build()
            .unwrap();

        assert_eq!(
            encode_batch_filter(&filter, 3),
            pairs(&[
                ("page", "3"),
                ("page_size", "50"),
                ("start_date", "2016-12-01T00:00:00+01:00"),
                ("from", "12345,6789"),
                ("tags", "tag1,таг2"),
                ("client_reference", "my-ref"),
            ])
        );
    }

    #[test]
    fn inbounds_filter_uses_plain_dates() {
        let filter = InboundsFilter::builder()
            .start_date(NaiveDate::from_ymd_opt(2016, 12, 1).unwrap())
            .end_date(NaiveDate::from_ymd_opt(2016, 12, 31).unwrap())
            .recipient("12345")
            .recipient("54321")
            .build()
            .unwrap();

        assert_eq!(
            encode_inbounds_filter(&filter, 0),
            pairs(&[
                ("page", "0"),
                ("start_date", "2016-12-01"),
                ("end_date", "2016-12-31"),
                ("to", "12345,54321"),
            ])
        );
    }

    #[test]
    fn report_params_join_statuses_and_codes() {
        let params = BatchDeliveryReportParams::builder()
            .report_type(ReportType::Full)
            .status(DeliveryStatus::Delivered)
            .status(DeliveryStatus::Aborted)
            .code(400)
            .code(0)
            .build()
            .unwrap();

        assert_eq!(
            encode_batch_delivery_report_params(&params),
            pairs(&[
                ("type", "full"),
                ("status", "Aborted,Delivered"),
                ("code", "0,400"),
            ])
        );
        let empty = BatchDeliveryReportParams::default();
        assert!(encode_batch_delivery_report_params(&empty).is_empty());
    }

    #[test]
    fn delivery_report_filter_orders_parameters() {
        let filter = DeliveryReportFilter::builder()
            .page_size(10)
            .status(DeliveryStatus::Failed)
            .code(11)
            .client_reference("abc")
            .build()
            .unwrap();

        assert_eq!(
            encode_delivery_report_filter(&filter, 1),
            pairs(&[
                ("page", "1"),
                ("page_size", "10"),
                ("status", "Failed"),
                ("code", "11"),
                ("client_reference", "abc"),
            ])
        );
    }

    #[test]
    fn encoded_parameters_are_accepted_by_a_url_builder() {
        let filter = BatchFilter::builder()
            .tag("needs encoding & more")
            .tag("ü")
            .build()
            .unwrap();
        let mut url = Url::parse("https://api.example.invalid/xms/v1/plan/batches").unwrap();
        url.query_pairs_mut()
            .extend_pairs(encode_batch_filter(&filter, 0));

        let back = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect::<Vec<_>>();
        assert_eq!(back, encode_batch_filter(&filter, 0));
    }

    #[test]
    fn dry_run_params_are_optional() {
        assert!(encode_dry_run_params(None, None).is_empty());
        assert_eq!(
            encode_dry_run_params(Some(true), Some(3)),
            pairs(&[("per_recipient", "true"), ("number_of_recipients", "3")])
        );
    }
}
