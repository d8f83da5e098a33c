//! Typed Rust client for the XMS SMS/MMS REST API.
//!
//! The crate has three layers: a domain layer of strong types, a transport
//! layer for wire-format details, and a client layer that sends requests and
//! classifies responses. Every operation comes in an async form on
//! [`ApiConnection`] and a blocking form on [`BlockingApiConnection`].
//!
//! ```rust,no_run
//! use futures::TryStreamExt;
//! use xms::{ApiConnection, BatchFilter, BatchOptions, MtBatchTextCreate, ServicePlanId, Token};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), xms::XmsError> {
//!     let conn = ApiConnection::builder(ServicePlanId::new("my-plan")?, Token::new("my-token")?)
//!         .start()?;
//!
//!     let batch = MtBatchTextCreate::new(["46701234567"], "Hello!", BatchOptions::default())?;
//!     let created = conn.create_batch(batch).await?;
//!     println!("created batch {}", created.id());
//!
//!     let batches: Vec<_> = conn
//!         .fetch_batches(BatchFilter::default())
//!         .elements()
//!         .try_collect()
//!         .await?;
//!     println!("{} batches in total", batches.len());
//!
//!     conn.close();
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    ApiConnection, ApiConnectionBuilder, BlockingApiConnection, BlockingPagedFetcher,
    CallbackWrapper, FutureCallback, PagedFetcher, XmsError,
};
pub use domain::{
    ApiError, AutoUpdate, BatchDeliveryReport, BatchDeliveryReportParams, BatchFilter, BatchId,
    BatchOptions, BatchUpdateOptions, DeliveryFeedback, DeliveryReportFilter, DeliveryStatus,
    GroupCreate, GroupFilter, GroupId, GroupResult, GroupUpdate, InboundsFilter, KeywordPair,
    MediaBody, MoSms, MtBatchBinaryCreate, MtBatchCreate, MtBatchMediaCreate, MtBatchResult,
    MtBatchTextCreate, MtBatchTextUpdate, MtBatchUpdate, Page, ParameterValues, PhoneNumber,
    RecipientDeliveryReport, ReportType, ServicePlanId, Tags, TagsUpdate, Token, UpdateValue,
    ValidationError,
};
pub use transport::response::UnexpectedResponse;
