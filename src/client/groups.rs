//! Group endpoints.

use std::collections::BTreeSet;

use reqwest::Method;

use crate::client::{ApiConnection, PagedFetcher, XmsError};
use crate::domain::{GroupCreate, GroupFilter, GroupId, GroupResult, GroupUpdate, Tags, TagsUpdate};
use crate::transport::paged::GROUPS;
use crate::transport::query;

const MEMBERS: &str = "members";
const TAGS: &str = "tags";

impl ApiConnection {
    /// Create a group.
    pub async fn create_group(&self, group: &GroupCreate) -> Result<GroupResult, XmsError> {
        let body = self.encode(group)?;
        self.send_json(Method::POST, &[GROUPS], Vec::new(), Some(body))
            .await
    }

    /// Fetch a group by id.
    pub async fn fetch_group(&self, id: &GroupId) -> Result<GroupResult, XmsError> {
        self.send_json(Method::GET, &[GROUPS, id.as_str()], Vec::new(), None)
            .await
    }

    /// Phone numbers of the group's direct members.
    pub async fn fetch_group_members(&self, id: &GroupId) -> Result<BTreeSet<String>, XmsError> {
        self.send_json(
            Method::GET,
            &[GROUPS, id.as_str(), MEMBERS],
            Vec::new(),
            None,
        )
        .await
    }

    /// List groups matching `filter`.
    pub fn fetch_groups(&self, filter: GroupFilter) -> PagedFetcher<GroupResult> {
        let conn = self.clone();
        PagedFetcher::new(move |page| {
            let conn = conn.clone();
            let params = query::encode_group_filter(&filter, page);
            async move { conn.fetch_page(&[GROUPS], params, GROUPS).await }
        })
    }

    /// Apply a partial update to a group.
    pub async fn update_group(
        &self,
        id: &GroupId,
        update: &GroupUpdate,
    ) -> Result<GroupResult, XmsError> {
        update.validate()?;
        let body = self.encode(update)?;
        self.send_json(Method::POST, &[GROUPS, id.as_str()], Vec::new(), Some(body))
            .await
    }

    /// Replace every property of a group.
    pub async fn replace_group(
        &self,
        id: &GroupId,
        group: &GroupCreate,
    ) -> Result<GroupResult, XmsError> {
        let body = self.encode(group)?;
        self.send_json(Method::PUT, &[GROUPS, id.as_str()], Vec::new(), Some(body))
            .await
    }

    /// Delete a group. Any response body is ignored.
    pub async fn delete_group(&self, id: &GroupId) -> Result<(), XmsError> {
        self.send_empty(Method::DELETE, &[GROUPS, id.as_str()], None)
            .await
    }

    /// Tags attached to a group.
    pub async fn fetch_group_tags(&self, id: &GroupId) -> Result<Tags, XmsError> {
        self.send_json(Method::GET, &[GROUPS, id.as_str(), TAGS], Vec::new(), None)
            .await
    }

    /// Replace every tag of a group.
    pub async fn replace_group_tags(&self, id: &GroupId, tags: &Tags) -> Result<Tags, XmsError> {
        let body = self.encode(tags)?;
        self.send_json(
            Method::PUT,
            &[GROUPS, id.as_str(), TAGS],
            Vec::new(),
            Some(body),
        )
        .await
    }

    /// Add and remove group tags in one request.
    pub async fn update_group_tags(
        &self,
        id: &GroupId,
        update: &TagsUpdate,
    ) -> Result<Tags, XmsError> {
        let body = self.encode(update)?;
        self.send_json(
            Method::POST,
            &[GROUPS, id.as_str(), TAGS],
            Vec::new(),
            Some(body),
        )
        .await
    }
}
