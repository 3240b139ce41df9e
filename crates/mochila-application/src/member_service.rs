//! Member listing and detail views.

use chrono::NaiveDate;
use mochila_core::error::{MochilaError, Result};
use mochila_core::member::{MemberDetail, MemberSummary, PhotoUrlResolver, SortMode, sort_members};
use mochila_core::user::UserRepository;
use std::sync::Arc;

use crate::ANONYMOUS_VIEWER;
use crate::interaction_ledger::InteractionLedger;

/// Read side of the member directory.
pub struct MemberQueryService {
    users: Arc<dyn UserRepository>,
    ledger: Arc<InteractionLedger>,
    resolver: PhotoUrlResolver,
}

impl MemberQueryService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        ledger: Arc<InteractionLedger>,
        resolver: PhotoUrlResolver,
    ) -> Self {
        Self {
            users,
            ledger,
            resolver,
        }
    }

    pub async fn list_members(
        &self,
        sort: SortMode,
        exclude_email: Option<&str>,
    ) -> Result<Vec<MemberSummary>> {
        self.list_members_on(sort, exclude_email, crate::today()).await
    }

    /// Members with a display name, minus `exclude_email`, ordered by `sort`.
    pub async fn list_members_on(
        &self,
        sort: SortMode,
        exclude_email: Option<&str>,
        today: NaiveDate,
    ) -> Result<Vec<MemberSummary>> {
        let exclude_email = exclude_email.filter(|e| !e.is_empty());

        let mut users: Vec<_> = self
            .users
            .get_all()
            .await?
            .into_iter()
            .filter(|u| u.has_display_name())
            .filter(|u| exclude_email != Some(u.email.as_str()))
            .collect();

        sort_members(&mut users, sort);

        Ok(users
            .iter()
            .map(|u| MemberSummary::project(u, &self.resolver, today))
            .collect())
    }

    pub async fn get_member_detail(
        &self,
        member_id: &str,
        viewer_id: Option<&str>,
    ) -> Result<MemberDetail> {
        self.get_member_detail_on(member_id, viewer_id, crate::today())
            .await
    }

    /// Resolves the member and records the view.
    ///
    /// Unknown ids fail with `NotFound` before any footprint is written. The
    /// returned counters include this view.
    pub async fn get_member_detail_on(
        &self,
        member_id: &str,
        viewer_id: Option<&str>,
        today: NaiveDate,
    ) -> Result<MemberDetail> {
        let mut member = self
            .users
            .get_by_id(member_id)
            .await?
            .ok_or_else(|| MochilaError::not_found("Member", member_id))?;

        let viewer_id = viewer_id
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(ANONYMOUS_VIEWER);
        self.ledger.add_footprint(viewer_id, member_id).await?;
        member.views_count = member.views_count.saturating_add(1);

        Ok(MemberDetail::project(&member, &self.resolver, today))
    }
}
