//! Access Rules
//!
//! Pure functions over profiles and grants. Nothing here talks to the
//! provider; callers load the data and apply results after the provider
//! confirms a write.

use std::collections::HashMap;

use kernel::id::UserId;

use crate::domain::entity::{app_access::AppAccessGrant, profile::Profile};
use crate::domain::value_object::{app_id::AppId, app_role::AppRole, global_role::GlobalRole};

/// Whether a user may open `app_id`.
///
/// Global admins always may. Everyone else needs a grant row for the app.
pub fn effective_access(global_role: GlobalRole, grants: &[AppAccessGrant], app_id: AppId) -> bool {
    global_role.is_global_admin() || grants.iter().any(|grant| grant.app_id == app_id)
}

/// What one cell of the admin grid shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessCell {
    /// Row belongs to an owner/admin. Not editable.
    GlobalAdmin,
    /// Editable role with a revoke control
    Granted { role: AppRole },
    /// No grant yet
    Grantable,
}

impl AccessCell {
    pub fn is_editable(&self) -> bool {
        !matches!(self, AccessCell::GlobalAdmin)
    }
}

/// One user in the admin grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccessRow {
    pub profile: Profile,
    pub grants: Vec<AppAccessGrant>,
}

impl UserAccessRow {
    pub fn new(profile: Profile, grants: Vec<AppAccessGrant>) -> Self {
        Self { profile, grants }
    }

    #[inline]
    pub fn user_id(&self) -> UserId {
        self.profile.id
    }

    pub fn grant_for(&self, app_id: AppId) -> Option<&AppAccessGrant> {
        self.grants.iter().find(|grant| grant.app_id == app_id)
    }

    pub fn has_access(&self, app_id: AppId) -> bool {
        effective_access(self.profile.global_role, &self.grants, app_id)
    }

    pub fn cell(&self, app_id: AppId) -> AccessCell {
        if self.profile.is_global_admin() {
            return AccessCell::GlobalAdmin;
        }
        match self.grant_for(app_id) {
            Some(grant) => AccessCell::Granted { role: grant.role },
            None => AccessCell::Grantable,
        }
    }

    /// Record a confirmed upsert: replace the entry for the same app, or append.
    pub fn apply_grant(&mut self, grant: AppAccessGrant) {
        match self.grants.iter_mut().find(|g| g.app_id == grant.app_id) {
            Some(existing) => *existing = grant,
            None => self.grants.push(grant),
        }
    }

    /// Record a confirmed delete.
    pub fn apply_revoke(&mut self, app_id: AppId) {
        self.grants.retain(|grant| grant.app_id != app_id);
    }

    /// Record a confirmed role change. Grants are kept; they matter again
    /// if the user is later demoted.
    pub fn apply_global_role(&mut self, role: GlobalRole) {
        self.profile.global_role = role;
    }
}

/// Every profile joined with its grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessMatrix {
    pub columns: Vec<AppId>,
    pub rows: Vec<UserAccessRow>,
}

impl AccessMatrix {
    /// Join by user id. Row order follows `profiles`; grants whose user has
    /// no profile are dropped.
    pub fn build(profiles: Vec<Profile>, grants: Vec<AppAccessGrant>) -> Self {
        let mut by_user: HashMap<UserId, Vec<AppAccessGrant>> = HashMap::new();
        for grant in grants {
            by_user.entry(grant.user_id).or_default().push(grant);
        }

        let rows = profiles
            .into_iter()
            .map(|profile| {
                let grants = by_user.remove(&profile.id).unwrap_or_default();
                UserAccessRow::new(profile, grants)
            })
            .collect();

        let orphaned: usize = by_user.values().map(Vec::len).sum();
        if orphaned > 0 {
            tracing::debug!(orphaned, "Dropped grants for users without a profile");
        }

        Self {
            columns: AppId::catalog().collect(),
            rows,
        }
    }

    pub fn row(&self, user_id: UserId) -> Option<&UserAccessRow> {
        self.rows.iter().find(|row| row.user_id() == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kernel::id::AppAccessId;

    fn profile(role: GlobalRole) -> Profile {
        Profile {
            id: UserId::new(),
            email: "user@example.com".to_string(),
            full_name: None,
            global_role: role,
            created_at: Utc::now(),
        }
    }

    fn grant(user_id: UserId, app_id: AppId, role: AppRole) -> AppAccessGrant {
        AppAccessGrant {
            id: AppAccessId::new(),
            user_id,
            app_id,
            role,
            granted_by: None,
        }
    }

    #[test]
    fn test_effective_access_global_admin_ignores_grants() {
        for role in [GlobalRole::Owner, GlobalRole::Admin] {
            for app in AppId::catalog() {
                assert!(effective_access(role, &[], app));
            }
        }
    }

    #[test]
    fn test_effective_access_requires_grant_otherwise() {
        let user = UserId::new();
        let grants = vec![grant(user, AppId::EximiaOs, AppRole::Viewer)];
        for role in [GlobalRole::Member, GlobalRole::Viewer] {
            assert!(effective_access(role, &grants, AppId::EximiaOs));
            assert!(!effective_access(role, &grants, AppId::BiblicalMinds));
        }
    }

    #[test]
    fn test_cells() {
        let member = profile(GlobalRole::Member);
        let user = member.id;
        let row = UserAccessRow::new(member, vec![grant(user, AppId::EximiaOs, AppRole::Editor)]);

        assert_eq!(
            row.cell(AppId::EximiaOs),
            AccessCell::Granted {
                role: AppRole::Editor
            }
        );
        assert_eq!(row.cell(AppId::PsycheDashboard), AccessCell::Grantable);

        let admin = UserAccessRow::new(profile(GlobalRole::Owner), vec![]);
        assert_eq!(admin.cell(AppId::PsycheDashboard), AccessCell::GlobalAdmin);
        assert!(!admin.cell(AppId::PsycheDashboard).is_editable());
    }

    #[test]
    fn test_apply_grant_replaces_existing_entry() {
        let member = profile(GlobalRole::Member);
        let user = member.id;
        let mut row = UserAccessRow::new(member, vec![]);

        row.apply_grant(grant(user, AppId::EximiaOs, AppRole::Viewer));
        row.apply_grant(grant(user, AppId::EximiaOs, AppRole::Admin));

        assert_eq!(row.grants.len(), 1);
        assert_eq!(
            row.cell(AppId::EximiaOs),
            AccessCell::Granted {
                role: AppRole::Admin
            }
        );
    }

    #[test]
    fn test_grant_then_revoke_restores_row() {
        let member = profile(GlobalRole::Member);
        let user = member.id;
        let original = UserAccessRow::new(member, vec![]);
        let mut row = original.clone();

        row.apply_grant(grant(user, AppId::BiblicalMinds, AppRole::Viewer));
        row.apply_revoke(AppId::BiblicalMinds);

        assert_eq!(row, original);
        assert_eq!(row.cell(AppId::BiblicalMinds), AccessCell::Grantable);
    }

    #[test]
    fn test_apply_global_role_flips_every_cell() {
        let member = profile(GlobalRole::Member);
        let user = member.id;
        let mut row =
            UserAccessRow::new(member, vec![grant(user, AppId::EximiaOs, AppRole::Viewer)]);

        row.apply_global_role(GlobalRole::Admin);
        for app in AppId::catalog() {
            assert_eq!(row.cell(app), AccessCell::GlobalAdmin);
        }

        row.apply_global_role(GlobalRole::Member);
        assert_eq!(
            row.cell(AppId::EximiaOs),
            AccessCell::Granted {
                role: AppRole::Viewer
            }
        );
    }

    #[test]
    fn test_matrix_join() {
        let first = profile(GlobalRole::Owner);
        let second = profile(GlobalRole::Member);
        let stranger = UserId::new();
        let grants = vec![
            grant(second.id, AppId::EximiaOs, AppRole::Viewer),
            grant(stranger, AppId::EximiaOs, AppRole::Admin),
            grant(second.id, AppId::PsycheDashboard, AppRole::Editor),
        ];
        let (first_id, second_id) = (first.id, second.id);

        let matrix = AccessMatrix::build(vec![first, second], grants);

        assert_eq!(matrix.columns, AppId::catalog().collect::<Vec<_>>());
        assert_eq!(matrix.rows.len(), 2);
        assert_eq!(matrix.rows[0].user_id(), first_id);
        assert!(matrix.row(first_id).unwrap().grants.is_empty());
        assert_eq!(matrix.row(second_id).unwrap().grants.len(), 2);
        assert!(matrix.row(stranger).is_none());
    }
}
