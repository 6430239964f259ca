use serde::Serialize;

/// RepositoryRef identifies one scanned repository on the source-control host.
///
/// Owned by the source-control adapter; read-only to everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    name: String,
    owner: String,
    full_name: String,
    default_branch: String,
    private: bool,
}

impl RepositoryRef {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        default_branch: impl Into<String>,
        private: bool,
    ) -> Self {
        let owner = owner.into();
        let name = name.into();
        let full_name = format!("{}/{}", owner, name);
        Self {
            name,
            owner,
            full_name,
            default_branch: default_branch.into(),
            private,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// `owner/name`
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn default_branch(&self) -> &str {
        &self.default_branch
    }

    pub fn is_private(&self) -> bool {
        self.private
    }
}

/// Latest commit on the default branch and the first status posted against it.
///
/// Only the first status entry returned by the host is kept, even when several
/// CI systems report on the same commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommitStatus {
    pub commit_sha: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_status_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_status_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_status_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_status_target_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullRequestCounts {
    pub open: u64,
    pub total: u64,
}

/// Raw branch protection settings of a repository's default branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchProtection {
    pub required_approving_review_count: u32,
    pub required_status_checks: Vec<String>,
    pub allow_force_pushes: bool,
}

/// Governance posture derived from [`BranchProtection`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BranchGovernance {
    pub has_protection: bool,
    pub min_approvals: u32,
    pub requires_status_checks: bool,
    pub allows_force_push: bool,
}

impl BranchGovernance {
    /// An unprotected branch (`None`) has no approvals, no checks and no force-push rule.
    pub fn derive(protection: Option<&BranchProtection>) -> Self {
        match protection {
            None => Self::default(),
            Some(p) => Self {
                has_protection: p.required_approving_review_count > 0,
                min_approvals: p.required_approving_review_count,
                requires_status_checks: !p.required_status_checks.is_empty(),
                allows_force_push: p.allow_force_pushes,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_ref_full_name() {
        let repo = RepositoryRef::new("acme", "billing", "main", true);
        assert_eq!(repo.full_name(), "acme/billing");
        assert_eq!(repo.name(), "billing");
        assert_eq!(repo.owner(), "acme");
        assert_eq!(repo.default_branch(), "main");
        assert!(repo.is_private());
    }

    #[test]
    fn test_governance_from_protected_branch() {
        let protection = BranchProtection {
            required_approving_review_count: 2,
            required_status_checks: vec!["ci/build".to_string()],
            allow_force_pushes: false,
        };
        let governance = BranchGovernance::derive(Some(&protection));
        assert!(governance.has_protection);
        assert_eq!(governance.min_approvals, 2);
        assert!(governance.requires_status_checks);
        assert!(!governance.allows_force_push);
    }

    #[test]
    fn test_governance_without_required_reviews() {
        let protection = BranchProtection {
            required_approving_review_count: 0,
            required_status_checks: vec![],
            allow_force_pushes: true,
        };
        let governance = BranchGovernance::derive(Some(&protection));
        assert!(!governance.has_protection);
        assert_eq!(governance.min_approvals, 0);
        assert!(!governance.requires_status_checks);
        assert!(governance.allows_force_push);
    }

    #[test]
    fn test_governance_unprotected_branch() {
        assert_eq!(BranchGovernance::derive(None), BranchGovernance::default());
    }
}
