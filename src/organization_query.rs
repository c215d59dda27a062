use std::collections::HashSet;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

lazy_static! {
    static ref NO_FILTER: OrganizationQuery = OrganizationQueryBuilder::default()
        .build()
        .expect("a query with no options set violates no invariant");
}

/// Immutable filter describing which organizations a lookup should return.
///
/// Built through [`OrganizationQueryBuilder`]; the two cross-field invariants
/// (team/personal exclusivity, `without_projects` vs. the analysis options)
/// are checked once at build time, so a value of this type is always valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OrganizationQueryBuilder")]
pub struct OrganizationQuery {
    keys: Option<HashSet<String>>,
    member: Option<i32>,
    only_team: bool,
    only_personal: bool,
    with_analyses: bool,
    analyzed_after: Option<i64>,
    without_projects: bool,
}

impl OrganizationQuery {
    pub fn builder() -> OrganizationQueryBuilder {
        OrganizationQueryBuilder::default()
    }

    /// The shared "select all organizations" query. Initialized once and
    /// reused; safe to hand out because the value is immutable.
    pub fn return_all() -> &'static OrganizationQuery {
        &NO_FILTER
    }

    /// Restriction to organizations whose key is in the set, if any.
    pub fn keys(&self) -> Option<&HashSet<String>> {
        self.keys.as_ref()
    }

    /// Restriction to organizations this user is a member of, if any.
    pub fn member(&self) -> Option<i32> {
        self.member
    }

    pub fn only_team(&self) -> bool {
        self.only_team
    }

    pub fn only_personal(&self) -> bool {
        self.only_personal
    }

    pub fn with_analyses(&self) -> bool {
        self.with_analyses
    }

    /// Restriction to organizations analyzed after this epoch-millis
    /// timestamp, if any.
    pub fn analyzed_after(&self) -> Option<i64> {
        self.analyzed_after
    }

    pub fn without_projects(&self) -> bool {
        self.without_projects
    }
}

/// Fluent accumulator for [`OrganizationQuery`]. Setters never fail;
/// conflicting combinations are rejected by [`build`](Self::build).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrganizationQueryBuilder {
    keys: Option<HashSet<String>>,
    member: Option<i32>,
    only_team: bool,
    only_personal: bool,
    with_analyses: bool,
    analyzed_after: Option<i64>,
    without_projects: bool,
}

impl OrganizationQueryBuilder {
    /// Restrict to organizations whose key is in `keys`. Absent entries are
    /// dropped and duplicates collapsed; an empty input clears the
    /// restriction entirely rather than matching nothing.
    pub fn set_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Option<String>>,
    {
        let keys: HashSet<String> = keys.into_iter().filter_map(Into::into).collect();
        self.keys = if keys.is_empty() { None } else { Some(keys) };
        self
    }

    /// Restrict to organizations this user is a member of, or clear the
    /// restriction with `None`.
    pub fn set_member(mut self, member: impl Into<Option<i32>>) -> Self {
        self.member = member.into();
        self
    }

    pub fn set_only_team(mut self) -> Self {
        self.only_team = true;
        self
    }

    pub fn set_only_personal(mut self) -> Self {
        self.only_personal = true;
        self
    }

    pub fn set_with_analyses(mut self) -> Self {
        self.with_analyses = true;
        self
    }

    /// Restrict to organizations analyzed after this epoch-millis timestamp.
    pub fn set_analyzed_after(mut self, timestamp_ms: i64) -> Self {
        self.analyzed_after = Some(timestamp_ms);
        self
    }

    pub fn set_without_projects(mut self) -> Self {
        self.without_projects = true;
        self
    }

    /// Validate the accumulated options and produce the immutable query.
    pub fn build(self) -> Result<OrganizationQuery> {
        if self.only_personal && self.only_team {
            return Err(QueryError::InvalidCombination(
                "only one of only_personal and only_team can be true",
            ));
        }
        if self.without_projects && (self.with_analyses || self.analyzed_after.is_some()) {
            return Err(QueryError::InvalidCombination(
                "without_projects cannot be used together with with_analyses or analyzed_after",
            ));
        }
        Ok(OrganizationQuery {
            // An empty key set can only arrive through deserialization; it
            // means "no restriction", same as an empty set_keys input.
            keys: self.keys.filter(|keys| !keys.is_empty()),
            member: self.member,
            only_team: self.only_team,
            only_personal: self.only_personal,
            with_analyses: self.with_analyses,
            analyzed_after: self.analyzed_after,
            without_projects: self.without_projects,
        })
    }
}

impl TryFrom<OrganizationQueryBuilder> for OrganizationQuery {
    type Error = QueryError;

    fn try_from(builder: OrganizationQueryBuilder) -> Result<Self> {
        builder.build()
    }
}
