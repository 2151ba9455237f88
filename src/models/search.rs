//! Typed search criteria shared by the search service and every repository.
//!
//! Handlers parse raw query strings into these types; repositories translate
//! them into their own query language (a BSON filter for MongoDB, a predicate
//! for the in-memory store). Both translations must agree on semantics:
//!
//! * text filters match a case-insensitive substring,
//! * date bounds are inclusive,
//! * a missing optional timestamp never satisfies a range bound,
//! * ordering is by the requested field, ties broken by id ascending.

use std::cmp::Ordering;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;

use crate::constants::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::models::{Role, User};

/// Equality and range predicates over user documents. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub is_locked: Option<bool>,
    pub email_verified: Option<bool>,
    pub created_from: Option<DateTime>,
    pub created_until: Option<DateTime>,
    /// Strictly before; users who never logged in are excluded.
    pub last_login_before: Option<DateTime>,
    /// Whether `invited_by_user_id` is set.
    pub invited: Option<bool>,
    /// Invited by this exact user.
    pub invited_by: Option<ObjectId>,
    pub is_converted: Option<bool>,
}

impl UserFilter {
    pub fn with_role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Default::default()
        }
    }

    pub fn inactive_since(cutoff: DateTime) -> Self {
        Self {
            last_login_before: Some(cutoff),
            ..Default::default()
        }
    }

    pub fn invitees_of(inviter: ObjectId) -> Self {
        Self {
            invited_by: Some(inviter),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn matches(&self, user: &User) -> bool {
        fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
            needle
                .as_ref()
                .map_or(true, |n| haystack.to_lowercase().contains(&n.to_lowercase()))
        }
        fn equals<T: PartialEq>(value: T, expected: Option<T>) -> bool {
            expected.map_or(true, |e| value == e)
        }

        contains_ci(&user.nickname, &self.nickname)
            && contains_ci(&user.email, &self.email)
            && equals(user.role, self.role)
            && equals(user.is_locked, self.is_locked)
            && equals(user.email_verified, self.email_verified)
            && self.created_from.map_or(true, |from| user.created_at >= from)
            && self.created_until.map_or(true, |until| user.created_at <= until)
            && self
                .last_login_before
                .map_or(true, |cutoff| matches!(user.last_login_at, Some(at) if at < cutoff))
            && equals(user.invited_by_user_id.is_some(), self.invited)
            && self
                .invited_by
                .map_or(true, |inviter| user.invited_by_user_id == Some(inviter))
            && equals(user.is_converted, self.is_converted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Nickname,
    Email,
    Role,
    CreatedAt,
    UpdatedAt,
    LastLoginAt,
}

impl SortField {
    /// Document field name used by the MongoDB repository.
    pub fn field_name(&self) -> &'static str {
        match self {
            SortField::Nickname => "nickname",
            SortField::Email => "email",
            SortField::Role => "role",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::LastLoginAt => "last_login_at",
        }
    }

    fn compare(&self, a: &User, b: &User) -> Ordering {
        match self {
            SortField::Nickname => a.nickname.cmp(&b.nickname),
            SortField::Email => a.email.cmp(&b.email),
            SortField::Role => a.role.as_str().cmp(b.role.as_str()),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::LastLoginAt => a.last_login_at.cmp(&b.last_login_at),
        }
    }
}

impl FromStr for SortField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nickname" => Ok(SortField::Nickname),
            "email" => Ok(SortField::Email),
            "role" => Ok(SortField::Role),
            "created_at" => Ok(SortField::CreatedAt),
            "updated_at" => Ok(SortField::UpdatedAt),
            "last_login_at" => Ok(SortField::LastLoginAt),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_i32(&self) -> i32 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for UserSort {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl UserSort {
    /// Total order used by the in-memory store.
    pub fn compare(&self, a: &User, b: &User) -> Ordering {
        let primary = match self.direction {
            SortDirection::Asc => self.field.compare(a, b),
            SortDirection::Desc => self.field.compare(b, a),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// Accepts `field`, `-field`, `+field`, `field:asc` and `field:desc`.
impl FromStr for UserSort {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (field, direction) = if let Some((field, dir)) = s.split_once(':') {
            let direction = match dir.trim().to_lowercase().as_str() {
                "asc" => SortDirection::Asc,
                "desc" => SortDirection::Desc,
                _ => return Err(()),
            };
            (field.trim(), direction)
        } else if let Some(field) = s.strip_prefix('-') {
            (field, SortDirection::Desc)
        } else if let Some(field) = s.strip_prefix('+') {
            (field, SortDirection::Asc)
        } else {
            (s, SortDirection::Asc)
        };

        Ok(Self {
            field: field.to_lowercase().parse()?,
            direction,
        })
    }
}

/// One-based page number and page size, already range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Returns `None` when either value is out of range.
    pub fn new(page: u64, size: u64) -> Option<Self> {
        if page == 0 || size == 0 || size > MAX_PAGE_SIZE {
            return None;
        }
        Some(Self { page, size })
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.size)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.size)
    }
}

/// Everything a search needs: what to match, how to order, which slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub filter: UserFilter,
    pub sort: UserSort,
    pub page: PageRequest,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(nickname: &str, email: &str, role: Role, created_millis: i64) -> User {
        let mut user = User::new(nickname.to_string(), email, role);
        user.created_at = DateTime::from_millis(created_millis);
        user
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = UserFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&user("a", "a@x.io", Role::Admin, 0)));
    }

    #[test]
    fn test_text_filters_are_case_insensitive_substrings() {
        let u = user("Brave_Lion_42", "Leo@Example.com", Role::Authenticated, 0);
        let filter = UserFilter {
            nickname: Some("lion".into()),
            email: Some("EXAMPLE".into()),
            ..Default::default()
        };
        assert!(filter.matches(&u));

        let miss = UserFilter {
            nickname: Some("tiger".into()),
            ..Default::default()
        };
        assert!(!miss.matches(&u));
    }

    #[test]
    fn test_text_filters_are_literal() {
        let u = user("dot_user", "x@y.io", Role::Authenticated, 0);
        let filter = UserFilter {
            nickname: Some("d.t".into()),
            ..Default::default()
        };
        assert!(!filter.matches(&u));
    }

    #[test]
    fn test_created_range_is_inclusive() {
        let u = user("a", "a@x.io", Role::Admin, 1_000);
        let filter = UserFilter {
            created_from: Some(DateTime::from_millis(1_000)),
            created_until: Some(DateTime::from_millis(1_000)),
            ..Default::default()
        };
        assert!(filter.matches(&u));

        let after = UserFilter {
            created_from: Some(DateTime::from_millis(1_001)),
            ..Default::default()
        };
        assert!(!after.matches(&u));
    }

    #[test]
    fn test_inactive_filter_skips_users_who_never_logged_in() {
        let mut u = user("a", "a@x.io", Role::Authenticated, 0);
        let filter = UserFilter::inactive_since(DateTime::from_millis(5_000));
        assert!(!filter.matches(&u));

        u.last_login_at = Some(DateTime::from_millis(4_999));
        assert!(filter.matches(&u));
        u.last_login_at = Some(DateTime::from_millis(5_000));
        assert!(!filter.matches(&u));
    }

    #[test]
    fn test_invitees_of_matches_only_that_inviter() {
        let inviter = ObjectId::new();
        let mut guest = user("guest", "g@x.io", Role::Anonymous, 0);
        let filter = UserFilter::invitees_of(inviter);
        assert!(!filter.matches(&guest));

        guest.invited_by_user_id = Some(ObjectId::new());
        assert!(!filter.matches(&guest));
        guest.invited_by_user_id = Some(inviter);
        assert!(filter.matches(&guest));
    }

    #[test]
    fn test_invited_and_boolean_filters() {
        let mut u = user("a", "a@x.io", Role::Anonymous, 0);
        u.invited_by_user_id = Some(mongodb::bson::oid::ObjectId::new());
        u.is_locked = true;

        let filter = UserFilter {
            invited: Some(true),
            is_locked: Some(true),
            email_verified: Some(false),
            is_converted: Some(false),
            role: Some(Role::Anonymous),
            ..Default::default()
        };
        assert!(filter.matches(&u));
        assert!(!UserFilter::with_role(Role::Admin).matches(&u));
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("-created_at".parse::<UserSort>(), Ok(UserSort::default()));
        assert_eq!(
            "nickname".parse::<UserSort>(),
            Ok(UserSort {
                field: SortField::Nickname,
                direction: SortDirection::Asc
            })
        );
        assert_eq!(
            "last_login_at:DESC".parse::<UserSort>(),
            Ok(UserSort {
                field: SortField::LastLoginAt,
                direction: SortDirection::Desc
            })
        );
        assert!("password_hash".parse::<UserSort>().is_err());
        assert!("email:sideways".parse::<UserSort>().is_err());
        assert!("".parse::<UserSort>().is_err());
    }

    #[test]
    fn test_sort_breaks_ties_by_id() {
        let a = user("same", "a@x.io", Role::Admin, 0);
        let b = user("same", "b@x.io", Role::Admin, 0);
        let sort = UserSort {
            field: SortField::Nickname,
            direction: SortDirection::Desc,
        };
        let (first, second) = if a.id < b.id { (&a, &b) } else { (&b, &a) };
        assert_eq!(sort.compare(first, second), Ordering::Less);
    }

    #[test]
    fn test_page_request_bounds() {
        assert!(PageRequest::new(0, 10).is_none());
        assert!(PageRequest::new(1, 0).is_none());
        assert!(PageRequest::new(1, MAX_PAGE_SIZE + 1).is_none());

        let page = PageRequest::new(3, 25).unwrap();
        assert_eq!(page.skip(), 50);
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(50), 2);
        assert_eq!(page.total_pages(51), 3);
    }
}
