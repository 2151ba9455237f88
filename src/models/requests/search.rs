//! Query-string models for the user list and search endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::constants::{
    CODE_INVALID_QUERY, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, ERR_DATE_RANGE, ERR_INVALID_DATE,
    ERR_INVALID_PAGE, ERR_INVALID_ROLE, ERR_INVALID_SIZE, ERR_INVALID_SORT,
};
use crate::errors::ApiError;
use crate::models::{PageRequest, Role, SearchCriteria, UserFilter, UserSort};
use crate::utils::time::{parse_date_bound, DateBound};

/// Query parameters for `GET /api/users/search`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserSearchQuery {
    /// Case-insensitive substring of the nickname
    pub nickname: Option<String>,
    /// Case-insensitive substring of the email address
    pub email: Option<String>,
    /// Exact role: ANONYMOUS, AUTHENTICATED, MANAGER or ADMIN
    pub role: Option<String>,
    pub is_locked: Option<bool>,
    pub email_verified: Option<bool>,
    /// Inclusive lower bound, RFC 3339 or YYYY-MM-DD. Encode a `+` offset as
    /// `%2B`; an unencoded one arrives as a space and is read back as `+`.
    pub created_at_start: Option<String>,
    /// Inclusive upper bound, RFC 3339 or YYYY-MM-DD (whole day)
    pub created_at_end: Option<String>,
    /// Page number, starting at 1 (default: 1)
    pub page: Option<u64>,
    /// Items per page, 1-100 (default: 10)
    pub size: Option<u64>,
    /// `field`, `-field`, `field:asc` or `field:desc` (default: -created_at)
    pub sort: Option<String>,
}

/// Query parameters for `GET /api/users`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Page number, starting at 1 (default: 1)
    pub page: Option<u64>,
    /// Items per page, 1-100 (default: 10)
    pub size: Option<u64>,
}

/// Blank strings are treated as if the parameter was omitted.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_page(page: Option<u64>, size: Option<u64>, errors: &mut Vec<String>) -> PageRequest {
    let page = page.unwrap_or(DEFAULT_PAGE_NUMBER);
    let size = size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page == 0 {
        errors.push(ERR_INVALID_PAGE.to_string());
    }
    if PageRequest::new(1, size).is_none() {
        errors.push(ERR_INVALID_SIZE.to_string());
    }
    PageRequest::new(page, size).unwrap_or_default()
}

impl ListUsersQuery {
    pub fn into_page(self) -> Result<PageRequest, ApiError> {
        let mut errors = Vec::new();
        let page = parse_page(self.page, self.size, &mut errors);
        if errors.is_empty() {
            Ok(page)
        } else {
            Err(ApiError::validation(CODE_INVALID_QUERY, errors))
        }
    }
}

impl UserSearchQuery {
    /// Validate every parameter and collect all problems into one validation error.
    pub fn into_criteria(self) -> Result<SearchCriteria, ApiError> {
        let mut errors = Vec::new();

        let role = match non_blank(self.role) {
            Some(raw) => match raw.parse::<Role>() {
                Ok(role) => Some(role),
                Err(_) => {
                    errors.push(ERR_INVALID_ROLE.to_string());
                    None
                }
            },
            None => None,
        };

        let mut parse_bound = |raw: Option<String>, bound: DateBound| {
            let raw = non_blank(raw)?;
            let parsed = parse_date_bound(&raw, bound);
            if parsed.is_none() {
                errors.push(format!("{}: '{}'", ERR_INVALID_DATE, raw));
            }
            parsed
        };
        let created_from = parse_bound(self.created_at_start, DateBound::Start);
        let created_until = parse_bound(self.created_at_end, DateBound::End);

        if let (Some(from), Some(until)) = (created_from, created_until) {
            if from > until {
                errors.push(ERR_DATE_RANGE.to_string());
            }
        }

        let sort = match non_blank(self.sort) {
            Some(raw) => raw.parse::<UserSort>().unwrap_or_else(|_| {
                errors.push(ERR_INVALID_SORT.to_string());
                UserSort::default()
            }),
            None => UserSort::default(),
        };

        let page = parse_page(self.page, self.size, &mut errors);

        if !errors.is_empty() {
            return Err(ApiError::validation(CODE_INVALID_QUERY, errors));
        }

        Ok(SearchCriteria {
            filter: UserFilter {
                nickname: non_blank(self.nickname),
                email: non_blank(self.email),
                role,
                is_locked: self.is_locked,
                email_verified: self.email_verified,
                created_from,
                created_until,
                ..Default::default()
            },
            sort,
            page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortDirection, SortField};

    fn errors_of(result: Result<SearchCriteria, ApiError>) -> Vec<String> {
        match result {
            Err(ApiError::ValidationError { code, errors }) => {
                assert_eq!(code, CODE_INVALID_QUERY);
                errors
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults_when_nothing_given() {
        let criteria = UserSearchQuery::default().into_criteria().unwrap();
        assert!(criteria.filter.is_empty());
        assert_eq!(criteria.sort, UserSort::default());
        assert_eq!(criteria.page, PageRequest::default());
    }

    #[test]
    fn test_all_filters_are_translated() {
        let query = UserSearchQuery {
            nickname: Some(" lion ".into()),
            email: Some("example.com".into()),
            role: Some("manager".into()),
            is_locked: Some(false),
            email_verified: Some(true),
            created_at_start: Some("2024-01-01".into()),
            created_at_end: Some("2024-12-31T23:00:00Z".into()),
            page: Some(2),
            size: Some(50),
            sort: Some("nickname:desc".into()),
        };
        let criteria = query.into_criteria().unwrap();
        assert_eq!(criteria.filter.nickname.as_deref(), Some("lion"));
        assert_eq!(criteria.filter.email.as_deref(), Some("example.com"));
        assert_eq!(criteria.filter.role, Some(Role::Manager));
        assert_eq!(criteria.filter.is_locked, Some(false));
        assert_eq!(criteria.filter.email_verified, Some(true));
        assert!(criteria.filter.created_from.is_some());
        assert!(criteria.filter.created_until.is_some());
        assert_eq!(criteria.sort.field, SortField::Nickname);
        assert_eq!(criteria.sort.direction, SortDirection::Desc);
        assert_eq!(criteria.page.skip(), 50);
    }

    #[test]
    fn test_blank_parameters_are_ignored() {
        let query = UserSearchQuery {
            nickname: Some("   ".into()),
            role: Some("".into()),
            sort: Some(" ".into()),
            ..Default::default()
        };
        let criteria = query.into_criteria().unwrap();
        assert!(criteria.filter.is_empty());
    }

    #[test]
    fn test_every_invalid_parameter_is_reported() {
        let query = UserSearchQuery {
            role: Some("overlord".into()),
            created_at_start: Some("yesterday".into()),
            page: Some(0),
            size: Some(1000),
            sort: Some("password_hash".into()),
            ..Default::default()
        };
        let errors = errors_of(query.into_criteria());
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ERR_INVALID_ROLE.to_string()));
        assert!(errors.contains(&ERR_INVALID_PAGE.to_string()));
        assert!(errors.contains(&ERR_INVALID_SIZE.to_string()));
        assert!(errors.contains(&ERR_INVALID_SORT.to_string()));
        assert!(errors.iter().any(|e| e.contains("yesterday")));
    }

    #[test]
    fn test_inverted_date_range_is_rejected() {
        let query = UserSearchQuery {
            created_at_start: Some("2024-06-02".into()),
            created_at_end: Some("2024-06-01".into()),
            ..Default::default()
        };
        assert_eq!(errors_of(query.into_criteria()), vec![ERR_DATE_RANGE.to_string()]);
    }

    #[test]
    fn test_same_day_range_is_accepted() {
        let query = UserSearchQuery {
            created_at_start: Some("2024-06-01".into()),
            created_at_end: Some("2024-06-01".into()),
            ..Default::default()
        };
        assert!(query.into_criteria().is_ok());
    }

    #[test]
    fn test_list_query_bounds() {
        assert!(ListUsersQuery::default().into_page().is_ok());
        let too_big = ListUsersQuery {
            page: Some(1),
            size: Some(101),
        };
        assert!(too_big.into_page().is_err());
    }
}
