//! Pagination response models.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{PageRequest, UserResponse};

/// One page of users from the list or search endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct UserPageResponse {
    /// Whether the request was successful
    pub success: bool,
    /// Users on this page
    pub data: Vec<UserResponse>,
    /// Total number of matching users
    pub total: u64,
    /// Current page number
    pub page: u64,
    /// Items per page
    pub size: u64,
    /// Total number of pages
    pub total_pages: u64,
}

impl UserPageResponse {
    pub fn new(data: Vec<UserResponse>, total: u64, page: PageRequest) -> Self {
        Self {
            success: true,
            data,
            total,
            page: page.page,
            size: page.size,
            total_pages: page.total_pages(total),
        }
    }
}
