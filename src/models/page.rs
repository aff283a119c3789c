//! Offset/size pagination and listing order

use crate::error::{AppError, AppResult};

/// Order applied to booking listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest start first, then highest id
    #[default]
    StartDesc,
    /// Earliest start first, then lowest id
    StartAsc,
}

impl SortOrder {
    pub const fn sql(&self) -> &'static str {
        match self {
            SortOrder::StartDesc => "start_date DESC, id DESC",
            SortOrder::StartAsc => "start_date ASC, id ASC",
        }
    }
}

/// A page window derived from an `(from, size)` request.
///
/// `from` is an element offset; it is rounded down to the page containing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    size: i64,
    order: SortOrder,
}

impl PageRequest {
    pub fn new(from: i64, size: i64) -> AppResult<Self> {
        if size <= 0 {
            return Err(AppError::InvalidPagination(format!("size must be positive, got {}", size)));
        }
        if from < 0 {
            return Err(AppError::InvalidPagination(format!("from must not be negative, got {}", from)));
        }
        Ok(Self {
            page: from / size,
            size,
            order: SortOrder::default(),
        })
    }

    /// First `size` rows in the given order
    pub fn first(size: i64, order: SortOrder) -> Self {
        Self {
            page: 0,
            size: size.max(1),
            order,
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Row offset of the first element of the page
    pub fn offset(&self) -> i64 {
        self.page * self.size
    }
}
