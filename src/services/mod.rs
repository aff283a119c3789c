//! Business logic services

pub mod bookings;

use std::sync::Arc;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub bookings: bookings::BookingsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            bookings: bookings::BookingsService::new(
                Arc::new(repository.users.clone()),
                Arc::new(repository.items.clone()),
                Arc::new(repository.bookings.clone()),
            ),
            repository,
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }
}
