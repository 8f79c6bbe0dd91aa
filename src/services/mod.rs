//! Business logic services

pub mod accrual;
pub mod borrows;
pub mod notifications;
pub mod renewals;
pub mod restrictions;
pub mod run_log;
pub mod transitions;

use crate::{config::AccrualConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub borrows: borrows::BorrowsService,
    pub transitions: transitions::TransitionsService,
    pub renewals: renewals::RenewalsService,
    pub accrual: accrual::AccrualService,
    pub restrictions: restrictions::RestrictionsService,
    pub notifications: notifications::NotificationsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, accrual_config: &AccrualConfig) -> Self {
        let notifications = notifications::NotificationsService::new(repository.clone());
        let restrictions = restrictions::RestrictionsService::new(repository.clone());
        let run_log = run_log::RunLog::new(&accrual_config.run_log_path);

        Self {
            borrows: borrows::BorrowsService::new(repository.clone(), restrictions.clone()),
            transitions: transitions::TransitionsService::new(repository.clone()),
            renewals: renewals::RenewalsService::new(repository.clone()),
            accrual: accrual::AccrualService::new(
                repository.clone(),
                notifications.clone(),
                run_log,
            ),
            restrictions,
            notifications,
        }
    }
}
