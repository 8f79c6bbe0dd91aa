//! Repository layer for database operations

pub mod activity_log;
pub mod books;
pub mod borrows;
pub mod fines;
pub mod notifications;
pub mod renewals;
pub mod reservations;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub borrows: borrows::BorrowsRepository,
    pub books: books::BooksRepository,
    pub fines: fines::FinesRepository,
    pub renewals: renewals::RenewalsRepository,
    pub reservations: reservations::ReservationsRepository,
    pub users: users::UsersRepository,
    pub activity_log: activity_log::ActivityLogRepository,
    pub notifications: notifications::NotificationsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            borrows: borrows::BorrowsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            fines: fines::FinesRepository::new(pool.clone()),
            renewals: renewals::RenewalsRepository::new(),
            reservations: reservations::ReservationsRepository::new(),
            users: users::UsersRepository::new(pool.clone()),
            activity_log: activity_log::ActivityLogRepository::new(),
            notifications: notifications::NotificationsRepository::new(pool.clone()),
            pool,
        }
    }
}
