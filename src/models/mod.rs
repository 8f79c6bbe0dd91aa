//! Data models for the circulation server

pub mod book;
pub mod borrow;
pub mod enums;
pub mod fine;
pub mod notification;
pub mod renewal;
pub mod reservation;
pub mod restriction;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use borrow::{BorrowDetails, BorrowRecord};
pub use enums::{
    BookStatus, BorrowStatus, NotificationPriority, PaymentStatus, RenewalMethod,
    ReservationStatus,
};
pub use fine::Fine;
pub use renewal::Renewal;
pub use reservation::Reservation;
pub use restriction::{Restriction, RestrictionType};
pub use user::{BorrowRule, User, UserType};
