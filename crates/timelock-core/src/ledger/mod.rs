//! In-memory asset ledger: seats, allocations, and atomic transfers.
//!
//! A [`Seat`] is a custodial position holding amounts keyed by
//! [`Designation`]. The [`Ledger`] owns every seat's backing record and
//! serializes all mutations behind one lock, so a transfer observes and
//! applies a consistent view.
//!
//! # Atomicity
//!
//! [`Ledger::atomic_transfer`] is all-or-nothing: every requested movement is
//! validated against current allocations before anything is written. A
//! rejected transfer leaves both seats exactly as they were.
//!
//! # Seat Lifecycle
//!
//! ```text
//! open_seat() --> live (mint / transfer / read)
//!                  |
//!              exit() --> exited: allocations frozen into payouts,
//!                         further transfers rejected
//! ```
//!
//! Exiting a seat settles it: its allocations at that instant become its
//! payouts, and [`Seat::payouts`] resolves for any waiter. A seat can exit
//! at most once.

mod designation;
mod error;
mod seat;
mod storage;


pub use designation::{AllocationMap, Designation};
pub use error::LedgerError;
pub use seat::{Seat, SeatId};
pub use storage::Ledger;
