//! Loyalty Domain Logic
//!
//! Pure functions shared by the repositories and API handlers:
//! tier resolution, point/commission arithmetic, voucher discount
//! application and code generation. No database access here.

pub mod code;
pub mod discount;
pub mod points;
pub mod tier;

pub use code::{generate_referral_code, generate_voucher_code};
pub use discount::{DiscountError, apply_voucher_to_order};
pub use points::{commission_for_order, points_for_amount};
pub use tier::{next_tier, resolve_tier};
