//! Stateless financial calculators.
//!
//! Every calculator is a pure function from a validated input record to an
//! output record. All money math uses `Decimal`; amounts are rounded to two
//! decimal places, half away from zero.

mod error;
mod math;

pub mod emi;
pub mod gratuity;
pub mod gst;
pub mod hra;
pub mod income_tax;
pub mod nps;
pub mod ppf;
pub mod salary;
pub mod sip;
pub mod tds;

#[cfg(test)]
mod props;

pub use error::CalculatorError;
pub use math::round_money;
