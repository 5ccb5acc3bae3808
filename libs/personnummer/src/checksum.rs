//! Check digit calculation.
//!
//! The check digit is a Luhn sum over nine digits: the two-digit year, month,
//! day and the three-digit running number, weighted 2,1,2,1,... from the left.
//! Only the year modulo 100 takes part, so the century never affects it.

use chrono::{Datelike, NaiveDate};

use crate::types::RunningNumber;

/// Computes the check digit for a birth date and running number.
#[must_use]
pub fn compute_checksum(birth_date: NaiveDate, running_number: RunningNumber) -> u8 {
    let year = birth_date.year().rem_euclid(100) as u32;
    let month = birth_date.month();
    let day = birth_date.day();
    let number = u32::from(running_number.value());

    let digits = [
        year / 10,
        year % 10,
        month / 10,
        month % 10,
        day / 10,
        day % 10,
        number / 100,
        number / 10 % 10,
        number % 10,
    ];

    let sum: u32 = digits
        .iter()
        .zip([2u32, 1].iter().cycle())
        .map(|(digit, weight)| {
            let product = digit * weight;
            if product > 9 {
                product / 10 + product % 10
            } else {
                product
            }
        })
        .sum();

    ((10 - sum % 10) % 10) as u8
}
