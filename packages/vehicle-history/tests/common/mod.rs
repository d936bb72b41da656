// Common test utilities
#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::*;

use chrono::NaiveDate;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
