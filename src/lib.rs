//! # vnquant-utils
//!
//! Helpers shared by the vnquant Vietnamese stock-market tooling:
//! - text cleaning and date parsing/formatting for scraped price tables
//! - OHLC/OHLCV column detection for tabular datasets
//! - a client for the VNDirect industry-classification API
//! - UTC+7 timestamp conversion
//!
//! ```no_run
//! use vnquant_utils::industry::{get_ind_class, IndustryQuery};
//!
//! fn main() -> vnquant_utils::Result<()> {
//!     let query = IndustryQuery::new().with_code_list(["ASM", "AAA"]);
//!     let industries = get_ind_class(&query)?;
//!     println!("{}", industries);
//!     Ok(())
//! }
//! ```

pub mod columns;
pub mod config;
pub mod error;
pub mod industry;
pub mod logger;
pub mod utils;

pub use columns::{is_ohlc, is_ohlcv, ColumnSet};
pub use error::{Error, Result};
pub use industry::{get_ind_class, IndustryClient, IndustryPage, IndustryQuery, NameSlotMode};
pub use utils::{
    clean_text, convert_date, convert_text_dateformat, date_difference_description,
    date_string_to_timestamp_utc7, datetime_to_timestamp_utc7, extract_number,
    split_change_col, TimeMark,
};
