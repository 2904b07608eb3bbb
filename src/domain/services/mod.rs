pub mod bedtime;
pub mod client_ip;

pub use bedtime::{compute_bedtime, parse_sunrise, sleep_duration, SLEEP_DURATION_MINUTES};
pub use client_ip::{extract_client_ip, FORWARDED_FOR_HEADER, REAL_IP_HEADER};
