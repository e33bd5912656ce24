//! Shared test fixtures.

use reqwest::blocking::Client;

use crate::io::loader::CsvLoader;

/// Quarterly sample in the canonical layout.
pub const SAMPLE_CSV: &str = "\
date,gdp_billions,gdp_growth_yoy,unemployment_rate,inflation_yoy
2019-01-01,21001.6,3.1%,3.9%,1.6%
2019-04-01,21289.3,2.5%,3.6%,1.8%
2019-07-01,21505.0,2.4%,3.6%,1.8%
2019-10-01,21694.5,2.6%,3.6%,2.0%
2020-01-01,21481.4,0.6%,3.8%,2.1%
2020-04-01,19477.4,-7.5%,13.0%,0.4%
2020-07-01,21138.6,-1.5%,8.8%,1.2%
2020-10-01,21477.6,-1.1%,6.8%,1.2%
";

/// A loader that never goes through a system proxy (tests talk to loopback).
pub fn test_loader() -> CsvLoader {
    let client = Client::builder()
        .no_proxy()
        .build()
        .expect("test HTTP client");
    CsvLoader::with_client(client)
}
