pub mod harness;

pub use harness::TestHarness;

pub const CHECK_URL: &str = "https://shelter.example.org/shelters/abc/results";

pub const PAGE_1: &str = include_str!("../fixtures/listings_page1.html");
pub const PAGE_2: &str = include_str!("../fixtures/listings_page2.html");
