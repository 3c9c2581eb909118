//! Integration tests for Img-Scout
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! full scrape pipeline end-to-end.

mod scrape_tests;
