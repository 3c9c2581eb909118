//! Site-specific scraper implementations
//!
//! Each supported website gets one [`crate::extract::ImageScraper`]
//! implementation. [`SelectorSite`] covers the common case where the site's
//! markup can be described entirely by CSS selectors in its
//! [`crate::config::SiteConfig`] entry; sites needing bespoke parsing get
//! their own type alongside it.

mod selector_site;

pub use selector_site::SelectorSite;
