//! Pagination module
//!
//! Supports: Link Header (RFC 5988) with `x-page` style metadata headers
//!
//! # Overview
//!
//! `RequestHelper` turns one list call into as many GET requests as the
//! server's `next` links require and concatenates the pages in order. A
//! pinned page is fetched alone and may carry its pagination metadata. The
//! same helper also issues single POST, PUT and DELETE requests and opens
//! streaming downloads.

mod engine;
mod link;
mod types;

pub use engine::RequestHelper;
pub use link::parse_link_header;
pub use types::{
    body_records, header_number, GetOptions, GetResponse, ListOptions, PaginatedResult,
    PaginationMetadata, LINK_HEADER, NEXT_PAGE_HEADER, PAGE_HEADER, PER_PAGE_HEADER,
    PREV_PAGE_HEADER, TOTAL_HEADER, TOTAL_PAGES_HEADER,
};
