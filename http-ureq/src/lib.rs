#![cfg_attr(feature = "docs", feature(doc_cfg))]
#![deny(
    single_use_lifetimes,
    missing_debug_implementations,
    large_assignments,
    exported_private_dependencies,
    absolute_paths_not_starting_with_crate,
    anonymous_parameters,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    meta_variable_misuse,
    missing_docs,
    non_ascii_idents,
    indirect_structural_match,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications
)]

//! # rivet-ureq
//!
//! ## Rivet Ureq 传输层实现
//!
//! 基于 Ureq 库提供 [`rivet_http::HttpCaller`] 与 [`rivet_http::Connector`] 接口实现，仅提供阻塞接口。

mod client;

pub use client::{Client, Connector};

pub use rivet_http as http;
pub use ureq;
