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

//! # rivet-reqwest
//!
//! ## Rivet Reqwest 传输层实现
//!
//! 基于 Reqwest 库的阻塞客户端提供 [`rivet_http::HttpCaller`] 与 [`rivet_http::Connector`] 接口实现。
//!
//! 需要注意的是，Reqwest 阻塞客户端不能在异步运行时的上下文中创建或销毁。

mod sync_client;

pub use rivet_http as http;
pub use reqwest;
pub use sync_client::{Connector, SyncClient};
