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
    trivial_numeric_casts,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications
)]

//! # rivet
//!
//! ## Rivet HTTP 客户端
//!
//! 重新导出 `rivet-http-client` 中的所有类型，以及启用的传输层

pub use rivet_http_client::*;

#[cfg(feature = "ureq")]
#[cfg_attr(feature = "docs", doc(cfg(feature = "ureq")))]
pub use rivet_ureq::Connector as UreqConnector;

#[cfg(feature = "reqwest")]
#[cfg_attr(feature = "docs", doc(cfg(feature = "reqwest")))]
pub use rivet_reqwest::Connector as ReqwestConnector;

/// 将所有 Trait 全部重新导出，方便统一导入
pub mod prelude {
    pub use rivet_http::{Connector as _, HttpCaller as _};
    pub use rivet_http_client::{Backoff as _, Converter as _};
}
