//! Per-file-kind content validators.
//!
//! Each validator takes the raw file text plus its repository-relative path
//! and returns issues; it never fails outright. Dispatch is a strategy map
//! from file identity to function, so the walker stays free of per-kind
//! knowledge.

use apim_guard_model::{FileKind, Issue};

use crate::FileContext;

pub mod info;
pub mod links;
pub mod policy;
pub mod specification;

pub type ValidatorFn = fn(&FileContext<'_>, &str, &str) -> Vec<Issue>;

pub fn validator_fn(kind: FileKind) -> ValidatorFn {
    match kind {
        FileKind::ApiInformation => info::check_api_information,
        FileKind::Specification => specification::check_specification,
        FileKind::Policy => policy::check_policy,
        FileKind::ProductInformation => info::check_product_information,
        FileKind::ProductApiLinks => links::check_product_api_links,
        FileKind::VersionSetInformation => info::check_version_set_information,
        FileKind::NamedValueInformation => info::check_named_value_information,
    }
}

pub(crate) fn file_name(rel_path: &str) -> &str {
    rel_path.rsplit('/').next().unwrap_or(rel_path)
}
