//! Fill empty `msgstr` entries in gettext catalogs using a DeepL-compatible service.
//!
//! The pipeline is: [`scanner::scan`] a catalog root, [`report::print_report`] what is
//! missing, then [`orchestrator::run`] batches through a [`translation::TranslationClient`].

pub mod catalog;
pub mod config;
pub mod i18n;
pub mod orchestrator;
pub mod report;
pub mod retry;
pub mod scanner;
pub mod translation;
