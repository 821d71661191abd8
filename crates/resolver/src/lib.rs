//! Link resolution engine.
//!
//! Scans chat messages for URLs and turns each one into a single line of
//! text: a page title for ordinary links, or an attributed summary for
//! social-media posts. Every link runs in its own detached task behind a
//! fixed-capacity admission gate, and failures never leave that task.

pub mod admission;
pub mod classify;
pub mod config;
pub mod dispatch;
pub mod error;
mod fetch;
pub mod generic;
pub mod html;
mod panic_trace;
pub mod policy;
pub mod scan;
pub mod social;

pub use {
    admission::{AdmissionController, AdmissionPermit},
    classify::{LinkKind, Platform, SocialPost, classify},
    config::ResolverConfig,
    dispatch::{Dispatcher, Outcome},
    error::{Error, Result},
    policy::{FetchPolicy, TitlePattern, domain_matches, select_policy},
    scan::find_urls,
};
