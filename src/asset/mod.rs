//! Asset planning module
//!
//! Turns a release version, repository identity and platform key into the
//! concrete URLs to download, following the naming convention used by the
//! release pipeline.

mod plan;

pub use plan::{AssetKind, AssetPlan, AssetRef, PlanRequest, build_plan};
