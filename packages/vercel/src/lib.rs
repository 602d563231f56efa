// ABOUTME: Vercel REST API client crate: projects, deployments, and domains
// ABOUTME: for linking tracker projects to their Vercel counterparts

pub mod client;
pub mod error;
pub mod types;

pub use client::{domain_union, VercelClient};
pub use error::{VercelError, VercelResult};
pub use types::{
    Deployment, DeploymentOverview, ProjectSummary, VercelProject, VercelProjectDetail,
};
