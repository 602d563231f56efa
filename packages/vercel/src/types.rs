// ABOUTME: Wire types for the Vercel API surface Plank consumes

use serde::{Deserialize, Serialize};

/// A Vercel project as listed to the frontend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelProject {
    pub id: String,
    pub name: String,
    pub account_id: Option<String>,
    pub team_id: Option<String>,
    pub url: String,
    pub framework: Option<String>,
    pub created_at: Option<i64>,
}

/// Project identity plus its inline domain list, from the detail endpoint.
#[derive(Debug, Clone)]
pub struct VercelProjectDetail {
    pub id: String,
    pub name: String,
    pub url: String,
    pub domains: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: String,
    pub url: String,
    pub state: Option<String>,
    pub created_at: Option<i64>,
    pub alias: Vec<String>,
}

/// The composed payload for one project: identity, recent deployments, and
/// every domain the three resolution strategies produced.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentOverview {
    pub project: ProjectSummary,
    pub deployments: Vec<Deployment>,
    pub domains: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub url: String,
}

// Raw Vercel API shapes, deserialized then mapped.

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectsResponse {
    pub projects: Vec<ProjectResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectResponse {
    pub id: String,
    pub name: String,
    pub account_id: Option<String>,
    pub team_id: Option<String>,
    pub alias: Option<Vec<String>>,
    pub framework: Option<String>,
    pub created_at: Option<i64>,
    pub link: Option<LinkResponse>,
    pub domains: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LinkResponse {
    pub url: Option<String>,
}

impl ProjectResponse {
    fn fallback_url(&self) -> String {
        format!("https://{}.vercel.app", self.name)
    }

    pub(crate) fn into_project(self) -> VercelProject {
        let url = self
            .alias
            .as_ref()
            .and_then(|aliases| aliases.first().cloned())
            .unwrap_or_else(|| self.fallback_url());
        VercelProject {
            id: self.id,
            name: self.name,
            account_id: self.account_id,
            team_id: self.team_id,
            url,
            framework: self.framework,
            created_at: self.created_at,
        }
    }

    pub(crate) fn into_detail(self) -> VercelProjectDetail {
        let url = self
            .link
            .as_ref()
            .and_then(|link| link.url.clone())
            .unwrap_or_else(|| self.fallback_url());
        VercelProjectDetail {
            id: self.id,
            name: self.name,
            url,
            domains: self.domains.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeploymentsResponse {
    pub deployments: Option<Vec<DeploymentResponse>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeploymentResponse {
    pub uid: String,
    pub url: Option<String>,
    pub state: Option<String>,
    pub created_at: Option<i64>,
    pub alias: Option<Vec<String>>,
}

impl From<DeploymentResponse> for Deployment {
    fn from(deployment: DeploymentResponse) -> Self {
        Deployment {
            id: deployment.uid,
            url: deployment.url.unwrap_or_default(),
            state: deployment.state,
            created_at: deployment.created_at,
            alias: deployment.alias.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DomainsResponse {
    pub domains: Option<Vec<DomainResponse>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DomainResponse {
    pub name: String,
}
