// ABOUTME: Vercel REST API client: project listing, deployment history, and
// ABOUTME: domain resolution across three independent sources

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{VercelError, VercelResult};
use crate::types::{
    Deployment, DeploymentOverview, DeploymentsResponse, DomainsResponse, ProjectResponse,
    ProjectSummary, ProjectsResponse, VercelProject, VercelProjectDetail,
};

const VERCEL_API_URL: &str = "https://api.vercel.com";

/// Client for the Vercel REST API, bound to one token and an optional team.
#[derive(Clone)]
pub struct VercelClient {
    http: Client,
    base_url: String,
    token: String,
    team_id: Option<String>,
}

impl VercelClient {
    pub fn new(token: impl Into<String>, team_id: Option<String>) -> VercelResult<Self> {
        Self::with_base_url(token, team_id, VERCEL_API_URL)
    }

    /// Same as [`VercelClient::new`] but against a different API origin.
    pub fn with_base_url(
        token: impl Into<String>,
        team_id: Option<String>,
        base_url: impl Into<String>,
    ) -> VercelResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| VercelError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            team_id,
        })
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> VercelResult<reqwest::Response> {
        let mut request = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.token))
            .query(query);
        if let Some(team_id) = &self.team_id {
            request = request.query(&[("teamId", team_id.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VercelError::Network(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        warn!("Vercel API returned {}: {}", status, message);
        Err(VercelError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Lists the account's projects, with a browsable URL per project.
    pub async fn list_projects(&self) -> VercelResult<Vec<VercelProject>> {
        debug!("Listing Vercel projects");

        let response = self.get("/v9/projects", &[]).await?;
        let body: ProjectsResponse = response
            .json()
            .await
            .map_err(|e| VercelError::InvalidResponse(e.to_string()))?;
        Ok(body
            .projects
            .into_iter()
            .map(ProjectResponse::into_project)
            .collect())
    }

    pub async fn get_project(&self, project_id: &str) -> VercelResult<VercelProjectDetail> {
        let response = self
            .get(&format!("/v9/projects/{}", project_id), &[])
            .await?;
        let body: ProjectResponse = response
            .json()
            .await
            .map_err(|e| VercelError::InvalidResponse(e.to_string()))?;
        Ok(body.into_detail())
    }

    /// The twenty most recent deployments of one project.
    pub async fn list_deployments(&self, project_id: &str) -> VercelResult<Vec<Deployment>> {
        let response = self
            .get(
                "/v6/deployments",
                &[("projectId", project_id), ("limit", "20")],
            )
            .await?;
        let body: DeploymentsResponse = response
            .json()
            .await
            .map_err(|e| VercelError::InvalidResponse(e.to_string()))?;
        Ok(body
            .deployments
            .unwrap_or_default()
            .into_iter()
            .map(Deployment::from)
            .collect())
    }

    /// Domains registered for one project via the domains endpoint.
    pub async fn list_domains(&self, project_id: &str) -> VercelResult<Vec<String>> {
        let response = self
            .get("/v5/domains", &[("projectId", project_id)])
            .await?;
        let body: DomainsResponse = response
            .json()
            .await
            .map_err(|e| VercelError::InvalidResponse(e.to_string()))?;
        Ok(body
            .domains
            .unwrap_or_default()
            .into_iter()
            .map(|domain| domain.name)
            .collect())
    }

    /// Composes the per-project overview: detail, recent deployments, and
    /// the union of every domain source. The project fetch must succeed;
    /// the deployment and domain fetches degrade to empty on failure.
    pub async fn deployment_overview(&self, project_id: &str) -> VercelResult<DeploymentOverview> {
        let project = self.get_project(project_id).await?;

        let deployments = match self.list_deployments(project_id).await {
            Ok(deployments) => deployments,
            Err(e) => {
                warn!("Deployment listing failed for {}: {}", project_id, e);
                Vec::new()
            }
        };
        let endpoint_domains = match self.list_domains(project_id).await {
            Ok(domains) => domains,
            Err(e) => {
                warn!("Domain listing failed for {}: {}", project_id, e);
                Vec::new()
            }
        };

        let domains = domain_union(&deployments, &endpoint_domains, &project.domains);

        Ok(DeploymentOverview {
            project: ProjectSummary {
                id: project.id,
                name: project.name,
                url: project.url,
            },
            deployments,
            domains,
        })
    }
}

/// Set-union of the three domain sources, first-seen order preserved:
/// aliases of READY deployments, then the domains endpoint, then the
/// project's inline domains.
pub fn domain_union(
    deployments: &[Deployment],
    endpoint_domains: &[String],
    project_domains: &[String],
) -> Vec<String> {
    let mut domains: Vec<String> = Vec::new();
    let mut push = |domain: &str| {
        if !domains.iter().any(|d| d == domain) {
            domains.push(domain.to_string());
        }
    };

    for deployment in deployments {
        if deployment.state.as_deref() == Some("READY") {
            for alias in &deployment.alias {
                push(alias);
            }
        }
    }
    for domain in endpoint_domains {
        push(domain);
    }
    for domain in project_domains {
        push(domain);
    }

    domains
}
