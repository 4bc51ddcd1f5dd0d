//! GraphQL-over-HTTP client for the platform's system API.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::environment::Environment;
use crate::error::{Result, StrataError};

use super::{CreateProjectRequest, MigrationResult, PushRequest, RemoteClient, RemoteProject};

const USER_AGENT: &str = concat!("strata/", env!("CARGO_PKG_VERSION"));

const ADD_PROJECT_MUTATION: &str = r#"
mutation addProject($name: String!, $alias: String, $region: Region, $config: String) {
  addProject(input: {name: $name, alias: $alias, region: $region, config: $config, clientMutationId: "strata"}) {
    project { id name alias region }
  }
}"#;

const PUSH_MUTATION: &str = r#"
mutation push($projectId: String!, $force: Boolean!, $isDryRun: Boolean!, $config: String!) {
  push(input: {projectId: $projectId, force: $force, isDryRun: $isDryRun, config: $config, version: 1}) {
    migrationMessages {
      type action name description
      subDescriptions { type action name description }
    }
    errors { description type field code }
    projectDefinition { modules { name content files } }
  }
}"#;

/// Where and how to reach one cluster
#[derive(Debug, Clone)]
pub struct ClusterEndpoint {
    pub host: String,
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    client: reqwest::Client,
    clusters: BTreeMap<String, ClusterEndpoint>,
}

impl HttpRemoteClient {
    pub fn new(clusters: BTreeMap<String, ClusterEndpoint>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StrataError::remote("client setup", e))?;
        Ok(Self { client, clusters })
    }

    /// Client for every cluster the environment knows about.
    pub fn from_environment(env: &Environment) -> Result<Self> {
        let clusters = env
            .cluster_names()
            .into_iter()
            .filter_map(|name| {
                let host = env.cluster_host(&name)?;
                let token = env.token_for_cluster(&name);
                Some((name, ClusterEndpoint { host, token }))
            })
            .collect();
        Self::new(clusters)
    }

    fn system_url(&self, cluster: &str) -> Result<(Url, Option<&str>)> {
        let endpoint = self.clusters.get(cluster).ok_or_else(|| StrataError::UnknownCluster {
            name: cluster.to_string(),
        })?;
        let url = system_url(&endpoint.host)?;
        Ok((url, endpoint.token.as_deref()))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        cluster: &str,
        query: &str,
        variables: Value,
    ) -> Result<T> {
        let (url, token) = self.system_url(cluster)?;
        debug!(operation, url = %url, "sending request");

        let mut request = self
            .client
            .post(url.clone())
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StrataError::remote(operation, format!("{} ({})", e, url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StrataError::remote(
                operation,
                format!("HTTP {} from {}", status, url),
            ));
        }

        let body: GraphQlResponse<T> = response
            .json()
            .await
            .map_err(|e| StrataError::remote(operation, format!("invalid response: {}", e)))?;

        body.into_data(operation)
    }
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn create_project(&self, request: CreateProjectRequest<'_>) -> Result<RemoteProject> {
        let config = serde_json::to_string(request.definition)
            .map_err(|e| StrataError::remote("addProject", e))?;
        let variables = json!({
            "name": request.name,
            "alias": request.alias,
            "region": request.region,
            "config": config,
        });

        let data: AddProjectData = self
            .execute("addProject", request.cluster, ADD_PROJECT_MUTATION, variables)
            .await?;

        let project = data.add_project.project;
        Ok(RemoteProject {
            id: project.id,
            name: project.name,
            alias: project.alias,
            region: project.region,
        })
    }

    async fn push(&self, request: PushRequest<'_>) -> Result<MigrationResult> {
        let config =
            serde_json::to_string(request.definition).map_err(|e| StrataError::remote("push", e))?;
        let variables = json!({
            "projectId": request.target.project_id,
            "force": request.force,
            "isDryRun": request.dry_run,
            "config": config,
        });

        let data: PushData = self
            .execute("push", &request.target.cluster, PUSH_MUTATION, variables)
            .await?;
        Ok(data.push)
    }
}

/// `<host>/system`, keeping any path prefix of the host.
pub fn system_url(host: &str) -> Result<Url> {
    let mut url = Url::parse(host)
        .map_err(|e| StrataError::remote("endpoint", format!("invalid host '{}': {}", host, e)))?;
    url.path_segments_mut()
        .map_err(|_| StrataError::remote("endpoint", format!("invalid host '{}'", host)))?
        .pop_if_empty()
        .push("system");
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl<T> GraphQlResponse<T> {
    fn into_data(self, operation: &str) -> Result<T> {
        if !self.errors.is_empty() {
            let message = self
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(StrataError::remote(operation, message));
        }
        self.data
            .ok_or_else(|| StrataError::remote(operation, "response contained no data"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddProjectData {
    add_project: AddProjectPayload,
}

#[derive(Debug, Deserialize)]
struct AddProjectPayload {
    project: ProjectNode,
}

#[derive(Debug, Deserialize)]
struct ProjectNode {
    id: String,
    name: String,
    #[serde(default)]
    alias: Option<String>,
    #[serde(default)]
    region: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PushData {
    push: MigrationResult,
}
