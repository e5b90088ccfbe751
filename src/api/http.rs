use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::info;

use super::{ApiError, PropertyApi};
use crate::config::Config;
use crate::models::{Project, ProjectKey, Property};

/// [`PropertyApi`] backed by the real HTTP service
pub struct HttpApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpApi {
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(config.api_base_url())?;
        if base.cannot_be_a_base() {
            bail!("API base URL {} cannot carry a path", base);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn projects_url(&self) -> Url {
        self.endpoint(&["api", "projects"])
    }

    fn properties_url(&self, project: &ProjectKey) -> Url {
        let mut url = self.endpoint(&["api", "properties", "all"]);
        url.query_pairs_mut().append_pair("projectId", project.as_str());
        url
    }

    fn add_property_url(&self, project: &ProjectKey) -> Url {
        self.endpoint(&["api", "projects", project.as_str(), "properties"])
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        info!(%url, "GET");
        let response = self.send(self.client.get(url.clone()), &url).await?;

        response.json::<T>().await.map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl PropertyApi for HttpApi {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_json(self.projects_url()).await
    }

    async fn list_properties(&self, project: &ProjectKey) -> Result<Vec<Property>, ApiError> {
        self.get_json(self.properties_url(project)).await
    }

    async fn add_property(&self, project: &ProjectKey, property: &Property) -> Result<(), ApiError> {
        let url = self.add_property_url(project);
        info!(%url, property = %property.id, "POST");
        self.send(self.client.post(url.clone()).json(property), &url).await?;

        Ok(())
    }
}
