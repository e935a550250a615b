//! Remote calls the form depends on.
//!
//! The session never performs I/O itself: it hands out [`RemoteRequest`]s and is fed the
//! matching [`Completion`]s. [`execute`] runs one request against a backend.

use std::future::Future;
use std::sync::Arc;

use reqwest::Client;

use crate::config::FormConfig;
use crate::errors::FormError;
use crate::models::{DeleteResponse, DependencyEdge, OptionItem, OptionsEnvelope, RowIndex};

/// Query parameter of the brigade lookup.
pub const POINT_PARAM: &str = "point_id";
/// Query parameter of the role lookup.
pub const PERSONNEL_TYPE_PARAM: &str = "personnel_type";

/// Dependent option lookups. Every call is a fresh request.
pub trait OptionFetcher: Send + Sync {
    fn fetch_brigades(
        &self,
        point_id: &str,
    ) -> impl Future<Output = Result<Vec<OptionItem>, FormError>> + Send;

    fn fetch_roles(
        &self,
        personnel_type: &str,
    ) -> impl Future<Output = Result<Vec<OptionItem>, FormError>> + Send;
}

/// Person maintenance calls made from the list.
pub trait PersonService: Send + Sync {
    fn delete_person(
        &self,
        entity_id: &str,
    ) -> impl Future<Output = Result<DeleteResponse, FormError>> + Send;
}

/// Identifies the selection an option fetch was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub row: RowIndex,
    pub edge: DependencyEdge,
    pub selection: String,
    pub generation: u64,
}

/// Work the host must carry out on behalf of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRequest {
    FetchOptions(FetchTicket),
    DeletePerson { entity_id: String },
}

/// Result of a [`RemoteRequest`], fed back into the session.
#[derive(Debug)]
pub enum Completion {
    Options {
        ticket: FetchTicket,
        result: Result<Vec<OptionItem>, FormError>,
    },
    Deleted {
        entity_id: String,
        result: Result<DeleteResponse, FormError>,
    },
}

/// Run one request against `backend`.
pub async fn execute<B>(backend: &B, request: RemoteRequest) -> Completion
where
    B: OptionFetcher + PersonService,
{
    match request {
        RemoteRequest::FetchOptions(ticket) => {
            let result = match ticket.edge {
                DependencyEdge::PointToBrigades => backend.fetch_brigades(&ticket.selection).await,
                DependencyEdge::PersonnelTypeToRoles => backend.fetch_roles(&ticket.selection).await,
            };
            Completion::Options { ticket, result }
        }
        RemoteRequest::DeletePerson { entity_id } => {
            let result = backend.delete_person(&entity_id).await;
            Completion::Deleted { entity_id, result }
        }
    }
}

/// `reqwest` backed implementation talking to the Django views.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    config: Arc<FormConfig>,
}

impl HttpBackend {
    pub fn new(config: Arc<FormConfig>) -> Result<Self, FormError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client, config })
    }

    async fn get_options(
        &self,
        url: &str,
        param: &str,
        value: &str,
    ) -> Result<Vec<OptionItem>, FormError> {
        tracing::debug!("GET {} {}={}", url, param, value);

        let envelope: OptionsEnvelope = self
            .client
            .get(url)
            .query(&[(param, value)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(envelope.into())
    }
}

impl OptionFetcher for HttpBackend {
    async fn fetch_brigades(&self, point_id: &str) -> Result<Vec<OptionItem>, FormError> {
        self.get_options(&self.config.brigades_url, POINT_PARAM, point_id)
            .await
    }

    async fn fetch_roles(&self, personnel_type: &str) -> Result<Vec<OptionItem>, FormError> {
        self.get_options(&self.config.roles_url, PERSONNEL_TYPE_PARAM, personnel_type)
            .await
    }
}

impl PersonService for HttpBackend {
    async fn delete_person(&self, entity_id: &str) -> Result<DeleteResponse, FormError> {
        let url = self.config.delete_url(entity_id);
        tracing::debug!("GET {} (delete)", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response)
    }
}
