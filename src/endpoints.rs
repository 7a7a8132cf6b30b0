//! Per-domain endpoint sets
//!
//! Every domain supports `list` and `get`. `create` and `update` exist only
//! where the domain implements [`Creatable`] / [`Updatable`], so writing to a
//! read-only domain does not compile.

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{
    Created, Curriculum, CurriculumInput, CurriculumUpdate, Event, EventInput, Path, Rating,
    RatingInput, RatingUpdate, Resource, Review, ReviewInput, ReviewUpdate,
};
use crate::pagination::{Page, PageQuery, Paginator};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::instrument;

/// A record type served under `/api<PATH>`
pub trait Domain: DeserializeOwned + Send + 'static {
    /// Collection path, e.g. `/curriculum`
    const PATH: &'static str;
}

pub trait Creatable: Domain {
    type Input: Serialize + Send + Sync;
}

pub trait Updatable: Domain {
    type Update: Serialize + Send + Sync;
}

impl Domain for Curriculum {
    const PATH: &'static str = "/curriculum";
}

impl Creatable for Curriculum {
    type Input = CurriculumInput;
}

impl Updatable for Curriculum {
    type Update = CurriculumUpdate;
}

impl Domain for Rating {
    const PATH: &'static str = "/rating";
}

impl Creatable for Rating {
    type Input = RatingInput;
}

impl Updatable for Rating {
    type Update = RatingUpdate;
}

impl Domain for Review {
    const PATH: &'static str = "/review";
}

impl Creatable for Review {
    type Input = ReviewInput;
}

impl Updatable for Review {
    type Update = ReviewUpdate;
}

impl Domain for Event {
    const PATH: &'static str = "/event";
}

impl Creatable for Event {
    type Input = EventInput;
}

impl Domain for Resource {
    const PATH: &'static str = "/resource";
}

impl Domain for Path {
    const PATH: &'static str = "/path";
}

/// Endpoints of one domain, borrowed from an [`ApiClient`]
pub struct DomainClient<'a, D: Domain> {
    client: &'a ApiClient,
    _domain: PhantomData<fn() -> D>,
}

impl<D: Domain> Clone for DomainClient<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: Domain> Copy for DomainClient<'_, D> {}

impl<'a, D: Domain> DomainClient<'a, D> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            _domain: PhantomData,
        }
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", D::PATH, urlencoding::encode(id))
    }

    /// `GET /<domain>[?query]`
    #[instrument(skip(self), fields(domain = D::PATH))]
    pub async fn list(&self, query: &PageQuery) -> Result<Page<D>> {
        self.client.get(&query.apply_to(D::PATH)).await
    }

    /// `GET /<domain>/<id>`; a missing record is an HTTP error with status 404
    #[instrument(skip(self), fields(domain = D::PATH))]
    pub async fn get(&self, id: &str) -> Result<D> {
        self.client.get(&Self::item_path(id)).await
    }

    /// Paginator starting at the first page of `query`
    pub fn paginate(&self, query: PageQuery) -> Paginator<'a, D> {
        Paginator::new(*self, query)
    }
}

impl<D: Creatable> DomainClient<'_, D> {
    /// `POST /<domain>` with exactly the serialized input
    #[instrument(skip(self, input), fields(domain = D::PATH))]
    pub async fn create(&self, input: &D::Input) -> Result<Created> {
        self.client.request(D::PATH, Method::POST, Some(input)).await
    }
}

impl<D: Updatable> DomainClient<'_, D> {
    /// `PATCH /<domain>/<id>` with only the fields present in `update`
    #[instrument(skip(self, update), fields(domain = D::PATH))]
    pub async fn update(&self, id: &str, update: &D::Update) -> Result<D> {
        self.client
            .request(&Self::item_path(id), Method::PATCH, Some(update))
            .await
    }
}

impl ApiClient {
    pub fn domain<D: Domain>(&self) -> DomainClient<'_, D> {
        DomainClient::new(self)
    }

    pub fn curriculums(&self) -> DomainClient<'_, Curriculum> {
        self.domain()
    }

    pub fn ratings(&self) -> DomainClient<'_, Rating> {
        self.domain()
    }

    pub fn reviews(&self) -> DomainClient<'_, Review> {
        self.domain()
    }

    pub fn events(&self) -> DomainClient<'_, Event> {
        self.domain()
    }

    pub fn resources(&self) -> DomainClient<'_, Resource> {
        self.domain()
    }

    pub fn paths(&self) -> DomainClient<'_, Path> {
        self.domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_path_encodes_id() {
        assert_eq!(
            DomainClient::<Curriculum>::item_path("507f1f77bcf86cd799439011"),
            "/curriculum/507f1f77bcf86cd799439011"
        );
        assert_eq!(DomainClient::<Path>::item_path("a/b"), "/path/a%2Fb");
    }

    #[test]
    fn test_paths_are_singular() {
        assert_eq!(<Curriculum as Domain>::PATH, "/curriculum");
        assert_eq!(<Rating as Domain>::PATH, "/rating");
        assert_eq!(<Review as Domain>::PATH, "/review");
        assert_eq!(<Event as Domain>::PATH, "/event");
        assert_eq!(<Resource as Domain>::PATH, "/resource");
        assert_eq!(<Path as Domain>::PATH, "/path");
    }
}
