//! Known implementations of the [`HttpClient`] contract

use std::sync::Arc;

use crate::checker::ExistenceChecker;
use crate::collection::CandidatesCollection;
use crate::contracts::SharedHttpClient;
use crate::entity::Candidate;
use crate::resolver::Resolver;

#[cfg(feature = "reqwest")]
use crate::contracts::{HttpClient, HttpError, HttpResponse};

/// Candidate tables for the HTTP client contract.
pub struct HttpClients;

impl HttpClients {
    pub fn resolver(checker: Arc<dyn ExistenceChecker>) -> Resolver<SharedHttpClient> {
        Resolver::with_tables("http-client", checker, Self::candidates, Self::extended)
    }

    fn candidates() -> CandidatesCollection<SharedHttpClient> {
        #[allow(unused_mut)]
        let mut candidates = CandidatesCollection::new();

        #[cfg(feature = "reqwest")]
        candidates.add(
            Candidate::new("reqwest", "^0.12", || {
                reqwest::blocking::Client::builder()
                    .build()
                    .ok()
                    .map(|client| Arc::new(ReqwestClient { inner: client }) as SharedHttpClient)
            })
            .expect("static http client candidate table"),
        );

        candidates
    }

    fn extended() -> CandidatesCollection<SharedHttpClient> {
        [
            ("reqwest", "^0.12"),
            ("ureq", "^2.0 | ^3.0"),
            ("hyper", "^1.0"),
            ("isahc", "^1.0"),
            ("curl", "^0.4"),
            ("attohttpc", "^0.28 | ^0.29"),
        ]
        .into_iter()
        .map(|(package, constraint)| {
            Candidate::unbuildable(package, constraint).expect("static http client candidate table")
        })
        .collect()
    }
}

/// Blocking reqwest client behind the contract surface.
#[cfg(feature = "reqwest")]
struct ReqwestClient {
    inner: reqwest::blocking::Client,
}

#[cfg(feature = "reqwest")]
impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let response = self.inner.get(url).send().map_err(|e| {
            if e.is_builder() {
                HttpError::InvalidUrl(url.to_string())
            } else {
                HttpError::Transport(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| HttpError::Transport(e.to_string()))?
            .to_vec();

        Ok(HttpResponse { status, body })
    }
}
