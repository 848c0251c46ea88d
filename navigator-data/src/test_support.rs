//! In-memory dataset source and sample payloads for tests and docs.
//!
//! The sample payloads decode to exactly
//! `navigator_core::test_support::sample_datasets()`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::io;

use async_trait::async_trait;

use crate::{DatasetPaths, DatasetSource, TransportError};

/// Canned outcome for one stub location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubResponse {
    /// Succeed with these bytes.
    Body(Vec<u8>),
    /// Fail as if the server answered with this status.
    Status(u16),
    /// Fail with a network error carrying this message.
    NetworkError(String),
    /// Never complete.
    Hang,
}

/// [`DatasetSource`] serving canned responses and logging each request.
///
/// Locations without a response fail with status 404.
#[derive(Debug, Default)]
pub struct StubSource {
    responses: HashMap<String, StubResponse>,
    requests: RefCell<Vec<String>>,
}

impl StubSource {
    /// An empty source; every fetch is a 404.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `response` for `location`.
    #[must_use]
    pub fn with_response(mut self, location: &str, response: StubResponse) -> Self {
        self.responses.insert(location.to_owned(), response);
        self
    }

    /// Serve `body` for `location`.
    #[must_use]
    pub fn with_body(self, location: &str, body: Vec<u8>) -> Self {
        self.with_response(location, StubResponse::Body(body))
    }

    /// Locations requested so far, in request order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl DatasetSource for StubSource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, TransportError> {
        self.requests.borrow_mut().push(location.to_owned());
        match self.responses.get(location) {
            Some(StubResponse::Body(body)) => Ok(body.clone()),
            Some(StubResponse::Status(status)) => Err(TransportError::Http {
                location: location.to_owned(),
                status: *status,
                message: format!("stub status {status}"),
            }),
            Some(StubResponse::NetworkError(message)) => Err(TransportError::Network {
                location: location.to_owned(),
                source: io::Error::new(io::ErrorKind::ConnectionReset, message.clone()),
            }),
            Some(StubResponse::Hang) => std::future::pending().await,
            None => Err(TransportError::Http {
                location: location.to_owned(),
                status: 404,
                message: "not found".to_owned(),
            }),
        }
    }
}

/// Drive `future` to completion on a fresh current-thread runtime.
///
/// # Panics
///
/// Panics if the runtime cannot be built.
#[expect(clippy::expect_used, reason = "test helper fails fast on runtime setup")]
pub fn block_on_for_tests<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime should build")
        .block_on(future)
}

/// Indicator CSV with two Tunisia rows and one Morocco row.
pub const SAMPLE_INDICATORS_CSV: &str = "\
Country,Year,Headline Consumer Price Inflation,GDP per Capita,Score
Tunisia,2022,8.3,3924,4.5
Tunisia,2021,5.7,3807,4.6
Morocco,2022,6.6,3527,5.1
";

/// Governorates Tunis, Sousse, Kairouan and Tozeur (no coordinates).
pub const SAMPLE_GOVERNORATES_JSON: &str = r#"{
  "governorates": [
    { "id": 1, "name": "Tunis", "coordinates": [36.8065, 10.1815] },
    { "id": "2", "name": "Sousse", "coordinates": [35.8256, 10.6369] },
    { "id": 3, "name": "Kairouan", "coordinates": [35.6781, 10.0963] },
    { "id": 4, "name": "Tozeur" }
  ]
}"#;

/// Tourism, agriculture and an empty manufacturing bucket.
pub const SAMPLE_SECTORS_JSON: &str = r#"{
  "tourism": {
    "governorates": [
      { "governorate_id": 2, "name": "Sousse", "hotel_capacity": 42000,
        "annual_visitors": 1900000, "cultural_sites": 12 },
      { "governorate_id": 1, "name": "Tunis", "hotel_capacity": 18000 }
    ]
  },
  "agriculture": {
    "governorates": [
      { "governorate_id": 3, "arable_land_percentage": 61,
        "main_crops": ["olives", "cereals"], "water_availability_score": 5 }
    ]
  },
  "manufacturing": { "governorates": [] }
}"#;

/// Pre-computed scores matching the sector sample.
pub const SAMPLE_METRICS_JSON: &str = r#"{
  "governorate_scores": [
    { "governorate_id": 2, "sectors": {
        "tourism": { "total_score": 88, "strengths": ["Coastal resorts"],
                     "challenges": ["Seasonal demand"],
                     "opportunities": ["Medical tourism"] } } },
    { "governorate_id": 1, "sectors": { "tourism": { "total_score": 72 } } },
    { "governorate_id": 3, "sectors": {
        "tourism": { "total_score": 55 },
        "agriculture": { "total_score": 81 } } },
    { "governorate_id": 4, "sectors": { "agriculture": { "total_score": 64 } } }
  ],
  "scoring_methodology": {
    "weights": { "infrastructure": 0.3, "labour": 0.4, "market_access": 0.3 }
  }
}"#;

/// Boundaries for Tunis and Sousse.
pub const SAMPLE_BOUNDARIES_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "properties": { "id": 1, "name": "Tunis" },
      "geometry": { "type": "Polygon",
        "coordinates": [[[10.0, 36.6], [10.5, 36.6], [10.5, 37.1], [10.0, 36.6]]] } },
    { "type": "Feature", "properties": { "gov_id": "2", "NAME_EN": "Sousse" },
      "geometry": { "type": "MultiPolygon",
        "coordinates": [[[[10.4, 35.6], [10.9, 35.6], [10.9, 36.1], [10.4, 35.6]]]] } }
  ]
}"#;

/// A stub serving every sample payload at its default location.
#[must_use]
pub fn sample_source() -> StubSource {
    let paths = DatasetPaths::default();
    StubSource::new()
        .with_body(&paths.indicators, SAMPLE_INDICATORS_CSV.as_bytes().to_vec())
        .with_body(&paths.governorates, SAMPLE_GOVERNORATES_JSON.as_bytes().to_vec())
        .with_body(&paths.sectors, SAMPLE_SECTORS_JSON.as_bytes().to_vec())
        .with_body(&paths.metrics, SAMPLE_METRICS_JSON.as_bytes().to_vec())
        .with_body(&paths.boundaries, SAMPLE_BOUNDARIES_GEOJSON.as_bytes().to_vec())
}
