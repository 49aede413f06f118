//! Blocking client for the auto.ria.com developer API.
//!
//! # Design
//! `AutoRiaClient` holds an API key, a parsed base URL and a `Transport`, and
//! nothing that changes between calls. Every endpoint method builds a
//! `Resource` and runs it through `fetch`, which is the whole pipeline:
//! validate, `build` the URL, execute one GET, `parse` the body. `build` and
//! `parse` are public so a host that runs its own HTTP stack can use the
//! client without a transport.

use std::fmt;

use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::{AveragePriceQuery, ListOptions, Resource};

const API_KEY_PARAM: &str = "api_key";

/// Client for the auto.ria.com developer API.
///
/// Each method issues at most one HTTP request and returns the decoded JSON
/// exactly as upstream shaped it. Nothing is cached.
#[derive(Clone)]
pub struct AutoRiaClient<T = UreqTransport> {
    api_key: String,
    base_url: Url,
    transport: T,
}

impl AutoRiaClient {
    /// Client for the production API using the default ureq transport.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> AutoRiaClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        let base_url = config.validate()?;
        Ok(Self {
            api_key: config.api_key,
            base_url,
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build the GET request for `resource`. Fails without side effects if a
    /// required identifier is blank or the resource is unsupported.
    pub fn build(&self, resource: &Resource) -> Result<HttpRequest> {
        resource.validate()?;

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Configuration("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(resource.segments());

        // The key goes last and caller-supplied keys are dropped, so it can
        // never be overridden.
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in resource.query() {
                if name != API_KEY_PARAM {
                    query.append_pair(name, value);
                }
            }
            query.append_pair(API_KEY_PARAM, &self.api_key);
        }

        Ok(HttpRequest {
            url: url.into(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        })
    }

    /// Decode a response body, turning upstream `error` objects into errors.
    ///
    /// The status code is only logged; the body decides the outcome.
    pub fn parse(&self, response: HttpResponse) -> Result<Value> {
        trace!(
            status = response.status,
            bytes = response.body.len(),
            "received response"
        );

        if !response.is_success() {
            debug!(status = response.status, "non-success status");
        }

        let value: Value = serde_json::from_str(&response.body)?;

        if let Some(error) = value.as_object().and_then(|obj| obj.get("error")) {
            return Err(ApiError::Upstream {
                message: stringify_error(error),
            });
        }

        Ok(value)
    }

    /// Run the full pipeline for one resource.
    pub fn fetch(&self, resource: &Resource) -> Result<Value> {
        let request = self.build(resource)?;
        let path = resource.segments().join("/");
        let params: Vec<&str> = resource.query().into_iter().map(|(name, _)| name).collect();
        debug!(resource = resource.name(), %path, ?params, "dispatching request");
        let response = self.transport.execute(&request)?;
        self.parse(response)
    }

    /// Vehicle categories (`/auto/categories`).
    pub fn types(&self) -> Result<Value> {
        self.fetch(&Resource::Categories)
    }

    /// Body styles of a category, or of every category with `ListOptions::all()`.
    pub fn body_styles(&self, category: &str, options: ListOptions) -> Result<Value> {
        self.fetch(&Resource::BodyStyles {
            category: category.to_string(),
            options,
        })
    }

    pub fn marks(&self, category: &str) -> Result<Value> {
        self.fetch(&Resource::Marks {
            category: category.to_string(),
        })
    }

    /// Models of a mark within a category, or every model with `ListOptions::all()`.
    pub fn models(&self, category: &str, mark: &str, options: ListOptions) -> Result<Value> {
        self.fetch(&Resource::Models {
            category: category.to_string(),
            mark: mark.to_string(),
            options,
        })
    }

    pub fn regions(&self) -> Result<Value> {
        self.fetch(&Resource::Regions)
    }

    pub fn cities(&self, region: &str) -> Result<Value> {
        self.fetch(&Resource::Cities {
            region: region.to_string(),
        })
    }

    pub fn gearboxes(&self, category: &str) -> Result<Value> {
        self.fetch(&Resource::Gearboxes {
            category: category.to_string(),
        })
    }

    pub fn driver_types(&self, category: &str) -> Result<Value> {
        self.fetch(&Resource::DriverTypes {
            category: category.to_string(),
        })
    }

    pub fn fuels(&self) -> Result<Value> {
        self.fetch(&Resource::Fuels)
    }

    pub fn colors(&self) -> Result<Value> {
        self.fetch(&Resource::Colors)
    }

    pub fn options(&self, category: &str) -> Result<Value> {
        self.fetch(&Resource::Options {
            category: category.to_string(),
        })
    }

    /// Average price for the fixed sample query.
    pub fn average_price(&self) -> Result<Value> {
        self.average_price_for(AveragePriceQuery::sample())
    }

    pub fn average_price_for(&self, query: AveragePriceQuery) -> Result<Value> {
        self.fetch(&Resource::AveragePrice { query })
    }

    /// Listing details for one car.
    pub fn info(&self, car_id: &str) -> Result<Value> {
        self.fetch(&Resource::Info {
            car_id: car_id.to_string(),
        })
    }

    pub fn photos(&self, car_id: &str) -> Result<Value> {
        self.fetch(&Resource::Photos {
            car_id: car_id.to_string(),
        })
    }

    /// Not implemented; always `ApiError::UnsupportedOperation`, no request sent.
    pub fn search(&self, params: &[(&str, &str)]) -> Result<Value> {
        self.fetch(&Resource::Search {
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
    }
}

impl<T> fmt::Debug for AutoRiaClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoRiaClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Upstream puts either a string or an object under `error`; strings are
/// used verbatim, anything else as compact JSON.
fn stringify_error(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}
