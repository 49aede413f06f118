//! Request-side types: the upstream resources and their options.
//!
//! # Design
//! `Resource` is the transient value every call is built from. Each variant
//! owns the identifiers its path needs and knows its path segments and query
//! parameters, so the client's pipeline stays a single code path. Resources
//! deserialize from JSON with a `"resource"` tag, which is how the test
//! vectors describe calls.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// How a body-style or model listing is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// `/auto/categories/{type}/...` flat list for one category.
    PerCategory,
    /// Per-category list nested by subcategory (`/_group`).
    Grouped,
    /// Flat resource across all categories.
    All,
}

/// Convenience flags for body-style and model listings.
///
/// The flags are mutually exclusive; when both are set `all` wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    #[serde(default)]
    pub all: bool,
    #[serde(default)]
    pub grouped: bool,
}

impl ListOptions {
    pub fn all() -> Self {
        Self {
            all: true,
            grouped: false,
        }
    }

    pub fn grouped() -> Self {
        Self {
            all: false,
            grouped: true,
        }
    }

    pub fn mode(&self) -> ListMode {
        if self.all {
            ListMode::All
        } else if self.grouped {
            ListMode::Grouped
        } else {
            ListMode::PerCategory
        }
    }
}

/// Query parameters for `/auto/average_price`, sent in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AveragePriceQuery {
    params: Vec<(String, String)>,
}

impl AveragePriceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed sample query: mark 9, model 31612, gearbox 2.
    pub fn sample() -> Self {
        Self::new()
            .param("marka_id", 9)
            .param("model_id", 31612)
            .param("gear_id", 2)
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// One upstream resource together with the identifiers it is scoped by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "resource", rename_all = "snake_case")]
pub enum Resource {
    Categories,
    BodyStyles {
        category: String,
        #[serde(default)]
        options: ListOptions,
    },
    Marks {
        category: String,
    },
    Models {
        category: String,
        mark: String,
        #[serde(default)]
        options: ListOptions,
    },
    Regions,
    Cities {
        region: String,
    },
    Gearboxes {
        category: String,
    },
    DriverTypes {
        category: String,
    },
    Fuels,
    Colors,
    Options {
        category: String,
    },
    AveragePrice {
        #[serde(default = "AveragePriceQuery::sample")]
        query: AveragePriceQuery,
    },
    Info {
        car_id: String,
    },
    Photos {
        car_id: String,
    },
    Search {
        #[serde(default)]
        params: Vec<(String, String)>,
    },
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// `.` and `..` are dropped by URL path normalization, which would send the
/// request to a different endpoint.
fn is_dot_segment(value: &str) -> bool {
    matches!(value, "." | "..")
}

fn require(field: &'static str, value: &str) -> Result<()> {
    if is_blank(value) {
        return Err(ApiError::InvalidArgument {
            field,
            reason: "should not be empty",
        });
    }
    if is_dot_segment(value) {
        return Err(ApiError::InvalidArgument {
            field,
            reason: "should not be `.` or `..`",
        });
    }
    Ok(())
}

impl Resource {
    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Categories => "types",
            Resource::BodyStyles { .. } => "body_styles",
            Resource::Marks { .. } => "marks",
            Resource::Models { .. } => "models",
            Resource::Regions => "regions",
            Resource::Cities { .. } => "cities",
            Resource::Gearboxes { .. } => "gearboxes",
            Resource::DriverTypes { .. } => "driver_types",
            Resource::Fuels => "fuels",
            Resource::Colors => "colors",
            Resource::Options { .. } => "options",
            Resource::AveragePrice { .. } => "average_price",
            Resource::Info { .. } => "info",
            Resource::Photos { .. } => "photos",
            Resource::Search { .. } => "search",
        }
    }

    /// Check required identifiers. Runs before any request is built.
    pub fn validate(&self) -> Result<()> {
        match self {
            Resource::Categories
            | Resource::Regions
            | Resource::Fuels
            | Resource::Colors
            | Resource::AveragePrice { .. } => Ok(()),
            Resource::BodyStyles { category, .. }
            | Resource::Marks { category }
            | Resource::Gearboxes { category }
            | Resource::DriverTypes { category }
            | Resource::Options { category } => require("type", category),
            Resource::Models { category, mark, .. } => {
                require("type", category)?;
                require("mark", mark)
            }
            Resource::Cities { region } => require("region", region),
            Resource::Info { car_id } | Resource::Photos { car_id } => require("car_id", car_id),
            Resource::Search { .. } => Err(ApiError::UnsupportedOperation {
                operation: "search",
            }),
        }
    }

    /// Path segments below the base URL. Identifiers are returned raw; the
    /// client percent-encodes each segment.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Resource::Categories => vec!["auto", "categories"],
            Resource::BodyStyles { category, options } => match options.mode() {
                ListMode::All => vec!["auto", "bodystyles"],
                ListMode::Grouped => {
                    vec!["auto", "categories", category.as_str(), "bodystyles", "_group"]
                }
                ListMode::PerCategory => {
                    vec!["auto", "categories", category.as_str(), "bodystyles"]
                }
            },
            Resource::Marks { category } => vec!["auto", "categories", category.as_str(), "marks"],
            Resource::Models {
                category,
                mark,
                options,
            } => match options.mode() {
                ListMode::All => vec!["auto", "models"],
                ListMode::Grouped => vec![
                    "auto",
                    "categories",
                    category.as_str(),
                    "marks",
                    mark.as_str(),
                    "models",
                    "_group",
                ],
                ListMode::PerCategory => vec![
                    "auto",
                    "categories",
                    category.as_str(),
                    "marks",
                    mark.as_str(),
                    "models",
                ],
            },
            Resource::Regions => vec!["auto", "states"],
            Resource::Cities { region } => vec!["auto", "states", region.as_str(), "cities"],
            Resource::Gearboxes { category } => {
                vec!["auto", "categories", category.as_str(), "gearboxes"]
            }
            Resource::DriverTypes { category } => {
                vec!["auto", "categories", category.as_str(), "driverTypes"]
            }
            Resource::Fuels => vec!["auto", "type"],
            Resource::Colors => vec!["auto", "colors"],
            Resource::Options { category } => {
                vec!["auto", "categories", category.as_str(), "auto_options"]
            }
            Resource::AveragePrice { .. } => vec!["auto", "average_price"],
            Resource::Info { .. } => vec!["auto", "info"],
            Resource::Photos { car_id } => vec!["auto", "fotos", car_id.as_str()],
            Resource::Search { .. } => vec!["auto", "search"],
        }
    }

    /// Resource-specific query parameters, before the API key is added.
    pub fn query(&self) -> Vec<(&str, &str)> {
        match self {
            Resource::AveragePrice { query } => query
                .params()
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
            Resource::Info { car_id } | Resource::Photos { car_id } => {
                vec![("auto_id", car_id.as_str())]
            }
            Resource::Search { params } => params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_takes_precedence_over_grouped() {
        let options = ListOptions {
            all: true,
            grouped: true,
        };
        assert_eq!(options.mode(), ListMode::All);
        assert_eq!(ListOptions::grouped().mode(), ListMode::Grouped);
        assert_eq!(ListOptions::default().mode(), ListMode::PerCategory);
    }

    #[test]
    fn body_styles_all_ignores_category() {
        let resource = Resource::BodyStyles {
            category: "1".to_string(),
            options: ListOptions::all(),
        };
        assert_eq!(resource.segments(), vec!["auto", "bodystyles"]);
    }

    #[test]
    fn grouped_models_append_group_segment() {
        let resource = Resource::Models {
            category: "2".to_string(),
            mark: "9".to_string(),
            options: ListOptions::grouped(),
        };
        assert_eq!(
            resource.segments(),
            vec!["auto", "categories", "2", "marks", "9", "models", "_group"]
        );
    }

    #[test]
    fn blank_identifiers_are_rejected_with_field_name() {
        let cases = [
            (
                Resource::Marks {
                    category: String::new(),
                },
                "type",
            ),
            (
                Resource::Models {
                    category: "1".to_string(),
                    mark: "  ".to_string(),
                    options: ListOptions::default(),
                },
                "mark",
            ),
            (
                Resource::Cities {
                    region: String::new(),
                },
                "region",
            ),
            (
                Resource::Photos {
                    car_id: String::new(),
                },
                "car_id",
            ),
        ];
        for (resource, expected) in cases {
            match resource.validate() {
                Err(ApiError::InvalidArgument { field, .. }) => assert_eq!(field, expected),
                other => panic!("{}: expected InvalidArgument, got {other:?}", resource.name()),
            }
        }
    }

    #[test]
    fn models_reports_type_before_mark() {
        let resource = Resource::Models {
            category: String::new(),
            mark: String::new(),
            options: ListOptions::default(),
        };
        assert!(matches!(
            resource.validate(),
            Err(ApiError::InvalidArgument { field: "type", .. })
        ));
    }

    #[test]
    fn dot_segments_are_rejected() {
        let cases = [
            (
                Resource::Marks {
                    category: "..".to_string(),
                },
                "type",
            ),
            (
                Resource::Models {
                    category: "1".to_string(),
                    mark: ".".to_string(),
                    options: ListOptions::default(),
                },
                "mark",
            ),
            (
                Resource::Cities {
                    region: "..".to_string(),
                },
                "region",
            ),
            (
                Resource::Photos {
                    car_id: ".".to_string(),
                },
                "car_id",
            ),
        ];
        for (resource, expected) in cases {
            match resource.validate() {
                Err(err @ ApiError::InvalidArgument { field, .. }) => {
                    assert_eq!(field, expected);
                    assert_eq!(err.to_string(), format!("`{expected}` should not be `.` or `..`"));
                }
                other => panic!("{}: expected InvalidArgument, got {other:?}", resource.name()),
            }
        }
    }

    #[test]
    fn dots_inside_identifiers_are_allowed() {
        let resource = Resource::Marks {
            category: "1.5".to_string(),
        };
        assert!(resource.validate().is_ok());
    }

    #[test]
    fn search_is_unsupported() {
        let resource = Resource::Search { params: Vec::new() };
        assert!(matches!(
            resource.validate(),
            Err(ApiError::UnsupportedOperation { operation: "search" })
        ));
    }

    #[test]
    fn info_and_photos_carry_auto_id() {
        let info = Resource::Info {
            car_id: "1".to_string(),
        };
        assert_eq!(info.query(), vec![("auto_id", "1")]);

        let photos = Resource::Photos {
            car_id: "1".to_string(),
        };
        assert_eq!(photos.segments(), vec!["auto", "fotos", "1"]);
        assert_eq!(photos.query(), vec![("auto_id", "1")]);
    }

    #[test]
    fn sample_average_price_query() {
        let query = AveragePriceQuery::sample();
        let params: Vec<(&str, &str)> = query
            .params()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            params,
            vec![("marka_id", "9"), ("model_id", "31612"), ("gear_id", "2")]
        );
    }

    #[test]
    fn resource_deserializes_from_tagged_json() {
        let raw = r#"{"resource":"body_styles","category":"1","options":{"grouped":true}}"#;
        let resource: Resource = serde_json::from_str(raw).unwrap();
        assert_eq!(
            resource,
            Resource::BodyStyles {
                category: "1".to_string(),
                options: ListOptions::grouped(),
            }
        );

        let resource: Resource = serde_json::from_str(r#"{"resource":"average_price"}"#).unwrap();
        assert_eq!(
            resource,
            Resource::AveragePrice {
                query: AveragePriceQuery::sample()
            }
        );
    }
}
