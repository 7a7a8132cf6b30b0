//! Record types of the six member domains
//!
//! Curriculum, Rating and Review are fully editable. Events can be created
//! but not changed. Resources and Paths are populated by another system and
//! are read-only here.

use crate::types::parse_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance of a create or save, stamped by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub from_ip: String,
    pub by_user: String,
    /// Raw timestamp as stamped by the server
    pub at_time: String,
    pub correlation_id: String,
}

impl Breadcrumb {
    /// `at_time` as UTC, when it parses
    pub fn at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.at_time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Archived,
}

/// Server response to a create call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    #[serde(rename = "_id")]
    pub id: String,
}

macro_rules! control_record {
    ($record:ident, $input:ident, $update:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $record {
            #[serde(rename = "_id")]
            pub id: String,
            pub name: String,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub description: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub status: Option<Status>,
            pub created: Breadcrumb,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub saved: Option<Breadcrumb>,
        }

        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $input {
            pub name: String,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub description: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub status: Option<Status>,
        }

        impl $input {
            pub fn new(name: impl Into<String>) -> Self {
                Self {
                    name: name.into(),
                    description: None,
                    status: None,
                }
            }

            pub fn description(mut self, description: impl Into<String>) -> Self {
                self.description = Some(description.into());
                self
            }

            pub fn status(mut self, status: Status) -> Self {
                self.status = Some(status);
                self
            }
        }

        /// Partial update; only fields that are `Some` go on the wire
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $update {
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub name: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub description: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub status: Option<Status>,
        }

        impl $update {
            pub fn name(mut self, name: impl Into<String>) -> Self {
                self.name = Some(name.into());
                self
            }

            pub fn description(mut self, description: impl Into<String>) -> Self {
                self.description = Some(description.into());
                self
            }

            pub fn status(mut self, status: Status) -> Self {
                self.status = Some(status);
                self
            }

            pub fn is_empty(&self) -> bool {
                self.name.is_none() && self.description.is_none() && self.status.is_none()
            }
        }
    };
}

control_record!(Curriculum, CurriculumInput, CurriculumUpdate);
control_record!(Rating, RatingInput, RatingUpdate);
control_record!(Review, ReviewInput, ReviewUpdate);

/// Event records carry a freeform status and are never saved after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub created: Breadcrumb,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl EventInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            status: None,
        }
    }
}

macro_rules! consume_record {
    ($record:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $record {
            #[serde(rename = "_id")]
            pub id: String,
            pub name: String,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub description: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub status: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub created: Option<Breadcrumb>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub saved: Option<Breadcrumb>,
        }
    };
}

consume_record!(Resource);
consume_record!(Path);
