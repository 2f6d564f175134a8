//! Event domain - timeline output handed to the renderer

mod event_assembler;

pub use event_assembler::{EventAssembler, ITEM_ID};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One timeline entry. Pure output shape with no identity of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub title: String,
    pub start_timestamp: DateTime<FixedOffset>,
    pub end_timestamp: DateTime<FixedOffset>,
    pub color: String,
    pub notes: String,
    pub icon_url: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub is_all_day: bool,
    pub is_point_in_time: bool,
}
