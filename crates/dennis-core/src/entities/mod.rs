//! Typed wrappers over API resources
//!
//! - [`Group`]: a collection of nameservers and zones
//! - [`Zone`]: a DNS zone belonging to a group
//! - [`Record`]: a record within a zone
//! - [`Nameserver`]: a nameserver zones are served from

pub mod group;
pub mod nameserver;
pub mod record;
pub mod zone;

pub use group::{Group, GroupProperties, NewGroup};
pub use nameserver::{Nameserver, NameserverProperties};
pub use record::{Record, RecordListOptions, RecordProperties, normalize_type};
pub use zone::{Zone, ZoneProperties};

use crate::error::{ErrorMap, Translation};

/// Translation applied to every `update`
pub(crate) const UPDATE_ERRORS: ErrorMap =
    ErrorMap::new(&[("validation_error", Translation::Validation)]);

/// Serde helper for optional epoch-second timestamps.
///
/// Accepts integer or fractional seconds.
pub(crate) mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, de::Error};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(secs) = Option::<f64>::deserialize(deserializer)? else {
            return Ok(None);
        };

        let whole = secs.floor();
        let nanos = ((secs - whole) * 1e9).round() as u32;
        DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {secs}")))
    }

}

/// Serde helper treating an explicit `null` like a missing key.
pub(crate) mod null_as_default {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

}
