//! Domain identifier types with validation
//!
//! This module provides the identifier types used to address stored imaging
//! records. A [`DicomIdentifier`] is a logical, caller-supplied reference at
//! study, series, or instance granularity; a [`VersionedInstanceIdentifier`]
//! is a concrete, storage-resolved instance whose version disambiguates
//! re-uploaded instances.

use crate::domain::errors::ResolveError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// DICOM unique identifier newtype wrapper
///
/// A UID is a dotted string of digits, at most 64 characters long.
///
/// # Examples
///
/// ```
/// use caravan::domain::Uid;
/// use std::str::FromStr;
///
/// let uid = Uid::from_str("1.2.840.113619.2.1").unwrap();
/// assert_eq!(uid.as_str(), "1.2.840.113619.2.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uid(String);

impl Uid {
    /// Creates a new Uid from a string
    ///
    /// # Errors
    ///
    /// Returns an error describing the first format violation found.
    pub fn new(uid: impl Into<String>) -> Result<Self, String> {
        let uid = uid.into();
        Self::check(&uid)?;
        Ok(Self(uid))
    }

    /// Validates an already-constructed Uid
    ///
    /// Deserialized identifiers bypass [`Uid::new`], so settings validation
    /// re-checks them through this method.
    pub fn validate(&self) -> Result<(), String> {
        Self::check(&self.0)
    }

    fn check(uid: &str) -> Result<(), String> {
        if uid.is_empty() {
            return Err("UID cannot be empty".to_string());
        }
        if uid.len() > 64 {
            return Err(format!("UID exceeds 64 characters: {uid}"));
        }
        if !uid.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(format!("UID contains invalid characters: {uid}"));
        }
        Ok(())
    }

    /// Returns the UID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Uid {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Uid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A logical reference to a study, series, or instance
///
/// The enum shape guarantees that exactly the UID components required by the
/// granularity are populated; there is no way to build a series reference
/// without its study, or an instance reference without both parents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DicomIdentifier {
    /// All instances within a study
    #[serde(rename_all = "camelCase")]
    Study { study_instance_uid: Uid },

    /// All instances within a series
    #[serde(rename_all = "camelCase")]
    Series {
        study_instance_uid: Uid,
        series_instance_uid: Uid,
    },

    /// A single instance
    #[serde(rename_all = "camelCase")]
    Instance {
        study_instance_uid: Uid,
        series_instance_uid: Uid,
        sop_instance_uid: Uid,
    },
}

impl DicomIdentifier {
    /// Creates a study-level identifier
    pub fn for_study(study: impl Into<String>) -> Result<Self, String> {
        Ok(Self::Study {
            study_instance_uid: Uid::new(study)?,
        })
    }

    /// Creates a series-level identifier
    pub fn for_series(study: impl Into<String>, series: impl Into<String>) -> Result<Self, String> {
        Ok(Self::Series {
            study_instance_uid: Uid::new(study)?,
            series_instance_uid: Uid::new(series)?,
        })
    }

    /// Creates an instance-level identifier
    pub fn for_instance(
        study: impl Into<String>,
        series: impl Into<String>,
        sop_instance: impl Into<String>,
    ) -> Result<Self, String> {
        Ok(Self::Instance {
            study_instance_uid: Uid::new(study)?,
            series_instance_uid: Uid::new(series)?,
            sop_instance_uid: Uid::new(sop_instance)?,
        })
    }

    /// Validates every UID component
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Study { study_instance_uid } => study_instance_uid.validate(),
            Self::Series {
                study_instance_uid,
                series_instance_uid,
            } => {
                study_instance_uid.validate()?;
                series_instance_uid.validate()
            }
            Self::Instance {
                study_instance_uid,
                series_instance_uid,
                sop_instance_uid,
            } => {
                study_instance_uid.validate()?;
                series_instance_uid.validate()?;
                sop_instance_uid.validate()
            }
        }
    }

    /// Returns the not-found error matching this identifier's granularity
    pub fn resolve_error(&self) -> ResolveError {
        match self {
            Self::Study { .. } => ResolveError::StudyNotFound,
            Self::Series { .. } => ResolveError::SeriesNotFound,
            Self::Instance { .. } => ResolveError::InstanceNotFound,
        }
    }
}

impl fmt::Display for DicomIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Study { study_instance_uid } => write!(f, "{study_instance_uid}"),
            Self::Series {
                study_instance_uid,
                series_instance_uid,
            } => write!(f, "{study_instance_uid}/{series_instance_uid}"),
            Self::Instance {
                study_instance_uid,
                series_instance_uid,
                sop_instance_uid,
            } => write!(
                f,
                "{study_instance_uid}/{series_instance_uid}/{sop_instance_uid}"
            ),
        }
    }
}

/// A concrete, storage-resolved instance
///
/// Produced only by resolving a [`DicomIdentifier`] against the instance
/// store. The version is a monotonically increasing storage watermark that
/// disambiguates re-uploaded instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionedInstanceIdentifier {
    pub study_instance_uid: Uid,
    pub series_instance_uid: Uid,
    pub sop_instance_uid: Uid,
    pub version: u64,
}

impl VersionedInstanceIdentifier {
    /// Creates a new versioned instance identifier
    pub fn new(
        study: impl Into<String>,
        series: impl Into<String>,
        sop_instance: impl Into<String>,
        version: u64,
    ) -> Result<Self, String> {
        Ok(Self {
            study_instance_uid: Uid::new(study)?,
            series_instance_uid: Uid::new(series)?,
            sop_instance_uid: Uid::new(sop_instance)?,
            version,
        })
    }
}

impl fmt::Display for VersionedInstanceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{} (version {})",
            self.study_instance_uid, self.series_instance_uid, self.sop_instance_uid, self.version
        )
    }
}
