//! Wire types for the UMD backend API
//!
//! Field names follow the backend's JSON exactly (girder's `_id`, the
//! configuration endpoint's `normMap`); serde renames keep the Rust side
//! idiomatic.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Mapping from role/group name to backend-assigned group identifier.
///
/// Absence of a key means the role is unknown (not yet loaded), not that
/// the role has no members.
pub type GroupMap = HashMap<String, String>;

/// The session user as returned by `GET user/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    /// Backend user id
    #[serde(rename = "_id")]
    pub id: String,
    /// Login name
    pub login: String,
    /// Site administrator flag
    #[serde(default)]
    pub admin: bool,
    /// Group ids this user belongs to
    #[serde(default)]
    pub groups: Vec<String>,
}

/// One element of the backend's group listing (`GET group`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Backend group id
    #[serde(rename = "_id")]
    pub id: String,
    /// Group display name (role name, e.g. "Annotator")
    pub name: String,
}

/// One norm mapping entry of the TA2 configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormMapping {
    /// Norm display name
    pub named: String,
    /// Numeric norm identifier
    pub id: i64,
    /// Language-community groups the norm applies to
    pub groups: Vec<String>,
}

/// TA2 configuration as served by `GET UMD_configuration/TA2_config`
///
/// Round-trips opaquely: the client performs no validation and preserves
/// entry order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ta2Config {
    #[serde(rename = "normMap")]
    pub norm_map: Vec<NormMapping>,
}

/// Annotation/review modes the platform's viewer can be opened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationMode {
    #[serde(rename = "VAE")]
    Vae,
    #[serde(rename = "norms")]
    Norms,
    #[serde(rename = "changepoint")]
    Changepoint,
    #[serde(rename = "emotion")]
    Emotion,
    #[serde(rename = "remediation")]
    Remediation,
    #[serde(rename = "review")]
    Review,
    #[serde(rename = "TA2Annotation_ASRMTQuality")]
    Ta2AsrMtQuality,
    #[serde(rename = "TA2Annotation_MTQuality")]
    Ta2MtQuality,
    #[serde(rename = "TA2Annotation_Norms")]
    Ta2Norms,
    #[serde(rename = "TA2Annotation_Remediation")]
    Ta2Remediation,
    #[serde(rename = "TA2Annotation_All")]
    Ta2All,
    #[serde(rename = "TA2Annotation_Creation")]
    Ta2Creation,
}

impl AnnotationMode {
    /// All known modes, in platform order
    pub const ALL: [AnnotationMode; 12] = [
        AnnotationMode::Vae,
        AnnotationMode::Norms,
        AnnotationMode::Changepoint,
        AnnotationMode::Emotion,
        AnnotationMode::Remediation,
        AnnotationMode::Review,
        AnnotationMode::Ta2AsrMtQuality,
        AnnotationMode::Ta2MtQuality,
        AnnotationMode::Ta2Norms,
        AnnotationMode::Ta2Remediation,
        AnnotationMode::Ta2All,
        AnnotationMode::Ta2Creation,
    ];

    /// The mode's wire name (as it appears in routes and JSON)
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationMode::Vae => "VAE",
            AnnotationMode::Norms => "norms",
            AnnotationMode::Changepoint => "changepoint",
            AnnotationMode::Emotion => "emotion",
            AnnotationMode::Remediation => "remediation",
            AnnotationMode::Review => "review",
            AnnotationMode::Ta2AsrMtQuality => "TA2Annotation_ASRMTQuality",
            AnnotationMode::Ta2MtQuality => "TA2Annotation_MTQuality",
            AnnotationMode::Ta2Norms => "TA2Annotation_Norms",
            AnnotationMode::Ta2Remediation => "TA2Annotation_Remediation",
            AnnotationMode::Ta2All => "TA2Annotation_All",
            AnnotationMode::Ta2Creation => "TA2Annotation_Creation",
        }
    }
}

impl fmt::Display for AnnotationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static MODES_BY_NAME: Lazy<HashMap<&'static str, AnnotationMode>> = Lazy::new(|| {
    AnnotationMode::ALL
        .iter()
        .map(|mode| (mode.as_str(), *mode))
        .collect()
});

impl FromStr for AnnotationMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MODES_BY_NAME
            .get(s)
            .copied()
            .ok_or_else(|| crate::Error::InvalidInput(format!("unknown annotation mode: {s}")))
    }
}
