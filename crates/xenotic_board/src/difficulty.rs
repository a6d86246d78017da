//! AI difficulty levels.

use serde::{Deserialize, Serialize};

/// How hard the server-side engine plays, from weakest to strongest.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Mostly random play.
    Easy,
    /// Mixes random and optimal play.
    Medium,
    /// Usually optimal.
    Hard,
    /// Full search; cannot be beaten.
    #[default]
    Impossible,
}
