//! Parsing of `--tower X,Y` arguments.

use std::{num::ParseFloatError, str::FromStr};

use glam::Vec2;
use thiserror::Error;

/// Field position requested for a tower on the command line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TowerArg(pub(crate) Vec2);

/// Errors produced while parsing a tower position.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum TowerArgError {
    /// The value was not of the form `X,Y`.
    #[error("expected X,Y but found `{0}`")]
    MissingSeparator(String),
    /// One coordinate was not a number.
    #[error("invalid coordinate `{value}`")]
    InvalidCoordinate {
        /// Offending text.
        value: String,
        /// Underlying parse failure.
        #[source]
        source: ParseFloatError,
    },
    /// One coordinate was infinite or NaN.
    #[error("coordinate `{0}` is not finite")]
    NonFinite(String),
}

impl FromStr for TowerArg {
    type Err = TowerArgError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (x, y) = value
            .split_once(',')
            .ok_or_else(|| TowerArgError::MissingSeparator(value.to_owned()))?;
        Ok(Self(Vec2::new(coordinate(x)?, coordinate(y)?)))
    }
}

fn coordinate(text: &str) -> Result<f32, TowerArgError> {
    let text = text.trim();
    let value: f32 = text
        .parse()
        .map_err(|source| TowerArgError::InvalidCoordinate {
            value: text.to_owned(),
            source,
        })?;

    if !value.is_finite() {
        return Err(TowerArgError::NonFinite(text.to_owned()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_coordinates() {
        assert_eq!(
            "300, 170.5".parse::<TowerArg>(),
            Ok(TowerArg(Vec2::new(300.0, 170.5)))
        );
    }

    #[test]
    fn rejects_missing_separator() {
        assert_eq!(
            "300".parse::<TowerArg>(),
            Err(TowerArgError::MissingSeparator("300".to_owned()))
        );
    }

    #[test]
    fn rejects_non_numeric_coordinates() {
        let error = "300,north".parse::<TowerArg>().unwrap_err();
        assert!(matches!(
            error,
            TowerArgError::InvalidCoordinate { ref value, .. } if value == "north"
        ));
        assert_eq!(error.to_string(), "invalid coordinate `north`");
    }

    #[test]
    fn rejects_infinite_coordinates() {
        assert_eq!(
            "inf,3".parse::<TowerArg>(),
            Err(TowerArgError::NonFinite("inf".to_owned()))
        );
    }
}
