//! Operator chain parsing for the command line.
//!
//! Format: `"op:param=value,param=value|op2:param=value"`. Operators are
//! applied left to right between an implicit source and sink. Values may be
//! numbers or step labels (`mode=directional`); fractions accept percentages
//! (`amount=50%`).

use rasterflow_core::{OperatorKind, ParameterInfo, UnknownOperator};
use thiserror::Error;

/// Errors from parsing a chain specification.
#[derive(Debug, Error, PartialEq)]
pub enum ChainError {
    /// Operator name not recognized.
    #[error(transparent)]
    UnknownOperator(#[from] UnknownOperator),

    /// Source and sink are implicit and cannot appear in a chain.
    #[error("'{0}' cannot appear in a chain (source and sink are implicit)")]
    Endpoint(OperatorKind),

    /// A `key=value` pair was malformed.
    #[error("invalid parameter format: '{0}' (expected key=value)")]
    Syntax(String),

    /// The operator has no parameter with this name.
    #[error("{op} has no parameter '{param}'")]
    UnknownParameter {
        /// Operator id.
        op: OperatorKind,
        /// Requested parameter name.
        param: String,
    },

    /// The value text could not be interpreted.
    #[error("invalid value '{value}' for {op}.{param}")]
    InvalidValue {
        /// Operator id.
        op: OperatorKind,
        /// Parameter name.
        param: String,
        /// Raw value text.
        value: String,
    },
}

/// One operator in a chain with resolved parameter values.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStep {
    /// Operator to instantiate.
    pub kind: OperatorKind,
    /// `(string id, value)` pairs ready for `ImageGraph::add_node_with`.
    pub params: Vec<(&'static str, f32)>,
}

/// Parses a full chain specification.
pub fn parse_chain(spec: &str) -> Result<Vec<ChainStep>, ChainError> {
    let mut steps = Vec::new();

    for step_spec in spec.split('|') {
        let step_spec = step_spec.trim();
        if step_spec.is_empty() {
            continue;
        }
        steps.push(parse_step(step_spec)?);
    }

    Ok(steps)
}

/// Parses `"op:key=value,key=value"`.
fn parse_step(spec: &str) -> Result<ChainStep, ChainError> {
    let (name, params_str) = spec.split_once(':').unwrap_or((spec, ""));
    let kind: OperatorKind = name.trim().parse()?;
    if matches!(kind, OperatorKind::Source | OperatorKind::Sink) {
        return Err(ChainError::Endpoint(kind));
    }

    // A scratch instance answers descriptor lookups.
    let probe = kind.create();
    let mut params = Vec::new();

    for param in params_str.split(',') {
        let param = param.trim();
        if param.is_empty() {
            continue;
        }

        let (key, value) = param
            .split_once('=')
            .ok_or_else(|| ChainError::Syntax(param.to_string()))?;
        let (key, value) = (key.trim(), value.trim());

        let index = probe
            .find_param_by_name(key)
            .ok_or_else(|| ChainError::UnknownParameter {
                op: kind,
                param: key.to_string(),
            })?;
        let desc = probe
            .param_info(index)
            .ok_or_else(|| ChainError::UnknownParameter {
                op: kind,
                param: key.to_string(),
            })?;
        let parsed = desc
            .parse_value(value)
            .filter(|v| v.is_finite())
            .ok_or_else(|| ChainError::InvalidValue {
                op: kind,
                param: key.to_string(),
                value: value.to_string(),
            })?;

        params.push((desc.string_id, parsed));
    }

    Ok(ChainStep { kind, params })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_step_chain() {
        let steps = parse_chain(
            "brightness_contrast:brightness=20,contrast=1.2|blur:radius=3,mode=directional,angle=45",
        )
        .unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].kind, OperatorKind::BrightnessContrast);
        assert_eq!(
            steps[0].params,
            vec![("brightness", 20.0), ("contrast", 1.2)]
        );
        assert_eq!(steps[1].kind, OperatorKind::Blur);
        assert_eq!(
            steps[1].params,
            vec![("radius", 3.0), ("mode", 1.0), ("angle", 45.0)]
        );
    }

    #[test]
    fn bare_names_and_aliases() {
        let steps = parse_chain(" bc | blur ").unwrap();
        assert_eq!(steps[0].kind, OperatorKind::BrightnessContrast);
        assert!(steps[0].params.is_empty());
        assert_eq!(steps[1].kind, OperatorKind::Blur);
    }

    #[test]
    fn percentage_amount() {
        let steps = parse_chain("blur:amount=50%").unwrap();
        assert_eq!(steps[0].params, vec![("amount", 0.5)]);
    }

    #[test]
    fn empty_chain_is_empty() {
        assert!(parse_chain("").unwrap().is_empty());
        assert!(parse_chain(" | ").unwrap().is_empty());
    }

    #[test]
    fn errors() {
        assert!(matches!(
            parse_chain("sharpen"),
            Err(ChainError::UnknownOperator(_))
        ));
        assert_eq!(
            parse_chain("sink"),
            Err(ChainError::Endpoint(OperatorKind::Sink))
        );
        assert_eq!(
            parse_chain("blur:radius"),
            Err(ChainError::Syntax("radius".to_string()))
        );
        assert!(matches!(
            parse_chain("blur:gamma=2"),
            Err(ChainError::UnknownParameter { param, .. }) if param == "gamma"
        ));
        assert!(matches!(
            parse_chain("blur:mode=sideways"),
            Err(ChainError::InvalidValue { value, .. }) if value == "sideways"
        ));
        assert!(matches!(
            parse_chain("bc:contrast=inf"),
            Err(ChainError::InvalidValue { .. })
        ));
    }
}
