//! Argument validation against a command's declared parameters.

use super::{CommandSpec, ParamKind, ParamSpec};
use crate::context::{ArgValue, Args, RawArgs};
use crate::error::ValidationError;

/// Map raw arguments onto `spec.params`. `sigil` is the prefix shown in
/// usage hints (`!` or `/`).
pub fn validate(spec: &CommandSpec, raw: &RawArgs, sigil: &str) -> Result<Args, ValidationError> {
    let supplied = match raw {
        RawArgs::Text(rest) => positional(spec.params, rest),
        RawArgs::Options(options) => spec
            .params
            .iter()
            .map(|p| {
                options
                    .iter()
                    .find(|(name, _)| name == p.name)
                    .map(|(_, value)| value.clone())
            })
            .collect(),
    };

    let mut args = Args::default();
    for (param, value) in spec.params.iter().zip(supplied) {
        if let Some(value) = check(spec, param, value, sigil)? {
            args.insert(param.name, value);
        }
    }
    Ok(args)
}

/// Split text arguments by whitespace; a trailing text parameter swallows the
/// rest of the line so card names keep their spaces.
fn positional(params: &[ParamSpec], rest: &str) -> Vec<Option<ArgValue>> {
    let mut remaining = rest.trim();
    params
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if remaining.is_empty() {
                return None;
            }
            let take_all = i + 1 == params.len() && p.kind == ParamKind::Text;
            let (word, tail) = if take_all {
                (remaining, "")
            } else {
                match remaining.split_once(char::is_whitespace) {
                    Some((word, tail)) => (word, tail.trim_start()),
                    None => (remaining, ""),
                }
            };
            remaining = tail;
            Some(ArgValue::Text(word.to_string()))
        })
        .collect()
}

fn check(
    spec: &CommandSpec,
    param: &ParamSpec,
    value: Option<ArgValue>,
    sigil: &str,
) -> Result<Option<ArgValue>, ValidationError> {
    match param.kind {
        ParamKind::Text => {
            let text = match value {
                Some(ArgValue::Text(s)) => s.trim().to_string(),
                Some(ArgValue::Integer(n)) => n.to_string(),
                Some(ArgValue::Flag(b)) => b.to_string(),
                None => String::new(),
            };
            if !text.is_empty() {
                Ok(Some(ArgValue::Text(text)))
            } else if param.required {
                Err(ValidationError::new(format!(
                    "❌ Please provide a {}. Usage: {}",
                    param.label,
                    spec.usage(sigil)
                )))
            } else {
                Ok(None)
            }
        }
        ParamKind::Integer { min, max } => {
            let out_of_range = || {
                ValidationError::new(format!(
                    "❌ Please provide a valid number between {min} and {max}. Usage: {}",
                    spec.usage(sigil)
                ))
            };
            let number = match value {
                Some(ArgValue::Integer(n)) => Some(n),
                Some(ArgValue::Text(s)) => Some(s.trim().parse::<i64>().map_err(|_| out_of_range())?),
                Some(ArgValue::Flag(_)) => return Err(out_of_range()),
                None => param.default,
            };
            match number {
                Some(n) if (min..=max).contains(&n) => Ok(Some(ArgValue::Integer(n))),
                Some(_) => Err(out_of_range()),
                None if param.required => Err(out_of_range()),
                None => Ok(None),
            }
        }
    }
}
