//! Argument normalization against a callee signature.

use smol_str::SmolStr;

use super::args::{ArgValue, ArgumentVector};
use crate::error::InvocationError;
use crate::unit::{ParamType, Signature};

/// Bind `args` to `signature`, producing exactly one value per parameter.
///
/// Fixed parameters bind positionally and must match in type. A trailing
/// variable-length group accepts either one [`ArgValue::StrArray`] or any
/// number of loose [`ArgValue::Str`] values, which are packed in order. An
/// explicitly empty group is legal; an absent one is a binding failure.
pub fn normalize(args: &ArgumentVector, signature: &Signature) -> Result<Vec<ArgValue>, InvocationError> {
    let fixed = signature.fixed_params();
    let values = args.values();
    if values.len() < fixed.len() {
        return Err(InvocationError::binding(format!(
            "expected at least {} arguments for {signature}, got {}",
            fixed.len(),
            values.len()
        )));
    }

    let mut bound = Vec::with_capacity(signature.arity());
    for (slot, (value, expected)) in values.iter().zip(fixed).enumerate() {
        check_slot(slot, value, *expected)?;
        bound.push(value.clone());
    }

    let rest = &values[fixed.len()..];
    if !signature.is_variadic() {
        if !rest.is_empty() {
            return Err(InvocationError::binding(format!(
                "{} extra arguments for {signature}",
                rest.len()
            )));
        }
        return Ok(bound);
    }

    bound.push(ArgValue::StrArray(pack_group(fixed.len(), rest)?));
    Ok(bound)
}

fn check_slot(slot: usize, value: &ArgValue, expected: ParamType) -> Result<(), InvocationError> {
    if value.param_type() == expected {
        Ok(())
    } else {
        Err(InvocationError::binding(format!(
            "slot {slot}: expected {}, got {}",
            expected.source_name(),
            value.param_type().source_name()
        )))
    }
}

fn pack_group(first_slot: usize, rest: &[ArgValue]) -> Result<Vec<SmolStr>, InvocationError> {
    match rest {
        [] => Err(InvocationError::binding(format!(
            "slot {first_slot}: missing variable-length group"
        ))),
        [ArgValue::StrArray(items)] => Ok(items.clone()),
        loose => loose
            .iter()
            .enumerate()
            .map(|(i, value)| match value {
                ArgValue::Str(s) => Ok(s.clone()),
                other => Err(InvocationError::binding(format!(
                    "slot {}: expected String, got {}",
                    first_slot + i,
                    other.param_type().source_name()
                ))),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvocationPhase;

    fn strs(items: &[&str]) -> Vec<SmolStr> {
        items.iter().map(|s| SmolStr::new(s)).collect()
    }

    fn signature() -> Signature {
        Signature::new(vec![ParamType::Int, ParamType::StrVarargs])
    }

    #[test]
    fn test_canonical_vector_binds_unchanged() {
        let args = ArgumentVector::canonical();
        let bound = normalize(&args, &Signature::canonical()).unwrap();

        assert_eq!(bound.len(), 10);
        for (a, b) in args.values().iter().zip(&bound) {
            assert!(a.same_value(b));
        }
    }

    #[test]
    fn test_loose_strings_are_packed() {
        let args = ArgumentVector::new(vec![
            ArgValue::Int(1),
            ArgValue::Str("some".into()),
            ArgValue::Str("strings".into()),
        ]);
        let bound = normalize(&args, &signature()).unwrap();

        assert!(bound[1].same_value(&ArgValue::StrArray(strs(&["some", "strings"]))));
    }

    #[test]
    fn test_empty_group_is_distinct_from_absent() {
        let empty = ArgumentVector::new(vec![ArgValue::Int(1), ArgValue::StrArray(Vec::new())]);
        let bound = normalize(&empty, &signature()).unwrap();
        assert!(bound[1].same_value(&ArgValue::StrArray(Vec::new())));

        let absent = ArgumentVector::new(vec![ArgValue::Int(1)]);
        let err = normalize(&absent, &signature()).unwrap_err();
        assert_eq!(err.phase, InvocationPhase::BindingFailed);
    }

    #[test]
    fn test_type_mismatch_names_the_slot() {
        let args = ArgumentVector::new(vec![ArgValue::Long(1), ArgValue::StrArray(Vec::new())]);
        let err = normalize(&args, &signature()).unwrap_err();

        assert_eq!(err.phase, InvocationPhase::BindingFailed);
        assert!(err.cause.contains("slot 0"));
    }

    #[test]
    fn test_extra_arguments_without_group() {
        let sig = Signature::new(vec![ParamType::Int]);
        let args = ArgumentVector::new(vec![ArgValue::Int(1), ArgValue::Int(2)]);
        assert!(normalize(&args, &sig).is_err());
    }
}
