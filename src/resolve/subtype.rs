//! Assignability between loaded types.

use crate::error::LoadError;
use crate::loader::LoadedType;

/// Whether an instance of `runtime` can be viewed as `reference`.
///
/// Compares unit identity, never names: a type named like one of the
/// runtime type's supertypes but defined by another context is not
/// assignable. Supertypes are loaded through their defining contexts.
pub fn is_assignable(
    runtime: LoadedType<'_>,
    reference: LoadedType<'_>,
    max_hops: usize,
) -> Result<bool, LoadError> {
    let mut current = Some(runtime);
    let mut hops = 0;
    while let Some(ty) = current {
        if ty.same_unit(&reference) {
            return Ok(true);
        }
        if ty
            .capability_types()?
            .iter()
            .any(|capability| capability.same_unit(&reference))
        {
            return Ok(true);
        }
        hops += 1;
        if hops > max_hops {
            return Err(LoadError::DelegationCycle {
                name: runtime.qualified_name().clone(),
                limit: max_hops,
            });
        }
        current = ty.parent_type()?;
    }
    Ok(false)
}
