use crate::contract::Contract;
use crate::error::ContractViolation;
use crate::ui::UiSpec;
use crate::validate::ValidatedSpec;

/// Renders a validated spec.
///
/// Implementations draw every interactive affordance from the spec's action
/// rows, never add their own, and forward a pressed action token unchanged
/// without judging whether it is currently legal.
pub trait PresentationAdapter {
    type Output;

    fn render(&mut self, spec: &ValidatedSpec) -> Self::Output;
}

/// Validate `spec` against `contract` and render it. A violation returns before
/// the adapter sees anything.
pub fn present<A: PresentationAdapter>(
    adapter: &mut A,
    spec: UiSpec,
    contract: &Contract,
) -> Result<A::Output, ContractViolation> {
    let validated = ValidatedSpec::new(spec, contract)?;
    Ok(adapter.render(&validated))
}
