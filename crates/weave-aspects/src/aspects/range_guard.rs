//! Range guard - reject numeric property writes outside `[min, max]`

use tracing::debug;
use weave_chain::{AspectResult, PropertyAspect};
use weave_core::{AccessKind, AspectError, Metadata, Phase, PropertyAccess, Value};

/// Before-write guard. Params: `min` and/or `max` (numbers, inclusive).
///
/// An out-of-range write is halted and resolves to the property's current
/// value, so the target is left untouched. A non-numeric proposal is an
/// error.
#[derive(Debug, Default)]
pub struct RangeGuardAspect;

impl RangeGuardAspect {
    pub fn new() -> Self {
        Self
    }

    fn bound(&self, metadata: &Metadata, key: &str) -> Result<Option<f64>, AspectError> {
        match metadata.param(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v.as_f64().map(Some).ok_or_else(|| {
                AspectError::invalid_argument("range_guard", format!("'{}' must be a number", key))
            }),
        }
    }
}

impl PropertyAspect for RangeGuardAspect {
    fn name(&self) -> &str {
        "range_guard"
    }

    fn supports(&self, kind: AccessKind, phase: Phase) -> bool {
        kind == AccessKind::Write && phase == Phase::Before
    }

    fn before(&self, metadata: &Metadata, access: &PropertyAccess<'_>) -> AspectResult {
        let proposed = access.proposed_value().and_then(|v| v.as_f64()).ok_or_else(|| {
            AspectError::invalid_argument(
                "range_guard",
                format!("'{}' requires a numeric value", access.property_name()),
            )
        })?;

        let min = self.bound(metadata, "min")?;
        let max = self.bound(metadata, "max")?;
        let below = min.is_some_and(|m| proposed < m);
        let above = max.is_some_and(|m| proposed > m);

        if below || above {
            debug!(
                property = access.property_name(),
                proposed,
                ?min,
                ?max,
                "rejected out-of-range write"
            );
            access.request_halt();
            return Ok(Some(access.current_value().clone()));
        }
        Ok(None)
    }
}
