//! Counter descriptors and how they are built from event specifications.

use crate::error::{Error, Result};
use crate::event::spec::{self, SpecError};
use crate::event::{EventType, Hardware, DEFAULT_EVENTS};

/// Describes one event to count.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attr {
    pub ty: EventType,
    pub event: Hardware,
    /// Counter is created stopped and must be started explicitly.
    pub disabled: bool,
    /// Child tasks created after registration are counted too.
    pub inherit: bool,
}

impl Attr {
    pub fn new(event: Hardware) -> Self {
        Self {
            ty: EventType::Hardware,
            event,
            disabled: true,
            inherit: true,
        }
    }

    pub fn code(&self) -> u32 {
        self.event.code()
    }
}

fn alloc(nr: usize) -> Result<Vec<Attr>> {
    let mut attrs = Vec::new();
    attrs
        .try_reserve_exact(nr)
        .map_err(|_| Error::ResourceExhaustion)?;
    Ok(attrs)
}

fn invalid(spec: &str, source: SpecError) -> Error {
    Error::InvalidSpec {
        spec: spec.to_string(),
        source,
    }
}

/// Builds `nr` descriptors from a specification already validated by
/// [`spec::check`].
pub fn from_spec(spec: &str, nr: usize) -> Result<Vec<Attr>> {
    if nr == 0 {
        return Err(invalid(spec, SpecError::NoEvents));
    }

    let mut attrs = alloc(nr)?;
    for token in spec::tokens(spec) {
        let token = token.map_err(|e| invalid(spec, e))?;
        attrs.push(Attr::new(token.event));
    }
    debug_assert_eq!(attrs.len(), nr);

    Ok(attrs)
}

/// Builds the default descriptor set.
pub fn from_default() -> Result<Vec<Attr>> {
    let mut attrs = alloc(DEFAULT_EVENTS.len())?;
    attrs.extend(DEFAULT_EVENTS.into_iter().map(Attr::new));
    Ok(attrs)
}

/// Validates `spec` if given, then builds its descriptors, or the default
/// set when there is none.
pub fn build(spec: Option<&str>) -> Result<Vec<Attr>> {
    match spec {
        Some(spec) => {
            let nr = spec::check(spec).map_err(|e| invalid(spec, e))?;
            from_spec(spec, nr)
        }
        None => from_default(),
    }
}
