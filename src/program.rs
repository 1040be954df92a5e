//! Shader program linking with pinned vertex attribute locations.

use crate::context::GraphicsContext;
use crate::error::{Error, Result};

/// Attribute locations reserved for the host vertex format's extra inputs.
///
/// Shader packs reference these by name; the host places the data at these
/// locations regardless of its own vertex layout.
pub const RESERVED_ATTRIBUTES: [(&str, u32); 3] = [
    ("mc_Entity", 10),
    ("mc_midTexCoord", 11),
    ("at_tangent", 12),
];

/// Ordered mapping from vertex input name to attribute location, applied to
/// every program before it is linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeBindings {
    entries: Vec<(String, u32)>,
}

impl Default for AttributeBindings {
    /// The [`RESERVED_ATTRIBUTES`] table.
    fn default() -> Self {
        RESERVED_ATTRIBUTES
            .iter()
            .fold(Self::empty(), |bindings, &(name, location)| {
                bindings.with_binding(name, location)
            })
    }
}

impl AttributeBindings {
    /// No bindings at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a binding, replacing the location of an existing entry with the
    /// same name in place.
    #[must_use]
    pub fn with_binding(mut self, name: impl Into<String>, location: u32) -> Self {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = location,
            None => self.entries.push((name, location)),
        }
        self
    }

    /// Location bound to `name`, if any.
    #[must_use]
    pub fn location(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|&(_, location)| location)
    }

    /// Bindings in application order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries
            .iter()
            .map(|(name, location)| (name.as_str(), *location))
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A linked, usable shader program.
///
/// Only produced by [`ProgramLinker::create`]. The program is not freed on
/// drop; whoever unloads the shader pack calls [`destroy`](Self::destroy).
#[derive(Debug)]
pub struct ShaderProgram<P> {
    handle: P,
    name: String,
    link_log: Option<String>,
}

impl<P: Copy> ShaderProgram<P> {
    /// Raw program handle, for uniform and binding calls.
    #[must_use]
    pub fn handle(&self) -> P {
        self.handle
    }

    /// Diagnostic name given at link time.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Non-empty linker output from a successful link, e.g. compiler notes.
    #[must_use]
    pub fn link_log(&self) -> Option<&str> {
        self.link_log.as_deref()
    }

    /// Make this the current program.
    pub fn bind<C>(&self, ctx: &C)
    where
        C: GraphicsContext<Program = P>,
    {
        ctx.use_program(Some(self.handle));
    }

    /// Clear the current program.
    pub fn unbind<C>(ctx: &C)
    where
        C: GraphicsContext<Program = P>,
    {
        ctx.use_program(None);
    }

    /// Free the program object.
    pub fn destroy<C>(self, ctx: &C)
    where
        C: GraphicsContext<Program = P>,
    {
        ctx.delete_program(self.handle);
    }
}

/// Links shader programs from compiled stages.
#[derive(Debug, Clone, Default)]
pub struct ProgramLinker {
    bindings: AttributeBindings,
}

impl ProgramLinker {
    /// A linker that pins `bindings` on every program it creates.
    #[must_use]
    pub fn new(bindings: AttributeBindings) -> Self {
        Self { bindings }
    }

    /// The attribute table applied before linking.
    #[must_use]
    pub fn bindings(&self) -> &AttributeBindings {
        &self.bindings
    }

    /// Link `stages` into a new program named `name`.
    ///
    /// Attribute locations are bound before the stages are attached, since
    /// they are only read at link time. Any non-empty link log is logged as
    /// a warning and kept verbatim on the returned program.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`] if no program object can be created, or
    /// [`Error::Link`] with the linker log if linking fails. In the latter
    /// case the program object has already been deleted.
    pub fn create<C: GraphicsContext>(
        &self,
        ctx: &C,
        name: &str,
        stages: &[C::Shader],
    ) -> Result<ShaderProgram<C::Program>> {
        let program = ctx.create_program()?;

        for (attribute, location) in self.bindings.iter() {
            ctx.bind_attrib_location(program, location, attribute);
        }

        for &stage in stages {
            ctx.attach_shader(program, stage);
        }

        ctx.link_program(program);

        let log = ctx.program_info_log(program);
        if !log.is_empty() {
            log::warn!("Program link log for {name}: {}", log.trim_end());
        }

        if !ctx.program_link_status(program) {
            ctx.delete_program(program);
            return Err(Error::Link {
                name: name.to_owned(),
                log,
            });
        }

        log::debug!("Linked shader program {name} ({program:?})");

        Ok(ShaderProgram {
            handle: program,
            name: name.to_owned(),
            link_log: (!log.is_empty()).then_some(log),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_are_reserved_slots() {
        let bindings = AttributeBindings::default();
        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings.location("mc_Entity"), Some(10));
        assert_eq!(bindings.location("mc_midTexCoord"), Some(11));
        assert_eq!(bindings.location("at_tangent"), Some(12));
        assert_eq!(
            bindings.iter().collect::<Vec<_>>(),
            vec![("mc_Entity", 10), ("mc_midTexCoord", 11), ("at_tangent", 12)]
        );
    }

    #[test]
    fn with_binding_appends_new_names() {
        let bindings = AttributeBindings::default().with_binding("a_custom", 13);
        assert_eq!(bindings.len(), 4);
        assert_eq!(bindings.iter().last(), Some(("a_custom", 13)));
    }

    #[test]
    fn with_binding_replaces_in_place() {
        let bindings = AttributeBindings::default().with_binding("mc_Entity", 14);
        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings.iter().next(), Some(("mc_Entity", 14)));
    }

    #[test]
    fn empty_has_no_bindings() {
        let bindings = AttributeBindings::empty();
        assert!(bindings.is_empty());
        assert_eq!(bindings.location("mc_Entity"), None);
    }

    #[test]
    fn linker_defaults_to_reserved_slots() {
        assert_eq!(ProgramLinker::default().bindings(), &AttributeBindings::default());
    }
}
