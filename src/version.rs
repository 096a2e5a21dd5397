//! Language version selection, used by the [`crate::strategy::StrategyRegistry`]
//! to gate evolving syntax.

/// A target-language revision, identified by its numeric release (8, 11, 17,
/// 21, 25, ...). Versions order the way releases do: a higher number is a
/// later, syntactically richer release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LanguageVersion(pub u32);

impl LanguageVersion {
    /// The oldest release this crate has default strategies registered for.
    pub const MIN: LanguageVersion = LanguageVersion(8);
    /// The newest release this crate knows about.
    pub const LATEST: LanguageVersion = LanguageVersion(25);

    pub const fn new(release: u32) -> Self {
        Self(release)
    }

    /// Flexible constructor prologues (statements before `this(...)`/`super(...)`)
    /// were finalized at version 25.
    pub fn allows_flexible_constructor_prologue(self) -> bool {
        self.0 >= 25
    }

    /// Records (and record patterns) were finalized at version 16.
    pub fn allows_records(self) -> bool {
        self.0 >= 16
    }

    /// Sealed classes/interfaces were finalized at version 17.
    pub fn allows_sealed_types(self) -> bool {
        self.0 >= 17
    }

    /// Pattern matching for `switch`, including primitive patterns and
    /// unnamed record-pattern bindings, was finalized at version 21.
    pub fn allows_pattern_matching_switch(self) -> bool {
        self.0 >= 21
    }

    /// Unnamed patterns/variables (`_`) were finalized at version 22.
    pub fn allows_unnamed_patterns(self) -> bool {
        self.0 >= 22
    }

    /// Primitive types in patterns were finalized at version 23.
    pub fn allows_primitive_patterns(self) -> bool {
        self.0 >= 23
    }

    /// Module import declarations (`import module M;`) were finalized at version 25.
    pub fn allows_module_import_declarations(self) -> bool {
        self.0 >= 25
    }

    /// Compact source files (implicitly-declared classes) were finalized at version 25.
    pub fn allows_compact_source_files(self) -> bool {
        self.0 >= 25
    }

    /// Text blocks were finalized at version 15.
    pub fn allows_text_blocks(self) -> bool {
        self.0 >= 15
    }
}

impl Default for LanguageVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

impl std::fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
