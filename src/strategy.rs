//! The strategy registry (spec.md §9.1): version-gated lookup for evolving
//! syntax, implemented here as the feature-gating half of the pattern —
//! see DESIGN.md's Open Question on why this crate does not also route
//! production parsing through per-strategy `parse()` calls.

use crate::version::LanguageVersion;

/// One version-gated grammar alternative this crate tracks availability
/// for. [`ParseStrategy::can_handle`] is the only behavior a strategy
/// contributes; the production it gates is implemented inline in
/// `parser::grammar`, which asks [`StrategyRegistry::is_enabled`] whether
/// to take that branch at all.
pub(crate) trait ParseStrategy: Send + Sync {
    /// Whether this strategy's construct is available at `version`.
    fn can_handle(&self, version: LanguageVersion) -> bool;

    fn description(&self) -> &'static str;

    /// The grammar-visible switch this strategy gates, so
    /// [`StrategyRegistry::is_enabled`] can be queried by call sites instead
    /// of each one re-deriving its own version predicate.
    fn feature(&self) -> Feature;
}

/// The version-gated syntax alternatives this crate ships strategies for.
/// A call site that needs to know "is this construct available at the
/// configured version" asks [`StrategyRegistry::is_enabled`] with one of
/// these rather than calling a [`LanguageVersion`] predicate directly, so
/// the registry is the thing actually consulted at parse time (spec.md
/// §4.4's "queried by (version, phase, current_token)").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Feature {
    FlexibleConstructorPrologue,
    ModuleImportDeclaration,
    CompactSourceFile,
    PrimitivePattern,
    UnnamedPattern,
    SealedType,
    Record,
    PatternMatchingSwitch,
}

pub(crate) struct StrategyRegistry {
    strategies: Vec<Box<dyn ParseStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    pub fn register(&mut self, strategy: Box<dyn ParseStrategy>) {
        self.strategies.push(strategy);
    }

    /// Whether a strategy gating `feature` accepts `version`. This is the
    /// grammar's actual entry point into the registry: call sites ask for a
    /// named feature rather than re-deriving a version predicate themselves.
    pub fn is_enabled(&self, version: LanguageVersion, feature: Feature) -> bool {
        self.strategies
            .iter()
            .any(|s| s.feature() == feature && s.can_handle(version))
    }

    /// Descriptions of every strategy accepting `version`, for diagnostics
    /// and tests; carries no ordering guarantee beyond registration order.
    pub fn descriptions_for(&self, version: LanguageVersion) -> Vec<&'static str> {
        self.strategies
            .iter()
            .filter(|s| s.can_handle(version))
            .map(|s| s.description())
            .collect()
    }

    /// Builds a registry preloaded with the strategies this parser ships
    /// with. Each covers one version-gated grammar alternative named in
    /// spec.md's REDESIGN FLAGS and SPEC_FULL.md's additions.
    pub fn register_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(FlexibleConstructorPrologueStrategy));
        registry.register(Box::new(ModuleImportDeclarationStrategy));
        registry.register(Box::new(CompactSourceFileStrategy));
        registry.register(Box::new(PrimitivePatternStrategy));
        registry.register(Box::new(UnnamedPatternStrategy));
        registry.register(Box::new(SealedTypeStrategy));
        registry.register(Box::new(RecordStrategy));
        registry.register(Box::new(PatternMatchingSwitchStrategy));
        registry
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::register_defaults()
    }
}

/// JEP 482 (finalized in version 25): statements are permitted in a
/// constructor body before the explicit `this(...)`/`super(...)` call, as
/// long as they don't read `this`.
struct FlexibleConstructorPrologueStrategy;

impl ParseStrategy for FlexibleConstructorPrologueStrategy {
    fn can_handle(&self, version: LanguageVersion) -> bool {
        version.allows_flexible_constructor_prologue()
    }

    fn description(&self) -> &'static str {
        "flexible constructor prologue (statements before this()/super())"
    }

    fn feature(&self) -> Feature {
        Feature::FlexibleConstructorPrologue
    }
}

/// `import module foo.bar;` (version 25+ preview syntax).
struct ModuleImportDeclarationStrategy;

impl ParseStrategy for ModuleImportDeclarationStrategy {
    fn can_handle(&self, version: LanguageVersion) -> bool {
        version.allows_module_import_declarations()
    }

    fn description(&self) -> &'static str {
        "module import declarations (`import module M;`)"
    }

    fn feature(&self) -> Feature {
        Feature::ModuleImportDeclaration
    }
}

/// Compact source files / instance main methods (version 25+ preview): a
/// top-level file containing only members, no enclosing class declaration.
struct CompactSourceFileStrategy;

impl ParseStrategy for CompactSourceFileStrategy {
    fn can_handle(&self, version: LanguageVersion) -> bool {
        version.allows_compact_source_files()
    }

    fn description(&self) -> &'static str {
        "compact source files (implicit classes, unnamed `main`)"
    }

    fn feature(&self) -> Feature {
        Feature::CompactSourceFile
    }
}

/// `case Integer i when i > 0:` style primitive type patterns (version 23+
/// preview).
struct PrimitivePatternStrategy;

impl ParseStrategy for PrimitivePatternStrategy {
    fn can_handle(&self, version: LanguageVersion) -> bool {
        version.allows_primitive_patterns()
    }

    fn description(&self) -> &'static str {
        "primitive type patterns in switch/instanceof"
    }

    fn feature(&self) -> Feature {
        Feature::PrimitivePattern
    }
}

/// `case Point(var x, _):` unnamed pattern variables (version 22+ preview).
struct UnnamedPatternStrategy;

impl ParseStrategy for UnnamedPatternStrategy {
    fn can_handle(&self, version: LanguageVersion) -> bool {
        version.allows_unnamed_patterns()
    }

    fn description(&self) -> &'static str {
        "unnamed pattern variables (`_`) in record deconstruction"
    }

    fn feature(&self) -> Feature {
        Feature::UnnamedPattern
    }
}

/// `sealed`/`non-sealed`/`permits` (version 17+): a class or interface
/// hierarchy closed to an explicit list of permitted subtypes.
struct SealedTypeStrategy;

impl ParseStrategy for SealedTypeStrategy {
    fn can_handle(&self, version: LanguageVersion) -> bool {
        version.allows_sealed_types()
    }

    fn description(&self) -> &'static str {
        "sealed/non-sealed types with a permits clause"
    }

    fn feature(&self) -> Feature {
        Feature::SealedType
    }
}

/// Record declarations and record patterns (version 16+).
struct RecordStrategy;

impl ParseStrategy for RecordStrategy {
    fn can_handle(&self, version: LanguageVersion) -> bool {
        version.allows_records()
    }

    fn description(&self) -> &'static str {
        "record declarations and record deconstruction patterns"
    }

    fn feature(&self) -> Feature {
        Feature::Record
    }
}

/// `switch` labels that deconstruct their selector by type or record shape,
/// rather than matching by constant equality (version 21+).
struct PatternMatchingSwitchStrategy;

impl ParseStrategy for PatternMatchingSwitchStrategy {
    fn can_handle(&self, version: LanguageVersion) -> bool {
        version.allows_pattern_matching_switch()
    }

    fn description(&self) -> &'static str {
        "pattern labels and `when` guards in `switch`"
    }

    fn feature(&self) -> Feature {
        Feature::PatternMatchingSwitch
    }
}

// String templates (JEP 430/459, withdrawn from the mainline JDK after
// preview) are a deliberate Open Question: no default strategy is
// registered for them. See DESIGN.md.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_version_excludes_new_strategies() {
        let registry = StrategyRegistry::default();
        let v17 = LanguageVersion(17);
        let descriptions = registry.descriptions_for(v17);
        assert!(!descriptions.contains(&"flexible constructor prologue (statements before this()/super())"));
    }

    #[test]
    fn compact_source_file_only_available_from_twenty_five() {
        let registry = StrategyRegistry::default();
        assert!(registry.is_enabled(LanguageVersion(25), Feature::CompactSourceFile));
        assert!(!registry.is_enabled(LanguageVersion(24), Feature::CompactSourceFile));
    }

    #[test]
    fn is_enabled_matches_feature_and_version_together() {
        let registry = StrategyRegistry::default();
        assert!(registry.is_enabled(LanguageVersion(17), Feature::SealedType));
        assert!(!registry.is_enabled(LanguageVersion(11), Feature::SealedType));
        assert!(registry.is_enabled(LanguageVersion(16), Feature::Record));
        assert!(!registry.is_enabled(LanguageVersion(15), Feature::Record));
        // A feature being enabled for one version doesn't leak into another.
        assert!(!registry.is_enabled(LanguageVersion(16), Feature::CompactSourceFile));
    }
}
