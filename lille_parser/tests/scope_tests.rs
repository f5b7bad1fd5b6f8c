//! Scope manager behavior, directly and through analysis

use pretty_assertions::assert_eq;

use lille_parser::{analyze, AnalyzerConfig, Binding, Kind, ScopeManager, Type, BUILTINS};

// =============================================================================
// Direct API
// =============================================================================

#[test]
fn test_shadowing_and_exit() {
    let mut scopes = ScopeManager::new();
    scopes.declare(Binding::new("X", Type::Integer, Kind::Variable, 0));

    scopes.enter_scope();
    scopes.declare(Binding::new("X", Type::Real, Kind::Variable, 1));
    assert_eq!(scopes.lookup("X").map(Binding::ty), Some(Type::Real));

    scopes.exit_scope();
    assert_eq!(scopes.lookup("X").map(Binding::ty), Some(Type::Integer));
}

#[test]
fn test_declare_reports_freshness() {
    let mut scopes = ScopeManager::new();
    let (_, fresh) = scopes.declare(Binding::new("N", Type::Integer, Kind::Variable, 0));
    assert!(fresh);
    let (_, fresh) = scopes.declare(Binding::new("N", Type::Integer, Kind::Variable, 0));
    assert!(!fresh);
}

#[test]
fn test_builtin_signatures() {
    let mut scopes = ScopeManager::new();
    scopes.predefine_builtins();
    for (name, argument, returns) in BUILTINS {
        let builtin = scopes.lookup(name).unwrap();
        assert_eq!(builtin.ty(), Type::Function);
        assert_eq!(builtin.return_type(), Ok(returns));
        let params = builtin.parameters().unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(scopes.get(params[0]).ty(), argument);
    }
}

// =============================================================================
// Through analysis
// =============================================================================

#[test]
fn test_levels_recorded_by_analysis() {
    let analysis = analyze(
        "program P is \
           g : integer; \
           procedure Q(a : value integer) is l : real; \
           begin for i in 1..a loop null; end loop; end Q; \
         begin null; end P;",
    );
    assert!(analysis.is_ok());

    let level = |name: &str| analysis.bindings_named(name).next().map(Binding::level);
    assert_eq!(level("P"), Some(0));
    assert_eq!(level("G"), Some(1));
    assert_eq!(level("Q"), Some(1));
    assert_eq!(level("A"), Some(2));
    assert_eq!(level("L"), Some(2));
    assert_eq!(level("I"), Some(3));

    let index = analysis.bindings_named("I").next().unwrap();
    assert_eq!(index.kind(), Kind::ForLoopIndex);
    assert_eq!(index.ty(), Type::Integer);
}

#[test]
fn test_inner_block_shadows_outer() {
    let analysis = analyze(
        "program P is \
           x : integer; \
           procedure Q is x : string; begin x := \"inner\"; end Q; \
         begin x := 1; end P;",
    );
    assert!(analysis.is_ok());
    let types: Vec<Type> = analysis.bindings_named("X").map(Binding::ty).collect();
    assert_eq!(types, vec![Type::Integer, Type::String]);
}

#[test]
fn test_sibling_blocks_are_isolated() {
    let analysis = analyze(
        "program P is \
           procedure A is t : integer; begin t := 1; end A; \
           procedure B is begin t := 2; end B; \
         begin null; end P;",
    );
    assert_eq!(analysis.diagnostics.codes(), vec![81]);
}

#[test]
fn test_mutual_visibility_of_earlier_callables() {
    let analysis = analyze(
        "program P is \
           procedure A is begin null; end A; \
           procedure B is begin A; end B; \
         begin B; end P;",
    );
    assert!(analysis.is_ok());
}

#[test]
fn test_dump_after_analysis() {
    let config = AnalyzerConfig::default().with_dump_scopes(true);
    let analysis = lille_parser::analyze_with_config("program P is begin null; end P;", config);
    let dump = analysis.scopes.dump();
    assert!(dump.starts_with("SCOPE 0:\n"));
    assert!(dump.contains("P : unknown program (level 0)"));
    assert!(dump.contains("INT2REAL : unknown function (level 0), 1 parameter(s), returns real"));
}
