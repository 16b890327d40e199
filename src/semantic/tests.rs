//! Unit tests for types, scopes and the semantic analyzer.

use std::rc::Rc;

use super::{
    analyzer::{AnalyzerOptions, SemanticAnalyzer},
    scope::{Ownership, ScopeKind, ScopeTree, Symbol, SymbolKind},
    types::{TypeContext, TypeKind},
};
use crate::{
    errors::diagnostics::{Diagnostic, Diagnostics, Severity},
    parser::parser::parse_source,
    Position, Span,
};

fn analyze_with(source: &str, options: AnalyzerOptions) -> (bool, Diagnostics, ScopeTree) {
    let (parser, program) = parse_source(source);
    assert!(
        !parser.had_error(),
        "unexpected syntax errors: {:?}",
        parser.diagnostics()
    );

    let mut diagnostics = Diagnostics::new();
    let mut analyzer = SemanticAnalyzer::new(options);
    let success = analyzer.analyze(&program, &mut diagnostics);

    (success, diagnostics, analyzer.into_scopes())
}

fn analyze(source: &str) -> (bool, Diagnostics) {
    let (success, diagnostics, _) = analyze_with(source, AnalyzerOptions::default());
    (success, diagnostics)
}

fn error_messages(diagnostics: &Diagnostics) -> Vec<String> {
    diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .map(|d| d.message.clone())
        .collect()
}

fn span() -> Span {
    Span::at(Position::new(1, 1))
}

// Types

#[test]
fn test_builtins_are_interned() {
    let mut types = TypeContext::new();

    let int = types.builtin("int").unwrap();
    assert!(Rc::ptr_eq(&int, &types.named("int")));
    assert!(Rc::ptr_eq(&int, &types.resolve("int")));
    assert!(types.builtin("Result").is_none());

    let result = types.named("Result");
    assert!(Rc::ptr_eq(&result, &types.builtin("Result").unwrap()));
}

#[test]
fn test_pointer_types_are_memoized() {
    let mut types = TypeContext::new();
    let int = types.named("int");
    let string = types.named("string");

    let first = types.pointer(&int, "*");
    let second = types.pointer(&int, "*");
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(first.name(), "int*");

    assert!(!Rc::ptr_eq(&first, &types.pointer(&string, "*")));
    assert!(!Rc::ptr_eq(&first, &types.pointer(&int, "^")));
}

#[test]
fn test_function_types_are_memoized() {
    let mut types = TypeContext::new();
    let int = types.named("int");
    let float = types.named("float");

    let first = types.function(&int, &[int.clone(), int.clone()]);
    let second = types.function(&int, &[int.clone(), int.clone()]);
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(first.name(), "function");
    assert_eq!(first.to_string(), "function(int, int) -> int");

    assert!(!Rc::ptr_eq(&first, &types.function(&int, &[int.clone(), float])));
    assert!(!Rc::ptr_eq(&first, &types.function(&int, &[int.clone()])));
}

#[test]
fn test_resolve_decorated_names() {
    let mut types = TypeContext::new();

    let ty = types.resolve("string*?");
    assert_eq!(ty.name(), "string*?");
    let TypeKind::Optional { inner } = ty.kind() else {
        panic!("expected an optional type");
    };
    assert!(matches!(inner.kind(), TypeKind::Pointer { decoration, .. } if decoration == "*"));
    assert!(Rc::ptr_eq(&ty, &types.resolve("string*?")));

    let reference = types.resolve("int&");
    assert!(matches!(reference.kind(), TypeKind::Reference { .. }));

    assert!(types.resolve("owned").is_any());
    assert_eq!(types.resolve("borrowed&").name(), "any&");
}

#[test]
fn test_infer_literal() {
    let mut types = TypeContext::new();

    assert_eq!(types.infer_literal("true").name(), "bool");
    assert_eq!(types.infer_literal("false").name(), "bool");
    assert_eq!(types.infer_literal("3.14").name(), "float");
    assert_eq!(types.infer_literal("42").name(), "int");
    assert_eq!(types.infer_literal("\"42\"").name(), "string");
    assert_eq!(types.infer_literal("'c'").name(), "string");
    assert_eq!(types.infer_literal("null").name(), "null");
    assert_eq!(types.infer_literal("99999999999999999999999").name(), "string");
}

// Scopes

#[test]
fn test_scope_declare_and_lookup() {
    let mut types = TypeContext::new();
    let mut scopes = ScopeTree::new();
    let root = scopes.root();
    let int = types.named("int");

    assert!(scopes.declare(root, Symbol::variable("x", int.clone(), span())));
    assert!(!scopes.declare(root, Symbol::variable("x", types.named("string"), span())));
    assert_eq!(scopes.lookup(root, "x").unwrap().ty.name(), "int");

    let child = scopes.create_child(root, ScopeKind::Block);
    assert_eq!(scopes.parent(child), Some(root));
    assert_eq!(scopes.children(root), &[child]);

    assert!(scopes.lookup(child, "x").is_some());
    assert!(scopes.lookup_local(child, "x").is_none());

    assert!(scopes.declare(child, Symbol::variable("x", types.named("bool"), span())));
    assert_eq!(scopes.lookup(child, "x").unwrap().ty.name(), "bool");
    assert_eq!(scopes.lookup(root, "x").unwrap().ty.name(), "int");
    assert!(scopes.lookup(child, "missing").is_none());
}

#[test]
fn test_scope_lookup_mut_updates_declaring_scope() {
    let mut types = TypeContext::new();
    let mut scopes = ScopeTree::new();
    let root = scopes.root();
    let inner = scopes.create_child(root, ScopeKind::Loop);

    scopes.declare(root, Symbol::variable("count", types.named("int"), span()));
    scopes.lookup_mut(inner, "count").unwrap().is_initialized = true;

    assert!(scopes.lookup_local(root, "count").unwrap().is_initialized);
}

#[test]
fn test_scope_symbols_keep_declaration_order() {
    let mut types = TypeContext::new();
    let mut scopes = ScopeTree::new();
    let root = scopes.root();

    for name in ["zeta", "alpha", "mid"] {
        scopes.declare(root, Symbol::variable(name, types.named("int"), span()));
    }

    let names: Vec<&str> = scopes.scope(root).symbols().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_ownership_from_type_name() {
    assert_eq!(Ownership::from_type_name("owned"), Ownership::Owned);
    assert_eq!(Ownership::from_type_name("owned&"), Ownership::Owned);
    assert_eq!(Ownership::from_type_name("borrowed"), Ownership::Borrowed);
    assert_eq!(Ownership::from_type_name("ref"), Ownership::Reference);
    assert_eq!(Ownership::from_type_name("int"), Ownership::Unknown);
}

// Analyzer

#[test]
fn test_end_to_end_add() {
    let (success, diagnostics, scopes) = analyze_with(
        "int add(int a, int b) { return a + b; }",
        AnalyzerOptions::default(),
    );

    assert!(success);
    assert!(diagnostics.is_empty());

    let root = scopes.root();
    let add = scopes.lookup_local(root, "add").unwrap();
    assert_eq!(add.kind, SymbolKind::Function);
    assert_eq!(add.ty.name(), "int");

    let function_scope = scopes.children(root)[0];
    assert_eq!(scopes.scope(function_scope).kind, ScopeKind::Function(String::from("add")));

    let parameters: Vec<String> = scopes
        .scope(function_scope)
        .symbols()
        .map(|s| format!("{}:{}", s.name, s.ty.name()))
        .collect();
    assert_eq!(parameters, vec!["a:int", "b:int"]);
}

#[test]
fn test_shadowing_in_nested_block() {
    let (success, diagnostics) = analyze("{ int x = 1; { int x = 2; } }");
    assert!(success);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_redeclaration_in_same_block() {
    let (success, diagnostics) = analyze("{ int x = 1; int x = 2; }");
    assert!(!success);
    assert_eq!(error_messages(&diagnostics), vec!["Variable redeclared: x"]);
}

#[test]
fn test_redeclaration_keeps_first_binding() {
    let (success, diagnostics) = analyze("int x = 1; string x = \"a\"; int y = x;");
    assert!(!success);
    assert_eq!(error_messages(&diagnostics), vec!["Variable redeclared: x"]);
}

#[test]
fn test_declaration_type_mismatch() {
    let (success, diagnostics) = analyze("int x = \"hello\";");
    assert!(!success);
    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(
        error_messages(&diagnostics),
        vec!["Type mismatch in declaration of 'x': expected int, found string"]
    );

    let (success, diagnostics) = analyze("int x = 5;");
    assert!(success);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_any_and_null_are_compatible() {
    let (success, diagnostics) = analyze(
        "any a = 5;
         int b = null;
         string s = a;
         b = a;",
    );
    assert!(success, "{:?}", diagnostics);
}

#[test]
fn test_inferred_declarations() {
    let (success, diagnostics) = analyze(
        "let a = 1;
         auto b = 2.5;
         let c = null;
         int d = a;
         float e = b;
         c = \"anything\";",
    );
    assert!(success, "{:?}", diagnostics);
}

#[test]
fn test_arithmetic_widening() {
    let (success, _) = analyze("float f = 1 + 2.5;");
    assert!(success);

    let (success, diagnostics) = analyze("int i = 1 * 2.5;");
    assert!(!success);
    assert_eq!(
        error_messages(&diagnostics),
        vec!["Type mismatch in declaration of 'i': expected int, found float"]
    );
}

#[test]
fn test_binary_type_mismatch() {
    let (success, diagnostics) = analyze("int x = 1 + \"a\";");
    assert!(!success);
    assert_eq!(
        error_messages(&diagnostics),
        vec!["Type mismatch in binary operation '+': int and string"]
    );
}

#[test]
fn test_comparisons_produce_bool() {
    let (success, diagnostics) = analyze(
        "int x = 1;
         bool a = x < 2;
         bool b = x == 1 && !a;
         bool c = 1.5 >= x;",
    );
    assert!(success, "{:?}", diagnostics);
}

#[test]
fn test_logical_operands_must_be_bool() {
    let (success, diagnostics) = analyze("bool b = 1 && 2;");
    assert!(!success);
    assert_eq!(
        error_messages(&diagnostics),
        vec!["Type mismatch in binary operation '&&': int and int"]
    );

    let (success, diagnostics) = analyze("if (1 || 0) {}");
    assert!(!success);
    assert_eq!(
        error_messages(&diagnostics),
        vec!["Type mismatch in binary operation '||': int and int"]
    );

    let (success, diagnostics) = analyze("any v = 1; bool ok = v && true || false;");
    assert!(success, "{:?}", diagnostics);
}

#[test]
fn test_modulo_does_not_widen() {
    let (success, diagnostics) = analyze("int m = 7 % 2;");
    assert!(success, "{:?}", diagnostics);

    let (success, diagnostics) = analyze("float f = 7 % 2.0;");
    assert!(!success);
    assert_eq!(
        error_messages(&diagnostics),
        vec!["Type mismatch in binary operation '%': int and float"]
    );
}

#[test]
fn test_assignment_to_undefined_identifier() {
    let (success, diagnostics) = analyze("y = 5;");
    assert!(!success);
    assert_eq!(
        error_messages(&diagnostics),
        vec!["Assignment to undefined identifier: y"]
    );
}

#[test]
fn test_assignment_type_mismatch() {
    let (success, diagnostics) = analyze("int x = 1; x = \"two\";");
    assert!(!success);
    assert_eq!(
        error_messages(&diagnostics),
        vec!["Type mismatch in assignment to 'x': expected int, found string"]
    );
}

#[test]
fn test_use_of_undefined_identifier() {
    let (success, diagnostics) = analyze("int x = y + 1;");
    assert!(!success);
    assert_eq!(error_messages(&diagnostics), vec!["Use of undefined identifier: y"]);
}

#[test]
fn test_call_validation() {
    let (success, diagnostics) = analyze("foo(1, 2);");
    assert!(!success);
    assert_eq!(error_messages(&diagnostics), vec!["Call to undefined function: foo"]);

    let (success, diagnostics) = analyze("void foo(int a, int b) {} foo(1, 2);");
    assert!(success, "{:?}", diagnostics);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_calling_a_variable() {
    let (success, diagnostics) = analyze("int v = 1; v();");
    assert!(!success);
    assert_eq!(error_messages(&diagnostics), vec!["Call to undefined function: v"]);
}

#[test]
fn test_call_type_is_return_type() {
    let (success, diagnostics) = analyze("int g() { return 1; } string s = g();");
    assert!(!success);
    assert_eq!(
        error_messages(&diagnostics),
        vec!["Type mismatch in declaration of 's': expected string, found int"]
    );
}

#[test]
fn test_chained_call_is_not_callable() {
    let (success, diagnostics) = analyze("int g() { return 1; } g()(2);");
    assert!(!success);
    assert_eq!(
        error_messages(&diagnostics),
        vec!["Call target is not a named function"]
    );
}

#[test]
fn test_argument_count_warning() {
    let (success, diagnostics) = analyze("int g(int a) { return a; } g(1, 2);");
    assert!(success);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.items()[0].severity, Severity::Warning);
    assert_eq!(
        diagnostics.items()[0].message,
        "Function 'g' expects 1 argument(s), found 2"
    );
}

#[test]
fn test_recursive_function() {
    let (success, diagnostics) = analyze(
        "int fact(int n) {
             if (n < 2) { return 1; }
             return n * fact(n - 1);
         }",
    );
    assert!(success, "{:?}", diagnostics);
}

#[test]
fn test_conditions_must_be_bool() {
    let (success, diagnostics) = analyze("if (1) {}");
    assert!(!success);
    assert_eq!(
        error_messages(&diagnostics),
        vec!["Condition of 'if' must be bool, found int"]
    );

    let (success, diagnostics) = analyze("string s = \"a\"; while (s) {}");
    assert!(!success);
    assert_eq!(
        error_messages(&diagnostics),
        vec!["Condition of 'while' must be bool, found string"]
    );

    let (success, diagnostics) = analyze("for (int i = 0; i; i = i + 1) {}");
    assert!(!success);
    assert_eq!(
        error_messages(&diagnostics),
        vec!["Condition of 'for' must be bool, found int"]
    );

    let (success, diagnostics) = analyze(
        "any flag = 1;
         int x = 0;
         if (flag) {}
         while (x < 3) { x = x + 1; }
         for (;;) {}",
    );
    assert!(success, "{:?}", diagnostics);
}

#[test]
fn test_missing_return() {
    let (success, diagnostics) = analyze("int f() { int x = 1; }");
    assert!(!success);
    assert_eq!(
        error_messages(&diagnostics),
        vec!["Function 'f' may be missing a return statement"]
    );

    let (success, _) = analyze("int f() {}");
    assert!(!success);

    let (success, _) = analyze("int f() { return 1; }");
    assert!(success);

    let (success, _) = analyze("void f() {}");
    assert!(success);

    let (success, _) = analyze("int f() return 1;");
    assert!(success);
}

#[test]
fn test_missing_return_is_shallow() {
    // A return anywhere in the body satisfies the check.
    let (success, diagnostics) = analyze("int f() { if (true) { return 1; } int y = 2; }");
    assert!(success, "{:?}", diagnostics);
}

#[test]
fn test_for_loop_scope() {
    let (success, diagnostics, scopes) = analyze_with(
        "for (int i = 0; i < 3; i = i + 1) {} int i = 5;",
        AnalyzerOptions::default(),
    );
    assert!(success, "{:?}", diagnostics);

    let root = scopes.root();
    let loop_scope = scopes.children(root)[0];
    assert_eq!(scopes.scope(loop_scope).kind, ScopeKind::Loop);
    assert!(scopes.lookup_local(loop_scope, "i").is_some());
    assert!(scopes.lookup_local(root, "i").is_some());
}

#[test]
fn test_use_of_moved_value() {
    let (success, diagnostics) = analyze(
        "owned a = 1;
         owned b = a;
         int c = a;",
    );
    assert!(!success);
    assert_eq!(error_messages(&diagnostics), vec!["Use of moved value: a"]);
}

#[test]
fn test_move_into_call_and_reassign() {
    let (success, diagnostics) = analyze(
        "void take(owned x) {}
         owned a = 1;
         take(a);
         a = 2;
         int c = a;",
    );
    assert!(success, "{:?}", diagnostics);

    let (success, diagnostics) = analyze(
        "void take(owned x) {}
         owned a = 1;
         take(a);
         take(a);",
    );
    assert!(!success);
    assert_eq!(error_messages(&diagnostics), vec!["Use of moved value: a"]);
}

#[test]
fn test_borrowed_values_are_not_moved() {
    let (success, diagnostics) = analyze(
        "borrowed a = 1;
         borrowed b = a;
         int c = a;",
    );
    assert!(success, "{:?}", diagnostics);
}

#[test]
fn test_assignment_to_constant() {
    let (success, diagnostics) = analyze("const k = 1; k = 2;");
    assert!(!success);
    assert_eq!(error_messages(&diagnostics), vec!["Assignment to constant: k"]);
}

#[test]
fn test_uninitialized_read_warns() {
    let (success, diagnostics) = analyze("int x; int y = x;");
    assert!(success);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.items()[0].severity, Severity::Warning);

    let (success, diagnostics) = analyze("int x; x = 1; int y = x;");
    assert!(success);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_function_and_parameter_redeclared() {
    let (success, diagnostics) = analyze(
        "void f() {}
         void f() {}
         int g(int a, int a) { return a; }",
    );
    assert!(!success);
    assert_eq!(
        error_messages(&diagnostics),
        vec!["Function redeclared: f", "Parameter redeclared: a"]
    );
}

#[test]
fn test_errors_accumulate() {
    let (success, diagnostics) = analyze(
        "int f() {
             y = 1;
             int x = \"a\";
             foo();
             if (2) {}
         }",
    );
    assert!(!success);
    assert_eq!(diagnostics.error_count(), 5);
}

#[test]
fn test_verbose_reports_info() {
    let (success, diagnostics, _) = analyze_with(
        "int add(int a, int b) { return a + b; }",
        AnalyzerOptions { verbose: true },
    );
    assert!(success);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.items()[0].severity, Severity::Info);
}

#[test]
fn test_existing_diagnostics_are_kept() {
    let (_, program) = parse_source("int x = \"a\";");

    let mut diagnostics = Diagnostics::new();
    diagnostics.push(Diagnostic::warning("from an earlier phase"));

    let mut analyzer = SemanticAnalyzer::new(AnalyzerOptions::default());
    let success = analyzer.analyze(&program, &mut diagnostics);

    assert!(!success);
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics.items()[0].message, "from an earlier phase");
}

#[test]
fn test_reanalysis_starts_fresh() {
    let (_, program) = parse_source("int x = 1;");
    let mut analyzer = SemanticAnalyzer::new(AnalyzerOptions::default());

    let mut first = Diagnostics::new();
    assert!(analyzer.analyze(&program, &mut first));

    let mut second = Diagnostics::new();
    assert!(analyzer.analyze(&program, &mut second));
    assert!(second.is_empty());
    assert_eq!(analyzer.scopes().scope(analyzer.scopes().root()).len(), 1);
}

#[test]
fn test_scope_summary() {
    let (_, _, scopes) = analyze_with(
        "int add(int a, int b) { return a + b; }",
        AnalyzerOptions::default(),
    );

    let expected = "\
scope global
  add: int (function)
  scope function add
    a: int (variable)
    b: int (variable)
    scope block
";
    assert_eq!(scopes.summary(), expected);
}
