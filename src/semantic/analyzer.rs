use std::rc::Rc;

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Function, Item, Program},
        expressions::{AssignmentExpr, BinaryExpr, CallExpr, Expr, IdentifierExpr},
        statements::{Stmt, VarDeclStmt},
    },
    errors::{
        diagnostics::{Diagnostic, Diagnostics},
        errors::ErrorImpl,
    },
    Span,
};

use super::{
    scope::{Ownership, ScopeId, ScopeKind, ScopeTree, Symbol, SymbolKind},
    types::{TypeContext, TypeKind, TypeRef, BOOL, FLOAT},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzerOptions {
    /// Emit an info diagnostic for every analyzed function.
    pub verbose: bool,
}

/// Walks a Program, building the scope tree and reporting every semantic
/// problem it finds. Analysis never stops early.
pub struct SemanticAnalyzer {
    options: AnalyzerOptions,
    types: TypeContext,
    scopes: ScopeTree,
    current: ScopeId,
    diagnostics: Diagnostics,
    success: bool,
    /// Set when a `return` is visited inside the current function.
    saw_return: bool,
}

impl SemanticAnalyzer {
    pub fn new(options: AnalyzerOptions) -> Self {
        let scopes = ScopeTree::new();
        let current = scopes.root();

        SemanticAnalyzer {
            options,
            types: TypeContext::new(),
            scopes,
            current,
            diagnostics: Diagnostics::new(),
            success: true,
            saw_return: false,
        }
    }

    /// Analyzes `program` against a fresh global scope, appending findings
    /// to `diagnostics`.
    ///
    /// # Returns
    ///
    /// True when this run reported no error-severity diagnostics.
    pub fn analyze(&mut self, program: &Program, diagnostics: &mut Diagnostics) -> bool {
        self.scopes = ScopeTree::new();
        self.current = self.scopes.root();
        self.success = true;
        self.saw_return = false;
        self.diagnostics = std::mem::take(diagnostics);

        for item in &program.items {
            match item {
                Item::Function(function) => self.visit_function(function),
                Item::Statement(stmt) => self.visit_stmt(stmt),
            }
        }

        *diagnostics = std::mem::take(&mut self.diagnostics);
        debug!(
            success = self.success,
            scopes = self.scopes.len(),
            "semantic analysis finished"
        );

        self.success
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn into_scopes(self) -> ScopeTree {
        self.scopes
    }

    fn report(&mut self, error: ErrorImpl, span: Span) {
        if error.severity().is_error() {
            self.success = false;
        }
        self.diagnostics.push(error.into_diagnostic(Some(span)));
    }

    fn push_scope(&mut self, kind: ScopeKind) {
        self.current = self.scopes.create_child(self.current, kind);
        trace!(scope = ?self.current, "entered scope");
    }

    fn pop_scope(&mut self) {
        match self.scopes.parent(self.current) {
            Some(parent) => {
                trace!(scope = ?self.current, "left scope");
                self.current = parent;
            }
            None => panic!("attempted to pop the global scope"),
        }
    }

    fn visit_function(&mut self, function: &Function) {
        let return_type = self.types.resolve(&function.return_type);
        let parameter_types: Vec<TypeRef> = function
            .parameters
            .iter()
            .map(|parameter| self.types.resolve(&parameter.type_name))
            .collect();
        let signature = self.types.function(&return_type, &parameter_types);

        let symbol = Symbol::function(&function.name, return_type.clone(), signature, function.span);
        if !self.scopes.declare(self.current, symbol) {
            self.report(
                ErrorImpl::FunctionRedeclared {
                    function: function.name.clone(),
                },
                function.span,
            );
        }

        self.push_scope(ScopeKind::Function(function.name.clone()));

        for (parameter, ty) in function.parameters.iter().zip(parameter_types) {
            let mut symbol = Symbol::variable(&parameter.name, ty, parameter.span);
            symbol.ownership = Ownership::from_type_name(&parameter.type_name);
            symbol.is_initialized = true;

            if !self.scopes.declare(self.current, symbol) {
                self.report(
                    ErrorImpl::ParameterRedeclared {
                        parameter: parameter.name.clone(),
                    },
                    parameter.span,
                );
            }
        }

        let enclosing_saw_return = std::mem::replace(&mut self.saw_return, false);
        self.visit_stmt(&function.body);

        // Shallow check: only the last statement of a block body counts.
        let ends_without_return = match function.body.as_ref() {
            Stmt::Block(block) => !matches!(block.body.last(), Some(Stmt::Return(_))),
            _ => false,
        };
        if !return_type.is_void() && !self.saw_return && ends_without_return {
            self.report(
                ErrorImpl::MissingReturn {
                    function: function.name.clone(),
                },
                function.span,
            );
        }

        self.saw_return = enclosing_saw_return;
        self.pop_scope();

        if self.options.verbose {
            self.diagnostics.push(
                Diagnostic::info(format!(
                    "Analyzed function '{}' returning {} with {} parameter(s)",
                    function.name,
                    return_type.name(),
                    function.parameters.len()
                ))
                .with_range(function.span),
            );
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => self.visit_var_decl(decl),
            Stmt::Assignment(assignment) => {
                self.visit_assignment(assignment);
            }
            Stmt::Block(block) => {
                self.push_scope(ScopeKind::Block);
                for stmt in block.iter() {
                    self.visit_stmt(stmt);
                }
                self.pop_scope();
            }
            Stmt::Return(ret) => {
                self.saw_return = true;
                if let Some(value) = &ret.value {
                    self.visit_expr(value);
                }
            }
            Stmt::Expression(expression) => {
                self.visit_expr(&expression.expression);
            }
            Stmt::If(if_stmt) => {
                self.check_condition("if", &if_stmt.condition);
                self.visit_stmt(&if_stmt.then_branch);
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.visit_stmt(else_branch);
                }
            }
            Stmt::While(while_stmt) => {
                self.check_condition("while", &while_stmt.condition);
                self.visit_stmt(&while_stmt.body);
            }
            Stmt::For(for_stmt) => {
                self.push_scope(ScopeKind::Loop);
                if let Some(init) = &for_stmt.init {
                    self.visit_stmt(init);
                }
                if let Some(condition) = &for_stmt.condition {
                    self.check_condition("for", condition);
                }
                if let Some(increment) = &for_stmt.increment {
                    self.visit_expr(increment);
                }
                self.visit_stmt(&for_stmt.body);
                self.pop_scope();
            }
        }
    }

    fn check_condition(&mut self, statement: &str, condition: &Expr) {
        let ty = self.visit_expr(condition);
        if ty.name() != BOOL && !ty.is_any() {
            self.report(
                ErrorImpl::NonBooleanCondition {
                    statement: statement.to_string(),
                    received: ty.name().to_string(),
                },
                *condition.span(),
            );
        }
    }

    fn visit_var_decl(&mut self, decl: &VarDeclStmt) {
        // The initializer is resolved before the new name is in scope.
        let initializer_type = decl
            .initializer
            .as_ref()
            .map(|initializer| self.visit_expr(initializer));

        let declared_type = decl
            .declared_type
            .as_deref()
            .filter(|type_name| *type_name != "auto");

        let ty = match declared_type {
            Some(type_name) => {
                let declared = self.types.resolve(type_name);
                if let (Some(initializer), Some(value)) = (&decl.initializer, &initializer_type) {
                    if !compatible(&declared, value) {
                        self.report(
                            ErrorImpl::DeclarationTypeMismatch {
                                variable: decl.name.clone(),
                                expected: declared.name().to_string(),
                                received: value.name().to_string(),
                            },
                            *initializer.span(),
                        );
                    }
                }
                declared
            }
            None => match initializer_type {
                Some(value) if !value.is_null() => value,
                _ => self.types.any(),
            },
        };

        if let Some(initializer) = &decl.initializer {
            self.consume(initializer);
        }

        let mut symbol = Symbol::variable(&decl.name, ty, decl.span);
        symbol.ownership = decl
            .declared_type
            .as_deref()
            .map(Ownership::from_type_name)
            .unwrap_or(Ownership::Unknown);
        symbol.is_initialized = decl.initializer.is_some();
        symbol.is_constant = decl.binding.is_constant();

        if !self.scopes.declare(self.current, symbol) {
            self.report(
                ErrorImpl::VariableRedeclared {
                    variable: decl.name.clone(),
                },
                decl.span,
            );
        }
    }

    fn visit_assignment(&mut self, assignment: &AssignmentExpr) -> TypeRef {
        let value = self.visit_expr(&assignment.value);
        self.consume(&assignment.value);

        let target = self
            .scopes
            .lookup(self.current, &assignment.target)
            .map(|symbol| (symbol.ty.clone(), symbol.is_constant));

        let Some((target_type, is_constant)) = target else {
            self.report(
                ErrorImpl::AssignmentToUndefined {
                    variable: assignment.target.clone(),
                },
                assignment.target_span,
            );
            return value;
        };

        if is_constant {
            self.report(
                ErrorImpl::AssignmentToConstant {
                    variable: assignment.target.clone(),
                },
                assignment.target_span,
            );
        } else if !compatible(&target_type, &value) {
            self.report(
                ErrorImpl::AssignmentTypeMismatch {
                    variable: assignment.target.clone(),
                    expected: target_type.name().to_string(),
                    received: value.name().to_string(),
                },
                *assignment.value.span(),
            );
        }

        if let Some(symbol) = self.scopes.lookup_mut(self.current, &assignment.target) {
            symbol.is_initialized = true;
            symbol.has_moved = false;
        }

        target_type
    }

    fn visit_expr(&mut self, expr: &Expr) -> TypeRef {
        match expr {
            Expr::Literal(literal) => self.types.infer_literal(&literal.value),
            Expr::Identifier(identifier) => self.visit_identifier(identifier),
            Expr::Binary(binary) => self.visit_binary(binary),
            Expr::Unary(unary) => {
                let operand = self.visit_expr(&unary.operand);
                if unary.operator == "!" {
                    self.types.named(BOOL)
                } else {
                    operand
                }
            }
            Expr::Call(call) => self.visit_call(call),
            Expr::Assignment(assignment) => self.visit_assignment(assignment),
        }
    }

    fn visit_identifier(&mut self, identifier: &IdentifierExpr) -> TypeRef {
        let Some(symbol) = self.scopes.lookup(self.current, &identifier.name) else {
            self.report(
                ErrorImpl::UndefinedIdentifier {
                    variable: identifier.name.clone(),
                },
                identifier.span,
            );
            return self.types.any();
        };

        let ty = symbol.ty.clone();
        let moved = symbol.ownership == Ownership::Owned && symbol.has_moved;
        let uninitialized = symbol.kind == SymbolKind::Variable && !symbol.is_initialized;

        if moved {
            self.report(
                ErrorImpl::UseOfMovedValue {
                    variable: identifier.name.clone(),
                },
                identifier.span,
            );
        }
        if uninitialized {
            self.report(
                ErrorImpl::PossiblyUninitialized {
                    variable: identifier.name.clone(),
                },
                identifier.span,
            );
        }

        ty
    }

    /// Checks the operands of a binary operation and gives its result type.
    ///
    /// `&&` and `||` take bool operands. Other operators need operands of
    /// the same type, except that `+ - * /` and comparisons accept mixed
    /// int and float, and equality accepts null. Comparison, equality and
    /// logical operators yield bool; mixed arithmetic yields float.
    ///
    /// # Returns
    ///
    /// The result type, or `any` after reporting a mismatch.
    fn visit_binary(&mut self, binary: &BinaryExpr) -> TypeRef {
        let left = self.visit_expr(&binary.left);
        let right = self.visit_expr(&binary.right);

        let operator = binary.operator.as_str();
        let arithmetic = matches!(operator, "+" | "-" | "*" | "/");
        let comparison = matches!(operator, "<" | "<=" | ">" | ">=");
        let equality = matches!(operator, "==" | "!=");
        let logical = matches!(operator, "&&" | "||");

        let operands_agree = if logical {
            let is_boolean = |ty: &TypeRef| ty.name() == BOOL || ty.is_any();
            is_boolean(&left) && is_boolean(&right)
        } else {
            Rc::ptr_eq(&left, &right)
                || left.name() == right.name()
                || left.is_any()
                || right.is_any()
                || ((arithmetic || comparison) && left.is_numeric() && right.is_numeric())
                || (equality && (left.is_null() || right.is_null()))
        };

        if !operands_agree {
            self.report(
                ErrorImpl::BinaryTypeMismatch {
                    operator: operator.to_string(),
                    left: left.name().to_string(),
                    right: right.name().to_string(),
                },
                binary.span,
            );
            return self.types.any();
        }

        if comparison || equality || logical {
            self.types.named(BOOL)
        } else if left.is_any() || right.is_any() {
            self.types.any()
        } else if left.name() != right.name() {
            // Mixed int and float arithmetic.
            self.types.named(FLOAT)
        } else {
            left
        }
    }

    fn visit_call(&mut self, call: &CallExpr) -> TypeRef {
        let result = match call.callee.as_identifier() {
            Some(name) => {
                let callee = self
                    .scopes
                    .lookup(self.current, name)
                    .filter(|symbol| symbol.kind == SymbolKind::Function)
                    .map(|symbol| (symbol.ty.clone(), symbol.signature.clone()));

                match callee {
                    Some((return_type, signature)) => {
                        if let Some(TypeKind::Function { parameters, .. }) =
                            signature.as_ref().map(|signature| signature.kind())
                        {
                            if parameters.len() != call.arguments.len() {
                                self.report(
                                    ErrorImpl::ArgumentCountMismatch {
                                        function: name.to_string(),
                                        expected: parameters.len(),
                                        received: call.arguments.len(),
                                    },
                                    call.span,
                                );
                            }
                        }
                        return_type
                    }
                    None => {
                        self.report(
                            ErrorImpl::UndefinedFunction {
                                function: name.to_string(),
                            },
                            *call.callee.span(),
                        );
                        self.types.any()
                    }
                }
            }
            None => {
                self.visit_expr(&call.callee);
                self.report(ErrorImpl::NotCallable, *call.callee.span());
                self.types.any()
            }
        };

        for argument in &call.arguments {
            self.visit_expr(argument);
            self.consume(argument);
        }

        result
    }

    /// Marks an owned variable as moved when `expr` hands it over whole:
    /// a declaration initializer, an assignment source or a call argument.
    fn consume(&mut self, expr: &Expr) {
        let Some(name) = expr.as_identifier() else {
            return;
        };

        if let Some(symbol) = self.scopes.lookup_mut(self.current, name) {
            if symbol.kind == SymbolKind::Variable && symbol.ownership == Ownership::Owned {
                symbol.has_moved = true;
            }
        }
    }
}

/// Whether a value of type `value` may be stored where `target` is expected.
fn compatible(target: &TypeRef, value: &TypeRef) -> bool {
    Rc::ptr_eq(target, value)
        || target.name() == value.name()
        || target.is_any()
        || value.is_any()
        || value.is_null()
}
