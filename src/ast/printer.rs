//! Indented text rendering of a parsed program, two spaces per level.
//!
//! ```text
//! Program:
//!   Function: add -> int
//!     Parameters: int a, int b
//!     Block:
//!       Return:
//!         BinaryOperation: +
//!           Identifier: a
//!           Identifier: b
//! ```

use std::fmt::Display;

use super::{
    ast::{Function, Item, Program},
    expressions::Expr,
    statements::{Stmt, VarDeclStmt},
};

impl Program {
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        line(&mut out, 0, "Program:");
        for item in &self.items {
            match item {
                Item::Function(function) => write_function(&mut out, function, 1),
                Item::Statement(stmt) => write_stmt(&mut out, stmt, 1),
            }
        }
        out
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty())
    }
}

fn line(out: &mut String, indent: usize, text: &str) {
    out.push_str(&"  ".repeat(indent));
    out.push_str(text);
    out.push('\n');
}

fn write_function(out: &mut String, function: &Function, indent: usize) {
    line(
        out,
        indent,
        &format!("Function: {} -> {}", function.name, function.return_type),
    );

    if !function.parameters.is_empty() {
        let parameters = function
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.type_name, p.name))
            .collect::<Vec<_>>()
            .join(", ");
        line(out, indent + 1, &format!("Parameters: {}", parameters));
    }

    write_stmt(out, &function.body, indent + 1);
}

fn declaration_header(decl: &VarDeclStmt) -> String {
    let mut parts = vec![];
    if let Some(keyword) = decl.binding.keyword() {
        parts.push(keyword);
    }
    if let Some(declared_type) = &decl.declared_type {
        parts.push(declared_type.as_str());
    }
    parts.push(decl.name.as_str());
    format!("VariableDeclaration: {}", parts.join(" "))
}

fn write_stmt(out: &mut String, stmt: &Stmt, indent: usize) {
    match stmt {
        Stmt::VarDecl(decl) => {
            line(out, indent, &declaration_header(decl));
            if let Some(initializer) = &decl.initializer {
                write_expr(out, initializer, indent + 1);
            }
        }
        Stmt::Assignment(assignment) => {
            line(out, indent, &format!("Assignment: {}", assignment.target));
            write_expr(out, &assignment.value, indent + 1);
        }
        Stmt::Block(block) => {
            line(out, indent, "Block:");
            for stmt in block.iter() {
                write_stmt(out, stmt, indent + 1);
            }
        }
        Stmt::Return(ret) => match &ret.value {
            Some(value) => {
                line(out, indent, "Return:");
                write_expr(out, value, indent + 1);
            }
            None => line(out, indent, "Return"),
        },
        Stmt::Expression(expression) => {
            line(out, indent, "ExpressionStatement:");
            write_expr(out, &expression.expression, indent + 1);
        }
        Stmt::If(if_stmt) => {
            line(out, indent, "If:");
            line(out, indent + 1, "Condition:");
            write_expr(out, &if_stmt.condition, indent + 2);
            line(out, indent + 1, "Then:");
            write_stmt(out, &if_stmt.then_branch, indent + 2);
            if let Some(else_branch) = &if_stmt.else_branch {
                line(out, indent + 1, "Else:");
                write_stmt(out, else_branch, indent + 2);
            }
        }
        Stmt::While(while_stmt) => {
            line(out, indent, "While:");
            line(out, indent + 1, "Condition:");
            write_expr(out, &while_stmt.condition, indent + 2);
            line(out, indent + 1, "Body:");
            write_stmt(out, &while_stmt.body, indent + 2);
        }
        Stmt::For(for_stmt) => {
            line(out, indent, "For:");
            if let Some(init) = &for_stmt.init {
                line(out, indent + 1, "Init:");
                write_stmt(out, init, indent + 2);
            }
            if let Some(condition) = &for_stmt.condition {
                line(out, indent + 1, "Condition:");
                write_expr(out, condition, indent + 2);
            }
            if let Some(increment) = &for_stmt.increment {
                line(out, indent + 1, "Increment:");
                write_expr(out, increment, indent + 2);
            }
            line(out, indent + 1, "Body:");
            write_stmt(out, &for_stmt.body, indent + 2);
        }
    }
}

fn write_expr(out: &mut String, expr: &Expr, indent: usize) {
    match expr {
        Expr::Assignment(assignment) => {
            line(out, indent, &format!("Assignment: {}", assignment.target));
            write_expr(out, &assignment.value, indent + 1);
        }
        Expr::Binary(binary) => {
            line(out, indent, &format!("BinaryOperation: {}", binary.operator));
            write_expr(out, &binary.left, indent + 1);
            write_expr(out, &binary.right, indent + 1);
        }
        Expr::Unary(unary) => {
            line(out, indent, &format!("UnaryOperation: {}", unary.operator));
            write_expr(out, &unary.operand, indent + 1);
        }
        Expr::Call(call) => {
            line(out, indent, "CallExpression:");
            write_expr(out, &call.callee, indent + 1);
            for argument in &call.arguments {
                write_expr(out, argument, indent + 1);
            }
        }
        Expr::Literal(literal) => line(out, indent, &format!("Literal: {}", literal.value)),
        Expr::Identifier(identifier) => {
            line(out, indent, &format!("Identifier: {}", identifier.name))
        }
    }
}
