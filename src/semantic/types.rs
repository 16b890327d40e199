//! Canonical type values.
//!
//! `TypeContext` hands out shared `TypeRef` handles. Builtins are interned
//! by name and wrapper types are memoized by structure, so two requests for
//! the same shape return the same allocation and `Rc::ptr_eq` is type
//! equality.

use std::{collections::HashMap, fmt::Display, rc::Rc};

pub type TypeRef = Rc<Type>;

pub const ANY: &str = "any";
pub const NULL: &str = "null";
pub const VOID: &str = "void";
pub const BOOL: &str = "bool";
pub const INT: &str = "int";
pub const FLOAT: &str = "float";
pub const STRING: &str = "string";

const BUILTINS: [&str; 16] = [
    "void", "bool", "byte", "number", "int", "long", "short", "float", "double", "char",
    "string", "any", "bytes", "list", "dict", "null",
];

/// Qualifiers that only carry ownership information.
const OWNERSHIP_QUALIFIERS: [&str; 3] = ["owned", "borrowed", "ref"];

#[derive(Debug, PartialEq)]
pub enum TypeKind {
    Builtin,
    Pointer { pointee: TypeRef, decoration: String },
    Reference { referent: TypeRef },
    Optional { inner: TypeRef },
    Function { return_type: TypeRef, parameters: Vec<TypeRef> },
}

#[derive(Debug, PartialEq)]
pub struct Type {
    name: String,
    kind: TypeKind,
}

impl Type {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn is_any(&self) -> bool {
        self.name == ANY
    }

    pub fn is_null(&self) -> bool {
        self.name == NULL
    }

    pub fn is_void(&self) -> bool {
        self.name == VOID
    }

    pub fn is_numeric(&self) -> bool {
        self.name == INT || self.name == FLOAT
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            TypeKind::Function {
                return_type,
                parameters,
            } => {
                let parameters = parameters
                    .iter()
                    .map(|p| p.name().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "function({}) -> {}", parameters, return_type.name())
            }
            _ => write!(f, "{}", self.name),
        }
    }
}

fn address(ty: &TypeRef) -> *const Type {
    Rc::as_ptr(ty)
}

#[derive(Debug)]
pub struct TypeContext {
    named: HashMap<String, TypeRef>,
    pointers: HashMap<(*const Type, String), TypeRef>,
    references: HashMap<*const Type, TypeRef>,
    optionals: HashMap<*const Type, TypeRef>,
    functions: HashMap<(*const Type, Vec<*const Type>), TypeRef>,
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeContext {
    pub fn new() -> Self {
        let mut context = TypeContext {
            named: HashMap::new(),
            pointers: HashMap::new(),
            references: HashMap::new(),
            optionals: HashMap::new(),
            functions: HashMap::new(),
        };

        for name in BUILTINS {
            context.named(name);
        }

        context
    }

    /// Looks up a registered builtin or named type.
    pub fn builtin(&self, name: &str) -> Option<TypeRef> {
        self.named.get(name).cloned()
    }

    /// Returns the named type, registering it on first use.
    pub fn named(&mut self, name: &str) -> TypeRef {
        self.named
            .entry(name.to_string())
            .or_insert_with(|| {
                Rc::new(Type {
                    name: name.to_string(),
                    kind: TypeKind::Builtin,
                })
            })
            .clone()
    }

    pub fn any(&mut self) -> TypeRef {
        self.named(ANY)
    }

    pub fn pointer(&mut self, pointee: &TypeRef, decoration: &str) -> TypeRef {
        let key = (address(pointee), decoration.to_string());
        self.pointers
            .entry(key)
            .or_insert_with(|| {
                Rc::new(Type {
                    name: format!("{}{}", pointee.name(), decoration),
                    kind: TypeKind::Pointer {
                        pointee: pointee.clone(),
                        decoration: decoration.to_string(),
                    },
                })
            })
            .clone()
    }

    pub fn reference(&mut self, referent: &TypeRef) -> TypeRef {
        self.references
            .entry(address(referent))
            .or_insert_with(|| {
                Rc::new(Type {
                    name: format!("{}&", referent.name()),
                    kind: TypeKind::Reference {
                        referent: referent.clone(),
                    },
                })
            })
            .clone()
    }

    pub fn optional(&mut self, inner: &TypeRef) -> TypeRef {
        self.optionals
            .entry(address(inner))
            .or_insert_with(|| {
                Rc::new(Type {
                    name: format!("{}?", inner.name()),
                    kind: TypeKind::Optional {
                        inner: inner.clone(),
                    },
                })
            })
            .clone()
    }

    pub fn function(&mut self, return_type: &TypeRef, parameters: &[TypeRef]) -> TypeRef {
        let key = (
            address(return_type),
            parameters.iter().map(address).collect::<Vec<_>>(),
        );
        self.functions
            .entry(key)
            .or_insert_with(|| {
                Rc::new(Type {
                    name: String::from("function"),
                    kind: TypeKind::Function {
                        return_type: return_type.clone(),
                        parameters: parameters.to_vec(),
                    },
                })
            })
            .clone()
    }

    /// Resolves a type name as written in source, e.g. `int`, `string*?`
    /// or `owned&`. Trailing decorations wrap the base from left to right.
    pub fn resolve(&mut self, type_name: &str) -> TypeRef {
        let base_len = type_name.trim_end_matches(['*', '&', '?']).len();
        let (base, decorations) = type_name.split_at(base_len);

        let mut resolved = if OWNERSHIP_QUALIFIERS.contains(&base) {
            self.any()
        } else {
            self.named(base)
        };

        for decoration in decorations.chars() {
            resolved = match decoration {
                '&' => self.reference(&resolved),
                '?' => self.optional(&resolved),
                _ => self.pointer(&resolved, "*"),
            };
        }

        resolved
    }

    /// Infers the type of a literal from its source text.
    ///
    /// Quoted text is a string and `null` is the null type. Otherwise
    /// `true`/`false` are bool, text containing `.` is float, text that
    /// parses as an integer is int, and anything else is a string.
    pub fn infer_literal(&mut self, lexeme: &str) -> TypeRef {
        let name = if lexeme.starts_with('"') || lexeme.starts_with('\'') {
            STRING
        } else if lexeme == NULL {
            NULL
        } else if lexeme == "true" || lexeme == "false" {
            BOOL
        } else if lexeme.contains('.') {
            FLOAT
        } else if lexeme.parse::<i64>().is_ok() {
            INT
        } else {
            STRING
        };

        self.named(name)
    }
}
