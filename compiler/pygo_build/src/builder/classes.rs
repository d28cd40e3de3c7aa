//! Classes → struct types with pointer-receiver methods.
//!
//! ```text
//! class Point:                      type Point struct { x int; y int }
//!     def __init__(self, x: int):   func NewPoint(x int) (self *Point) { self = new(Point); ...; return }
//!         self.x = x           →
//!     def norm(self): ...           func (self *Point) norm() { ... }
//! ```

use pygo_ir::{GoType, NodeId, NodeKind, Token};
use pygo_py::{Arguments, ClassDef, Constant, Expr, FunctionDef, Stmt};
use pygo_types::{ObjKind, Object, ScopeId, ScopeTree, TypeCx};
use tracing::debug;

use super::stmts::mark_generator;
use super::{unsupported_stmt, Builder, Decline, Outcome};
use crate::BuildError;

/// Go name for a Python method name.
fn method_name(name: &str) -> String {
    match name {
        "__str__" => "String".to_owned(),
        "__repr__" => "GoString".to_owned(),
        dunder if dunder.len() > 4 && dunder.starts_with("__") && dunder.ends_with("__") => {
            let stripped = &dunder[2..dunder.len() - 2];
            let mut chars = stripped.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => stripped.to_owned(),
            }
        }
        other => other.to_owned(),
    }
}

/// Receiver name and the remaining parameters of a method.
fn split_receiver(args: &Arguments) -> (String, Arguments) {
    let mut rest = args.clone();
    let receiver = if rest.posonlyargs.is_empty() {
        (!rest.args.is_empty()).then(|| rest.args.remove(0))
    } else {
        Some(rest.posonlyargs.remove(0))
    };
    // Defaults align to the end, so a receiver never has one unless every
    // positional parameter does.
    let positional = rest.posonlyargs.len() + rest.args.len();
    if rest.defaults.len() > positional {
        rest.defaults.remove(0);
    }
    let name = receiver.map_or_else(|| "self".to_owned(), |arg| arg.arg);
    (name, rest)
}

fn is_docstring_or_pass(stmt: &Stmt) -> bool {
    matches!(
        stmt,
        Stmt::Pass
            | Stmt::Expr {
                value: Expr::Constant {
                    value: Constant::Str(_) | Constant::Ellipsis,
                },
            }
    )
}

/// A struct field in declaration order.
struct FieldSpec {
    name: String,
    ty: NodeId,
}

/// Add a field unless one of that name exists; the first type wins.
fn push_field(fields: &mut Vec<FieldSpec>, name: &str, ty: NodeId) {
    if ty.is_valid() && !fields.iter().any(|f| f.name == name) {
        fields.push(FieldSpec {
            name: name.to_owned(),
            ty,
        });
    }
}

impl Builder<'_> {
    /// Fields written through the receiver anywhere in a method body.
    fn receiver_fields(
        &mut self,
        method: &FunctionDef,
        fields: &mut Vec<FieldSpec>,
    ) -> Result<(), BuildError> {
        let (receiver, params) = split_receiver(&method.args);

        // Parameter types, so `self.x = x` can take the type of `x`.
        let mut scopes = ScopeTree::new();
        for arg in params.positional().chain(&params.kwonlyargs) {
            if let Some(annotation) = &arg.annotation {
                let ty = self.annotation(annotation)?;
                if ty.is_valid() {
                    scopes.declare(
                        ScopeId::ROOT,
                        Object::with_decl(&arg.arg, ObjKind::Variable, ty),
                    );
                }
            }
        }

        let mut writes = Vec::new();
        collect_receiver_writes(&method.body, &receiver, &mut writes);
        for write in writes {
            let (name, ty) = match write {
                ReceiverWrite::Annotated { attr, annotation } => {
                    (attr, self.annotation(annotation)?)
                }
                ReceiverWrite::Assigned { attr, value } => {
                    // Built only to be typed; whatever it queues is dropped.
                    let outer = std::mem::take(&mut self.pending);
                    let built = self.expr(value);
                    self.pending = outer;
                    let known = built
                        .ok()
                        .and_then(|v| TypeCx::new(&self.arena, &scopes, ScopeId::ROOT).type_of(v));
                    let ty = match known {
                        Some(ty) if !matches!(ty, GoType::Tuple(_)) => self.arena.type_expr(&ty),
                        _ => self.any_of(Vec::new()),
                    };
                    (attr, ty)
                }
            };
            push_field(fields, name, ty);
        }
        Ok(())
    }

    /// `*Name`
    fn class_ptr(&mut self, class: &str) -> NodeId {
        let name = self.arena.ident(class);
        self.arena.star(name)
    }

    /// `func NewX(params) (self *X) { self = new(X); inits; body; return }`
    fn constructor(
        &mut self,
        class: &str,
        init: Option<&FunctionDef>,
        inits: Vec<NodeId>,
    ) -> Result<NodeId, BuildError> {
        let (receiver, args) = match init {
            Some(def) => split_receiver(&def.args),
            None => ("self".to_owned(), Arguments::default()),
        };
        let params = self.parameters(&args)?;
        let ptr = self.class_ptr(class);
        let results = self.named_result(&receiver, ptr);

        let lhs = self.arena.ident(&receiver);
        let ty = self.arena.ident(class);
        let new = self.arena.call_path("new", vec![ty]);
        let mut body = vec![self.arena.assign(vec![lhs], Token::Assign, vec![new])];
        body.extend(inits);
        if let Some(def) = init {
            body.extend(self.stmts(&def.body)?);
        }
        body.push(self.arena.ret(Vec::new()));

        let ty = self.arena.func_type(params.fields, results);
        self.arena.meta_mut(ty).defaults = params.defaults;
        let body = self.arena.block(body);
        Ok(self.arena.alloc(NodeKind::FuncDecl {
            recv: NodeId::INVALID,
            name: format!("New{class}"),
            ty,
            body,
        }))
    }

    /// `func (self *X) name(params) results { body }`
    fn method(&mut self, class: &str, def: &FunctionDef, is_async: bool) -> Result<NodeId, BuildError> {
        let (receiver, args) = split_receiver(&def.args);
        let (ty, body) = self.function(def, &args, is_async)?;
        let ptr = self.class_ptr(class);
        let recv = self.arena.field(&[receiver.as_str()], ptr);
        let recv = self.arena.field_list(vec![recv]);
        let id = self.arena.alloc(NodeKind::FuncDecl {
            recv,
            name: method_name(&def.name),
            ty,
            body,
        });
        mark_generator(self, id, &def.body);
        Ok(id)
    }
}

enum ReceiverWrite<'p> {
    Annotated { attr: &'p str, annotation: &'p Expr },
    Assigned { attr: &'p str, value: &'p Expr },
}

/// `receiver.attr = ...` and `receiver.attr: T = ...` in `body`, nested
/// blocks included, nested definitions excluded.
fn collect_receiver_writes<'p>(body: &'p [Stmt], receiver: &str, out: &mut Vec<ReceiverWrite<'p>>) {
    let attr_of = |target: &'p Expr| match target {
        Expr::Attribute { value, attr } if value.as_name() == Some(receiver) => Some(attr.as_str()),
        _ => None,
    };
    for stmt in body {
        match stmt {
            Stmt::Assign { targets, value } => {
                for target in targets {
                    let elts: &[Expr] = match target {
                        Expr::Tuple { elts } | Expr::List { elts } => elts,
                        single => std::slice::from_ref(single),
                    };
                    let values: Option<&[Expr]> = match value {
                        Expr::Tuple { elts } | Expr::List { elts }
                            if elts.len() == targets_len(target) =>
                        {
                            Some(elts.as_slice())
                        }
                        _ => None,
                    };
                    for (i, elt) in elts.iter().enumerate() {
                        let Some(attr) = attr_of(elt) else {
                            continue;
                        };
                        let value = match values {
                            Some(values) => &values[i],
                            None if elts.len() == 1 => value,
                            None => continue,
                        };
                        out.push(ReceiverWrite::Assigned { attr, value });
                    }
                }
            }
            Stmt::AnnAssign {
                target, annotation, ..
            } => {
                if let Some(attr) = attr_of(target) {
                    out.push(ReceiverWrite::Annotated { attr, annotation });
                }
            }
            Stmt::If { body, orelse, .. } | Stmt::While { body, orelse, .. } => {
                collect_receiver_writes(body, receiver, out);
                collect_receiver_writes(orelse, receiver, out);
            }
            Stmt::For(for_) => {
                collect_receiver_writes(&for_.body, receiver, out);
                collect_receiver_writes(&for_.orelse, receiver, out);
            }
            Stmt::With { body, .. } => collect_receiver_writes(body, receiver, out),
            Stmt::Try(t) => {
                collect_receiver_writes(&t.body, receiver, out);
                for handler in &t.handlers {
                    collect_receiver_writes(&handler.body, receiver, out);
                }
                collect_receiver_writes(&t.orelse, receiver, out);
                collect_receiver_writes(&t.finalbody, receiver, out);
            }
            _ => {}
        }
    }
}

fn targets_len(target: &Expr) -> usize {
    match target {
        Expr::Tuple { elts } | Expr::List { elts } => elts.len(),
        _ => 1,
    }
}

/// `class X(Base): ...` → `type X struct { Base; fields }` plus its
/// constructor and methods.
pub(super) fn class(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::ClassDef(ClassDef {
        name, bases, body, ..
    }) = stmt
    else {
        return Err(Decline::Shape);
    };

    // Built-in bases and generic parameters have no struct to embed.
    let embedded: Vec<String> = bases
        .iter()
        .filter_map(Expr::dotted)
        .filter(|base| !matches!(base.as_str(), "object" | "Exception" | "BaseException"))
        .collect();

    let mut fields: Vec<FieldSpec> = Vec::new();
    let mut inits = Vec::new();
    let mut methods: Vec<(&FunctionDef, bool)> = Vec::new();
    let mut init_def = None;
    for item in body {
        match item {
            Stmt::FunctionDef(def) | Stmt::AsyncFunctionDef(def) if def.name == "__init__" => {
                init_def = Some(def);
            }
            Stmt::FunctionDef(def) => methods.push((def, false)),
            Stmt::AsyncFunctionDef(def) => methods.push((def, true)),
            Stmt::AnnAssign {
                target: Expr::Name { id },
                annotation,
                value,
            } => {
                let ty = b.annotation(annotation)?;
                push_field(&mut fields, id, ty);
                if let Some(value) = value {
                    inits.push((id.as_str(), value));
                }
            }
            Stmt::Assign { targets, value } => {
                let [Expr::Name { id }] = targets.as_slice() else {
                    return Err(unsupported_stmt(item).into());
                };
                inits.push((id.as_str(), value));
            }
            other if is_docstring_or_pass(other) => {}
            other => return Err(unsupported_stmt(other).into()),
        }
    }

    // Class-level values become constructor assignments.
    let receiver = init_def.map_or_else(|| "self".to_owned(), |def| split_receiver(&def.args).0);
    let mut init_stmts = Vec::with_capacity(inits.len());
    for (field, value) in inits {
        let value = b.expr(value)?;
        if !fields.iter().any(|f| f.name == field) {
            let ty = match b.static_type(value) {
                Some(known) => b.arena.type_expr(&known),
                None => b.any_of(vec![value]),
            };
            push_field(&mut fields, field, ty);
        }
        let recv = b.arena.ident(&receiver);
        let lhs = b.arena.sel(recv, field);
        init_stmts.push(b.arena.assign(vec![lhs], Token::Assign, vec![value]));
    }

    if let Some(def) = init_def {
        b.receiver_fields(def, &mut fields)?;
    }
    for (def, _) in &methods {
        b.receiver_fields(def, &mut fields)?;
    }

    // type X struct { ... }
    let mut list = Vec::with_capacity(embedded.len() + fields.len());
    for base in &embedded {
        let ty = b.arena.path(base);
        list.push(b.arena.field(&[], ty));
    }
    for field in fields {
        list.push(b.arena.field(&[field.name.as_str()], field.ty));
    }
    let field_list = b.arena.field_list(list);
    let struct_ty = b.arena.alloc(NodeKind::StructType { fields: field_list });
    let spec = b.arena.alloc(NodeKind::TypeSpec {
        name: name.clone(),
        ty: struct_ty,
    });
    let mut out = vec![b.arena.alloc(NodeKind::GenDecl {
        tok: Token::Type,
        specs: vec![spec],
    })];

    if init_def.is_some() || !init_stmts.is_empty() {
        out.push(b.constructor(name, init_def, init_stmts)?);
    }
    for (def, is_async) in methods {
        out.push(b.method(name, def, is_async)?);
    }
    debug!(class = %name, decls = out.len(), "class");
    Ok(out)
}
