//! Bindings: a template plus the rules for splicing it into a call site.

use pygo_ir::directive;
use pygo_py::visit::{walk_expr_mut, walk_stmts_mut};
use pygo_py::{Call, Expr, FunctionDef, Stmt};
use rustc_hash::FxHashMap;

use crate::{BindError, BoundArgs, CalleePattern, Signature};

/// How an instantiated template replaces the call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BindStyle {
    /// The value of the template's single `return`.
    Expr,
    /// The template body, spliced in place of the call's statement.
    Stmt,
    /// A parameterless function literal with arguments substituted into
    /// its body, invoked immediately.
    ParamlessFuncLit,
    /// A function literal that keeps its parameters and is invoked with
    /// the call's arguments.
    FuncLitCall,
}

/// An immutable template registration.
#[derive(Clone, Debug)]
pub struct Binding {
    pub pattern: CalleePattern,
    pub style: BindStyle,
    pub template: FunctionDef,
    /// Parameters passed by address (`&x`) to a [`BindStyle::FuncLitCall`].
    pub deref_args: &'static [&'static str],
    /// Names of the function literal's result fields.
    pub results: &'static [&'static str],
    /// One-time initializer emitted next to the statement using the
    /// template.
    pub init: Option<FunctionDef>,
    signature: Signature,
}

/// A call argument for a [`Form::Call`].
#[derive(Clone, Debug, PartialEq)]
pub struct CallArg {
    pub value: Expr,
    /// Pass `&value`.
    pub by_address: bool,
}

/// Instantiated template, ready for the builder.
#[derive(Clone, Debug, PartialEq)]
pub enum Form {
    Expr(Expr),
    Stmts(Vec<Stmt>),
    /// Parameterless closure to invoke with no arguments.
    Closure(FunctionDef),
    /// Closure to invoke with `args`.
    Call { def: FunctionDef, args: Vec<CallArg> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Instantiated {
    /// Template name, recorded on the produced call for later passes.
    pub snippet: String,
    pub form: Form,
    pub results: Vec<String>,
    pub init: Option<FunctionDef>,
}

impl Binding {
    pub fn new(pattern: CalleePattern, style: BindStyle, template: FunctionDef) -> Self {
        let signature = Signature::from_arguments(&template.args);
        Binding {
            pattern,
            style,
            template,
            deref_args: &[],
            results: &[],
            init: None,
            signature,
        }
    }

    #[must_use]
    pub fn deref(mut self, args: &'static [&'static str]) -> Self {
        self.deref_args = args;
        self
    }

    #[must_use]
    pub fn results(mut self, names: &'static [&'static str]) -> Self {
        self.results = names;
        self
    }

    #[must_use]
    pub fn init(mut self, init: FunctionDef) -> Self {
        self.init = Some(init);
        self
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Bind `call`, with a method pattern's receiver as first argument.
    pub fn bind(&self, call: &Call) -> Result<BoundArgs, BindError> {
        match self.pattern.receiver(&call.func) {
            Some(receiver) => {
                let mut positional = Vec::with_capacity(call.args.len() + 1);
                positional.push(receiver.clone());
                positional.extend(call.args.iter().cloned());
                self.signature.bind(&positional, &call.keywords)
            }
            None => self.signature.bind(&call.args, &call.keywords),
        }
    }

    /// Substitute `bound` into the template.
    pub fn instantiate(&self, bound: BoundArgs) -> Instantiated {
        let mut def = self.template.clone();
        let form = match self.style {
            BindStyle::FuncLitCall => {
                let values: FxHashMap<&str, &Expr> =
                    bound.iter().map(|a| (a.name.as_str(), &a.value)).collect();
                let params = def
                    .args
                    .posonlyargs
                    .iter_mut()
                    .chain(&mut def.args.args)
                    .chain(&mut def.args.kwonlyargs);
                for param in params {
                    if let Some(annotation) = &mut param.annotation {
                        substitute_marked(annotation, &values);
                    }
                }
                if let Some(returns) = &mut def.returns {
                    substitute_marked(returns, &values);
                }
                let args = bound
                    .into_iter()
                    .map(|a| CallArg {
                        by_address: self.deref_args.contains(&a.name.as_str()),
                        value: a.value,
                    })
                    .collect();
                Form::Call { def, args }
            }
            BindStyle::Expr | BindStyle::Stmt | BindStyle::ParamlessFuncLit => {
                let values: FxHashMap<String, Expr> =
                    bound.into_iter().map(|a| (a.name, a.value)).collect();
                walk_stmts_mut(&mut def.body, &mut |e| substitute(e, &values));
                if let Some(returns) = &mut def.returns {
                    walk_expr_mut(returns, &mut |e| substitute(e, &values));
                }
                def.args = pygo_py::Arguments::default();
                match self.style {
                    BindStyle::Expr => match def.body.first() {
                        Some(Stmt::Return { value: Some(value) }) => Form::Expr(value.clone()),
                        _ => Form::Closure(def),
                    },
                    BindStyle::Stmt => Form::Stmts(def.body),
                    _ => Form::Closure(def),
                }
            }
        };
        Instantiated {
            snippet: self.template.name.clone(),
            form,
            results: self.results.iter().map(|r| (*r).to_owned()).collect(),
            init: self.init.clone(),
        }
    }
}

fn substitute(expr: &mut Expr, values: &FxHashMap<String, Expr>) {
    if let Expr::Name { id } = expr {
        if let Some(value) = values.get(id.as_str()) {
            *expr = value.clone();
        }
    }
}

/// Replace parameter names inside `PYGO_ANY[...]` annotations, leaving
/// type names alone.
fn substitute_marked(annotation: &mut Expr, values: &FxHashMap<&str, &Expr>) {
    match annotation {
        Expr::Subscript { value, slice } if value.as_name() == Some(directive::ANY) => {
            walk_expr_mut(slice, &mut |e| {
                if let Expr::Name { id } = e {
                    if let Some(&bound) = values.get(id.as_str()) {
                        *e = bound.clone();
                    }
                }
            });
        }
        Expr::Subscript { slice, .. } => substitute_marked(slice, values),
        Expr::Tuple { elts } => {
            for elt in elts {
                substitute_marked(elt, values);
            }
        }
        _ => {}
    }
}
