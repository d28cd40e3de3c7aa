//! Loop shapes: counted ranges, unpacking iterators, generators, sets and
//! files.

use pygo_ir::{GoType, NodeId, NodeKind, Token};

use super::{call_args, callee_name, is_int_lit, method_call, qualified, replace_node};
use crate::walk::{Cx, Pass, Rewrite};

/// Parts of a `RangeStmt`.
struct Range {
    key: NodeId,
    value: NodeId,
    x: NodeId,
    body: NodeId,
}

fn range_parts(cx: &Cx<'_>, id: NodeId) -> Option<Range> {
    match cx.arena.get(id)? {
        NodeKind::RangeStmt {
            key,
            value,
            x,
            body,
            ..
        } => Some(Range {
            key: *key,
            value: *value,
            x: *x,
            body: *body,
        }),
        _ => None,
    }
}

/// Whether `id` is absent or the blank identifier.
fn is_blank(cx: &Cx<'_>, id: NodeId) -> bool {
    !id.is_valid() || cx.arena.is_ident(id, "_")
}

/// The two names of a `(k, v)` loop target.
fn pair(cx: &Cx<'_>, target: NodeId) -> Option<(NodeId, NodeId)> {
    match cx.arena.get(target)? {
        NodeKind::CompositeLit { ty, elts } if !ty.is_valid() && elts.len() == 2 => {
            Some((elts[0], elts[1]))
        }
        _ => None,
    }
}

fn set_range(cx: &mut Cx<'_>, id: NodeId, range: Range) {
    let Range {
        key,
        value,
        x,
        body,
    } = range;
    let tok = if key.is_valid() || value.is_valid() {
        Token::Define
    } else {
        Token::Illegal
    };
    cx.arena.set_kind(
        id,
        NodeKind::RangeStmt {
            key,
            value,
            tok,
            x,
            body,
        },
    );
}

/// `enumerate(xs)`, `d.items()`, `d.keys()` and `d.values()` as range
/// operands.
pub(crate) struct UnpackRange;

impl Pass for UnpackRange {
    fn name(&self) -> &'static str {
        "UnpackRange"
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(range) = range_parts(cx, id) else {
            return Rewrite::Keep;
        };
        if !is_blank(cx, range.key) {
            return Rewrite::Keep;
        }
        let args = call_args(cx.arena, range.x);
        if callee_name(cx.arena, range.x) == Some("enumerate") {
            let (Some((index, item)), [source]) = (pair(cx, range.value), args.as_slice()) else {
                return Rewrite::Keep;
            };
            let source = *source;
            set_range(
                cx,
                id,
                Range {
                    key: index,
                    value: item,
                    x: source,
                    body: range.body,
                },
            );
            return Rewrite::Keep;
        }
        let Some((map, method)) = method_call(cx.arena, range.x) else {
            return Rewrite::Keep;
        };
        if !args.is_empty() {
            return Rewrite::Keep;
        }
        let (key, value) = match method {
            "items" => match pair(cx, range.value) {
                Some(names) => names,
                None => return Rewrite::Keep,
            },
            "keys" => (range.value, NodeId::INVALID),
            "values" => (range.key, range.value),
            _ => return Rewrite::Keep,
        };
        set_range(
            cx,
            id,
            Range {
                key,
                value,
                x: map,
                body: range.body,
            },
        );
        Rewrite::Keep
    }
}

/// `for i := range(a, b, step)` → a counted `for` loop.
pub(crate) struct RangeRangeToFor;

impl Pass for RangeRangeToFor {
    fn name(&self) -> &'static str {
        "RangeRangeToFor"
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(range) = range_parts(cx, id) else {
            return Rewrite::Keep;
        };
        if callee_name(cx.arena, range.x) != Some("range") || !is_blank(cx, range.key) {
            return Rewrite::Keep;
        }
        let name = match cx.arena.ident_name(range.value) {
            Some("_") => "_i".to_owned(),
            Some(name) => name.to_owned(),
            None => return Rewrite::Keep,
        };
        let (start, stop, step) = match call_args(cx.arena, range.x).as_slice() {
            [stop] => (cx.arena.int_lit(0), *stop, None),
            [start, stop] => (*start, *stop, None),
            [start, stop, step] => (*start, *stop, Some(*step)),
            _ => return Rewrite::Keep,
        };

        let var = cx.arena.ident(&name);
        let init = cx.arena.define(var, start);
        let counter = cx.arena.ident(&name);
        let (cmp, post) = match step {
            None => (Token::Lss, cx.arena.inc_dec(counter, Token::Inc)),
            Some(step) if is_int_lit(cx.arena, step, "1") => {
                (Token::Lss, cx.arena.inc_dec(counter, Token::Inc))
            }
            Some(step) => match cx.arena.kind(step) {
                NodeKind::UnaryExpr { op: Token::Sub, x }
                    if matches!(cx.arena.get(*x), Some(NodeKind::BasicLit { .. })) =>
                {
                    let magnitude = *x;
                    if is_int_lit(cx.arena, magnitude, "1") {
                        (Token::Gtr, cx.arena.inc_dec(counter, Token::Dec))
                    } else {
                        let post =
                            cx.arena
                                .assign(vec![counter], Token::SubAssign, vec![magnitude]);
                        (Token::Gtr, post)
                    }
                }
                _ => {
                    let post = cx.arena.assign(vec![counter], Token::AddAssign, vec![step]);
                    (Token::Lss, post)
                }
            },
        };
        let bound = cx.arena.ident(&name);
        let cond = cx.arena.binary(bound, cmp, stop);
        Rewrite::Replace(cx.arena.alloc(NodeKind::ForStmt {
            init,
            cond,
            post,
            body: range.body,
        }))
    }
}

/// Element type of a generator handle `func() chan T`.
fn generator_elem(ty: &GoType) -> Option<&GoType> {
    let GoType::Func(sig) = ty else {
        return None;
    };
    match (sig.params.as_slice(), sig.results.as_slice()) {
        ([], [GoType::Chan(_, elt)]) => Some(elt),
        _ => None,
    }
}

/// `value, ok := <-handle()`, or `=` for the loop post statement.
fn pull(cx: &mut Cx<'_>, handle: NodeId, value: NodeId, tok: Token) -> NodeId {
    let handle = cx.arena.deep_copy(handle);
    let call = cx.arena.call(handle, Vec::new());
    let recv = cx.arena.recv(call);
    let ok = cx.arena.ident("ok");
    cx.arena.assign(vec![value, ok], tok, vec![recv])
}

/// Ranging over a generator: pull values until the channel closes.
pub(crate) struct YieldRangeTransformer;

impl YieldRangeTransformer {
    /// `for v, ok := <-g(); ok; v, ok = <-g() { body }`, with a temporary
    /// for `g` unless it is a plain name.
    fn lower(cx: &mut Cx<'_>, range: &Range) -> NodeId {
        let value = if range.value.is_valid() {
            range.value
        } else {
            cx.arena.ident("_")
        };
        let (handle, setup) = if cx.arena.ident_name(range.x).is_some() {
            (range.x, None)
        } else {
            let temp = cx.arena.ident("generator");
            let setup = cx.arena.define(temp, range.x);
            (cx.arena.ident("generator"), Some(setup))
        };
        let init = pull(cx, handle, value, Token::Define);
        let again = cx.arena.deep_copy(value);
        let post = pull(cx, handle, again, Token::Assign);
        let cond = cx.arena.ident("ok");
        let for_stmt = cx.arena.alloc(NodeKind::ForStmt {
            init,
            cond,
            post,
            body: range.body,
        });
        match setup {
            Some(setup) => cx.arena.block(vec![setup, for_stmt]),
            None => for_stmt,
        }
    }
}

impl Pass for YieldRangeTransformer {
    fn name(&self) -> &'static str {
        "YieldRangeTransformer"
    }

    fn repeatable(&self) -> bool {
        false
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(range) = range_parts(cx, id) else {
            return Rewrite::Keep;
        };
        if !is_blank(cx, range.key) || pair(cx, range.value).is_some() {
            return Rewrite::Keep;
        }
        match cx.type_of(range.x) {
            Some(ty) if generator_elem(&ty).is_some() => Rewrite::Replace(Self::lower(cx, &range)),
            Some(_) => Rewrite::Keep,
            None => {
                cx.defer_type(id, range.x);
                Rewrite::Keep
            }
        }
    }

    fn resolved(&mut self, cx: &mut Cx<'_>, node: NodeId, ty: &GoType) {
        if generator_elem(ty).is_none() {
            return;
        }
        let Some(range) = range_parts(cx, node) else {
            return;
        };
        let lowered = Self::lower(cx, &range);
        let root = cx.root;
        replace_node(cx.arena, root, node, lowered);
    }
}

/// Ranging over a set yields its members, which are the map keys.
pub(crate) struct LoopThroughSetValuesNotKeys;

impl Pass for LoopThroughSetValuesNotKeys {
    fn name(&self) -> &'static str {
        "LoopThroughSetValuesNotKeys"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(range) = range_parts(cx, id) else {
            return Rewrite::Keep;
        };
        if !is_blank(cx, range.key) || is_blank(cx, range.value) {
            return Rewrite::Keep;
        }
        let Some(GoType::Map(_, value)) = cx.type_of(range.x) else {
            return Rewrite::Keep;
        };
        if *value != GoType::empty_struct() {
            return Rewrite::Keep;
        }
        set_range(
            cx,
            id,
            Range {
                key: range.value,
                value: NodeId::INVALID,
                ..range
            },
        );
        Rewrite::Keep
    }
}

/// Ranging over an open file yields its lines.
pub(crate) struct LoopThroughFileLines;

impl Pass for LoopThroughFileLines {
    fn name(&self) -> &'static str {
        "LoopThroughFileLines"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(range) = range_parts(cx, id) else {
            return Rewrite::Keep;
        };
        if !is_blank(cx, range.key) {
            return Rewrite::Keep;
        }
        let file = GoType::pointer(GoType::qualified("os", "File"));
        let is_file = cx.type_of(range.x).as_ref() == Some(&file)
            || qualified(cx.arena, range.x) == Some(("os", "Stdin"));
        if !is_file {
            return Rewrite::Keep;
        }
        // { scanner := bufio.NewScanner(f); for scanner.Scan() { v := scanner.Text(); ... } }
        let scanner = cx.arena.ident("scanner");
        let new_scanner = cx.arena.call_path("bufio.NewScanner", vec![range.x]);
        let setup = cx.arena.define(scanner, new_scanner);
        let cond = cx.arena.call_path("scanner.Scan", Vec::new());
        if !is_blank(cx, range.value) {
            let text = cx.arena.call_path("scanner.Text", Vec::new());
            let line = cx.arena.define(range.value, text);
            if let NodeKind::BlockStmt { list } = cx.arena.kind_mut(range.body) {
                list.insert(0, line);
            }
        }
        let lines = cx.arena.alloc(NodeKind::ForStmt {
            init: NodeId::INVALID,
            cond,
            post: NodeId::INVALID,
            body: range.body,
        });
        Rewrite::Replace(cx.arena.block(vec![setup, lines]))
    }
}

#[cfg(test)]
mod tests;
