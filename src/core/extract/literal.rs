//! Resolution of the composite literal a function returns.
//!
//! Three source idioms are recognized:
//!
//! ```go
//! return &schema.Resource{...}            // 1. direct return
//!
//! r := &schema.Resource{...}              // 2. bound, then returned
//! return r
//!
//! var r = &schema.Resource{...}           // 3. declared, then returned
//! return r
//! ```
//!
//! Return statements nested in `if`/`for`/`switch` bodies count as well.

use crate::core::parsers::ast::{CompositeLit, Expr, Stmt};

/// All composite literals the body returns, ordered by idiom (direct returns
/// first, then bound variables, then declared variables) and by source order
/// within an idiom. Duplicates are removed.
pub fn resolve_returned_literals(body: &[Stmt]) -> Vec<&CompositeLit> {
    let mut stmts = Vec::new();
    flatten(body, &mut stmts);

    let mut found: Vec<&CompositeLit> = Vec::new();

    // 1. return T{...}
    for stmt in &stmts {
        if let Stmt::Return(values) = stmt
            && let Some(lit) = values.first().and_then(Expr::as_composite)
        {
            push_unique(&mut found, lit);
        }
    }

    // 2. x := T{...} / x = T{...}; return x
    for lit in bound_literals(&stmts, |stmt| match stmt {
        Stmt::Define { names, values } | Stmt::Assign { names, values } => {
            vec![(names.as_slice(), values.as_slice())]
        }
        _ => Vec::new(),
    }) {
        push_unique(&mut found, lit);
    }

    // 3. var x = T{...}; return x
    for lit in bound_literals(&stmts, |stmt| match stmt {
        Stmt::Var(specs) => specs
            .iter()
            .map(|s| (s.names.as_slice(), s.values.as_slice()))
            .collect(),
        _ => Vec::new(),
    }) {
        push_unique(&mut found, lit);
    }

    found
}

/// First returned literal, the policy every caller uses.
pub fn resolve_returned_literal(body: &[Stmt]) -> Option<&CompositeLit> {
    resolve_returned_literals(body).into_iter().next()
}

fn push_unique<'a>(found: &mut Vec<&'a CompositeLit>, lit: &'a CompositeLit) {
    if !found.iter().any(|f| std::ptr::eq(*f, lit)) {
        found.push(lit);
    }
}

/// Statements in source order with nested blocks inlined.
fn flatten<'a>(stmts: &'a [Stmt], out: &mut Vec<&'a Stmt>) {
    for stmt in stmts {
        match stmt {
            Stmt::Block(inner) => flatten(inner, out),
            other => out.push(other),
        }
    }
}

/// Literals bound to a returned identifier by statements preceding the return.
fn bound_literals<'a, F>(stmts: &[&'a Stmt], bindings: F) -> Vec<&'a CompositeLit>
where
    F: Fn(&'a Stmt) -> Vec<(&'a [String], &'a [Expr])>,
{
    let mut found = Vec::new();
    for (index, stmt) in stmts.iter().enumerate() {
        let Stmt::Return(values) = stmt else {
            continue;
        };
        let Some(name) = values.first().and_then(Expr::as_ident) else {
            continue;
        };

        for earlier in &stmts[..index] {
            for (names, values) in bindings(*earlier) {
                if let Some(lit) = bound_value(names, values, name).and_then(Expr::as_composite) {
                    found.push(lit);
                }
            }
        }
    }
    found
}

/// Value assigned to `name` in a `names = values` binding.
fn bound_value<'a>(names: &[String], values: &'a [Expr], name: &str) -> Option<&'a Expr> {
    if names.len() != values.len() {
        return None;
    }
    names
        .iter()
        .position(|n| n == name)
        .and_then(|i| values.get(i))
}
