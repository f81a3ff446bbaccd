//! Go source parsing.
//!
//! Parses with tree-sitter-go and lowers the concrete tree into the typed
//! [`GoFile`] representation. Lowering is tolerant: shapes that are not
//! modelled become `Other` variants instead of errors. A tree containing
//! syntax errors is rejected as a whole.

use anyhow::{Result, anyhow, bail};
use tree_sitter::{Node, Parser};

use super::ast::{
    CompositeLit, Decl, Element, Expr, Field, FuncDecl, GoFile, Receiver, Stmt, StructType,
    TypeDecl, TypeExpr, TypeRef, TypeSpec, VarSpec,
};

/// A parsed and lowered Go file.
#[derive(Debug, Clone)]
pub struct ParsedGo {
    pub file: GoFile,
}

/// Parse Go source code into the typed syntax tree.
///
/// Fails if tree-sitter cannot produce a tree or if the tree contains error
/// or missing nodes.
pub fn parse_go_source(code: &str, file_path: &str) -> Result<ParsedGo> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| anyhow!("Failed to load Go grammar: {}", e))?;

    let tree = parser
        .parse(code, None)
        .ok_or_else(|| anyhow!("Failed to parse go source: {}", file_path))?;

    let root = tree.root_node();
    if root.has_error() {
        match first_error(root) {
            Some(node) => {
                let pos = node.start_position();
                bail!(
                    "Syntax error at {}:{}:{}",
                    file_path,
                    pos.row + 1,
                    pos.column + 1
                );
            }
            None => bail!("Syntax error in {}", file_path),
        }
    }

    let file = Lowerer::new(code.as_bytes()).lower_file(root);
    Ok(ParsedGo { file })
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect()
}

struct Lowerer<'a> {
    src: &'a [u8],
}

impl<'a> Lowerer<'a> {
    fn new(src: &'a [u8]) -> Self {
        Self { src }
    }

    fn text(&self, node: Node) -> &'a str {
        node.utf8_text(self.src).unwrap_or_default()
    }

    fn lower_file(&self, root: Node) -> GoFile {
        let mut cursor = root.walk();
        let children: Vec<Node> = root.named_children(&mut cursor).collect();

        let mut file = GoFile::default();
        for (index, child) in children.iter().enumerate() {
            match child.kind() {
                "package_clause" => {}
                "function_declaration" | "method_declaration" => {
                    let doc = self.doc_comment(&children, index);
                    file.decls.push(Decl::Func(self.lower_func(*child, doc)));
                }
                "type_declaration" => {
                    let doc = self.doc_comment(&children, index);
                    file.decls.push(Decl::Type(self.lower_type_decl(*child, doc)));
                }
                "comment" => {}
                _ => file.decls.push(Decl::Other),
            }
        }
        file
    }

    /// Leading comment block of `siblings[index]`.
    ///
    /// Comments belong to the block while each one ends on the line directly
    /// above the next, and none shares a line with preceding code.
    fn doc_comment(&self, siblings: &[Node], index: usize) -> Option<String> {
        let mut lines = Vec::new();
        let mut next_row = siblings[index].start_position().row;

        for i in (0..index).rev() {
            let node = siblings[i];
            if node.kind() != "comment" || node.end_position().row + 1 != next_row {
                break;
            }
            let start_row = node.start_position().row;
            if i > 0
                && siblings[i - 1].kind() != "comment"
                && siblings[i - 1].end_position().row == start_row
            {
                break;
            }
            lines.push(strip_comment_markers(self.text(node)));
            next_row = start_row;
        }

        if lines.is_empty() {
            return None;
        }
        lines.reverse();
        Some(lines.join("\n"))
    }

    fn lower_func(&self, node: Node, doc: Option<String>) -> FuncDecl {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();

        let receiver = if node.kind() == "method_declaration" {
            node.child_by_field_name("receiver")
                .and_then(|r| self.lower_receiver(r))
        } else {
            None
        };

        let body = node
            .child_by_field_name("body")
            .map(|b| self.lower_block(b))
            .unwrap_or_default();

        FuncDecl {
            name,
            receiver,
            doc,
            body,
        }
    }

    fn lower_receiver(&self, params: Node) -> Option<Receiver> {
        let param = named_children(params)
            .into_iter()
            .find(|n| n.kind() == "parameter_declaration")?;
        let ty = self.lower_type_ref(param.child_by_field_name("type")?);
        let pointer = matches!(ty, TypeRef::Pointer(_));
        let type_name = ty.base_name()?.to_string();
        Some(Receiver { type_name, pointer })
    }

    fn lower_block(&self, block: Node) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        for child in named_children(block) {
            if child.kind() == "statement_list" {
                stmts.extend(named_children(child).into_iter().map(|s| self.lower_stmt(s)));
            } else {
                stmts.push(self.lower_stmt(child));
            }
        }
        stmts
    }

    fn lower_stmt(&self, node: Node) -> Stmt {
        match node.kind() {
            "return_statement" => {
                let values = named_children(node)
                    .into_iter()
                    .find(|n| n.kind() == "expression_list")
                    .map(|list| self.lower_expr_list(list))
                    .unwrap_or_default();
                Stmt::Return(values)
            }
            "short_var_declaration" => Stmt::Define {
                names: self.field_names(node, "left"),
                values: self.field_exprs(node, "right"),
            },
            "assignment_statement" => {
                let operator = node
                    .child_by_field_name("operator")
                    .map(|op| self.text(op))
                    .unwrap_or("=");
                if operator != "=" {
                    return Stmt::Other;
                }
                Stmt::Assign {
                    names: self.field_names(node, "left"),
                    values: self.field_exprs(node, "right"),
                }
            }
            "var_declaration" => Stmt::Var(self.lower_var_specs(node)),
            "block" | "statement_list" => Stmt::Block(self.lower_block(node)),
            "if_statement" => {
                let mut stmts = Vec::new();
                for field in ["initializer", "consequence", "alternative"] {
                    if let Some(child) = node.child_by_field_name(field) {
                        stmts.push(self.lower_stmt(child));
                    }
                }
                Stmt::Block(stmts)
            }
            "for_statement" => node
                .child_by_field_name("body")
                .map(|b| Stmt::Block(self.lower_block(b)))
                .unwrap_or(Stmt::Other),
            "expression_switch_statement" | "type_switch_statement" | "select_statement" => {
                let cases = named_children(node)
                    .into_iter()
                    .filter(|c| c.kind().ends_with("_case"))
                    .map(|c| Stmt::Block(self.lower_block(c)))
                    .collect();
                Stmt::Block(cases)
            }
            "labeled_statement" => named_children(node)
                .into_iter()
                .find(|n| n.kind() != "label_name")
                .map(|inner| self.lower_stmt(inner))
                .unwrap_or(Stmt::Other),
            _ => Stmt::Other,
        }
    }

    fn lower_var_specs(&self, node: Node) -> Vec<VarSpec> {
        let mut specs = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "var_spec" => specs.push(self.lower_var_spec(child)),
                "var_spec_list" => specs.extend(self.lower_var_specs(child)),
                _ => {}
            }
        }
        specs
    }

    fn lower_var_spec(&self, node: Node) -> VarSpec {
        let mut cursor = node.walk();
        let names = node
            .children_by_field_name("name", &mut cursor)
            .map(|n| self.text(n).to_string())
            .collect();
        VarSpec {
            names,
            values: self.field_exprs(node, "value"),
        }
    }

    /// Identifiers of an expression-list field; non-identifiers become `_`.
    fn field_names(&self, node: Node, field: &str) -> Vec<String> {
        self.field_exprs(node, field)
            .into_iter()
            .map(|e| match e {
                Expr::Ident(name) => name,
                _ => "_".to_string(),
            })
            .collect()
    }

    fn field_exprs(&self, node: Node, field: &str) -> Vec<Expr> {
        match node.child_by_field_name(field) {
            Some(list) if list.kind() == "expression_list" => self.lower_expr_list(list),
            Some(expr) => vec![self.lower_expr(expr)],
            None => Vec::new(),
        }
    }

    fn lower_expr_list(&self, list: Node) -> Vec<Expr> {
        named_children(list)
            .into_iter()
            .map(|n| self.lower_expr(n))
            .collect()
    }

    fn lower_expr(&self, node: Node) -> Expr {
        match node.kind() {
            "identifier" | "field_identifier" | "type_identifier" | "package_identifier" => {
                Expr::Ident(self.text(node).to_string())
            }
            "selector_expression" => {
                let (Some(operand), Some(field)) = (
                    node.child_by_field_name("operand"),
                    node.child_by_field_name("field"),
                ) else {
                    return Expr::Other;
                };
                Expr::Selector {
                    operand: Box::new(self.lower_expr(operand)),
                    field: self.text(field).to_string(),
                }
            }
            "qualified_type" => {
                let (Some(package), Some(name)) = (
                    node.child_by_field_name("package"),
                    node.child_by_field_name("name"),
                ) else {
                    return Expr::Other;
                };
                Expr::Selector {
                    operand: Box::new(Expr::Ident(self.text(package).to_string())),
                    field: self.text(name).to_string(),
                }
            }
            "call_expression" => {
                let Some(func) = node.child_by_field_name("function") else {
                    return Expr::Other;
                };
                let args = node
                    .child_by_field_name("arguments")
                    .map(|a| {
                        named_children(a)
                            .into_iter()
                            .map(|n| self.lower_expr(n))
                            .collect()
                    })
                    .unwrap_or_default();
                Expr::Call {
                    func: Box::new(self.lower_expr(func)),
                    args,
                }
            }
            "composite_literal" => {
                let ty = node.child_by_field_name("type").map(|t| self.lower_type_ref(t));
                match node.child_by_field_name("body") {
                    Some(body) => Expr::Composite(self.lower_literal_value(body, ty)),
                    None => Expr::Other,
                }
            }
            "literal_value" => Expr::Composite(self.lower_literal_value(node, None)),
            "literal_element" | "parenthesized_expression" => named_children(node)
                .first()
                .map(|inner| self.lower_expr(*inner))
                .unwrap_or(Expr::Other),
            "unary_expression" => {
                let (Some(op), Some(operand)) = (
                    node.child_by_field_name("operator"),
                    node.child_by_field_name("operand"),
                ) else {
                    return Expr::Other;
                };
                Expr::Unary {
                    op: self.text(op).to_string(),
                    operand: Box::new(self.lower_expr(operand)),
                }
            }
            "interpreted_string_literal" => Expr::StringLit(unquote(self.text(node))),
            "raw_string_literal" => Expr::StringLit(self.text(node).trim_matches('`').to_string()),
            "func_literal" => Expr::FuncLit,
            _ => Expr::Other,
        }
    }

    fn lower_literal_value(&self, body: Node, ty: Option<TypeRef>) -> CompositeLit {
        let mut elements = Vec::new();
        for child in named_children(body) {
            match child.kind() {
                "keyed_element" => {
                    let parts = named_children(child);
                    if let [key, value, ..] = parts.as_slice() {
                        elements.push(Element::Keyed {
                            key: self.key_text(*key),
                            value: self.lower_expr(*value),
                        });
                    }
                }
                _ => elements.push(Element::Positional(self.lower_expr(child))),
            }
        }
        CompositeLit { ty, elements }
    }

    fn key_text(&self, key: Node) -> String {
        match self.lower_expr(key) {
            Expr::Ident(name) => name,
            Expr::StringLit(value) => value,
            _ => self.text(key).to_string(),
        }
    }

    fn lower_type_ref(&self, node: Node) -> TypeRef {
        match node.kind() {
            "type_identifier" | "identifier" => TypeRef::Named(self.text(node).to_string()),
            "qualified_type" => match (
                node.child_by_field_name("package"),
                node.child_by_field_name("name"),
            ) {
                (Some(package), Some(name)) => TypeRef::Qualified {
                    package: self.text(package).to_string(),
                    name: self.text(name).to_string(),
                },
                _ => TypeRef::Other(self.text(node).to_string()),
            },
            "pointer_type" => match named_children(node).first() {
                Some(inner) => TypeRef::Pointer(Box::new(self.lower_type_ref(*inner))),
                None => TypeRef::Other(self.text(node).to_string()),
            },
            "generic_type" => match node.child_by_field_name("type") {
                Some(base) => TypeRef::Generic {
                    base: Box::new(self.lower_type_ref(base)),
                    args: node
                        .child_by_field_name("type_arguments")
                        .map(|a| self.text(a).to_string())
                        .unwrap_or_default(),
                },
                None => TypeRef::Other(self.text(node).to_string()),
            },
            "parenthesized_type" => match named_children(node).first() {
                Some(inner) => self.lower_type_ref(*inner),
                None => TypeRef::Other(self.text(node).to_string()),
            },
            _ => TypeRef::Other(self.text(node).to_string()),
        }
    }

    fn lower_type_decl(&self, node: Node, doc: Option<String>) -> TypeDecl {
        let mut specs = Vec::new();
        self.collect_type_specs(node, &mut specs);
        TypeDecl {
            doc,
            specs,
        }
    }

    fn collect_type_specs(&self, node: Node, specs: &mut Vec<TypeSpec>) {
        for child in named_children(node) {
            match child.kind() {
                "type_spec" => {
                    let (Some(name), Some(ty)) = (
                        child.child_by_field_name("name"),
                        child.child_by_field_name("type"),
                    ) else {
                        continue;
                    };
                    let ty = match ty.kind() {
                        "struct_type" => TypeExpr::Struct(self.lower_struct(ty)),
                        "interface_type" => TypeExpr::Other,
                        _ => TypeExpr::Ref(self.lower_type_ref(ty)),
                    };
                    specs.push(TypeSpec {
                        name: self.text(name).to_string(),
                        ty,
                    });
                }
                "type_spec_list" => self.collect_type_specs(child, specs),
                _ => {}
            }
        }
    }

    fn lower_struct(&self, node: Node) -> StructType {
        let mut fields = Vec::new();
        let Some(list) = named_children(node)
            .into_iter()
            .find(|n| n.kind() == "field_declaration_list")
        else {
            return StructType { fields };
        };

        for decl in named_children(list) {
            if decl.kind() != "field_declaration" {
                continue;
            }
            let Some(ty_node) = decl.child_by_field_name("type") else {
                continue;
            };
            let mut cursor = decl.walk();
            let names: Vec<String> = decl
                .children_by_field_name("name", &mut cursor)
                .map(|n| self.text(n).to_string())
                .collect();

            let mut ty = self.lower_type_ref(ty_node);
            if names.is_empty() {
                let mut cursor = decl.walk();
                let starred = decl.children(&mut cursor).any(|c| c.kind() == "*");
                if starred {
                    ty = TypeRef::Pointer(Box::new(ty));
                }
            }
            fields.push(Field { names, ty });
        }
        StructType { fields }
    }
}

/// Strip `//` or `/* */` markers and surrounding whitespace.
fn strip_comment_markers(text: &str) -> String {
    if let Some(rest) = text.strip_prefix("//") {
        return rest.trim().to_string();
    }
    if let Some(rest) = text.strip_prefix("/*") {
        let rest = rest.strip_suffix("*/").unwrap_or(rest);
        return rest
            .lines()
            .map(|l| l.trim().trim_start_matches('*').trim())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();
    }
    text.trim().to_string()
}

/// Decode a Go interpreted string literal including its quotes.
fn unquote(literal: &str) -> String {
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('a') => out.push('\u{07}'),
            Some('b') => out.push('\u{08}'),
            Some('f') => out.push('\u{0C}'),
            Some('v') => out.push('\u{0B}'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(kind @ ('x' | 'u' | 'U')) => {
                let width = match kind {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = (0..width).filter_map(|_| chars.next()).collect();
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push(kind);
                        out.push_str(&digits);
                    }
                }
            }
            Some(d @ '0'..='7') => {
                let mut digits = String::from(d);
                while digits.len() < 3 {
                    match chars.peek() {
                        Some(next @ '0'..='7') => {
                            digits.push(*next);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                match u32::from_str_radix(&digits, 8).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push_str(&digits);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(code: &str) -> GoFile {
        parse_go_source(code, "test.go").unwrap().file
    }

    fn first_func(file: &GoFile) -> &FuncDecl {
        file.decls
            .iter()
            .find_map(|d| match d {
                Decl::Func(f) => Some(f),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_package_clause_only() {
        let file = parse("package ec2\n");
        assert!(file.decls.is_empty());
    }

    #[test]
    fn test_syntax_error_is_rejected() {
        let result = parse_go_source("package x\nfunc broken( {\n", "broken.go");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("broken.go"), "unexpected error: {}", err);
    }

    #[test]
    fn test_generic_type_alias_is_rejected() {
        // tree-sitter-go 0.23 predates generic type aliases (Go 1.24).
        let result = parse_go_source("package p\ntype A[T any] = B[T]\n", "p.go");
        let err = result.unwrap_err().to_string();
        assert!(
            err.starts_with("Syntax error at p.go:2:"),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn test_doc_comment_block() {
        let code = r#"package x

// unrelated

// @SDKResource("aws_foo", name="Foo")
// second line
func resourceFoo() {}
"#;
        let file = parse(code);
        let func = first_func(&file);
        assert_eq!(func.name, "resourceFoo");
        assert_eq!(
            func.doc.as_deref(),
            Some("@SDKResource(\"aws_foo\", name=\"Foo\")\nsecond line")
        );
    }

    #[test]
    fn test_blank_line_detaches_comment() {
        let code = r#"package x

// @SDKResource("aws_foo")

func resourceFoo() {}
"#;
        let file = parse(code);
        assert_eq!(first_func(&file).doc, None);
    }

    #[test]
    fn test_method_receiver() {
        let code = r#"package x

func (r *fooResource) Schema(ctx context.Context) {}
"#;
        let file = parse(code);
        let func = first_func(&file);
        assert_eq!(func.name, "Schema");
        assert_eq!(
            func.receiver,
            Some(Receiver {
                type_name: "fooResource".to_string(),
                pointer: true,
            })
        );
    }

    #[test]
    fn test_generic_receiver() {
        let code = r#"package x

func (r *fooResource[M]) Schema() {}
"#;
        let file = parse(code);
        let receiver = first_func(&file).receiver.clone().unwrap();
        assert_eq!(receiver.type_name, "fooResource");
        assert!(receiver.pointer);
    }

    #[test]
    fn test_return_of_address_of_composite() {
        let code = r#"package x

func resourceFoo() *schema.Resource {
	return &schema.Resource{
		CreateWithoutTimeout: resourceFooCreate,
		ReadWithoutTimeout:   schema.NoopContext,
	}
}
"#;
        let file = parse(code);
        let func = first_func(&file);
        let Stmt::Return(values) = &func.body[0] else {
            panic!("expected return, got {:?}", func.body[0]);
        };
        let lit = values[0].as_composite().unwrap();
        assert_eq!(
            lit.ty,
            Some(TypeRef::Qualified {
                package: "schema".to_string(),
                name: "Resource".to_string(),
            })
        );
        assert_eq!(
            lit.field("CreateWithoutTimeout"),
            Some(&Expr::Ident("resourceFooCreate".to_string()))
        );
        assert_eq!(
            lit.field("ReadWithoutTimeout").and_then(|e| e.as_qualified()),
            Some(("schema", "NoopContext"))
        );
    }

    #[test]
    fn test_short_var_and_var_declarations() {
        let code = r#"package x

func a() *schema.Resource {
	r := &schema.Resource{}
	var v = &schema.Resource{}
	r = v
	return r
}
"#;
        let file = parse(code);
        let body = &first_func(&file).body;
        assert!(matches!(&body[0], Stmt::Define { names, .. } if names == &["r"]));
        assert!(matches!(&body[1], Stmt::Var(specs) if specs[0].names == ["v"]));
        assert!(matches!(&body[2], Stmt::Assign { names, .. } if names == &["r"]));
        assert!(matches!(&body[3], Stmt::Return(values) if values[0] == Expr::Ident("r".into())));
    }

    #[test]
    fn test_elided_slice_elements() {
        let code = r#"package x

func (p *servicePackage) SDKResources(ctx context.Context) []*inttypes.ServicePackageSDKResource {
	return []*inttypes.ServicePackageSDKResource{
		{
			Factory:  resourceFoo,
			TypeName: "aws_foo",
		},
	}
}
"#;
        let file = parse(code);
        let func = first_func(&file);
        assert!(func.receiver.is_some());
        let Stmt::Return(values) = &func.body[0] else {
            panic!("expected return");
        };
        let slice = values[0].as_composite().unwrap();
        let element = slice.positional().next().unwrap().as_composite().unwrap();
        assert_eq!(element.ty, None);
        assert_eq!(
            element.field("TypeName"),
            Some(&Expr::StringLit("aws_foo".to_string()))
        );
    }

    #[test]
    fn test_struct_embedded_fields() {
        let code = r#"package x

type fooResource struct {
	framework.ResourceWithModel[fooResourceModel]
	*helper
	name string
}
"#;
        let file = parse(code);
        let Decl::Type(decl) = &file.decls[0] else {
            panic!("expected type decl");
        };
        let TypeExpr::Struct(st) = &decl.specs[0].ty else {
            panic!("expected struct");
        };
        let embedded: Vec<_> = st.embedded().collect();
        assert_eq!(embedded.len(), 2);
        assert_eq!(embedded[0].package(), Some("framework"));
        assert_eq!(embedded[0].base_name(), Some("ResourceWithModel"));
        assert!(matches!(embedded[1], TypeRef::Pointer(_)));
    }

    #[test]
    fn test_nested_return_in_if() {
        let code = r#"package x

func a(ok bool) *schema.Resource {
	if ok {
		return &schema.Resource{}
	}
	return nil
}
"#;
        let file = parse(code);
        let body = &first_func(&file).body;
        assert!(matches!(&body[0], Stmt::Block(_)));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote(r#""plain""#), "plain");
        assert_eq!(unquote(r#""a\tb\n""#), "a\tb\n");
        assert_eq!(unquote(r#""q\"x\\""#), "q\"x\\");
        assert_eq!(unquote(r#""\x41é""#), "Aé");
        assert_eq!(unquote(r#""\101""#), "A");
    }

    #[test]
    fn test_strip_comment_markers() {
        assert_eq!(strip_comment_markers("// hello "), "hello");
        assert_eq!(strip_comment_markers("/* a\n * b */"), "a\nb");
    }
}
