//! TypeScript printer for declaration trees.
//!
//! Output uses four-space indentation and `\n` line terminators.

use super::ast::*;

/// How an item is printed relative to its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    /// Prefix the declaration with `export`.
    pub exported: bool,
    /// The container is already ambient, so `declare` is implied.
    pub ambient: bool,
}

impl Context {
    /// Direct children of a namespace body.
    pub const NAMESPACE_BODY: Context = Context {
        exported: true,
        ambient: true,
    };
}

/// Print a parsed file. Top-level items keep no `export` modifier.
pub fn file_to_string(file: &DtsFile) -> String {
    let mut out = String::new();
    let ctx = Context {
        exported: false,
        ambient: false,
    };
    for item in &file.items {
        write_item(item, ctx, 0, &mut out);
    }
    out
}

pub fn indent(level: usize, out: &mut String) {
    for _ in 0..level {
        out.push_str("    ");
    }
}

/// Write a JSDoc block at the given indentation.
pub fn write_doc(doc: &str, level: usize, out: &mut String) {
    let lines: Vec<&str> = doc.lines().collect();
    indent(level, out);
    if lines.len() <= 1 {
        out.push_str("/** ");
        out.push_str(doc.trim());
        out.push_str(" */\n");
        return;
    }

    out.push_str("/**\n");
    for line in lines {
        indent(level, out);
        if line.is_empty() {
            out.push_str(" *\n");
        } else {
            out.push_str(" * ");
            out.push_str(line);
            out.push('\n');
        }
    }
    indent(level, out);
    out.push_str(" */\n");
}

fn write_opt_doc(doc: Option<&String>, level: usize, out: &mut String) {
    if let Some(doc) = doc {
        write_doc(doc, level, out);
    }
}

/// Write `export ` and `declare ` as the context requires.
fn write_modifiers(ctx: Context, runtime: bool, out: &mut String) {
    if ctx.exported {
        out.push_str("export ");
    }
    if runtime && !ctx.ambient {
        out.push_str("declare ");
    }
}

/// Write one declaration followed by a newline.
pub fn write_item(item: &DtsItem, ctx: Context, level: usize, out: &mut String) {
    match item {
        DtsItem::Function(f) => write_function(f, ctx, level, out),
        DtsItem::Interface(i) => write_interface(i, ctx, level, out),
        DtsItem::TypeAlias(t) => write_type_alias(t, ctx, level, out),
        DtsItem::Class(c) => write_class(c, ctx, level, out),
        DtsItem::Enum(e) => write_enum(e, ctx, level, out),
        DtsItem::Variable(v) => write_variable(v, ctx, level, out),
        DtsItem::Namespace(ns) => write_namespace(ns, ctx, level, out),
        DtsItem::Module(m) => write_module(m, ctx, level, out),
        DtsItem::Export(e) => write_export(e, level, out),
    }
}

fn write_function(f: &DtsFunction, ctx: Context, level: usize, out: &mut String) {
    write_opt_doc(f.doc.as_ref(), level, out);
    indent(level, out);
    write_modifiers(ctx, true, out);
    out.push_str("function ");
    out.push_str(&f.name);
    write_type_params(&f.type_params, out);
    write_params(f.this_param.as_deref(), &f.params, out);
    write_return_annotation(f.return_type.as_ref(), out);
    out.push_str(";\n");
}

fn write_interface(i: &DtsInterface, ctx: Context, level: usize, out: &mut String) {
    write_opt_doc(i.doc.as_ref(), level, out);
    indent(level, out);
    write_modifiers(ctx, false, out);
    out.push_str("interface ");
    out.push_str(&i.name);
    write_type_params(&i.type_params, out);
    if !i.extends.is_empty() {
        out.push_str(" extends ");
        write_type_list(&i.extends, out);
    }
    out.push_str(" {\n");
    for member in &i.members {
        write_interface_member(member, level + 1, out);
    }
    indent(level, out);
    out.push_str("}\n");
}

fn write_type_alias(t: &DtsTypeAlias, ctx: Context, level: usize, out: &mut String) {
    write_opt_doc(t.doc.as_ref(), level, out);
    indent(level, out);
    write_modifiers(ctx, false, out);
    out.push_str("type ");
    out.push_str(&t.name);
    write_type_params(&t.type_params, out);
    out.push_str(" = ");
    write_type_at(&t.ty, level, out);
    out.push_str(";\n");
}

fn write_class(c: &DtsClass, ctx: Context, level: usize, out: &mut String) {
    write_opt_doc(c.doc.as_ref(), level, out);
    indent(level, out);
    write_modifiers(ctx, true, out);
    if c.is_abstract {
        out.push_str("abstract ");
    }
    out.push_str("class ");
    out.push_str(&c.name);
    write_type_params(&c.type_params, out);
    if let Some(base) = &c.extends {
        out.push_str(" extends ");
        write_type(base, out);
    }
    if !c.implements.is_empty() {
        out.push_str(" implements ");
        write_type_list(&c.implements, out);
    }
    out.push_str(" {\n");
    for member in &c.members {
        write_class_member(member, level + 1, out);
    }
    indent(level, out);
    out.push_str("}\n");
}

fn write_enum(e: &DtsEnum, ctx: Context, level: usize, out: &mut String) {
    write_opt_doc(e.doc.as_ref(), level, out);
    indent(level, out);
    write_modifiers(ctx, true, out);
    if e.is_const {
        out.push_str("const ");
    }
    out.push_str("enum ");
    out.push_str(&e.name);
    out.push_str(" {\n");
    for (i, member) in e.members.iter().enumerate() {
        write_opt_doc(member.doc.as_ref(), level + 1, out);
        indent(level + 1, out);
        out.push_str(&member.name);
        if let Some(init) = &member.initializer {
            out.push_str(" = ");
            out.push_str(init);
        }
        if i + 1 < e.members.len() {
            out.push(',');
        }
        out.push('\n');
    }
    indent(level, out);
    out.push_str("}\n");
}

fn write_variable(v: &DtsVariableStatement, ctx: Context, level: usize, out: &mut String) {
    write_opt_doc(v.doc.as_ref(), level, out);
    indent(level, out);
    write_modifiers(ctx, true, out);
    out.push_str(&v.kind.to_string());
    out.push(' ');
    for (i, decl) in v.declarations.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&decl.name);
        if let Some(ty) = &decl.ty {
            out.push_str(": ");
            write_type_at(ty, level, out);
        }
        if let Some(init) = &decl.initializer {
            out.push_str(" = ");
            out.push_str(init);
        }
    }
    out.push_str(";\n");
}

fn write_namespace(ns: &DtsNamespace, ctx: Context, level: usize, out: &mut String) {
    write_opt_doc(ns.doc.as_ref(), level, out);
    indent(level, out);
    write_modifiers(ctx, true, out);
    out.push_str("namespace ");
    out.push_str(&ns.name);
    out.push_str(" {\n");
    for item in &ns.items {
        write_item(item, Context::NAMESPACE_BODY, level + 1, out);
    }
    indent(level, out);
    out.push_str("}\n");
}

fn write_module(m: &DtsModule, ctx: Context, level: usize, out: &mut String) {
    indent(level, out);
    write_modifiers(ctx, true, out);
    if m.name == "global" {
        out.push_str("global {\n");
    } else {
        out.push_str("module ");
        out.push_str(&quote_string(&m.name));
        out.push_str(" {\n");
    }
    for item in &m.items {
        write_item(item, Context::NAMESPACE_BODY, level + 1, out);
    }
    indent(level, out);
    out.push_str("}\n");
}

fn write_export(e: &DtsExport, level: usize, out: &mut String) {
    indent(level, out);
    match e {
        DtsExport::Equals(name) => {
            out.push_str("export = ");
            out.push_str(name);
        }
        DtsExport::Default(name) => {
            out.push_str("export default ");
            out.push_str(name);
        }
        DtsExport::Named(names) => {
            out.push_str("export {");
            for (i, (name, alias)) in names.iter().enumerate() {
                out.push_str(if i == 0 { " " } else { ", " });
                out.push_str(name);
                if let Some(alias) = alias {
                    out.push_str(" as ");
                    out.push_str(alias);
                }
            }
            out.push_str(if names.is_empty() { "}" } else { " }" });
        }
    }
    out.push_str(";\n");
}

fn write_interface_member(member: &InterfaceMember, level: usize, out: &mut String) {
    let doc = match member {
        InterfaceMember::Property(p) => p.doc.as_ref(),
        InterfaceMember::Method(m) => m.doc.as_ref(),
        InterfaceMember::CallSignature(c) => c.doc.as_ref(),
        InterfaceMember::ConstructSignature(c) => c.doc.as_ref(),
        InterfaceMember::IndexSignature(s) => s.doc.as_ref(),
        InterfaceMember::Accessor(a) => a.doc.as_ref(),
    };
    write_opt_doc(doc, level, out);
    indent(level, out);
    write_member_signature(member, level, out);
    out.push_str(";\n");
}

/// A type member without its doc, indentation or terminator.
fn write_member_signature(member: &InterfaceMember, level: usize, out: &mut String) {
    match member {
        InterfaceMember::Property(p) => {
            if p.readonly {
                out.push_str("readonly ");
            }
            out.push_str(&p.name);
            if p.optional {
                out.push('?');
            }
            if let Some(ty) = &p.ty {
                out.push_str(": ");
                write_type_at(ty, level, out);
            }
        }
        InterfaceMember::Method(m) => {
            out.push_str(&m.name);
            if m.optional {
                out.push('?');
            }
            write_type_params(&m.type_params, out);
            write_params(m.this_param.as_deref(), &m.params, out);
            write_return_annotation(m.return_type.as_ref(), out);
        }
        InterfaceMember::CallSignature(c) => {
            write_type_params(&c.type_params, out);
            write_params(c.this_param.as_deref(), &c.params, out);
            write_return_annotation(c.return_type.as_ref(), out);
        }
        InterfaceMember::ConstructSignature(c) => {
            out.push_str("new ");
            write_type_params(&c.type_params, out);
            write_params(None, &c.params, out);
            write_return_annotation(c.return_type.as_ref(), out);
        }
        InterfaceMember::IndexSignature(s) => write_index_signature(s, out),
        InterfaceMember::Accessor(a) => write_accessor(a, out),
    }
}

fn write_index_signature(s: &IndexSignature, out: &mut String) {
    if s.is_static {
        out.push_str("static ");
    }
    if s.readonly {
        out.push_str("readonly ");
    }
    out.push('[');
    out.push_str(&s.key_name);
    out.push_str(": ");
    write_type(&s.key_type, out);
    out.push_str("]: ");
    write_type(&s.value_type, out);
}

fn write_accessor(a: &Accessor, out: &mut String) {
    write_visibility(a.visibility, out);
    if a.is_static {
        out.push_str("static ");
    }
    if a.is_abstract {
        out.push_str("abstract ");
    }
    out.push_str(match a.kind {
        AccessorKind::Get => "get ",
        AccessorKind::Set => "set ",
    });
    out.push_str(&a.name);
    write_params(None, &a.params, out);
    write_return_annotation(a.return_type.as_ref(), out);
}

fn write_visibility(visibility: Visibility, out: &mut String) {
    match visibility {
        Visibility::Public => {}
        Visibility::Protected => out.push_str("protected "),
        Visibility::Private => out.push_str("private "),
    }
}

fn write_class_member(member: &ClassMember, level: usize, out: &mut String) {
    match member {
        ClassMember::Property(p) => {
            write_opt_doc(p.doc.as_ref(), level, out);
            indent(level, out);
            write_visibility(p.visibility, out);
            if p.is_static {
                out.push_str("static ");
            }
            if p.is_abstract {
                out.push_str("abstract ");
            }
            if p.readonly {
                out.push_str("readonly ");
            }
            out.push_str(&p.name);
            if p.optional {
                out.push('?');
            }
            if let Some(ty) = &p.ty {
                out.push_str(": ");
                write_type_at(ty, level, out);
            }
        }
        ClassMember::Method(m) => {
            write_opt_doc(m.doc.as_ref(), level, out);
            indent(level, out);
            write_visibility(m.visibility, out);
            if m.is_static {
                out.push_str("static ");
            }
            if m.is_abstract {
                out.push_str("abstract ");
            }
            out.push_str(&m.name);
            if m.optional {
                out.push('?');
            }
            write_type_params(&m.type_params, out);
            write_params(m.this_param.as_deref(), &m.params, out);
            write_return_annotation(m.return_type.as_ref(), out);
        }
        ClassMember::Constructor(c) => {
            write_opt_doc(c.doc.as_ref(), level, out);
            indent(level, out);
            write_visibility(c.visibility, out);
            out.push_str("constructor");
            write_params(None, &c.params, out);
        }
        ClassMember::IndexSignature(s) => {
            write_opt_doc(s.doc.as_ref(), level, out);
            indent(level, out);
            write_index_signature(s, out);
        }
        ClassMember::Accessor(a) => {
            write_opt_doc(a.doc.as_ref(), level, out);
            indent(level, out);
            write_accessor(a, out);
        }
    }
    out.push_str(";\n");
}

fn write_type_params(type_params: &[TypeParam], out: &mut String) {
    if type_params.is_empty() {
        return;
    }
    out.push('<');
    for (i, param) in type_params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        for modifier in &param.modifiers {
            out.push_str(match modifier {
                TypeParamModifier::In => "in ",
                TypeParamModifier::Out => "out ",
                TypeParamModifier::Const => "const ",
            });
        }
        out.push_str(&param.name);
        if let Some(constraint) = &param.constraint {
            out.push_str(" extends ");
            write_type(constraint, out);
        }
        if let Some(default) = &param.default {
            out.push_str(" = ");
            write_type(default, out);
        }
    }
    out.push('>');
}

fn write_params(this_param: Option<&DtsType>, params: &[Param], out: &mut String) {
    out.push('(');
    let mut first = true;
    if let Some(this_ty) = this_param {
        out.push_str("this: ");
        write_type(this_ty, out);
        first = false;
    }
    for param in params {
        if !first {
            out.push_str(", ");
        }
        first = false;
        if param.rest {
            out.push_str("...");
        }
        out.push_str(&param.name);
        if param.optional {
            out.push('?');
        }
        if let Some(ty) = &param.ty {
            out.push_str(": ");
            write_type(ty, out);
        }
    }
    out.push(')');
}

fn write_return_annotation(ty: Option<&DtsType>, out: &mut String) {
    if let Some(ty) = ty {
        out.push_str(": ");
        write_type(ty, out);
    }
}

fn write_type_list(types: &[DtsType], out: &mut String) {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_type(ty, out);
    }
}

/// Write a type on a single line.
pub fn write_type(ty: &DtsType, out: &mut String) {
    write_type_at(ty, 0, out);
}

/// Function-like and conditional types bind looser than `|` and `&`.
fn needs_parens_in_union(ty: &DtsType) -> bool {
    matches!(
        ty,
        DtsType::Function(_) | DtsType::Constructor { .. } | DtsType::Conditional { .. }
    )
}

/// Operands of `[]`, `[K]`, `keyof` and `readonly` bind tightest.
fn needs_parens_in_postfix(ty: &DtsType) -> bool {
    needs_parens_in_union(ty)
        || matches!(
            ty,
            DtsType::Union(_)
                | DtsType::Intersection(_)
                | DtsType::KeyOf(_)
                | DtsType::Operator { .. }
                | DtsType::Infer(_)
        )
}

fn write_wrapped(ty: &DtsType, wrap: bool, level: usize, out: &mut String) {
    if wrap {
        out.push('(');
        write_type_at(ty, level, out);
        out.push(')');
    } else {
        write_type_at(ty, level, out);
    }
}

fn write_type_args(type_args: &[DtsType], level: usize, out: &mut String) {
    if type_args.is_empty() {
        return;
    }
    out.push('<');
    for (i, arg) in type_args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_type_at(arg, level, out);
    }
    out.push('>');
}

fn write_function_type(func: &FunctionType, level: usize, out: &mut String) {
    write_type_params(&func.type_params, out);
    write_params(func.this_param.as_deref(), &func.params, out);
    out.push_str(" => ");
    write_type_at(&func.return_type, level, out);
}

fn write_mapped_modifier(modifier: Option<MappedModifier>, out: &mut String) {
    match modifier {
        Some(MappedModifier::Add) => out.push('+'),
        Some(MappedModifier::Remove) => out.push('-'),
        Some(MappedModifier::Preserve) | None => {}
    }
}

/// Write a type. Object literal types whose members carry docs are laid out
/// over several lines, indented one level past `level`.
fn write_type_at(ty: &DtsType, level: usize, out: &mut String) {
    match ty {
        DtsType::Named { name, type_args } => {
            out.push_str(name);
            write_type_args(type_args, level, out);
        }
        DtsType::Primitive(p) => out.push_str(&p.to_string()),
        DtsType::StringLiteral(s) => out.push_str(&quote_string(s)),
        DtsType::NumberLiteral(n) => out.push_str(n),
        DtsType::BooleanLiteral(b) => out.push_str(if *b { "true" } else { "false" }),
        DtsType::Union(types) => {
            for (i, t) in types.iter().enumerate() {
                if i > 0 {
                    out.push_str(" | ");
                }
                write_wrapped(t, needs_parens_in_union(t), level, out);
            }
        }
        DtsType::Intersection(types) => {
            for (i, t) in types.iter().enumerate() {
                if i > 0 {
                    out.push_str(" & ");
                }
                let wrap = needs_parens_in_union(t) || matches!(t, DtsType::Union(_));
                write_wrapped(t, wrap, level, out);
            }
        }
        DtsType::Function(func) => write_function_type(func, level, out),
        DtsType::Constructor { is_abstract, func } => {
            if *is_abstract {
                out.push_str("abstract ");
            }
            out.push_str("new ");
            write_function_type(func, level, out);
        }
        DtsType::Object(members) => write_object_type(members, level, out),
        DtsType::Array(elem) => {
            write_wrapped(elem, needs_parens_in_postfix(elem), level, out);
            out.push_str("[]");
        }
        DtsType::Tuple(elements) => {
            out.push('[');
            for (i, elem) in elements.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                if elem.rest {
                    out.push_str("...");
                }
                match &elem.name {
                    Some(name) => {
                        out.push_str(name);
                        if elem.optional {
                            out.push('?');
                        }
                        out.push_str(": ");
                        write_type_at(&elem.ty, level, out);
                    }
                    None => {
                        write_type_at(&elem.ty, level, out);
                        if elem.optional {
                            out.push('?');
                        }
                    }
                }
            }
            out.push(']');
        }
        DtsType::TypeOf(name) => {
            out.push_str("typeof ");
            out.push_str(name);
        }
        DtsType::KeyOf(inner) => {
            out.push_str("keyof ");
            write_wrapped(inner, needs_parens_in_postfix(inner), level, out);
        }
        DtsType::Operator { op, ty } => {
            out.push_str(match op {
                TypeOperator::Readonly => "readonly ",
                TypeOperator::Unique => "unique ",
            });
            write_wrapped(ty, needs_parens_in_postfix(ty), level, out);
        }
        DtsType::IndexAccess { object, index } => {
            write_wrapped(object, needs_parens_in_postfix(object), level, out);
            out.push('[');
            write_type_at(index, level, out);
            out.push(']');
        }
        DtsType::Conditional {
            check,
            extends,
            true_type,
            false_type,
        } => {
            write_wrapped(check, needs_parens_in_union(check), level, out);
            out.push_str(" extends ");
            write_wrapped(extends, matches!(**extends, DtsType::Conditional { .. }), level, out);
            out.push_str(" ? ");
            write_type_at(true_type, level, out);
            out.push_str(" : ");
            write_type_at(false_type, level, out);
        }
        DtsType::Mapped {
            key_name,
            key_constraint,
            name_type,
            value_type,
            readonly,
            optional,
        } => {
            out.push_str("{ ");
            if readonly.is_some() {
                write_mapped_modifier(*readonly, out);
                out.push_str("readonly ");
            }
            out.push('[');
            out.push_str(key_name);
            out.push_str(" in ");
            write_type_at(key_constraint, level, out);
            if let Some(name_type) = name_type {
                out.push_str(" as ");
                write_type_at(name_type, level, out);
            }
            out.push(']');
            if optional.is_some() {
                write_mapped_modifier(*optional, out);
                out.push('?');
            }
            out.push_str(": ");
            write_type_at(value_type, level, out);
            out.push_str("; }");
        }
        DtsType::Infer(name) => {
            out.push_str("infer ");
            out.push_str(name);
        }
        DtsType::TemplateLiteral(raw) => out.push_str(raw),
        DtsType::Import {
            module,
            qualifier,
            type_args,
        } => {
            out.push_str("import(");
            out.push_str(&quote_string(module));
            out.push(')');
            if let Some(qualifier) = qualifier {
                out.push('.');
                out.push_str(qualifier);
            }
            write_type_args(type_args, level, out);
        }
        DtsType::Predicate { asserts, param, ty } => {
            if *asserts {
                out.push_str("asserts ");
            }
            out.push_str(param);
            if let Some(ty) = ty {
                out.push_str(" is ");
                write_type_at(ty, level, out);
            }
        }
        DtsType::Parenthesized(inner) => {
            out.push('(');
            write_type_at(inner, level, out);
            out.push(')');
        }
        DtsType::This => out.push_str("this"),
    }
}

fn member_has_doc(member: &InterfaceMember) -> bool {
    match member {
        InterfaceMember::Property(p) => p.doc.is_some(),
        InterfaceMember::Method(m) => m.doc.is_some(),
        InterfaceMember::CallSignature(c) => c.doc.is_some(),
        InterfaceMember::ConstructSignature(c) => c.doc.is_some(),
        InterfaceMember::IndexSignature(s) => s.doc.is_some(),
        InterfaceMember::Accessor(a) => a.doc.is_some(),
    }
}

fn write_object_type(members: &[InterfaceMember], level: usize, out: &mut String) {
    if members.is_empty() {
        out.push_str("{}");
        return;
    }

    if members.iter().any(member_has_doc) {
        out.push_str("{\n");
        for member in members {
            write_interface_member(member, level + 1, out);
        }
        indent(level, out);
        out.push('}');
        return;
    }

    out.push_str("{ ");
    for member in members {
        write_member_signature(member, level, out);
        out.push_str("; ");
    }
    out.push('}');
}

/// Quote a string as a double-quoted TypeScript literal.
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
