//! AST walk that records the byte ranges of type-level syntax.
//!
//! Nothing is reprinted: every construct that only exists for the type
//! checker becomes a deletion against the original text, so formatting and
//! comments outside those ranges survive untouched.

use crate::diagnostic::DiagnosticKind;
use crate::imports::{ExportCandidate, ExportItem, ImportCandidate, NamedImport};
use crate::specifier;
use crate::TransformOptions;
use rustc_hash::FxHashSet;
use source_edit::{EditSet, Span};
use swc_common::comments::{CommentKind, Comments, SingleThreadedComments};
use swc_common::{BytePos, Span as SwcSpan, Spanned};
use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

/// Class member and parameter modifiers with no runtime meaning.
const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "readonly",
    "override",
    "abstract",
    "declare",
];

/// Keywords that may precede a member name besides the modifiers.
const MEMBER_PREFIXES: &[&str] = &["static", "accessor", "async", "get", "set"];

/// Edits and findings from one walk.
pub(crate) struct Stripped {
    pub edits: EditSet,
    pub findings: Vec<(DiagnosticKind, String, Span)>,
}

/// Collects identifiers that appear inside type syntax.
#[derive(Default)]
pub(crate) struct TypeRefCollector {
    refs: FxHashSet<String>,
}

impl Visit for TypeRefCollector {
    fn visit_ident(&mut self, ident: &Ident) {
        self.refs.insert(ident.sym.to_string());
    }
}

pub(crate) struct TypeStripper<'a> {
    source: &'a str,
    base: u32,
    comments: &'a SingleThreadedComments,
    options: &'a TransformOptions,
    edits: EditSet,
    findings: Vec<(DiagnosticKind, String, Span)>,
    imports: Vec<ImportCandidate>,
    exports: Vec<ExportCandidate>,
    default_exports: Vec<(Span, String)>,
    /// Interfaces and type aliases declared in this file.
    type_names: FxHashSet<String>,
    value_refs: FxHashSet<String>,
    type_refs: TypeRefCollector,
}

impl<'a> TypeStripper<'a> {
    pub fn new(
        source: &'a str,
        start_pos: BytePos,
        comments: &'a SingleThreadedComments,
        options: &'a TransformOptions,
    ) -> Self {
        Self {
            source,
            base: start_pos.0,
            comments,
            options,
            edits: EditSet::new(),
            findings: Vec::new(),
            imports: Vec::new(),
            exports: Vec::new(),
            default_exports: Vec::new(),
            type_names: FxHashSet::default(),
            value_refs: FxHashSet::default(),
            type_refs: TypeRefCollector::default(),
        }
    }

    /// Resolves the collected imports and exports and returns all edits.
    pub fn finish(mut self) -> Stripped {
        for (_, name) in &self.default_exports {
            if !self.type_names.contains(name) {
                self.value_refs.insert(name.clone());
            }
        }

        let elide = self.options.elide_type_only_imports;
        let mut erased = Vec::new();
        for import in &self.imports {
            let value_refs = &self.value_refs;
            let type_refs = &self.type_refs.refs;
            erased.extend(import.resolve(
                self.source,
                |local| elide && type_refs.contains(local) && !value_refs.contains(local),
                &mut self.edits,
            ));
        }
        self.type_names.extend(erased);

        let is_type_name =
            |name: &str| self.type_names.contains(name) && !self.value_refs.contains(name);
        for export in &self.exports {
            export.resolve(is_type_name, &mut self.edits);
        }
        for (stmt, name) in &self.default_exports {
            if is_type_name(name) {
                self.edits.delete_lines(*stmt);
            }
        }

        Stripped {
            edits: self.edits,
            findings: self.findings,
        }
    }

    fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.base) as usize
    }

    fn span(&self, span: SwcSpan) -> Span {
        Span::from_usize(self.offset(span.lo), self.offset(span.hi))
    }

    fn bytes(&self) -> &'a [u8] {
        self.source.as_bytes()
    }

    fn remove_range(&mut self, lo: usize, hi: usize) {
        if lo < hi {
            self.edits.delete(Span::from_usize(lo, hi));
        }
    }

    fn remove(&mut self, span: SwcSpan) {
        let span = self.span(span);
        self.remove_range(span.lo(), span.hi());
    }

    fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>, span: SwcSpan) {
        let span = self.span(span);
        self.findings.push((kind, message.into(), span));
    }

    fn note_types<N: VisitWith<TypeRefCollector>>(&mut self, node: &N) {
        node.visit_with(&mut self.type_refs);
    }

    /// The identifier immediately before `pos`, skipping whitespace.
    fn word_before(&self, pos: usize) -> Option<(usize, &'a str)> {
        let source = self.source;
        let bytes = source.as_bytes();
        let mut end = pos;
        while end > 0 && bytes[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        let mut start = end;
        while start > 0 && is_ident_byte(bytes[start - 1]) {
            start -= 1;
        }
        (start < end).then(|| (start, &source[start..end]))
    }

    fn skip_blanks(&self, mut pos: usize) -> usize {
        let bytes = self.bytes();
        while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t') {
            pos += 1;
        }
        pos
    }

    /// Offset past a `;` that directly follows `pos`, or `pos` itself.
    fn past_semicolon(&self, pos: usize) -> usize {
        let after = self.skip_blanks(pos);
        if self.bytes().get(after) == Some(&b';') {
            after + 1
        } else {
            pos
        }
    }

    /// A statement span extended over its trailing `;`.
    fn stmt_span(&self, span: SwcSpan) -> Span {
        let span = self.span(span);
        Span::from_usize(span.lo(), self.past_semicolon(span.hi()))
    }

    /// Extends a statement span over a preceding `declare`, a trailing `;`
    /// and an attached doc comment, then records it as a line deletion.
    fn remove_statement(&mut self, span: SwcSpan) {
        let span = self.stmt_span(span);
        let mut lo = span.lo();
        if let Some((start, "declare")) = self.word_before(lo) {
            lo = start;
        }
        let hi = span.hi();

        if self.options.remove_type_doc_comments {
            if let Some(doc) = self.leading_doc_comment(lo) {
                lo = doc;
            }
        }
        self.edits.delete_lines(Span::from_usize(lo, hi));
    }

    /// Start of the run of `/** */` comments directly attached to `pos`.
    fn leading_doc_comment(&self, pos: usize) -> Option<usize> {
        let comments = self.comments.get_leading(BytePos(pos as u32 + self.base))?;
        comments
            .iter()
            .rev()
            .take_while(|c| c.kind == CommentKind::Block && c.text.starts_with('*'))
            .last()
            .map(|c| self.offset(c.span.lo))
    }

    /// Removes `: Type`, along with a `?` or `!` marker right before the colon.
    fn remove_type_ann(&mut self, ann: &TsTypeAnn) {
        let bytes = self.bytes();
        let span = self.span(ann.span);
        let mut colon = span.lo();
        if bytes.get(colon) != Some(&b':') {
            let mut i = colon;
            while i > 0 && bytes[i - 1].is_ascii_whitespace() {
                i -= 1;
            }
            if i == 0 || bytes[i - 1] != b':' {
                self.remove_range(span.lo(), span.hi());
                return;
            }
            colon = i - 1;
        }

        let mut start = colon;
        while start > 0 && matches!(bytes[start - 1], b' ' | b'\t') {
            start -= 1;
        }
        if start > 0 && matches!(bytes[start - 1], b'?' | b'!') {
            start -= 1;
        } else {
            start = colon;
        }
        self.remove_range(start, span.hi());
    }

    /// Removes a `?` that follows `pos`, as in `method?()` or `(arg?) =>`.
    fn remove_optional_marker(&mut self, pos: usize) {
        let at = self.skip_blanks(pos);
        if self.bytes().get(at) == Some(&b'?') {
            self.remove_range(at, at + 1);
        }
    }

    /// Start of the modifier region of a member or parameter: past its last
    /// decorator, whose arguments may hold modifier-like words.
    fn after_decorators(&self, from: usize, decorators: &[Decorator]) -> usize {
        decorators
            .last()
            .map_or(from, |last| from.max(self.offset(last.span.hi)))
    }

    /// Removes modifier keywords between `lo` and `hi`, skipping over
    /// comments and strings. `lo` must already be past any decorators.
    fn remove_modifiers(&mut self, lo: usize, hi: usize) {
        let bytes = self.bytes();
        let hi = hi.min(bytes.len());
        let mut i = lo;
        while i < hi {
            match bytes[i] {
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    while i < hi && bytes[i] != b'\n' {
                        i += 1;
                    }
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    i = self.source[i + 2..]
                        .find("*/")
                        .map_or(hi, |end| i + 2 + end + 2);
                }
                quote @ (b'"' | b'\'' | b'`') => {
                    i += 1;
                    while i < hi && bytes[i] != quote {
                        if bytes[i] == b'\\' {
                            i += 1;
                        }
                        i += 1;
                    }
                    i += 1;
                }
                b if is_ident_byte(b) => {
                    let start = i;
                    while i < hi && is_ident_byte(bytes[i]) {
                        i += 1;
                    }
                    let word = &self.source[start..i];
                    let after_dot = start > 0 && bytes[start - 1] == b'.';
                    if !after_dot && MODIFIERS.contains(&word) {
                        let mut end = i;
                        while end < hi && bytes[end].is_ascii_whitespace() {
                            end += 1;
                        }
                        self.remove_range(start, end);
                        i = end;
                    }
                }
                _ => i += 1,
            }
        }
    }

    /// Removes an `abstract` keyword at or right before `pos`.
    fn remove_abstract_keyword(&mut self, pos: usize) {
        let rest = &self.source[pos.min(self.source.len())..];
        if rest.starts_with("abstract") && !rest[8..].starts_with(|c: char| is_ident_char(c)) {
            let end = pos + 8;
            let mut after = end;
            while after < self.source.len() && self.bytes()[after].is_ascii_whitespace() {
                after += 1;
            }
            self.remove_range(pos, after);
        } else if let Some((start, "abstract")) = self.word_before(pos) {
            self.remove_range(start, pos);
        }
    }

    fn rewrite_specifier(&mut self, span: SwcSpan) {
        let span = self.span(span);
        let Some(literal) = span.slice(self.source) else {
            return;
        };
        if let Some(edit) =
            specifier::rewrite_literal(span.lo(), literal, &self.options.extension_map)
        {
            self.edits.push(edit);
        }
    }

    /// Handles declarations that vanish entirely. Returns true when `decl`
    /// was removed.
    fn strip_type_decl(&mut self, decl: &Decl, stmt: SwcSpan) -> bool {
        match decl {
            Decl::TsInterface(interface) => {
                self.type_names.insert(interface.id.sym.to_string());
                self.note_types(&**interface);
                self.remove_statement(stmt);
                true
            }
            Decl::TsTypeAlias(alias) => {
                self.type_names.insert(alias.id.sym.to_string());
                self.note_types(&**alias);
                self.remove_statement(stmt);
                true
            }
            Decl::TsEnum(e) if e.declare => {
                self.remove_statement(stmt);
                true
            }
            Decl::TsEnum(e) => {
                self.report(
                    DiagnosticKind::Enum,
                    format!("enum `{}` has runtime semantics and was left in place", e.id.sym),
                    e.span,
                );
                false
            }
            Decl::TsModule(module)
                if module.declare
                    || module.global
                    || module.body.as_ref().map_or(true, is_type_only_namespace) =>
            {
                self.note_types(&**module);
                self.remove_statement(stmt);
                true
            }
            Decl::TsModule(module) => {
                self.report(
                    DiagnosticKind::Namespace,
                    "namespace contains runtime code and was left in place",
                    module.span,
                );
                false
            }
            Decl::Var(var) if var.declare => {
                self.note_types(&**var);
                self.remove_statement(stmt);
                true
            }
            Decl::Fn(f) if f.declare || f.function.body.is_none() => {
                self.note_types(&*f.function);
                self.remove_statement(stmt);
                true
            }
            Decl::Class(class) if class.declare => {
                self.note_types(&*class.class);
                self.remove_statement(stmt);
                true
            }
            _ => false,
        }
    }

    fn collect_import(&mut self, import: &ImportDecl) {
        let mut candidate = ImportCandidate {
            stmt: self.stmt_span(import.span),
            type_only: import.type_only,
            binding: None,
            named: Vec::new(),
        };
        for spec in &import.specifiers {
            match spec {
                ImportSpecifier::Named(named) => candidate.named.push(NamedImport {
                    span: self.span(named.span),
                    local: named.local.sym.to_string(),
                    type_only: named.is_type_only,
                }),
                ImportSpecifier::Default(default) => {
                    candidate.binding =
                        Some((self.span(default.span), default.local.sym.to_string()));
                }
                ImportSpecifier::Namespace(ns) => {
                    candidate.binding = Some((self.span(ns.span), ns.local.sym.to_string()));
                }
            }
        }
        self.imports.push(candidate);
        self.rewrite_specifier(import.src.span);
    }

    fn collect_export(&mut self, export: &NamedExport) {
        let items = export
            .specifiers
            .iter()
            .map(|spec| match spec {
                ExportSpecifier::Named(named) => ExportItem {
                    span: self.span(named.span),
                    local: match &named.orig {
                        ModuleExportName::Ident(ident) => Some(ident.sym.to_string()),
                        _ => None,
                    },
                    type_only: named.is_type_only,
                },
                ExportSpecifier::Namespace(ns) => ExportItem {
                    span: self.span(ns.span),
                    local: None,
                    type_only: false,
                },
                ExportSpecifier::Default(default) => ExportItem {
                    span: self.span(default.exported.span),
                    local: None,
                    type_only: false,
                },
            })
            .collect();
        self.exports.push(ExportCandidate {
            stmt: self.stmt_span(export.span),
            type_only: export.type_only,
            reexport: export.src.is_some(),
            items,
        });
        if let Some(src) = &export.src {
            self.rewrite_specifier(src.span);
        }
    }

    fn strip_implements(&mut self, class: &Class) {
        let (Some(first), Some(last)) = (class.implements.first(), class.implements.last()) else {
            return;
        };
        let first_lo = self.offset(first.span.lo);
        let Some(keyword) = self.source[..first_lo].rfind("implements") else {
            return;
        };
        let bytes = self.bytes();
        let mut start = keyword;
        while start > 0 && bytes[start - 1].is_ascii_whitespace() {
            start -= 1;
        }
        let end = self.offset(last.span.hi);
        self.remove_range(start, end);
        for clause in &class.implements {
            self.note_types(clause);
        }
    }

    /// Turns `constructor(private a: A)` into a plain parameter plus a
    /// `this.a = a;` assignment at the top of the body.
    fn lower_param_props(&mut self, ctor: &Constructor) {
        let mut names = Vec::new();
        let mut prev_end = self.offset(ctor.key.span().hi);
        for param in &ctor.params {
            let param_span = param.span();
            if let ParamOrTsParamProp::TsParamProp(prop) = param {
                let (inner_lo, name) = match &prop.param {
                    TsParamPropParam::Ident(binding) => {
                        (self.offset(binding.span().lo), Some(binding.id.sym.to_string()))
                    }
                    TsParamPropParam::Assign(assign) => (
                        self.offset(assign.span.lo),
                        match &*assign.left {
                            Pat::Ident(binding) => Some(binding.id.sym.to_string()),
                            _ => None,
                        },
                    ),
                };
                let lo = self.after_decorators(prev_end, &prop.decorators);
                self.remove_modifiers(lo, inner_lo);
                names.extend(name);
            }
            prev_end = self.offset(param_span.hi);
        }

        let Some(body) = &ctor.body else {
            return;
        };
        if names.is_empty() {
            return;
        }

        let body_span = self.span(body.span);
        let ctor_indent = self.line_indent(self.offset(ctor.span.lo));
        let super_call = body.stmts.iter().find(|stmt| {
            matches!(
                stmt,
                Stmt::Expr(ExprStmt { expr, .. })
                    if matches!(&**expr, Expr::Call(CallExpr { callee: Callee::Super(_), .. }))
            )
        });
        let indent = match body.stmts.first() {
            Some(first) if self.starts_line(self.offset(first.span().lo)) => {
                self.line_indent(self.offset(first.span().lo))
            }
            _ => format!("{ctor_indent}  "),
        };
        let assignments: String = names
            .iter()
            .map(|name| format!("\n{indent}this.{name} = {name};"))
            .collect();

        if body.stmts.is_empty() {
            let inner = Span::from_usize(body_span.lo() + 1, body_span.hi().saturating_sub(1));
            let only_whitespace = inner
                .slice(self.source)
                .is_some_and(|text| text.trim().is_empty());
            if only_whitespace {
                self.edits
                    .replace(inner, format!("{assignments}\n{ctor_indent}"));
                return;
            }
        }

        let at = match super_call {
            Some(stmt) => self.past_semicolon(self.offset(stmt.span().hi)),
            None => body_span.lo() + 1,
        };
        self.edits.replace(Span::empty(at as u32), assignments);
    }

    fn starts_line(&self, pos: usize) -> bool {
        self.source[..pos]
            .trim_end_matches([' ', '\t'])
            .ends_with('\n')
    }

    fn line_indent(&self, pos: usize) -> String {
        let line_start = self.source[..pos].rfind('\n').map_or(0, |nl| nl + 1);
        self.source[line_start..]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect()
    }

    /// Removes a class member together with any modifiers in front of it.
    fn remove_member(&mut self, span: SwcSpan) {
        let span = self.stmt_span(span);
        let mut lo = span.lo();
        while let Some((start, word)) = self.word_before(lo) {
            if !MODIFIERS.contains(&word) && !MEMBER_PREFIXES.contains(&word) {
                break;
            }
            lo = start;
        }
        self.edits.delete_lines(Span::from_usize(lo, span.hi()));
    }
}

impl Visit for TypeStripper<'_> {
    fn visit_module_decl(&mut self, decl: &ModuleDecl) {
        match decl {
            ModuleDecl::Import(import) => self.collect_import(import),
            ModuleDecl::ExportDecl(export) => {
                if !self.strip_type_decl(&export.decl, export.span) {
                    export.decl.visit_with(self);
                }
            }
            ModuleDecl::ExportNamed(export) => self.collect_export(export),
            ModuleDecl::ExportDefaultDecl(export) => match &export.decl {
                DefaultDecl::TsInterfaceDecl(interface) => {
                    self.type_names.insert(interface.id.sym.to_string());
                    self.note_types(&**interface);
                    self.remove_statement(export.span);
                }
                DefaultDecl::Fn(f) if f.function.body.is_none() => {
                    self.note_types(&*f.function);
                    self.remove_statement(export.span);
                }
                _ => export.decl.visit_with(self),
            },
            ModuleDecl::ExportDefaultExpr(export) => match &*export.expr {
                Expr::Ident(ident) => self
                    .default_exports
                    .push((self.stmt_span(export.span), ident.sym.to_string())),
                _ => export.expr.visit_with(self),
            },
            ModuleDecl::ExportAll(export) => {
                if export.type_only {
                    self.remove_statement(export.span);
                } else {
                    self.rewrite_specifier(export.src.span);
                }
            }
            ModuleDecl::TsImportEquals(import) => {
                if import.is_type_only {
                    self.remove_statement(import.span);
                } else {
                    self.report(
                        DiagnosticKind::ImportEquals,
                        "`import ... = ...` is not valid JavaScript and was left in place",
                        import.span,
                    );
                }
            }
            ModuleDecl::TsExportAssignment(export) => {
                self.report(
                    DiagnosticKind::ExportAssignment,
                    "`export =` is not valid JavaScript and was left in place",
                    export.span,
                );
                export.expr.visit_with(self);
            }
            ModuleDecl::TsNamespaceExport(export) => self.remove_statement(export.span),
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        if let Stmt::Decl(decl) = stmt {
            if self.strip_type_decl(decl, decl.span()) {
                return;
            }
        }
        stmt.visit_children_with(self);
    }

    fn visit_ident(&mut self, ident: &Ident) {
        self.value_refs.insert(ident.sym.to_string());
    }

    fn visit_binding_ident(&mut self, binding: &BindingIdent) {
        if binding.id.optional && binding.type_ann.is_none() {
            let name_end = self.offset(binding.id.span.lo) + binding.id.sym.len();
            self.remove_optional_marker(name_end);
        }
        binding.visit_children_with(self);
    }

    fn visit_ts_type(&mut self, _ty: &TsType) {}

    fn visit_ts_type_ann(&mut self, ann: &TsTypeAnn) {
        self.remove_type_ann(ann);
        self.note_types(ann);
    }

    fn visit_ts_type_param_decl(&mut self, params: &TsTypeParamDecl) {
        self.remove(params.span);
        self.note_types(params);
    }

    fn visit_ts_type_param_instantiation(&mut self, args: &TsTypeParamInstantiation) {
        self.remove(args.span);
        self.note_types(args);
    }

    fn visit_ts_as_expr(&mut self, expr: &TsAsExpr) {
        let from = self.offset(expr.expr.span_hi());
        let to = self.offset(expr.span.hi);
        self.remove_range(from, to);
        self.note_types(&*expr.type_ann);
        expr.expr.visit_with(self);
    }

    fn visit_ts_satisfies_expr(&mut self, expr: &TsSatisfiesExpr) {
        let from = self.offset(expr.expr.span_hi());
        let to = self.offset(expr.span.hi);
        self.remove_range(from, to);
        self.note_types(&*expr.type_ann);
        expr.expr.visit_with(self);
    }

    fn visit_ts_const_assertion(&mut self, expr: &TsConstAssertion) {
        let from = self.offset(expr.expr.span_hi());
        let to = self.offset(expr.span.hi);
        self.remove_range(from, to);
        expr.expr.visit_with(self);
    }

    fn visit_ts_non_null_expr(&mut self, expr: &TsNonNullExpr) {
        let from = self.offset(expr.expr.span_hi());
        let to = self.offset(expr.span.hi);
        self.remove_range(from, to);
        expr.expr.visit_with(self);
    }

    fn visit_ts_type_assertion(&mut self, expr: &TsTypeAssertion) {
        let from = self.offset(expr.span.lo);
        let to = self.offset(expr.expr.span_lo());
        self.remove_range(from, to);
        self.note_types(&*expr.type_ann);
        expr.expr.visit_with(self);
    }

    fn visit_function(&mut self, function: &Function) {
        if let Some(first) = function.params.first() {
            if matches!(&first.pat, Pat::Ident(b) if &*b.id.sym == "this") {
                let lo = self.offset(first.span.lo);
                let hi = match function.params.get(1) {
                    Some(next) => self.offset(next.span.lo),
                    None => self.offset(first.span.hi),
                };
                self.remove_range(lo, hi);
                self.note_types(&first.pat);
            }
        }
        function.visit_children_with(self);
    }

    fn visit_class(&mut self, class: &Class) {
        if class.is_abstract {
            self.remove_abstract_keyword(self.offset(class.span.lo));
        }
        self.strip_implements(class);

        class.decorators.visit_with(self);
        class.super_class.visit_with(self);
        class.type_params.visit_with(self);
        class.super_type_params.visit_with(self);

        let mut prev_end = match class.body.first() {
            Some(first) => {
                let first_lo = self.offset(first.span().lo);
                self.source[..first_lo].rfind('{').map_or(first_lo, |b| b + 1)
            }
            None => 0,
        };
        for member in &class.body {
            self.strip_member(member, prev_end);
            prev_end = self.offset(member.span().hi);
        }
    }

    fn visit_call_expr(&mut self, call: &CallExpr) {
        let loads_module = match &call.callee {
            Callee::Import(_) => true,
            Callee::Expr(callee) => matches!(&**callee, Expr::Ident(i) if &*i.sym == "require"),
            Callee::Super(_) => false,
        };
        if loads_module {
            if let Some(arg) = call.args.first().filter(|arg| arg.spread.is_none()) {
                match &*arg.expr {
                    Expr::Lit(Lit::Str(s)) => self.rewrite_specifier(s.span),
                    Expr::Tpl(tpl) if tpl.exprs.is_empty() => self.rewrite_specifier(tpl.span),
                    _ => {}
                }
            }
        }
        call.visit_children_with(self);
    }
}

impl TypeStripper<'_> {
    fn strip_member(&mut self, member: &ClassMember, prev_end: usize) {
        match member {
            ClassMember::TsIndexSignature(sig) => {
                self.note_types(sig);
                self.remove_member(sig.span);
            }
            ClassMember::ClassProp(prop) if prop.declare || prop.is_abstract => {
                self.note_types(prop);
                self.remove_member(prop.span);
            }
            ClassMember::Method(method)
                if method.is_abstract || method.function.body.is_none() =>
            {
                self.note_types(&*method.function);
                self.remove_member(method.span);
            }
            ClassMember::PrivateMethod(method) if method.function.body.is_none() => {
                self.note_types(&*method.function);
                self.remove_member(method.span);
            }
            ClassMember::Constructor(ctor) if ctor.body.is_none() => {
                self.note_types(ctor);
                self.remove_member(ctor.span);
            }
            ClassMember::Constructor(ctor) => {
                self.remove_modifiers(prev_end, self.offset(ctor.key.span().lo));
                self.lower_param_props(ctor);
                ctor.visit_children_with(self);
            }
            ClassMember::ClassProp(prop) => {
                let key = self.span(prop.key.span());
                let lo = self.after_decorators(prev_end, &prop.decorators);
                self.remove_modifiers(lo, key.lo());
                if prop.is_optional && prop.type_ann.is_none() {
                    self.remove_optional_marker(key.hi());
                }
                prop.visit_children_with(self);
            }
            ClassMember::PrivateProp(prop) => {
                let key = self.span(prop.key.span());
                let lo = self.after_decorators(prev_end, &prop.decorators);
                self.remove_modifiers(lo, key.lo());
                if prop.is_optional && prop.type_ann.is_none() {
                    self.remove_optional_marker(key.hi());
                }
                prop.visit_children_with(self);
            }
            ClassMember::Method(method) => {
                let key = self.span(method.key.span());
                let lo = self.after_decorators(prev_end, &method.function.decorators);
                self.remove_modifiers(lo, key.lo());
                if method.is_optional {
                    self.remove_optional_marker(key.hi());
                }
                method.visit_children_with(self);
            }
            ClassMember::PrivateMethod(method) => {
                let key = self.span(method.key.span());
                let lo = self.after_decorators(prev_end, &method.function.decorators);
                self.remove_modifiers(lo, key.lo());
                if method.is_optional {
                    self.remove_optional_marker(key.hi());
                }
                method.visit_children_with(self);
            }
            ClassMember::AutoAccessor(accessor) => {
                let key = self.span(accessor.key.span());
                let lo = self.after_decorators(prev_end, &accessor.decorators);
                self.remove_modifiers(lo, key.lo());
                accessor.visit_children_with(self);
            }
            ClassMember::StaticBlock(_) | ClassMember::Empty(_) => {
                member.visit_children_with(self);
            }
        }
    }
}

fn is_type_only_namespace(body: &TsNamespaceBody) -> bool {
    match body {
        TsNamespaceBody::TsModuleBlock(block) => block.body.iter().all(is_type_only_item),
        TsNamespaceBody::TsNamespaceDecl(inner) => {
            inner.declare || is_type_only_namespace(&inner.body)
        }
    }
}

fn is_type_only_item(item: &ModuleItem) -> bool {
    let decl = match item {
        ModuleItem::Stmt(Stmt::Decl(decl)) => decl,
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => &export.decl,
        ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(export)) => return export.type_only,
        ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => return import.type_only,
        ModuleItem::Stmt(Stmt::Empty(_)) => return true,
        _ => return false,
    };
    match decl {
        Decl::TsInterface(_) | Decl::TsTypeAlias(_) => true,
        Decl::TsModule(module) => {
            module.declare || module.body.as_ref().map_or(true, is_type_only_namespace)
        }
        Decl::TsEnum(e) => e.declare,
        Decl::Var(var) => var.declare,
        Decl::Fn(f) => f.declare,
        Decl::Class(class) => class.declare,
        _ => false,
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
