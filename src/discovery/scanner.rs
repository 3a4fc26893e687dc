//! Single-pass `syn` scanner.
//!
//! Walks a source tree, parses each `.rs` file exactly once, and collects
//! every declaration carrying a handler annotation into a [`ScanIndex`].
//! Files are visited in sorted path order so discovery order is stable
//! across platforms and walk implementations.
//!
//! Scope names are built from the file stem plus the module and impl path
//! inside the file: a method on `impl WebApp` inside `mod admin` of
//! `routes.rs` is reported as `routes::admin::WebApp`.

use crate::core::errors::Error;
use crate::discovery::{
    AnnotationKind, AnnotationValues, Declaration, Discovery, Parameter, SourcePosition, UNASSIGNED,
};
use ignore::WalkBuilder;
use quote::ToTokens;
use std::fs;
use std::path::{Path, PathBuf};
use syn::punctuated::Punctuated;
use syn::visit::Visit;

const PARAM_ATTRIBUTE: &str = "http_param";

/// Scanner over one source tree root (a directory or a single file).
pub struct SourceScanner {
    root: PathBuf,
}

impl SourceScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn scan(&self) -> Result<ScanIndex, Error> {
        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();
        for entry in walker {
            let entry =
                entry.map_err(|e| Error::file_system(e.to_string(), self.root.clone()))?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path.to_path_buf());
            }
        }
        files.sort();

        let mut index = ScanIndex::default();
        for file in &files {
            let content = fs::read_to_string(file).map_err(|e| {
                Error::file_system_with_source(
                    format!("cannot read {}", file.display()),
                    file.clone(),
                    e,
                )
            })?;
            scan_source(file, &content, &mut index)?;
        }
        Ok(index)
    }
}

/// All declarations found in one scan, separated by annotation kind.
#[derive(Debug, Default)]
pub struct ScanIndex {
    urls: Vec<Declaration>,
    exception_handlers: Vec<Declaration>,
}

impl ScanIndex {
    fn push(&mut self, kind: AnnotationKind, declaration: Declaration) {
        match kind {
            AnnotationKind::Url => self.urls.push(declaration),
            AnnotationKind::ExceptionHandler => self.exception_handlers.push(declaration),
        }
    }
}

impl Discovery for ScanIndex {
    fn declarations(&self, kind: AnnotationKind) -> &[Declaration] {
        match kind {
            AnnotationKind::Url => &self.urls,
            AnnotationKind::ExceptionHandler => &self.exception_handlers,
        }
    }
}

fn scan_source(file: &Path, content: &str, index: &mut ScanIndex) -> Result<(), Error> {
    let parsed = syn::parse_file(content)
        .map_err(|e| Error::parse(file, e.span().start().line, e.to_string()))?;
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut collector = DeclarationCollector {
        file,
        scope: vec![stem],
        index,
    };
    collector.visit_file(&parsed);
    Ok(())
}

struct DeclarationCollector<'a> {
    file: &'a Path,
    scope: Vec<String>,
    index: &'a mut ScanIndex,
}

impl DeclarationCollector<'_> {
    fn scope_name(&self) -> String {
        self.scope.join("::")
    }

    fn position(&self, span: proc_macro2::Span) -> SourcePosition {
        SourcePosition {
            file: self.file.to_path_buf(),
            line: span.start().line,
        }
    }

    fn collect_callable(&mut self, attrs: &[syn::Attribute], sig: &syn::Signature) {
        for kind in [AnnotationKind::Url, AnnotationKind::ExceptionHandler] {
            if let Some(attr) = find_annotation(attrs, kind) {
                let declaration = Declaration {
                    is_method: true,
                    class_name: self.scope_name(),
                    simple_name: sig.ident.to_string(),
                    doc_comment: doc_comment(attrs),
                    position: self.position(sig.ident.span()),
                    parameters: parameters(&sig.inputs),
                    annotation: annotation_values(attr),
                };
                self.index.push(kind, declaration);
            }
        }
    }

    fn collect_non_callable(
        &mut self,
        attrs: &[syn::Attribute],
        name: String,
        span: proc_macro2::Span,
    ) {
        for kind in [AnnotationKind::Url, AnnotationKind::ExceptionHandler] {
            if let Some(attr) = find_annotation(attrs, kind) {
                let declaration = Declaration {
                    is_method: false,
                    class_name: self.scope_name(),
                    simple_name: name.clone(),
                    doc_comment: doc_comment(attrs),
                    position: self.position(span),
                    parameters: Vec::new(),
                    annotation: annotation_values(attr),
                };
                self.index.push(kind, declaration);
            }
        }
    }
}

impl<'ast> Visit<'ast> for DeclarationCollector<'_> {
    fn visit_item(&mut self, item: &'ast syn::Item) {
        if let Some((attrs, name, span)) = non_callable_parts(item) {
            self.collect_non_callable(attrs, name, span);
        }
        syn::visit::visit_item(self, item);
    }

    fn visit_item_fn(&mut self, item: &'ast syn::ItemFn) {
        self.collect_callable(&item.attrs, &item.sig);
        syn::visit::visit_item_fn(self, item);
    }

    fn visit_impl_item_fn(&mut self, item: &'ast syn::ImplItemFn) {
        self.collect_callable(&item.attrs, &item.sig);
        syn::visit::visit_impl_item_fn(self, item);
    }

    fn visit_trait_item_fn(&mut self, item: &'ast syn::TraitItemFn) {
        self.collect_callable(&item.attrs, &item.sig);
        syn::visit::visit_trait_item_fn(self, item);
    }

    fn visit_item_mod(&mut self, item: &'ast syn::ItemMod) {
        self.scope.push(item.ident.to_string());
        syn::visit::visit_item_mod(self, item);
        self.scope.pop();
    }

    fn visit_item_impl(&mut self, item: &'ast syn::ItemImpl) {
        self.scope.push(render_type(&item.self_ty));
        syn::visit::visit_item_impl(self, item);
        self.scope.pop();
    }
}

/// The annotatable items a handler annotation can erroneously land on.
/// Functions are handled by the callable visitors; everything else is a
/// malformed target reported with its name and span.
fn non_callable_parts(item: &syn::Item) -> Option<(&[syn::Attribute], String, proc_macro2::Span)> {
    match item {
        syn::Item::Struct(i) => Some((&i.attrs, i.ident.to_string(), i.ident.span())),
        syn::Item::Enum(i) => Some((&i.attrs, i.ident.to_string(), i.ident.span())),
        syn::Item::Union(i) => Some((&i.attrs, i.ident.to_string(), i.ident.span())),
        syn::Item::Const(i) => Some((&i.attrs, i.ident.to_string(), i.ident.span())),
        syn::Item::Static(i) => Some((&i.attrs, i.ident.to_string(), i.ident.span())),
        syn::Item::Trait(i) => Some((&i.attrs, i.ident.to_string(), i.ident.span())),
        syn::Item::Type(i) => Some((&i.attrs, i.ident.to_string(), i.ident.span())),
        syn::Item::Mod(i) => Some((&i.attrs, i.ident.to_string(), i.ident.span())),
        syn::Item::Impl(i) => Some((&i.attrs, render_type(&i.self_ty), i.impl_token.span)),
        _ => None,
    }
}

fn find_annotation(attrs: &[syn::Attribute], kind: AnnotationKind) -> Option<&syn::Attribute> {
    attrs
        .iter()
        .find(|attr| attr.path().is_ident(kind.attribute_name()))
}

/// Pull the annotation's arguments out of the attribute token tree.
///
/// Accepts a leading bare string literal for `value`, plus `key = literal`
/// pairs for `value`, `weight` and `handler`. Anything unrecognized is
/// ignored, leaving the defaults in place.
fn annotation_values(attr: &syn::Attribute) -> AnnotationValues {
    let mut values = AnnotationValues::default();
    let syn::Meta::List(list) = &attr.meta else {
        return values;
    };
    let Ok(args) = list.parse_args_with(Punctuated::<syn::Expr, syn::Token![,]>::parse_terminated)
    else {
        return values;
    };
    for arg in args {
        match arg {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(s),
                ..
            }) => {
                if values.value.is_none() {
                    values.value = Some(s.value());
                }
            }
            syn::Expr::Assign(assign) => apply_assign(&mut values, &assign),
            _ => {}
        }
    }
    values
}

fn apply_assign(values: &mut AnnotationValues, assign: &syn::ExprAssign) {
    let syn::Expr::Path(path) = assign.left.as_ref() else {
        return;
    };
    let Some(key) = path.path.get_ident() else {
        return;
    };
    match (key.to_string().as_str(), assign.right.as_ref()) {
        (
            "value",
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(s),
                ..
            }),
        ) => values.value = Some(s.value()),
        (
            "handler",
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(s),
                ..
            }),
        ) => values.handler = Some(s.value()),
        (
            "weight",
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Int(i),
                ..
            }),
        ) => values.weight = i.base10_parse().unwrap_or(0),
        ("weight", syn::Expr::Unary(unary)) => {
            if let (
                syn::UnOp::Neg(_),
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Int(i),
                    ..
                }),
            ) = (&unary.op, unary.expr.as_ref())
            {
                values.weight = -i.base10_parse().unwrap_or(0);
            }
        }
        _ => {}
    }
}

fn doc_comment(attrs: &[syn::Attribute]) -> Option<String> {
    let mut lines = Vec::new();
    for attr in attrs {
        if attr.path().is_ident("doc") {
            if let syn::Meta::NameValue(nv) = &attr.meta {
                if let syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(s),
                    ..
                }) = &nv.value
                {
                    let line = s.value();
                    lines.push(line.strip_prefix(' ').unwrap_or(&line).to_string());
                }
            }
        }
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn parameters(inputs: &Punctuated<syn::FnArg, syn::Token![,]>) -> Vec<Parameter> {
    inputs
        .iter()
        .filter_map(|arg| match arg {
            syn::FnArg::Receiver(_) => None,
            syn::FnArg::Typed(pat_ty) => Some(Parameter {
                type_name: render_type(&pat_ty.ty),
                name: pattern_name(&pat_ty.pat),
                named_binding: named_binding(&pat_ty.attrs),
            }),
        })
        .collect()
}

fn pattern_name(pat: &syn::Pat) -> String {
    match pat {
        syn::Pat::Ident(p) => p.ident.to_string(),
        _ => "_".to_string(),
    }
}

fn named_binding(attrs: &[syn::Attribute]) -> Option<String> {
    let attr = attrs.iter().find(|a| a.path().is_ident(PARAM_ATTRIBUTE))?;
    match &attr.meta {
        syn::Meta::Path(_) => Some(UNASSIGNED.to_string()),
        syn::Meta::List(list) => Some(
            list.parse_args::<syn::LitStr>()
                .map(|lit| lit.value())
                .unwrap_or_else(|_| UNASSIGNED.to_string()),
        ),
        syn::Meta::NameValue(nv) => {
            if let syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(s),
                ..
            }) = &nv.value
            {
                Some(s.value())
            } else {
                Some(UNASSIGNED.to_string())
            }
        }
    }
}

/// Token-stream rendering of a type with the spacing `proc_macro2` inserts
/// between tokens collapsed back to source-like form.
fn render_type(ty: &syn::Type) -> String {
    ty.to_token_stream()
        .to_string()
        .replace(" :: ", "::")
        .replace(" < ", "<")
        .replace(" >", ">")
        .replace("< ", "<")
        .replace("& ", "&")
        .replace(" ,", ",")
        .replace("( ", "(")
        .replace(" )", ")")
}
