//! Rust source writer
//!
//! Converts a [`RenderingPlan`] into Rust modules: one file per top-level
//! unit, a `mod.rs` declaring them and a `keys.rs` holding the typed key
//! wrappers every unit refers to.
//!
//! Uses [`quote`] for quasi-quoting token streams and [`prettyplease`] for
//! formatting the output into idiomatic Rust.

use std::collections::BTreeSet;
use std::path::PathBuf;

use proc_macro2::{Ident, Literal, TokenStream};
use quote::{format_ident, quote};

use crate::error::{CodegenError, CodegenResult};
use crate::metrics::{InstrumentKind, NumberType};
use crate::model::EnumValue;
use crate::naming::{to_snake_case, IdentifierScope};
use crate::plan::{
    BuilderCall, ConstantDecl, ConstantType, Declaration, EmissionUnit, EnumContainer,
    FactoryDecl, RenderingPlan, UnitRole,
};
use crate::types::{ScalarType, ValueType};

const HEADER: &str = "\
// @generated by `semconv generate`. Do not edit manually.\n\
// Regenerate from the semantic-convention model instead.\n\n";

/// Module holding `AttributeKey` / `AttributeKeyTemplate`.
pub const KEYS_MODULE: &str = "keys";

// ── Public API ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RustWriterOptions {
    /// Absolute path of the keys module (e.g. `crate::semconv::keys`).
    /// `None` resolves it relative to each generated module.
    pub keys_path: Option<String>,
}

impl RustWriterOptions {
    pub fn keys_path(mut self, path: impl Into<String>) -> Self {
        self.keys_path = Some(path.into());
        self
    }
}

/// One output file, path relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Render every file for `plan`.
pub fn write_rust(
    plan: &RenderingPlan,
    options: &RustWriterOptions,
) -> CodegenResult<Vec<GeneratedFile>> {
    let mut files = Vec::with_capacity(plan.units.len() + 2);
    files.push(GeneratedFile {
        path: PathBuf::from("mod.rs"),
        contents: generate_mod_rs(plan)?,
    });
    files.push(GeneratedFile {
        path: PathBuf::from(format!("{KEYS_MODULE}.rs")),
        contents: generate_keys_rs()?,
    });
    for unit in &plan.units {
        files.push(GeneratedFile {
            path: PathBuf::from(format!("{}.rs", module_ident(unit)?)),
            contents: generate_unit_rs(unit, options)?,
        });
    }
    Ok(files)
}

/// `mod.rs` declaring the keys module and every top-level unit.
pub fn generate_mod_rs(plan: &RenderingPlan) -> CodegenResult<String> {
    let keys = format_ident!("{}", KEYS_MODULE);
    let mut scope = IdentifierScope::new("mod.rs");
    let mods = plan
        .units
        .iter()
        .map(|unit| claim_module(&mut scope, unit))
        .collect::<CodegenResult<Vec<_>>>()?;
    let tokens = quote! {
        #![doc = " Semantic-convention constants."]
        pub mod #keys;
        #(pub mod #mods;)*
    };
    Ok(format!("{HEADER}{}", unparse("mod.rs", tokens)?))
}

/// `keys.rs`: the typed key wrappers referenced by generated constants.
pub fn generate_keys_rs() -> CodegenResult<String> {
    let tokens = quote! {
        #![doc = " Typed attribute keys."]

        use std::marker::PhantomData;

        #[doc = " An attribute key whose values are of type `T`."]
        #[derive(Debug)]
        pub struct AttributeKey<T> {
            key: &'static str,
            _value: PhantomData<fn() -> T>,
        }

        impl<T> AttributeKey<T> {
            pub const fn new(key: &'static str) -> Self {
                Self { key, _value: PhantomData }
            }

            pub const fn key(&self) -> &'static str {
                self.key
            }
        }

        impl<T> Clone for AttributeKey<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for AttributeKey<T> {}

        #[doc = " A key prefix completed at runtime, e.g. `http.request.header.<name>`."]
        #[derive(Debug)]
        pub struct AttributeKeyTemplate<T> {
            prefix: &'static str,
            _value: PhantomData<fn() -> T>,
        }

        impl<T> AttributeKeyTemplate<T> {
            pub const fn new(prefix: &'static str) -> Self {
                Self { prefix, _value: PhantomData }
            }

            pub const fn prefix(&self) -> &'static str {
                self.prefix
            }

            #[doc = " Full key for `suffix`."]
            pub fn key(&self, suffix: &str) -> String {
                format!("{}.{}", self.prefix, suffix)
            }
        }

        impl<T> Clone for AttributeKeyTemplate<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for AttributeKeyTemplate<T> {}
    };
    Ok(format!("{HEADER}{}", unparse("keys.rs", tokens)?))
}

// ── Units ─────────────────────────────────────────────────────────────────────

fn generate_unit_rs(unit: &EmissionUnit, options: &RustWriterOptions) -> CodegenResult<String> {
    let doc = unit_doc(unit);
    let body = emit_unit_body(unit, options, 1)?;
    let tokens = quote! {
        #![doc = #doc]
        #body
    };
    Ok(format!("{HEADER}{}", unparse(&unit.identifier, tokens)?))
}

/// Imports and items of `unit`; children become nested modules. `depth`
/// is how many `super::` hops lead back to the keys module's parent.
fn emit_unit_body(
    unit: &EmissionUnit,
    options: &RustWriterOptions,
    depth: usize,
) -> CodegenResult<TokenStream> {
    let imports = emit_imports(unit, options, depth)?;
    let mut scope = IdentifierScope::new(unit.identifier.as_str());
    let items = unit
        .declarations
        .iter()
        .map(|d| emit_declaration(&mut scope, d))
        .collect::<CodegenResult<Vec<_>>>()?;
    let children = unit
        .children
        .iter()
        .map(|child| {
            let name = claim_module(&mut scope, child)?;
            let doc = unit_doc(child);
            let body = emit_unit_body(child, options, depth + 1)?;
            Ok(quote! {
                pub mod #name {
                    #![doc = #doc]
                    #body
                }
            })
        })
        .collect::<CodegenResult<Vec<_>>>()?;

    Ok(quote! {
        #(#imports)*
        #(#items)*
        #(#children)*
    })
}

fn unit_doc(unit: &EmissionUnit) -> String {
    match (unit.role, unit.namespace.as_deref()) {
        (UnitRole::Bundle, _) => " Semantic conventions for every namespace.".to_string(),
        (UnitRole::Metrics, Some(ns)) => format!(" Metrics in the `{ns}` namespace."),
        (_, Some(ns)) => format!(" Semantic conventions in the `{ns}` namespace."),
        (_, None) => " Semantic conventions.".to_string(),
    }
}

fn emit_imports(
    unit: &EmissionUnit,
    options: &RustWriterOptions,
    depth: usize,
) -> CodegenResult<Vec<TokenStream>> {
    let mut keys = BTreeSet::new();
    let mut metrics = BTreeSet::new();
    for decl in &unit.declarations {
        match decl {
            Declaration::Constant(ConstantDecl {
                ty: ConstantType::Key(_),
                ..
            }) => {
                keys.insert("AttributeKey");
            }
            Declaration::TemplatedConstant(_) => {
                keys.insert("AttributeKeyTemplate");
            }
            Declaration::Factory(f) => {
                metrics.insert("Meter");
                metrics.insert(instrument_type(f.instrument));
            }
            _ => {}
        }
    }

    let mut out = Vec::new();
    if !keys.is_empty() {
        let path = keys_path(&unit.identifier, options, depth)?;
        for name in keys {
            let name = format_ident!("{}", name);
            out.push(quote! { use #path::#name; });
        }
    }
    for name in metrics {
        let name = format_ident!("{}", name);
        out.push(quote! { use opentelemetry::metrics::#name; });
    }
    Ok(out)
}

fn keys_path(unit: &str, options: &RustWriterOptions, depth: usize) -> CodegenResult<syn::Path> {
    let raw = match &options.keys_path {
        Some(path) => path.clone(),
        None => {
            let mut segments = vec!["super"; depth];
            segments.push(KEYS_MODULE);
            segments.join("::")
        }
    };
    syn::parse_str(&raw).map_err(|e| render_error(unit, format!("invalid keys path `{raw}`: {e}")))
}

// ── Declarations ──────────────────────────────────────────────────────────────

fn emit_declaration(
    scope: &mut IdentifierScope,
    decl: &Declaration,
) -> CodegenResult<TokenStream> {
    match decl {
        Declaration::Constant(c) => emit_constant(scope, c, false),
        Declaration::TemplatedConstant(c) => emit_constant(scope, c, true),
        Declaration::EnumContainer(e) => emit_enum_container(scope, e),
        Declaration::Factory(f) => emit_factory(scope, f),
    }
}

fn emit_constant(
    scope: &mut IdentifierScope,
    c: &ConstantDecl,
    templated: bool,
) -> CodegenResult<TokenStream> {
    let name = claim_ident(scope, &c.identifier, &c.identifier)?;
    let doc = emit_doc(&c.doc);
    let literal = &c.literal;
    Ok(match c.ty {
        ConstantType::Key(value_type) => {
            let ty = value_type_tokens(value_type);
            let wrapper = if templated {
                format_ident!("AttributeKeyTemplate")
            } else {
                format_ident!("AttributeKey")
            };
            quote! {
                #doc
                pub const #name: #wrapper<#ty> = #wrapper::new(#literal);
            }
        }
        ConstantType::MetricName | ConstantType::EventName => quote! {
            #doc
            pub const #name: &str = #literal;
        },
    })
}

fn emit_enum_container(
    scope: &mut IdentifierScope,
    e: &EnumContainer,
) -> CodegenResult<TokenStream> {
    let name = claim_ident(scope, &e.identifier, &e.identifier)?;
    let mut member_scope = IdentifierScope::new(e.identifier.as_str());
    let doc = emit_doc(&e.doc);
    let ty = match e.value_type {
        ScalarType::String => quote! { &'static str },
        _ => quote! { i64 },
    };
    let members = e
        .members
        .iter()
        .map(|m| {
            let member = claim_ident(&mut member_scope, &m.identifier, &m.identifier)?;
            let member_doc = emit_doc(&m.doc);
            let value = match &m.value {
                EnumValue::Str(s) => quote! { #s },
                EnumValue::Int(v) => int_literal(*v),
            };
            Ok(quote! {
                #member_doc
                pub const #member: #ty = #value;
            })
        })
        .collect::<CodegenResult<Vec<_>>>()?;

    Ok(quote! {
        #doc
        #[derive(Debug, Clone, Copy)]
        pub struct #name;

        impl #name {
            #(#members)*
        }
    })
}

fn emit_factory(scope: &mut IdentifierScope, f: &FactoryDecl) -> CodegenResult<TokenStream> {
    let name = claim_ident(scope, &to_snake_case(&f.identifier), &f.identifier)?;
    let doc = emit_doc(&f.doc);
    let method = format_ident!("{}", builder_method(f.instrument, f.number));
    let instrument = format_ident!("{}", instrument_type(f.instrument));
    let number = match (f.instrument, f.number) {
        (_, NumberType::Double) => quote! { f64 },
        (InstrumentKind::Counter | InstrumentKind::Histogram, NumberType::Long) => quote! { u64 },
        (InstrumentKind::UpDownCounter | InstrumentKind::Gauge, NumberType::Long) => {
            quote! { i64 }
        }
    };
    let metric_name = &f.metric_name;
    let calls = f.calls.iter().map(|call| match call {
        BuilderCall::Description(d) => quote! { .with_description(#d) },
        BuilderCall::Unit(u) => quote! { .with_unit(#u) },
    });

    Ok(quote! {
        #doc
        pub fn #name(meter: &Meter) -> #instrument<#number> {
            meter.#method(#metric_name) #(#calls)* .build()
        }
    })
}

fn builder_method(instrument: InstrumentKind, number: NumberType) -> &'static str {
    match (instrument, number) {
        (InstrumentKind::Counter, NumberType::Long) => "u64_counter",
        (InstrumentKind::Counter, NumberType::Double) => "f64_counter",
        (InstrumentKind::UpDownCounter, NumberType::Long) => "i64_up_down_counter",
        (InstrumentKind::UpDownCounter, NumberType::Double) => "f64_up_down_counter",
        (InstrumentKind::Histogram, NumberType::Long) => "u64_histogram",
        (InstrumentKind::Histogram, NumberType::Double) => "f64_histogram",
        (InstrumentKind::Gauge, NumberType::Long) => "i64_gauge",
        (InstrumentKind::Gauge, NumberType::Double) => "f64_gauge",
    }
}

fn instrument_type(instrument: InstrumentKind) -> &'static str {
    match instrument {
        InstrumentKind::Counter => "Counter",
        InstrumentKind::UpDownCounter => "UpDownCounter",
        InstrumentKind::Histogram => "Histogram",
        InstrumentKind::Gauge => "Gauge",
    }
}

fn value_type_tokens(value_type: ValueType) -> TokenStream {
    let scalar = match value_type.scalar {
        ScalarType::Boolean => quote! { bool },
        ScalarType::String => quote! { String },
        ScalarType::Long => quote! { i64 },
        ScalarType::Double => quote! { f64 },
    };
    if value_type.array {
        quote! { Vec<#scalar> }
    } else {
        scalar
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn emit_doc(lines: &[String]) -> TokenStream {
    let lines = lines.iter().map(|line| {
        if line.is_empty() {
            String::new()
        } else {
            format!(" {line}")
        }
    });
    quote! { #(#[doc = #lines])* }
}

fn int_literal(v: i64) -> TokenStream {
    let lit = Literal::u64_unsuffixed(v.unsigned_abs());
    if v < 0 {
        quote! { -#lit }
    } else {
        quote! { #lit }
    }
}

/// Turn `raw` into a Rust identifier, prefixing `_` when it is not one.
fn rust_ident(unit: &str, raw: &str) -> CodegenResult<Ident> {
    let mut s: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if syn::parse_str::<Ident>(&s).is_err() {
        s.insert(0, '_');
    }
    syn::parse_str::<Ident>(&s)
        .map_err(|e| render_error(unit, format!("cannot form an identifier from `{raw}`: {e}")))
}

/// Sanitized identifier for `raw`, claimed in `scope` on behalf of the
/// plan identifier `source`. Two plan identifiers that sanitize to the same
/// Rust identifier collide.
fn claim_ident(scope: &mut IdentifierScope, raw: &str, source: &str) -> CodegenResult<Ident> {
    let ident = rust_ident(scope.name(), raw)?;
    scope.claim(&ident.to_string(), source)?;
    Ok(ident)
}

/// Module name of `unit`: its snake-cased identifier, which must already be
/// a plain `[a-z0-9_]` identifier since it doubles as a file name.
fn module_ident(unit: &EmissionUnit) -> CodegenResult<Ident> {
    let name = to_snake_case(&unit.identifier);
    let plain = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !plain {
        return Err(render_error(
            &unit.identifier,
            format!("module name `{name}` is not a plain identifier"),
        ));
    }
    if name == KEYS_MODULE || name == "mod" {
        return Err(render_error(
            &unit.identifier,
            format!("module name `{name}` is reserved"),
        ));
    }
    syn::parse_str::<Ident>(&name).map_err(|_| {
        render_error(
            &unit.identifier,
            format!("module name `{name}` is not a valid identifier"),
        )
    })
}

fn claim_module(scope: &mut IdentifierScope, unit: &EmissionUnit) -> CodegenResult<Ident> {
    let ident = module_ident(unit)?;
    scope.claim(&ident.to_string(), &unit.identifier)?;
    Ok(ident)
}

fn unparse(unit: &str, tokens: TokenStream) -> CodegenResult<String> {
    let file: syn::File = syn::parse2(tokens).map_err(|e| render_error(unit, e.to_string()))?;
    Ok(prettyplease::unparse(&file))
}

fn render_error(unit: &str, reason: String) -> CodegenError {
    CodegenError::Render {
        unit: unit.to_string(),
        reason,
    }
}
