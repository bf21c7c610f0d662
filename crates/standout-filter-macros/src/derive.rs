//! Implementation of the `#[derive(Filterable)]` macro.
//!
//! Generates `Filterable` (field metadata and indexed access) and `AsValue`
//! (the struct as a navigable record) for structs with named fields.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result, Visibility};

use crate::attrs::parse_filter_attrs;

/// Main implementation of the Filterable derive macro.
pub fn filterable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unit => return Ok(expand(&input, Vec::new(), Vec::new(), Vec::new())),
            Fields::Unnamed(_) => {
                return Err(Error::new(
                    input.span(),
                    "Filterable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Filterable can only be derived for structs",
            ))
        }
    };

    let mut defs: Vec<TokenStream> = Vec::new();
    let mut arms: Vec<TokenStream> = Vec::new();
    let mut bounds: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_filter_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let name = attrs
            .rename
            .unwrap_or_else(|| ident.to_string().trim_start_matches("r#").to_string());
        let exported = matches!(field.vis, Visibility::Public(_));

        let mut def = quote! { ::standout_filter::FieldDef::new(#name) };
        if !attrs.tags.is_empty() {
            let sources = attrs.tags.iter().map(|(source, _)| source);
            let aliases = attrs.tags.iter().map(|(_, alias)| alias);
            def = quote! { #def.with_tags(&[#((#sources, #aliases)),*]) };
        }
        if !exported {
            def = quote! { #def.private() };
        }
        if attrs.flatten {
            def = quote! { #def.flattened() };
        }

        // Private members are only read when they are flattened.
        if exported || attrs.flatten {
            let index = defs.len();
            let ty = &field.ty;
            arms.push(quote! {
                #index => ::standout_filter::AsValue::as_value(&self.#ident),
            });
            bounds.push(quote! { #ty: ::standout_filter::AsValue });
        }
        defs.push(def);
    }

    Ok(expand(&input, defs, arms, bounds))
}

fn expand(
    input: &DeriveInput,
    defs: Vec<TokenStream>,
    arms: Vec<TokenStream>,
    bounds: Vec<TokenStream>,
) -> TokenStream {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Field types only need bounds when the struct is generic.
    let predicates = if input.generics.params.is_empty() {
        Vec::new()
    } else {
        bounds
    };
    let existing: Vec<_> = where_clause
        .map(|w| w.predicates.iter().collect())
        .unwrap_or_default();
    let where_tokens = if existing.is_empty() && predicates.is_empty() {
        quote! {}
    } else {
        quote! { where #(#existing,)* #(#predicates,)* }
    };

    quote! {
        impl #impl_generics ::standout_filter::Filterable for #struct_name #ty_generics #where_tokens {
            fn fields(&self) -> &'static [::standout_filter::FieldDef] {
                const FIELDS: &[::standout_filter::FieldDef] = &[#(#defs),*];
                FIELDS
            }

            fn field(&self, index: usize) -> ::standout_filter::Value<'_> {
                match index {
                    #(#arms)*
                    _ => ::standout_filter::Value::Nil,
                }
            }
        }

        impl #impl_generics ::standout_filter::AsValue for #struct_name #ty_generics #where_tokens {
            fn as_value(&self) -> ::standout_filter::Value<'_> {
                ::standout_filter::Value::Record(self)
            }
        }
    }
}
