//! Derive macro for standout-filter.
//!
//! # Available Macros
//!
//! - [`Filterable`] - Generate field metadata and accessors so rule paths
//!   can be resolved against a struct
//!
//! Usually reached through the `derive` feature of `standout-filter`, which
//! re-exports the macro next to the trait of the same name.

mod attrs;
mod derive;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `Filterable` and `AsValue` for a struct with named fields.
///
/// Every field type must implement `standout_filter::AsValue` (all scalar,
/// string, optional, pointer and collection types do, as does any type
/// deriving `Filterable`).
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[filter(skip)]` | Omit the field; paths naming it are not found |
/// | `#[filter(rename = "...")]` | Declared name used by rules (default: field name) |
/// | `#[filter(tag(json = "...", ...))]` | Aliases per source, selected with `field_name_tag` |
/// | `#[filter(flatten)]` | Promote the fields (or map keys) of this member |
/// | `#[serde(rename = "...")]` | Alias for the `"serde"` source |
/// | `#[serde(flatten)]` | Same as `#[filter(flatten)]` |
///
/// Only `pub` fields can be addressed. Naming a non-`pub` field in a rule is
/// an error, though the fields of a non-`pub` flattened member are promoted.
///
/// # Example
///
/// ```ignore
/// use standout_filter::{Filterable, Processor, Rule, Op};
///
/// #[derive(Filterable)]
/// struct Address {
///     #[filter(tag(json = "country"))]
///     pub country_code: String,
/// }
///
/// #[derive(Filterable)]
/// struct Person {
///     #[filter(tag(json = "name"))]
///     pub full_name: String,
///     #[filter(tag(json = "address"))]
///     pub address: Address,
///     #[filter(skip)]
///     pub internal_id: u64,
/// }
///
/// let processor = Processor::builder().field_name_tag("json").build()?;
/// let rules = vec![vec![Rule::new("address.country", Op::Equal, "FR")]];
/// processor.apply(&rules, &mut people)?;
/// ```
#[proc_macro_derive(Filterable, attributes(filter, serde))]
pub fn filterable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::filterable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
