//! Attribute parsing for the Filterable derive macro.
//!
//! Reads `#[filter(...)]` field attributes, plus the subset of
//! `#[serde(...)]` that affects how a field is addressed.

use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Lit, Meta, Result, Token,
};

/// Alias source recorded for `#[serde(rename = "...")]`.
pub const SERDE_SOURCE: &str = "serde";

/// Field-level attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterAttr {
    /// Omit this field entirely.
    pub skip: bool,
    /// Promote the fields of this member.
    pub flatten: bool,
    /// Declared name override (default: the field identifier).
    pub rename: Option<String>,
    /// Aliases as `(source, alias)` pairs, in declaration order.
    pub tags: Vec<(String, String)>,
}

impl FilterAttr {
    fn add_tag(&mut self, source: String, alias: String) {
        match self.tags.iter_mut().find(|(s, _)| *s == source) {
            Some(entry) => entry.1 = alias,
            None => self.tags.push((source, alias)),
        }
    }
}

impl Parse for FilterAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FilterAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,
                Meta::Path(p) if p.is_ident("flatten") => attr.flatten = true,

                // rename = "name"
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    attr.rename = Some(string_lit(&nv.value, "rename")?);
                }

                // tag(json = "name,omitempty", xml = "n")
                Meta::List(list) if list.path.is_ident("tag") => {
                    let entries = list.parse_args_with(
                        Punctuated::<Meta, Token![,]>::parse_terminated,
                    )?;
                    for entry in entries {
                        let Meta::NameValue(nv) = &entry else {
                            return Err(Error::new(
                                entry.span(),
                                "expected `source = \"alias\"` inside tag(...)",
                            ));
                        };
                        let source = nv
                            .path
                            .get_ident()
                            .ok_or_else(|| Error::new(nv.path.span(), "expected a source name"))?
                            .to_string();
                        attr.add_tag(source, string_lit(&nv.value, "tag alias")?);
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown filter attribute. Expected: skip, flatten, rename = \"...\", or tag(source = \"...\")",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

fn string_lit(expr: &Expr, what: &str) -> Result<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        other => Err(Error::new(
            other.span(),
            format!("{what} must be a string literal"),
        )),
    }
}

/// Picks `rename` and `flatten` out of a `#[serde(...)]` attribute.
///
/// Anything else serde accepts is ignored, including forms that do not
/// parse as plain meta items.
fn merge_serde_attr(attr: &Attribute, into: &mut FilterAttr) {
    let Ok(content) = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated) else {
        return;
    };
    for meta in content {
        match &meta {
            Meta::Path(p) if p.is_ident("flatten") => into.flatten = true,
            Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                if let Ok(alias) = string_lit(&nv.value, "rename") {
                    into.add_tag(SERDE_SOURCE.to_string(), alias);
                }
            }
            _ => {}
        }
    }
}

/// Collects the filter-relevant attributes of a field.
///
/// `#[filter(...)]` attributes may be repeated; later ones add to earlier
/// ones. An explicit `tag(serde = "...")` wins over `#[serde(rename)]`.
pub fn parse_filter_attrs(attrs: &[Attribute]) -> Result<FilterAttr> {
    let mut result = FilterAttr::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        merge_serde_attr(attr, &mut result);
    }

    for attr in attrs.iter().filter(|a| a.path().is_ident("filter")) {
        let parsed = attr.parse_args::<FilterAttr>()?;
        result.skip |= parsed.skip;
        result.flatten |= parsed.flatten;
        if parsed.rename.is_some() {
            result.rename = parsed.rename;
        }
        for (source, alias) in parsed.tags {
            result.add_tag(source, alias);
        }
    }

    Ok(result)
}
