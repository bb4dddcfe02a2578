//! Human-readable rendering of `syn` types for messages.

use quote::ToTokens;

/// Token-stream spacing artefacts and their compact form.
const SPACING_FIXES: &[(&str, &str)] = &[
    (" :: ", "::"),
    (":: ", "::"),
    (" ::", "::"),
    (" < ", "<"),
    ("< ", "<"),
    (" <", "<"),
    (" >", ">"),
    (" ,", ","),
    ("& ", "&"),
    (" ;", ";"),
    ("( ", "("),
    (" )", ")"),
    ("[ ", "["),
    (" ]", "]"),
];

/// Renders a type the way it would be written by hand, e.g. `Box<dyn Store>`.
#[must_use]
pub fn type_display(ty: &syn::Type) -> String {
    let raw = ty.to_token_stream().to_string();
    SPACING_FIXES
        .iter()
        .fold(raw, |acc, (from, to)| acc.replace(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn show(ty: syn::Type) -> String {
        type_display(&ty)
    }

    #[test]
    fn renders_common_shapes() {
        assert_eq!(show(parse_quote!(Service)), "Service");
        assert_eq!(show(parse_quote!(Box<dyn Store>)), "Box<dyn Store>");
        assert_eq!(show(parse_quote!(std::sync::Arc<Service>)), "std::sync::Arc<Service>");
        assert_eq!(show(parse_quote!(Vec<Box<dyn Store>>)), "Vec<Box<dyn Store>>");
        assert_eq!(show(parse_quote!(&'a mut Service)), "&'a mut Service");
        assert_eq!(show(parse_quote!((Service, u8))), "(Service, u8)");
        assert_eq!(show(parse_quote!([u8; 4])), "[u8; 4]");
        assert_eq!(show(parse_quote!(HashMap<String, u8>)), "HashMap<String, u8>");
    }
}
