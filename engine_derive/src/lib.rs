use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro for the `Component` trait
///
/// The generated impl names `Component`, `ComponentRegistry` and
/// `ComponentMetadata` unqualified, so all three must be in scope at the
/// derive site.
#[proc_macro_derive(Component, attributes(component))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let component_name = match component_name_attr(&input) {
        Ok(Some(value)) => value,
        Ok(None) => name.to_string(),
        Err(err) => return err.to_compile_error().into(),
    };

    let expanded = quote! {
        impl Component for #name {
            fn component_name() -> &'static str {
                #component_name
            }

            fn register(registry: &mut ComponentRegistry) {
                let metadata = ComponentMetadata::new::<Self>(Self::component_name());
                registry.register_with_metadata(metadata);
            }
        }
    };

    TokenStream::from(expanded)
}

/// Reads `#[component(name = "...")]`, rejecting unknown keys
fn component_name_attr(input: &DeriveInput) -> syn::Result<Option<String>> {
    let mut component_name = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("component") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: syn::LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("component name must not be empty"));
                }
                component_name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported component attribute, expected `name`"))
            }
        })?;
    }
    Ok(component_name)
}
