//! Procedural macros used in the definition and implementation of getters and setters for NameSettings

use quote::quote;
use syn::parse::ParseStream;
use syn::parse::{Parse, Result};
use syn::{Expr, Ident, Token};

type ValueName = Ident;
type ValueType = Ident;
type DefaultValue = Expr;

/// Signature contains the results of parsing a nps_gets_and_sets definition, i.e., the
/// name of a value stored in a NameSettings map and the corresponding type.
struct Signature {
    value_name: ValueName,
    value_type: ValueType,
}

impl Parse for Signature {
    fn parse(stream: ParseStream<'_>) -> Result<Self> {
        let value_name = stream.parse()?;
        stream.parse::<Token!(,)>()?;
        let value_type = stream.parse()?;
        Ok(Signature {
            value_name,
            value_type,
        })
    }
}

/// SignatureWithDefault contains the components of a nps_gets_and_sets_with_default definition,
/// i.e., a value name, a value type and the value returned when the map holds no entry. For example:
///     ```text
///     nps_gets_and_sets_with_default!(PS_CN_IN_DN_FALLBACK, bool, false);
///     ```
struct SignatureWithDefault {
    value_name: ValueName,
    value_type: ValueType,
    default_value: DefaultValue,
}

impl Parse for SignatureWithDefault {
    fn parse(stream: ParseStream<'_>) -> Result<Self> {
        let value_name = stream.parse()?;
        stream.parse::<Token!(,)>()?;
        let value_type = stream.parse()?;
        stream.parse::<Token!(,)>()?;
        let default_value = stream.parse()?;
        Ok(SignatureWithDefault {
            value_name,
            value_type,
            default_value,
        })
    }
}

/// Names shared by both macros: getter, setter, the NameSettingsTypes variant and the doc strings.
struct Accessors {
    getter: Ident,
    setter: Ident,
    variant: Ident,
    getter_comment: String,
    setter_comment: String,
}

/// PS_DN_FORMAT yields get_dn_format and set_dn_format; bool values are held in the Bool variant
/// and all other types in the variant of the same name.
fn accessors(flag: &Ident, value_type: &Ident) -> Accessors {
    let flag_name = flag.to_string();
    let flag_str = flag_name
        .strip_prefix("PS_")
        .unwrap_or(&flag_name)
        .to_lowercase();
    let getter_str = format!("get_{}", flag_str);
    let setter_str = format!("set_{}", flag_str);
    let type_str = value_type.to_string();
    let variant_str = if type_str == "bool" {
        "Bool".to_string()
    } else {
        type_str
    };

    Accessors {
        getter: Ident::new(&getter_str, flag.span()),
        setter: Ident::new(&setter_str, flag.span()),
        variant: Ident::new(&variant_str, value_type.span()),
        getter_comment: format!(
            "`{}` is used to retrieve `{}` items from a [`NameSettings`] instance",
            getter_str, flag
        ),
        setter_comment: format!(
            "`{}` is used to set `{}` items in a [`NameSettings`] instance",
            setter_str, flag
        ),
    }
}

#[proc_macro]
pub fn nps_gets_and_sets(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let signature = syn::parse_macro_input!(input as Signature);
    let flag = signature.value_name;
    let return_t = signature.value_type;
    let Accessors {
        getter,
        setter,
        variant,
        getter_comment,
        setter_comment,
    } = accessors(&flag, &return_t);

    let tokens = quote! {
            #[doc = #getter_comment]
            pub fn #getter(nps: &NameSettings) -> Option<#return_t> {
                match nps.0.get(#flag) {
                    Some(NameSettingsTypes::#variant(v)) => Some(v.clone()),
                    _ => None,
                }
            }
            #[doc = #setter_comment]
            pub fn #setter(nps: &mut NameSettings, v: #return_t) {
                nps.0.insert(#flag.to_string(), NameSettingsTypes::#variant(v));
            }
    };
    tokens.into()
}

#[proc_macro]
pub fn nps_gets_and_sets_with_default(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let signature = syn::parse_macro_input!(input as SignatureWithDefault);
    let flag = signature.value_name;
    let return_t = signature.value_type;
    let default_value = signature.default_value;
    let Accessors {
        getter,
        setter,
        variant,
        getter_comment,
        setter_comment,
    } = accessors(&flag, &return_t);

    let tokens = quote! {
            #[doc = #getter_comment]
            pub fn #getter(nps: &NameSettings) -> #return_t {
                match nps.0.get(#flag) {
                    Some(NameSettingsTypes::#variant(v)) => v.clone(),
                    _ => #default_value,
                }
            }
            #[doc = #setter_comment]
            pub fn #setter(nps: &mut NameSettings, v: #return_t) {
                nps.0.insert(#flag.to_string(), NameSettingsTypes::#variant(v));
            }
    };
    tokens.into()
}
