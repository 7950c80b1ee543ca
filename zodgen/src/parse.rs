//! Reads rendered chains back into fragments.
//!
//! The rendered subset of the target language that matters here (names,
//! member access, calls, arrays and scalar literals) is also valid Rust
//! expression syntax, so `syn` does the tokenizing and parsing. Object and
//! regex literals have no Rust counterpart and are reported as unsupported,
//! as are keywords used as method names (`z.enum(..)`).

use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{Lit, LitInt, Member, UnOp};

use crate::errors::{GenError, Result};
use crate::expr::{self, Expr, Literal};

/// Parses rendered source text into a fragment.
pub fn parse_expr(source: &str) -> Result<Expr> {
    let parsed: syn::Expr = syn::parse_str(source)?;
    convert(&parsed)
}

fn convert(parsed: &syn::Expr) -> Result<Expr> {
    match parsed {
        syn::Expr::Path(path) => {
            if path.qself.is_some() {
                return Err(GenError::unsupported("qualified path"));
            }
            let ident = path
                .path
                .get_ident()
                .ok_or_else(|| GenError::unsupported("multi-segment path"))?;
            let name = ident.unraw().to_string();
            match name.as_str() {
                "null" => Ok(Expr::null()),
                "undefined" => Ok(Expr::undefined()),
                "NaN" => Ok(Expr::Literal(Literal::Float(f64::NAN))),
                "Infinity" => Ok(Expr::Literal(Literal::Float(f64::INFINITY))),
                _ => expr::identifier(name),
            }
        }
        syn::Expr::Field(field) => match &field.member {
            Member::Named(ident) => expr::property_access(convert(&field.base)?, ident.unraw().to_string()),
            Member::Unnamed(_) => Err(GenError::unsupported("positional field access")),
        },
        syn::Expr::MethodCall(call) => {
            if call.turbofish.is_some() {
                return Err(GenError::unsupported("turbofish"));
            }
            let callee = expr::property_access(convert(&call.receiver)?, call.method.unraw().to_string())?;
            expr::call(callee, convert_list(&call.args)?)
        }
        syn::Expr::Call(call) => expr::call(convert(&call.func)?, convert_list(&call.args)?),
        syn::Expr::Paren(paren) => convert(&paren.expr),
        syn::Expr::Group(group) => convert(&group.expr),
        syn::Expr::Array(array) => Ok(Expr::Array(convert_list(&array.elems)?)),
        syn::Expr::Lit(lit) => convert_lit(&lit.lit),
        syn::Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => match &*unary.expr {
            syn::Expr::Lit(syn::ExprLit { lit: Lit::Int(value), .. }) if value.suffix().is_empty() => {
                negate_int(value)
            }
            operand => negate(convert(operand)?),
        },
        syn::Expr::Block(_) => Err(GenError::unsupported("object literal")),
        _ => Err(GenError::unsupported("expression form")),
    }
}

fn convert_list<P>(items: &Punctuated<syn::Expr, P>) -> Result<Vec<Expr>> {
    items.iter().map(convert).collect()
}

fn convert_lit(lit: &Lit) -> Result<Expr> {
    match lit {
        Lit::Str(value) => Ok(Expr::string(value.value())),
        Lit::Bool(value) => Ok(Expr::from(value.value)),
        Lit::Int(value) => match value.suffix() {
            "" => Ok(Expr::Literal(Literal::Int(value.base10_parse()?))),
            "n" => Ok(Expr::bigint(value.base10_parse()?)),
            suffix => Err(GenError::unsupported(format!("integer suffix `{suffix}`"))),
        },
        Lit::Float(value) => match value.suffix() {
            "" => Ok(Expr::Literal(Literal::Float(value.base10_parse()?))),
            suffix => Err(GenError::unsupported(format!("float suffix `{suffix}`"))),
        },
        _ => Err(GenError::unsupported("literal kind")),
    }
}

/// Negates an unsuffixed integer literal. The magnitude is read wider than
/// `i64` so that `i64::MIN` is reachable.
fn negate_int(value: &LitInt) -> Result<Expr> {
    let magnitude: i128 = value.base10_parse()?;
    let negated = i64::try_from(-magnitude)
        .map_err(|_| syn::Error::new(value.span(), "number too large to fit in target type"))?;
    Ok(Expr::Literal(Literal::Int(negated)))
}

fn negate(operand: Expr) -> Result<Expr> {
    match operand {
        Expr::Literal(Literal::Int(value)) => Ok(Expr::Literal(Literal::Int(-value))),
        Expr::Literal(Literal::Float(value)) => Ok(Expr::Literal(Literal::Float(-value))),
        Expr::Literal(Literal::BigInt(value)) => Ok(Expr::bigint(-value)),
        _ => Err(GenError::unsupported("negation of a non-numeric expression")),
    }
}
