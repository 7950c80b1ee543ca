//! Serializable descriptions of a value's validation rules.
//!
//! ```json
//! {
//!   "kind": "array",
//!   "options": [{ "validator": { "kind": "string", "rules": [{ "name": "email" }] } }],
//!   "rules": [{ "name": "min", "args": [1] }, { "name": "optional" }]
//! }
//! ```
//!
//! builds `z.array(z.string().email()).min(1).optional()`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{GenError, Result};
use crate::expr::Expr;
use crate::kinds::ValueKinds;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueDescription {
    pub kind: String,
    /// Arguments of the root factory call.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ArgDescription>,
    /// Refinements, applied in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDescription {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgDescription>,
}

/// One argument: a nested validator, an object shape of arguments, or a plain JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgDescription {
    Validator(NestedValidator),
    Shape(ObjectShape),
    Value(serde_json::Value),
}

/// `{ "validator": { .. } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NestedValidator {
    pub validator: Box<ValueDescription>,
}

/// `{ "shape": { "field": <arg>, .. } }`, rendered as an object literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectShape {
    pub shape: BTreeMap<String, ArgDescription>,
}

impl ValueDescription {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            options: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn option(mut self, arg: impl Into<ArgDescription>) -> Self {
        self.options.push(arg.into());
        self
    }

    pub fn rule(mut self, name: impl Into<String>, args: Vec<ArgDescription>) -> Self {
        self.rules.push(RuleDescription {
            name: name.into(),
            args,
        });
        self
    }
}

impl From<serde_json::Value> for ArgDescription {
    fn from(value: serde_json::Value) -> Self {
        ArgDescription::Value(value)
    }
}

impl From<ValueDescription> for ArgDescription {
    fn from(value: ValueDescription) -> Self {
        ArgDescription::Validator(NestedValidator {
            validator: Box::new(value),
        })
    }
}

impl ValueKinds {
    /// Builds the chain a description asks for.
    ///
    /// Fails with `UnknownKind` for a kind that was not composed and with
    /// `UnknownToken` for a rule the kind does not expose.
    pub fn build(&self, description: &ValueDescription) -> Result<Expr> {
        let builder = self.kind(&description.kind).ok_or_else(|| GenError::UnknownKind {
            kind: description.kind.clone(),
        })?;

        let mut expr = builder.create(self.build_args(&description.options)?)?;
        for rule in &description.rules {
            let creator = builder.t().get(&rule.name).ok_or_else(|| GenError::UnknownToken {
                kind: description.kind.clone(),
                name: rule.name.clone(),
            })?;
            expr = creator.apply(expr, self.build_args(&rule.args)?)?;
        }
        Ok(expr)
    }

    fn build_args(&self, args: &[ArgDescription]) -> Result<Vec<Expr>> {
        args.iter().map(|arg| self.build_arg(arg)).collect()
    }

    fn build_arg(&self, arg: &ArgDescription) -> Result<Expr> {
        match arg {
            ArgDescription::Validator(nested) => self.build(&nested.validator),
            ArgDescription::Shape(object) => {
                let entries = object
                    .shape
                    .iter()
                    .map(|(key, value)| -> Result<(String, Expr)> { Ok((key.clone(), self.build_arg(value)?)) })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Expr::Object(entries))
            }
            ArgDescription::Value(value) => Ok(Expr::from(value.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_nested_description() {
        let kinds = ValueKinds::builtin().unwrap();
        let description: ValueDescription = serde_json::from_value(json!({
            "kind": "array",
            "options": [{ "validator": { "kind": "string", "rules": [{ "name": "email" }] } }],
            "rules": [{ "name": "min", "args": [1] }, { "name": "optional" }]
        }))
        .unwrap();
        let expr = kinds.build(&description).unwrap();
        assert_eq!(expr.to_string(), "z.array(z.string().email()).min(1).optional()");
    }

    #[test]
    fn builds_object_shape() {
        let kinds = ValueKinds::builtin().unwrap();
        let description: ValueDescription = serde_json::from_value(json!({
            "kind": "object",
            "options": [{ "shape": {
                "name": { "validator": { "kind": "string", "rules": [{ "name": "min", "args": [2] }] } },
                "age": { "validator": { "kind": "number", "rules": [{ "name": "int" }] } }
            } }],
            "rules": [{ "name": "strict" }]
        }))
        .unwrap();
        let expr = kinds.build(&description).unwrap();
        assert_eq!(
            expr.to_string(),
            "z.object({ age: z.number().int(), name: z.string().min(2) }).strict()"
        );
    }

    #[test]
    fn plain_objects_stay_literals() {
        let kinds = ValueKinds::builtin().unwrap();
        let description = ValueDescription::new("string").rule(
            "min",
            vec![json!(3).into(), json!({ "message": "too short" }).into()],
        );
        let expr = kinds.build(&description).unwrap();
        assert_eq!(expr.to_string(), r#"z.string().min(3, { message: "too short" })"#);
    }

    #[test]
    fn oversized_integer_argument_stays_a_number() {
        let kinds = ValueKinds::builtin().unwrap();
        let description: ValueDescription = serde_json::from_str(
            r#"{"kind":"number","rules":[{"name":"max","args":[18446744073709551615]}]}"#,
        )
        .unwrap();
        let expr = kinds.build(&description).unwrap();
        assert_eq!(expr.to_string(), format!("z.number().max({:?})", u64::MAX as f64));
    }

    #[test]
    fn unknown_rule_is_reported() {
        let kinds = ValueKinds::builtin().unwrap();
        let description = ValueDescription::new("set").rule("email", vec![]);
        match kinds.build(&description) {
            Err(GenError::UnknownToken { kind, name }) => {
                assert_eq!(kind, "set");
                assert_eq!(name, "email");
            }
            other => panic!("expected UnknownToken, got {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_reported() {
        let kinds = ValueKinds::builtin().unwrap();
        let err = kinds.build(&ValueDescription::new("tuple")).unwrap_err();
        assert!(matches!(err, GenError::UnknownKind { .. }));
    }

    #[test]
    fn description_round_trips_through_json() {
        let description = ValueDescription::new("string")
            .option(json!({ "description": "user name" }))
            .rule("max", vec![json!(64).into()]);
        let encoded = serde_json::to_string(&description).unwrap();
        let decoded: ValueDescription = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, description);
    }
}
