//! Implementation of the `literal mutations` command.

use serde::Deserialize;
use serde_json::json;

use crate::{
    books::{decode, expect_success},
    commands::{ColorChoice, Context},
    error::Result,
    operations::SCHEMA_MUTATIONS,
    prompt::TerminalPrompter,
};

/// Introspected schema.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Schema {
    /// Root mutation type, absent when the schema has none.
    mutation_type: Option<MutationType>,
}

/// Root mutation type.
#[derive(Debug, Deserialize)]
struct MutationType {
    /// Mutation fields.
    fields: Vec<Field>,
}

/// A schema field.
#[derive(Debug, Deserialize)]
struct Field {
    /// Field name.
    name: String,
}

/// Execute the mutations command.
pub async fn run(color: ColorChoice, debug: bool) -> Result<()> {
    let context = Context::load(color, debug)?;
    let credential = context
        .store
        .get_usable(&context.gateway, &mut TerminalPrompter)
        .await?;

    let outcome = context
        .gateway
        .send(&SCHEMA_MUTATIONS, json!({}), Some(&credential.token))
        .await?;
    let schema: Schema = decode(&SCHEMA_MUTATIONS, expect_success(&SCHEMA_MUTATIONS, outcome)?)?;

    println!("Available mutations:");
    for name in mutation_names(&schema) {
        println!("- {name}");
    }
    Ok(())
}

/// Names of the schema's mutations, in schema order.
fn mutation_names(schema: &Schema) -> Vec<&str> {
    schema
        .mutation_type
        .as_ref()
        .map(|mutation| mutation.fields.iter().map(|field| field.name.as_str()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Schema, mutation_names};

    #[test]
    fn lists_mutation_names() {
        let schema: Schema = serde_json::from_value(json!({
            "mutationType": {"fields": [{"name": "login"}, {"name": "createBook"}]}
        }))
        .expect("schema");
        assert_eq!(mutation_names(&schema), vec!["login", "createBook"]);
    }

    #[test]
    fn handles_schema_without_mutations() {
        let schema: Schema =
            serde_json::from_value(json!({"mutationType": null})).expect("schema");
        assert!(mutation_names(&schema).is_empty());
    }
}
