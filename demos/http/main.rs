use opa_client::{
    http::{EvalOptions, Opa, PolicyOptions, SetDocumentOptions},
    PolicyDecision,
};
use serde::Serialize;
use serde_json::json;
use std::collections::HashSet;

const POLICY: &str = r#"package example

import rego.v1

project_permissions contains permission if {
	some role in data.users[input.user_id].projects[input.project_id].roles
	some permission in data.roles[role]
}
"#;

enum ProjectPermissions {}

#[derive(Serialize)]
struct OpaInput {
    user_id: String,
    project_id: String,
}

impl PolicyDecision for ProjectPermissions {
    const POLICY_PATH: &'static str = "example.project_permissions";
    type Input = OpaInput;
    type Output = HashSet<String>;
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let opa = Opa::new("http://localhost:8181")?;

    opa.health().await?;

    opa.put_policy("example", POLICY, &PolicyOptions::default())
        .await?;

    opa.set_document(
        "users",
        &json!({
            "test": {
                "projects": {
                    "test": {
                        "roles": ["owner"]
                    }
                }
            }
        }),
        &SetDocumentOptions::default(),
    )
    .await?;

    opa.set_document(
        "roles",
        &json!({
            "owner": ["read", "write", "delete"]
        }),
        &SetDocumentOptions::default(),
    )
    .await?;

    let input = OpaInput {
        user_id: "test".into(),
        project_id: "test".into(),
    };

    let decision = opa.decide::<ProjectPermissions>(&input).await?;

    println!("{:?}", decision.result);

    let res = opa
        .post_document::<_, HashSet<String>>(
            "example/project_permissions",
            &input,
            &EvalOptions {
                metrics: true,
                ..EvalOptions::default()
            },
        )
        .await?;

    println!("{:?}", res.metrics);

    Ok(())
}
