//! Plan documents shared by unit tests.

use serde_json::{Value, json};

/// A plan with a single root-level `nomad_job` resource.
pub const NOMAD_PLAN: &str = r#"{
  "format_version": "0.1",
  "terraform_version": "0.14.5",
  "planned_values": {
    "root_module": {
      "resources": [
        {
          "address": "module.job.test_job",
          "mode": "managed",
          "type": "nomad_job",
          "name": "test_job",
          "provider_name": "registry.terraform.io/hashicorp/nomad",
          "schema_version": 0,
          "values": {
            "name": "unit-test",
            "datacenters": ["dc1"],
            "detach": true,
            "purge_on_destroy": null
          }
        }
      ]
    }
  }
}"#;

/// A plan with resources spread over nested child modules.
pub const MODULE_PLAN: &str = r#"{
  "format_version": "0.1",
  "planned_values": {
    "root_module": {
      "resources": [
        {
          "address": "aws_s3_bucket.logs",
          "mode": "managed",
          "type": "aws_s3_bucket",
          "name": "logs",
          "values": {
            "bucket": "demo-logs",
            "acl": "private",
            "tags": {"Environment": "dev", "Team": "platform"}
          }
        }
      ],
      "child_modules": [
        {
          "address": "module.vpc",
          "resources": [
            {
              "address": "module.vpc.aws_eip.nat[0]",
              "mode": "managed",
              "type": "aws_eip",
              "name": "nat",
              "index": 0,
              "values": {"vpc": true, "timeouts": null}
            },
            {
              "address": "module.vpc.aws_eip.nat[1]",
              "mode": "managed",
              "type": "aws_eip",
              "name": "nat",
              "index": 1
            }
          ]
        },
        {
          "address": "module.db",
          "child_modules": [
            {
              "address": "module.db.module.db_subnet_group",
              "resources": [
                {
                  "address": "module.db.module.db_subnet_group.aws_db_subnet_group.this[0]",
                  "mode": "managed",
                  "type": "aws_db_subnet_group",
                  "name": "this",
                  "index": 0,
                  "values": {"name_prefix": "demodb-", "description": "Database subnet group"}
                }
              ]
            }
          ]
        },
        {
          "address": "module.eks",
          "resources": [
            {
              "address": "module.eks.aws_eks_cluster.this[0]",
              "mode": "managed",
              "type": "aws_eks_cluster",
              "name": "this",
              "index": 0,
              "values": {
                "name": "argocd-playground",
                "encryption_config": [
                  {"provider": [{}], "resources": ["secrets"]}
                ]
              }
            }
          ]
        }
      ]
    }
  }
}"#;

/// Address of the resource declared at the given module nesting level of
/// [`nested_plan`].
pub fn nested_address(level: usize) -> String {
    let mut address = String::new();
    for i in 1..=level {
        address.push_str(&format!("module.m{i}."));
    }
    address.push_str(&format!("null_resource.r{level}"));
    address
}

/// A plan with one resource per module and `levels` nested modules below
/// the root.
pub fn nested_plan(levels: usize) -> String {
    fn module(level: usize, levels: usize) -> Value {
        let mut module = json!({
            "resources": [{
                "address": nested_address(level),
                "type": "null_resource",
                "name": format!("r{level}"),
                "values": {"triggers": null}
            }]
        });
        if level < levels {
            module["child_modules"] = json!([module_with_address(level + 1, levels)]);
        }
        module
    }

    fn module_with_address(level: usize, levels: usize) -> Value {
        let mut value = module(level, levels);
        let prefix = nested_address(level);
        let address = prefix
            .rsplit_once(".null_resource")
            .map_or_else(String::new, |(m, _)| m.to_string());
        value["address"] = json!(address);
        value
    }

    json!({"planned_values": {"root_module": module(0, levels)}}).to_string()
}
