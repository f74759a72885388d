//! Fields reachable from a message, with their names and field ids.

use std::collections::BTreeSet;

use ir::{GenerationRequest, MessageDefinition};

use crate::utils::snake_to_pascal_case;

/// One field reachable from a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    /// CamelCase names concatenated ("KeyName")
    pub name: String,
    /// Declared names joined with dots ("key.name")
    pub json_path: String,
    /// Field numbers joined with dots ("2.1")
    pub id: String,
}

/// Every field reachable from `message`, depth first in declaration order.
///
/// A leading `fields` field is left out. Each message is expanded once per
/// path, so self-referencing messages terminate.
pub fn field_paths(request: &GenerationRequest, message: &MessageDefinition) -> Vec<FieldPath> {
    let mut paths = Vec::new();
    let mut visiting = BTreeSet::new();
    collect(request, message, None, &mut visiting, &mut paths);
    paths
}

fn collect<'r>(
    request: &'r GenerationRequest,
    message: &'r MessageDefinition,
    parent: Option<&FieldPath>,
    visiting: &mut BTreeSet<&'r str>,
    paths: &mut Vec<FieldPath>,
) {
    if !visiting.insert(message.name.as_str()) {
        return;
    }
    for (i, field) in message.fields.iter().enumerate() {
        if i == 0 && field.name == "fields" {
            continue;
        }
        let path = match parent {
            Some(p) => FieldPath {
                name: format!("{}{}", p.name, snake_to_pascal_case(&field.name)),
                json_path: format!("{}.{}", p.json_path, field.name),
                id: format!("{}.{}", p.id, field.number),
            },
            None => FieldPath {
                name: snake_to_pascal_case(&field.name),
                json_path: field.name.clone(),
                id: field.number.to_string(),
            },
        };
        let sub = field.type_name.as_deref().and_then(|t| request.find_message(t));
        paths.push(path.clone());
        if let Some(sub) = sub {
            collect(request, sub, Some(&path), visiting, paths);
        }
    }
    visiting.remove(message.name.as_str());
}

#[cfg(test)]
mod tests {
    use ir::{FieldDefinition, FileDefinition};

    use super::*;

    #[test]
    fn test_paths_carry_json_names_and_ids() {
        let field = |name: &str, number: u32, type_name: Option<&str>| FieldDefinition {
            name: name.to_string(),
            number,
            type_name: type_name.map(str::to_string),
        };
        let request = GenerationRequest {
            files: vec![FileDefinition {
                name: "cloudlet.proto".to_string(),
                services: vec![],
                messages: vec![
                    MessageDefinition {
                        name: "Cloudlet".to_string(),
                        fields: vec![
                            field("fields", 1, None),
                            field("key", 2, Some("CloudletKey")),
                            field("num_dynamic_ips", 3, None),
                        ],
                        ..Default::default()
                    },
                    MessageDefinition {
                        name: "CloudletKey".to_string(),
                        fields: vec![field("organization", 1, None)],
                        ..Default::default()
                    },
                ],
            }],
            ..Default::default()
        };

        let cloudlet = request.find_message("Cloudlet").expect("cloudlet");
        let paths: Vec<(String, String, String)> = field_paths(&request, cloudlet)
            .into_iter()
            .map(|p| (p.name, p.json_path, p.id))
            .collect();
        assert_eq!(
            paths,
            vec![
                ("Key".to_string(), "key".to_string(), "2".to_string()),
                ("KeyOrganization".to_string(), "key.organization".to_string(), "2.1".to_string()),
                ("NumDynamicIps".to_string(), "num_dynamic_ips".to_string(), "3".to_string()),
            ]
        );
    }
}
