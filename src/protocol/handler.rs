//! Command handler
//!
//! Validate, dispatch, render. A command line is parsed into a typed
//! [`Command`] first; only a fully valid command reaches the store, so a
//! rejected line never changes the graph.

use crate::graph::{GraphResult, GraphStore, PropertyRemoval, RelationshipAssertion};
use crate::protocol::command::Command;
use crate::protocol::response::{Payload, Response};
use tracing::{debug, warn};

/// Stateless dispatcher from command lines to store operations
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandHandler;

impl CommandHandler {
    pub fn new() -> Self {
        Self
    }

    /// Parse and execute one command line
    pub fn handle_line(&self, line: &str, store: &mut GraphStore) -> Response {
        match Command::parse(line) {
            Ok(command) => self.execute(command, store),
            Err(err) => {
                warn!(line, error = %err, "rejected command");
                Response::from(err)
            }
        }
    }

    /// Execute an already-parsed command
    pub fn execute(&self, command: Command, store: &mut GraphStore) -> Response {
        let name = command.name();
        debug!(command = name.keyword(), mutation = name.is_mutation(), "executing command");

        match self.dispatch(command, store) {
            Ok(payload) => Response::Success(payload),
            Err(err) => {
                debug!(command = name.keyword(), error = %err, "command failed");
                Response::from(err)
            }
        }
    }

    fn dispatch(&self, command: Command, store: &mut GraphStore) -> GraphResult<Payload> {
        match command {
            Command::AddEntity { label, name } => {
                let message = format!("Entity \"{}\" added with label \"{}\"", name, label);
                store.add_entity(label, &name)?;
                Ok(message_payload(message))
            }
            Command::AddProperty { name, properties } => {
                store.set_properties(&name, &properties)?;
                Ok(message_payload(format!(
                    "{} propert{} set on \"{}\"",
                    properties.len(),
                    plural(properties.len(), "y", "ies"),
                    name
                )))
            }
            Command::GetInfo { name, keys } => {
                Ok(Payload::Entity(store.get_properties(&name, &keys)?))
            }
            Command::DeleteInfo { name, keys } => {
                let removal = store.delete_properties(&name, &keys)?;
                Ok(removal_payload(removal, &format!("\"{}\"", name)))
            }
            Command::GetLabeled { label } => {
                let entities = store.find_by_label(&label)?;
                Ok(Payload::Labeled { label, entities })
            }
            Command::DeleteEntity { label, name } => {
                let deletion = store.delete_entity(label, &name)?;
                Ok(Payload::EntityDeleted {
                    message: format!(
                        "Entity \"{}\" with label \"{}\" deleted",
                        deletion.entity.name, deletion.entity.label
                    ),
                    relationships_removed: deletion.relationships_removed,
                })
            }
            Command::AddRelationship {
                source,
                target,
                rel_type,
            } => {
                let message = match store.add_relationship(&source, &target, rel_type.clone())? {
                    RelationshipAssertion::Created(_) => format!(
                        "Relationship \"{}\" -[{}]-> \"{}\" added",
                        source, rel_type, target
                    ),
                    RelationshipAssertion::AlreadyPresent(_) => format!(
                        "Relationship \"{}\" -[{}]-> \"{}\" already exists",
                        source, rel_type, target
                    ),
                };
                Ok(message_payload(message))
            }
            Command::AddRelationshipProperty { rel, properties } => {
                store.set_relationship_properties(&rel, &properties)?;
                Ok(message_payload(format!(
                    "{} propert{} set on relationship \"{}\" -> \"{}\"",
                    properties.len(),
                    plural(properties.len(), "y", "ies"),
                    rel.source,
                    rel.target
                )))
            }
            Command::GetRelationshipInfo { rel, keys } => Ok(Payload::Relationship(
                store.get_relationship_properties(&rel, &keys)?,
            )),
            Command::DeleteRelationshipInfo { rel, keys } => {
                let removal = store.delete_relationship_properties(&rel, &keys)?;
                let owner = format!("relationship \"{}\" -> \"{}\"", rel.source, rel.target);
                Ok(removal_payload(removal, &owner))
            }
            Command::DeleteRelationship {
                source,
                target,
                types,
            } => {
                let removed = store.delete_relationship(&source, &target, &types)?;
                let message = if types.is_all() {
                    format!(
                        "{} relationship{} from \"{}\" to \"{}\" deleted",
                        removed.len(),
                        plural(removed.len(), "", "s"),
                        source,
                        target
                    )
                } else {
                    let names: Vec<&str> =
                        removed.iter().map(|rel| rel.rel_type.as_str()).collect();
                    format!(
                        "Relationship \"{}\" -[{}]-> \"{}\" deleted",
                        source,
                        names.join(", "),
                        target
                    )
                };
                Ok(message_payload(message))
            }
            Command::Find { name, types } => {
                let related = store.neighbors(&name, &types)?;
                Ok(Payload::Related { name, related })
            }
            Command::Get { pairs } => Ok(Payload::Matches {
                matches: store.find_by_property(&pairs)?,
            }),
        }
    }
}

fn message_payload(message: String) -> Payload {
    Payload::Message { message }
}

fn removal_payload(removal: PropertyRemoval, owner: &str) -> Payload {
    match removal {
        PropertyRemoval::Cleared { removed } => Payload::PropertiesDeleted {
            message: format!(
                "All {} propert{} deleted from {}",
                removed,
                plural(removed, "y", "ies"),
                owner
            ),
            keys: Vec::new(),
        },
        PropertyRemoval::Keys(keys) => {
            let found = keys.iter().filter(|k| k.found).count();
            let message = if found == keys.len() {
                format!("Properties deleted from {}", owner)
            } else {
                format!(
                    "{} of {} properties deleted from {}",
                    found,
                    keys.len(),
                    owner
                )
            };
            Payload::PropertiesDeleted { message, keys }
        }
    }
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::response::ErrorKind;
    use serde_json::json;

    fn run(store: &mut GraphStore, line: &str) -> Response {
        CommandHandler::new().handle_line(line, store)
    }

    fn seeded() -> GraphStore {
        let mut store = GraphStore::new();
        for line in [
            "ADD_ENTITY{Person, Alice}",
            "ADD_ENTITY{Person, Bob}",
            "ADD_ENTITY{City, Paris}",
            "ADD_r{Alice, Bob, friend}",
            "ADD_r{Alice, Paris, lives_in}",
        ] {
            assert!(!run(&mut store, line).is_error(), "{}", line);
        }
        store
    }

    #[test]
    fn test_add_and_get_info() {
        let mut store = seeded();
        assert!(!run(&mut store, "ADD_PROPERTY{Alice, age:30, city:Paris}").is_error());

        let response = run(&mut store, "GET_INFO{Alice, age, email}");
        assert_eq!(
            response.to_json(),
            json!({
                "status": "success",
                "label": "Person",
                "name": "Alice",
                "properties": {"age": "30", "email": null},
            })
        );
    }

    #[test]
    fn test_rejected_lines_leave_graph_unchanged() {
        let mut store = seeded();
        let before = store.statistics();

        let response = run(&mut store, "ADD_ENTITY{Person}");
        assert_eq!(response.kind(), Some(ErrorKind::MalformedCommand));
        let response = run(&mut store, "TRUNCATE{everything}");
        assert_eq!(response.kind(), Some(ErrorKind::UnsupportedCommand));
        let response = run(&mut store, "ADD_PROPERTY{Alice, age:30, broken}");
        assert_eq!(response.kind(), Some(ErrorKind::MalformedCommand));

        assert_eq!(store.statistics(), before);
        assert_eq!(store.entity("Alice").unwrap().property_count(), 0);
    }

    #[test]
    fn test_duplicate_entity() {
        let mut store = seeded();
        let response = run(&mut store, "ADD_ENTITY{City, Alice}");
        assert_eq!(response.kind(), Some(ErrorKind::DuplicateEntity));
    }

    #[test]
    fn test_delete_info_reports_per_key() {
        let mut store = seeded();
        run(&mut store, "ADD_PROPERTY{Alice, age:30}");

        let response = run(&mut store, "DELETE_INFO{Alice, age, email}");
        assert_eq!(
            response.to_json()["keys"],
            json!([{"key": "age", "found": true}, {"key": "email", "found": false}])
        );

        let response = run(&mut store, "DELETE_INFO{Alice, email}");
        assert_eq!(response.kind(), Some(ErrorKind::NoMatchingProperty));
    }

    #[test]
    fn test_find_and_get() {
        let mut store = seeded();
        let response = run(&mut store, "FIND{Alice, friend}");
        assert_eq!(
            response.to_json(),
            json!({
                "status": "success",
                "name": "Alice",
                "related": [{"name": "Bob", "relationship": "friend"}],
            })
        );

        assert_eq!(run(&mut store, "FIND{Bob}").kind(), Some(ErrorKind::NoRelationships));
        assert_eq!(run(&mut store, "FIND{Alice, enemy}").kind(), Some(ErrorKind::NoMatch));
        assert_eq!(run(&mut store, "FIND{Zed}").kind(), Some(ErrorKind::EntityNotFound));

        run(&mut store, "ADD_PROPERTY{Bob, age:30}");
        let response = run(&mut store, "GET{age:30, age:99}");
        assert_eq!(
            response.to_json()["matches"],
            json!([{"key": "age", "value": "30", "entities": ["Bob"]}])
        );
        assert_eq!(run(&mut store, "GET{age:99}").kind(), Some(ErrorKind::NoMatch));
    }

    #[test]
    fn test_relationship_errors() {
        let mut store = seeded();
        assert_eq!(
            run(&mut store, "ADD_r{Alice, Zed, friend}").kind(),
            Some(ErrorKind::EndpointNotFound)
        );
        assert_eq!(
            run(&mut store, "DELETE_r{Bob, Alice, friend}").kind(),
            Some(ErrorKind::RelationshipNotFound)
        );
        assert_eq!(
            run(&mut store, "DELETE_r{Alice, Bob, enemy}").kind(),
            Some(ErrorKind::NoMatchingType)
        );
        assert_eq!(
            run(&mut store, "GET_r_INFO{Alice, Bob[enemy], ALL}").kind(),
            Some(ErrorKind::NoMatchingType)
        );
    }

    #[test]
    fn test_delete_entity_cascades() {
        let mut store = seeded();
        let response = run(&mut store, "DELETE_ENTITY{Person, Alice}");
        assert_eq!(response.to_json()["relationships_removed"], json!(2));
        assert_eq!(store.relationship_count(), 0);
        assert_eq!(
            run(&mut store, "FIND{Alice}").kind(),
            Some(ErrorKind::EntityNotFound)
        );
    }

    #[test]
    fn test_reasserting_relationship_is_not_an_error() {
        let mut store = seeded();
        let response = run(&mut store, "ADD_r{Alice, Bob, friend}");
        assert!(!response.is_error());
        assert_eq!(store.relationship_count(), 2);
    }
}
