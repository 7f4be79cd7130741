//! Command parsing
//!
//! A command line has the shape `NAME{field, field, ...}`. Parsing happens in
//! two steps: the frame is split into a command keyword and trimmed fields,
//! then the fields are validated against the command's arity and turned into a
//! typed [`Command`]. Nothing touches the graph until parsing has succeeded.

use crate::graph::{KeySelector, Label, RelationType, RelationshipRef, TypeFilter, WILDCARD};
use thiserror::Error;

/// Command parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Bad framing, field count or field syntax
    #[error("Malformed {command} command: {reason}")]
    Malformed {
        command: &'static str,
        reason: String,
    },

    /// Unknown command keyword
    #[error("Unsupported command: {0}")]
    Unsupported(String),
}

pub type CommandResult<T> = Result<T, CommandError>;

/// The fixed command set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    AddEntity,
    AddProperty,
    GetInfo,
    DeleteInfo,
    GetLabeled,
    DeleteEntity,
    AddRelationship,
    AddRelationshipProperty,
    GetRelationshipInfo,
    DeleteRelationshipInfo,
    DeleteRelationship,
    Find,
    Get,
}

impl CommandName {
    pub const ALL: [CommandName; 13] = [
        CommandName::AddEntity,
        CommandName::AddProperty,
        CommandName::GetInfo,
        CommandName::DeleteInfo,
        CommandName::GetLabeled,
        CommandName::DeleteEntity,
        CommandName::AddRelationship,
        CommandName::AddRelationshipProperty,
        CommandName::GetRelationshipInfo,
        CommandName::DeleteRelationshipInfo,
        CommandName::DeleteRelationship,
        CommandName::Find,
        CommandName::Get,
    ];

    /// Protocol keyword, e.g. `ADD_r_PROPERTY`
    pub fn keyword(&self) -> &'static str {
        match self {
            CommandName::AddEntity => "ADD_ENTITY",
            CommandName::AddProperty => "ADD_PROPERTY",
            CommandName::GetInfo => "GET_INFO",
            CommandName::DeleteInfo => "DELETE_INFO",
            CommandName::GetLabeled => "GET_LABELED",
            CommandName::DeleteEntity => "DELETE_ENTITY",
            CommandName::AddRelationship => "ADD_r",
            CommandName::AddRelationshipProperty => "ADD_r_PROPERTY",
            CommandName::GetRelationshipInfo => "GET_r_INFO",
            CommandName::DeleteRelationshipInfo => "DELETE_r_INFO",
            CommandName::DeleteRelationship => "DELETE_r",
            CommandName::Find => "FIND",
            CommandName::Get => "GET",
        }
    }

    /// Exact, case-sensitive keyword lookup
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.keyword() == keyword)
    }

    /// Whether the command can change the graph
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            CommandName::GetInfo
                | CommandName::GetLabeled
                | CommandName::GetRelationshipInfo
                | CommandName::Find
                | CommandName::Get
        )
    }
}

/// A parsed, validated command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddEntity {
        label: Label,
        name: String,
    },
    AddProperty {
        name: String,
        properties: Vec<(String, String)>,
    },
    GetInfo {
        name: String,
        keys: KeySelector,
    },
    DeleteInfo {
        name: String,
        keys: KeySelector,
    },
    GetLabeled {
        label: Label,
    },
    DeleteEntity {
        label: Label,
        name: String,
    },
    AddRelationship {
        source: String,
        target: String,
        rel_type: RelationType,
    },
    AddRelationshipProperty {
        rel: RelationshipRef,
        properties: Vec<(String, String)>,
    },
    GetRelationshipInfo {
        rel: RelationshipRef,
        keys: KeySelector,
    },
    DeleteRelationshipInfo {
        rel: RelationshipRef,
        keys: KeySelector,
    },
    DeleteRelationship {
        source: String,
        target: String,
        types: TypeFilter,
    },
    Find {
        name: String,
        types: TypeFilter,
    },
    Get {
        pairs: Vec<(String, String)>,
    },
}

impl Command {
    /// Parse one command line
    pub fn parse(line: &str) -> CommandResult<Command> {
        let Frame { name, fields } = Frame::split(line)?;
        let args = Args { name, fields };

        match name {
            CommandName::AddEntity => {
                args.exactly(2, "expected a label and a name")?;
                Ok(Command::AddEntity {
                    label: Label::new(args.identifier(0, "label")?),
                    name: args.identifier(1, "entity name")?.to_string(),
                })
            }
            CommandName::AddProperty => {
                args.at_least(2, "expected a name and at least one key:value pair")?;
                Ok(Command::AddProperty {
                    name: args.fields[0].to_string(),
                    properties: args.pairs(1)?,
                })
            }
            CommandName::GetInfo => {
                args.at_least(2, "expected a name and keys or ALL")?;
                Ok(Command::GetInfo {
                    name: args.fields[0].to_string(),
                    keys: args.keys(1),
                })
            }
            CommandName::DeleteInfo => {
                args.at_least(2, "expected a name and keys or ALL")?;
                Ok(Command::DeleteInfo {
                    name: args.fields[0].to_string(),
                    keys: args.keys(1),
                })
            }
            CommandName::GetLabeled => {
                args.exactly(1, "expected a single label")?;
                Ok(Command::GetLabeled {
                    label: Label::new(args.fields[0]),
                })
            }
            CommandName::DeleteEntity => {
                args.exactly(2, "expected a label and a name")?;
                Ok(Command::DeleteEntity {
                    label: Label::new(args.fields[0]),
                    name: args.fields[1].to_string(),
                })
            }
            CommandName::AddRelationship => {
                args.exactly(3, "expected two entity names and a relationship type")?;
                Ok(Command::AddRelationship {
                    source: args.fields[0].to_string(),
                    target: args.fields[1].to_string(),
                    rel_type: RelationType::new(args.identifier(2, "relationship type")?),
                })
            }
            CommandName::AddRelationshipProperty => {
                args.at_least(3, "expected two entity names and at least one key:value pair")?;
                Ok(Command::AddRelationshipProperty {
                    rel: args.relationship_ref()?,
                    properties: args.pairs(2)?,
                })
            }
            CommandName::GetRelationshipInfo => {
                args.at_least(3, "expected two entity names and keys or ALL")?;
                Ok(Command::GetRelationshipInfo {
                    rel: args.relationship_ref()?,
                    keys: args.keys(2),
                })
            }
            CommandName::DeleteRelationshipInfo => {
                args.at_least(3, "expected two entity names and keys or ALL")?;
                Ok(Command::DeleteRelationshipInfo {
                    rel: args.relationship_ref()?,
                    keys: args.keys(2),
                })
            }
            CommandName::DeleteRelationship => {
                args.exactly(3, "expected two entity names and a relationship type or ALL")?;
                let types = if args.fields[2] == WILDCARD {
                    TypeFilter::All
                } else {
                    TypeFilter::single(args.fields[2])
                };
                Ok(Command::DeleteRelationship {
                    source: args.fields[0].to_string(),
                    target: args.fields[1].to_string(),
                    types,
                })
            }
            CommandName::Find => {
                args.at_least(1, "expected an entity name")?;
                Ok(Command::Find {
                    name: args.fields[0].to_string(),
                    types: TypeFilter::from_fields(args.owned_from(1)),
                })
            }
            CommandName::Get => {
                args.at_least(1, "expected at least one key:value pair")?;
                Ok(Command::Get {
                    pairs: args.pairs(0)?,
                })
            }
        }
    }

    pub fn name(&self) -> CommandName {
        match self {
            Command::AddEntity { .. } => CommandName::AddEntity,
            Command::AddProperty { .. } => CommandName::AddProperty,
            Command::GetInfo { .. } => CommandName::GetInfo,
            Command::DeleteInfo { .. } => CommandName::DeleteInfo,
            Command::GetLabeled { .. } => CommandName::GetLabeled,
            Command::DeleteEntity { .. } => CommandName::DeleteEntity,
            Command::AddRelationship { .. } => CommandName::AddRelationship,
            Command::AddRelationshipProperty { .. } => CommandName::AddRelationshipProperty,
            Command::GetRelationshipInfo { .. } => CommandName::GetRelationshipInfo,
            Command::DeleteRelationshipInfo { .. } => CommandName::DeleteRelationshipInfo,
            Command::DeleteRelationship { .. } => CommandName::DeleteRelationship,
            Command::Find { .. } => CommandName::Find,
            Command::Get { .. } => CommandName::Get,
        }
    }
}

/// Keyword plus trimmed fields of one command line
struct Frame<'a> {
    name: CommandName,
    fields: Vec<&'a str>,
}

impl<'a> Frame<'a> {
    fn split(line: &'a str) -> CommandResult<Frame<'a>> {
        let line = line.trim();

        let Some(open) = line.find('{') else {
            return match CommandName::from_keyword(line) {
                Some(name) => Err(malformed(name, "missing opening brace")),
                None => Err(CommandError::Unsupported(line.to_string())),
            };
        };

        let keyword = line[..open].trim_end();
        let name = CommandName::from_keyword(keyword)
            .ok_or_else(|| CommandError::Unsupported(keyword.to_string()))?;

        let body = line[open + 1..]
            .strip_suffix('}')
            .ok_or_else(|| malformed(name, "missing closing brace"))?;
        if body.contains(['{', '}']) {
            return Err(malformed(name, "unexpected brace inside arguments"));
        }

        if body.trim().is_empty() {
            return Ok(Frame {
                name,
                fields: Vec::new(),
            });
        }

        let fields: Vec<&str> = body.split(',').map(str::trim).collect();
        if fields.iter().any(|field| field.is_empty()) {
            return Err(malformed(name, "empty field"));
        }

        Ok(Frame { name, fields })
    }
}

/// Field accessors with per-command validation
struct Args<'a> {
    name: CommandName,
    fields: Vec<&'a str>,
}

impl<'a> Args<'a> {
    fn exactly(&self, count: usize, reason: &str) -> CommandResult<()> {
        if self.fields.len() != count {
            return Err(malformed(self.name, reason));
        }
        Ok(())
    }

    fn at_least(&self, count: usize, reason: &str) -> CommandResult<()> {
        if self.fields.len() < count {
            return Err(malformed(self.name, reason));
        }
        Ok(())
    }

    /// A field that names something new; brackets are reserved for
    /// `target[type]` references
    fn identifier(&self, index: usize, what: &str) -> CommandResult<&'a str> {
        let field = self.fields[index];
        if field.contains(['[', ']']) {
            return Err(malformed(
                self.name,
                format!("{} \"{}\" must not contain '[' or ']'", what, field),
            ));
        }
        Ok(field)
    }

    fn owned_from(&self, start: usize) -> Vec<String> {
        self.fields[start..].iter().map(|f| f.to_string()).collect()
    }

    fn keys(&self, start: usize) -> KeySelector {
        KeySelector::from_fields(self.owned_from(start))
    }

    /// Split every field from `start` on its first colon
    fn pairs(&self, start: usize) -> CommandResult<Vec<(String, String)>> {
        self.fields[start..]
            .iter()
            .map(|field| {
                let (key, value) = field
                    .split_once(':')
                    .ok_or_else(|| malformed(self.name, format!("missing ':' in property \"{}\"", field)))?;
                let (key, value) = (key.trim(), value.trim());
                if key.is_empty() || value.is_empty() {
                    return Err(malformed(
                        self.name,
                        format!("empty key or value in property \"{}\"", field),
                    ));
                }
                Ok((key.to_string(), value.to_string()))
            })
            .collect()
    }

    /// First two fields as a relationship reference
    ///
    /// The target may carry a type qualifier: `Bob[friend]`.
    fn relationship_ref(&self) -> CommandResult<RelationshipRef> {
        let source = self.fields[0];
        let target = self.fields[1];

        if !target.contains(['[', ']']) {
            return Ok(RelationshipRef::new(source, target));
        }

        let qualified = target
            .strip_suffix(']')
            .and_then(|rest| rest.split_once('['))
            .map(|(name, rel_type)| (name.trim(), rel_type.trim()))
            .filter(|(name, rel_type)| {
                !name.is_empty() && !rel_type.is_empty() && !rel_type.contains(['[', ']'])
            });

        match qualified {
            Some((name, rel_type)) => Ok(RelationshipRef::typed(source, name, rel_type)),
            None => Err(malformed(
                self.name,
                format!("invalid relationship reference \"{}\"", target),
            )),
        }
    }
}

fn malformed(name: CommandName, reason: impl Into<String>) -> CommandError {
    CommandError::Malformed {
        command: name.keyword(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_parse_add_entity_trims_fields() {
        let command = Command::parse("ADD_ENTITY{ Person ,  Alice }").unwrap();
        assert_eq!(
            command,
            Command::AddEntity {
                label: Label::new("Person"),
                name: "Alice".to_string(),
            }
        );
        assert_eq!(command.name(), CommandName::AddEntity);
    }

    #[test]
    fn test_keyword_prefixes_do_not_collide() {
        assert_eq!(
            Command::parse("ADD_r{Alice, Bob, friend}").unwrap().name(),
            CommandName::AddRelationship
        );
        assert_eq!(
            Command::parse("ADD_r_PROPERTY{Alice, Bob, since:2020}").unwrap().name(),
            CommandName::AddRelationshipProperty
        );
        assert_eq!(
            Command::parse("DELETE_r{Alice, Bob, ALL}").unwrap().name(),
            CommandName::DeleteRelationship
        );
        assert_eq!(
            Command::parse("DELETE_r_INFO{Alice, Bob, since}").unwrap().name(),
            CommandName::DeleteRelationshipInfo
        );
        assert_eq!(Command::parse("GET{age:30}").unwrap().name(), CommandName::Get);
        assert_eq!(
            Command::parse("GET_INFO{Alice, ALL}").unwrap().name(),
            CommandName::GetInfo
        );
    }

    #[test]
    fn test_unsupported_commands() {
        assert_eq!(
            Command::parse("DROP_TABLE{users}"),
            Err(CommandError::Unsupported("DROP_TABLE".to_string()))
        );
        assert_eq!(
            Command::parse("add_entity{Person, Alice}"),
            Err(CommandError::Unsupported("add_entity".to_string()))
        );
        assert_eq!(
            Command::parse("hello"),
            Err(CommandError::Unsupported("hello".to_string()))
        );
    }

    #[test]
    fn test_bad_framing_is_malformed() {
        for line in [
            "ADD_ENTITY",
            "ADD_ENTITY{Person, Alice",
            "ADD_ENTITY{Person, Alice} trailing",
            "ADD_ENTITY{Person, {Alice}}",
        ] {
            assert!(
                matches!(
                    Command::parse(line),
                    Err(CommandError::Malformed { command: "ADD_ENTITY", .. })
                ),
                "{} should be malformed",
                line
            );
        }
    }

    #[test]
    fn test_field_counts() {
        assert!(Command::parse("ADD_ENTITY{Person}").is_err());
        assert!(Command::parse("ADD_ENTITY{Person, Alice, Bob}").is_err());
        assert!(Command::parse("ADD_ENTITY{Person, }").is_err());
        assert!(Command::parse("GET_LABELED{}").is_err());
        assert!(Command::parse("ADD_r{Alice, Bob}").is_err());
        assert!(Command::parse("DELETE_r{Alice, Bob, friend, enemy}").is_err());
        assert!(Command::parse("GET_INFO{Alice}").is_err());
        assert!(Command::parse("FIND{}").is_err());
        assert!(Command::parse("GET{}").is_err());
        assert!(Command::parse("GET_r_INFO{Alice, Bob}").is_err());
    }

    #[test]
    fn test_parse_property_pairs() {
        let command = Command::parse("ADD_PROPERTY{Alice, age:30, city : New York, url:http://x}").unwrap();
        assert_eq!(
            command,
            Command::AddProperty {
                name: "Alice".to_string(),
                properties: pairs(&[("age", "30"), ("city", "New York"), ("url", "http://x")]),
            }
        );
    }

    #[test]
    fn test_bad_property_pairs() {
        assert!(matches!(
            Command::parse("ADD_PROPERTY{Alice, age}"),
            Err(CommandError::Malformed { .. })
        ));
        assert!(Command::parse("ADD_PROPERTY{Alice, :30}").is_err());
        assert!(Command::parse("ADD_PROPERTY{Alice, age:}").is_err());
        assert!(Command::parse("GET{age:30, city}").is_err());
    }

    #[test]
    fn test_key_selectors() {
        assert_eq!(
            Command::parse("GET_INFO{Alice, ALL}").unwrap(),
            Command::GetInfo {
                name: "Alice".to_string(),
                keys: KeySelector::All,
            }
        );
        assert_eq!(
            Command::parse("DELETE_INFO{Alice, age, city}").unwrap(),
            Command::DeleteInfo {
                name: "Alice".to_string(),
                keys: KeySelector::Keys(vec!["age".into(), "city".into()]),
            }
        );
    }

    #[test]
    fn test_find_type_filters() {
        assert_eq!(
            Command::parse("FIND{Alice}").unwrap(),
            Command::Find {
                name: "Alice".to_string(),
                types: TypeFilter::All,
            }
        );
        assert_eq!(
            Command::parse("FIND{Alice, ALL}").unwrap(),
            Command::Find {
                name: "Alice".to_string(),
                types: TypeFilter::All,
            }
        );
        assert_eq!(
            Command::parse("FIND{Alice, friend, sibling}").unwrap(),
            Command::Find {
                name: "Alice".to_string(),
                types: TypeFilter::Only(vec!["friend".into(), "sibling".into()]),
            }
        );
    }

    #[test]
    fn test_delete_relationship_wildcard() {
        assert_eq!(
            Command::parse("DELETE_r{Alice, Bob, ALL}").unwrap(),
            Command::DeleteRelationship {
                source: "Alice".to_string(),
                target: "Bob".to_string(),
                types: TypeFilter::All,
            }
        );
        assert_eq!(
            Command::parse("DELETE_r{Alice, Bob, friend}").unwrap(),
            Command::DeleteRelationship {
                source: "Alice".to_string(),
                target: "Bob".to_string(),
                types: TypeFilter::single("friend"),
            }
        );
    }

    #[test]
    fn test_typed_relationship_reference() {
        assert_eq!(
            Command::parse("GET_r_INFO{Alice, Bob[coworker], ALL}").unwrap(),
            Command::GetRelationshipInfo {
                rel: RelationshipRef::typed("Alice", "Bob", "coworker"),
                keys: KeySelector::All,
            }
        );
        assert_eq!(
            Command::parse("ADD_r_PROPERTY{Alice, Bob [ friend ], since:2020}").unwrap(),
            Command::AddRelationshipProperty {
                rel: RelationshipRef::typed("Alice", "Bob", "friend"),
                properties: pairs(&[("since", "2020")]),
            }
        );
        for line in [
            "GET_r_INFO{Alice, Bob[], ALL}",
            "GET_r_INFO{Alice, [friend], ALL}",
            "GET_r_INFO{Alice, Bob[friend, ALL}",
            "GET_r_INFO{Alice, Bob]friend[, ALL}",
        ] {
            assert!(Command::parse(line).is_err(), "{} should be rejected", line);
        }
    }

    #[test]
    fn test_brackets_rejected_in_new_identifiers() {
        for line in [
            "ADD_ENTITY{Person, Bob[x]}",
            "ADD_ENTITY{Per]son, Bob}",
            "ADD_r{Alice, Bob, fri[end}",
        ] {
            assert!(
                matches!(Command::parse(line), Err(CommandError::Malformed { .. })),
                "{} should be malformed",
                line
            );
        }
    }

    #[test]
    fn test_mutation_classification() {
        assert!(CommandName::AddEntity.is_mutation());
        assert!(CommandName::DeleteRelationship.is_mutation());
        assert!(!CommandName::Find.is_mutation());
        assert!(!CommandName::GetRelationshipInfo.is_mutation());
    }

    #[test]
    fn test_keyword_round_trip() {
        for name in CommandName::ALL {
            assert_eq!(CommandName::from_keyword(name.keyword()), Some(name));
        }
    }
}
