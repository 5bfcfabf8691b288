//! Participant configuration read from the XML file.
//!
//! The subset understood here:
//!
//! | element | used for |
//! |---------|----------|
//! | `types/struct`, `types/module`, `types/enum` | member names and default values |
//! | `domain_library/domain[@domain_id]` | the domain id |
//! | `domain/register_type`, `domain/topic` | topic to type mapping |
//! | `domain_participant_library/domain_participant[@domain_ref]` | the participant |
//! | `publisher/data_writer[@topic_ref]` | outputs |
//! | `subscriber/data_reader[@topic_ref]` | inputs |
//! | `data_reader/datareader_qos/history` | reader history depth |
//!
//! Everything else (QoS libraries, transports, discovery) is ignored.

use crate::{error::ConfigError, types::TypeRegistry};
use connector_core::ConnectorConfig;
use roxmltree::{Document, Node};
use std::{collections::HashMap, fs};

/// Reader history kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum History {
    /// Keep the most recent `n` samples.
    KeepLast(usize),
    /// Keep every sample until taken.
    KeepAll,
}

impl Default for History {
    /// DDS default: keep the last sample.
    fn default() -> Self {
        History::KeepLast(1)
    }
}

/// A data writer or data reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Topic name.
    pub topic: String,
    /// Registered type name of the topic.
    pub type_name: String,
    /// History (readers only; writers keep the default).
    pub history: History,
}

/// One `<domain_participant>` and everything it references.
#[derive(Debug, Clone)]
pub struct ParticipantConfig {
    /// Qualified participant name (`Library::Participant`).
    pub name: String,
    /// Domain id.
    pub domain_id: u32,
    /// Writers keyed by `Publisher::Writer`.
    pub writers: HashMap<String, EndpointConfig>,
    /// Readers keyed by `Subscriber::Reader`.
    pub readers: HashMap<String, EndpointConfig>,
    /// Declared types.
    pub types: TypeRegistry,
}

struct Topic {
    type_name: String,
}

impl ParticipantConfig {
    /// Load the participant named by `config` from its file.
    pub fn load(config: &ConnectorConfig) -> Result<Self, ConfigError> {
        let path = config.config_file();
        let xml = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&xml, config.config_name())
    }

    /// Parse the participant `config_name` out of an XML document.
    pub fn parse(xml: &str, config_name: &str) -> Result<Self, ConfigError> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();
        if !root.has_tag_name("dds") {
            return Err(ConfigError::Root(root.tag_name().name().to_string()));
        }

        let (library, participant_name) = split_qualified(config_name)?;
        let participant = named_children(root, "domain_participant_library", library)
            .flat_map(|lib| named_children(lib, "domain_participant", participant_name))
            .next()
            .ok_or_else(|| ConfigError::ParticipantNotFound(config_name.to_string()))?;

        let domain_ref = participant
            .attribute("domain_ref")
            .ok_or(ConfigError::MissingAttribute {
                element: "domain_participant",
                attribute: "domain_ref",
            })?;
        let domain = find_domain(root, domain_ref)?;

        let domain_id = match participant
            .attribute("domain_id")
            .or_else(|| domain.attribute("domain_id"))
        {
            Some(id) => id.trim().parse().map_err(|_| ConfigError::InvalidValue {
                what: "domain_id",
                value: id.to_string(),
            })?,
            None => 0,
        };

        // Participants may declare topics of their own on top of the domain's.
        let mut topics = collect_topics(domain);
        topics.extend(collect_topics(participant));

        let writers = collect_endpoints(participant, "publisher", "data_writer", &topics)?;
        let readers = collect_endpoints(participant, "subscriber", "data_reader", &topics)?;

        let types = TypeRegistry::from_xml(root);
        for endpoint in writers.values().chain(readers.values()) {
            types.validate(&endpoint.type_name)?;
        }

        Ok(ParticipantConfig {
            name: config_name.to_string(),
            domain_id,
            writers,
            readers,
            types,
        })
    }
}

fn split_qualified(name: &str) -> Result<(&str, &str), ConfigError> {
    match name.split_once("::") {
        Some((lib, item)) if !lib.is_empty() && !item.is_empty() => Ok((lib, item)),
        _ => Err(ConfigError::BadName(name.to_string())),
    }
}

fn named_children<'a, 'input: 'a, 'n>(
    parent: Node<'a, 'input>,
    tag: &'static str,
    name: &'n str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    parent
        .children()
        .filter(move |n| n.has_tag_name(tag) && n.attribute("name") == Some(name))
}

fn find_domain<'a, 'input>(
    root: Node<'a, 'input>,
    domain_ref: &str,
) -> Result<Node<'a, 'input>, ConfigError> {
    let not_found = || ConfigError::DomainNotFound(domain_ref.to_string());
    let (library, domain) = split_qualified(domain_ref).map_err(|_| not_found())?;
    named_children(root, "domain_library", library)
        .flat_map(|lib| named_children(lib, "domain", domain))
        .next()
        .ok_or_else(not_found)
}

fn collect_topics(parent: Node<'_, '_>) -> HashMap<String, Topic> {
    let registered: HashMap<&str, &str> = parent
        .children()
        .filter(|n| n.has_tag_name("register_type"))
        .filter_map(|n| {
            let name = n.attribute("name")?;
            Some((name, n.attribute("type_ref").unwrap_or(name)))
        })
        .collect();

    parent
        .children()
        .filter(|n| n.has_tag_name("topic"))
        .filter_map(|n| {
            let name = n.attribute("name")?;
            let register = n.attribute("register_type_ref").unwrap_or(name);
            let type_name = registered.get(register).copied().unwrap_or(register);
            Some((
                name.to_string(),
                Topic {
                    type_name: type_name.to_string(),
                },
            ))
        })
        .collect()
}

fn collect_endpoints(
    participant: Node<'_, '_>,
    group_tag: &'static str,
    endpoint_tag: &'static str,
    topics: &HashMap<String, Topic>,
) -> Result<HashMap<String, EndpointConfig>, ConfigError> {
    let mut endpoints = HashMap::new();
    for group in participant.children().filter(|n| n.has_tag_name(group_tag)) {
        let group_name = group.attribute("name").ok_or(ConfigError::MissingAttribute {
            element: group_tag,
            attribute: "name",
        })?;
        for endpoint in group.children().filter(|n| n.has_tag_name(endpoint_tag)) {
            let name = endpoint.attribute("name").ok_or(ConfigError::MissingAttribute {
                element: endpoint_tag,
                attribute: "name",
            })?;
            let qualified = format!("{group_name}::{name}");
            let topic_ref = endpoint.attribute("topic_ref").ok_or(ConfigError::MissingAttribute {
                element: endpoint_tag,
                attribute: "topic_ref",
            })?;
            let topic = topics.get(topic_ref).ok_or_else(|| ConfigError::TopicNotFound {
                topic: topic_ref.to_string(),
                entity: qualified.clone(),
            })?;
            let history = parse_history(endpoint)?;
            endpoints.insert(
                qualified,
                EndpointConfig {
                    topic: topic_ref.to_string(),
                    type_name: topic.type_name.clone(),
                    history,
                },
            );
        }
    }
    Ok(endpoints)
}

fn parse_history(endpoint: Node<'_, '_>) -> Result<History, ConfigError> {
    let Some(history) = endpoint
        .children()
        .filter(|n| n.has_tag_name("datareader_qos") || n.has_tag_name("datawriter_qos"))
        .flat_map(|qos| qos.children())
        .find(|n| n.has_tag_name("history"))
    else {
        return Ok(History::default());
    };

    let child_text = |tag: &str| {
        history
            .children()
            .find(|n| n.has_tag_name(tag))
            .and_then(|n| n.text())
            .map(str::trim)
    };

    match child_text("kind") {
        Some("KEEP_ALL_HISTORY_QOS") => Ok(History::KeepAll),
        Some("KEEP_LAST_HISTORY_QOS") | None => {
            let depth = match child_text("depth") {
                Some(depth) => depth.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                    what: "history depth",
                    value: depth.to_string(),
                })?,
                None => 1,
            };
            Ok(History::KeepLast(depth.max(1)))
        }
        Some(other) => Err(ConfigError::InvalidValue {
            what: "history kind",
            value: other.to_string(),
        }),
    }
}
