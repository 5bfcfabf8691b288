//! Data types declared under `<types>`.
//!
//! Only what the loopback needs is kept: member names, so unknown members can
//! be rejected, and enough of each member's type to produce a default value.

use crate::error::ConfigError;
use roxmltree::Node;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Largest number of values a default instance may hold.
const MAX_INSTANCE_SIZE: usize = 1 << 16;

/// What a member's default value looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    /// Any integer or floating point type, and enums.
    Number,
    /// `boolean`.
    Boolean,
    /// `string`, `wstring`, `char`, `wchar`.
    String,
    /// A sequence or array of anything.
    Sequence,
    /// A member of another declared type.
    NonBasic(String),
}

/// A struct member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Member name.
    pub name: String,
    /// Member type.
    pub kind: MemberKind,
}

/// The structs and enums of a configuration, keyed by qualified name
/// (`Module::Name`).
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    structs: HashMap<String, Vec<Member>>,
    enums: HashSet<String>,
}

impl TypeRegistry {
    /// Collect every `<struct>` and `<enum>` below `<types>` elements of `root`.
    pub fn from_xml(root: Node<'_, '_>) -> Self {
        let mut registry = TypeRegistry::default();
        for types in root.children().filter(|n| n.has_tag_name("types")) {
            registry.collect(types, "");
        }
        registry
    }

    fn collect(&mut self, parent: Node<'_, '_>, prefix: &str) {
        for node in parent.children().filter(Node::is_element) {
            let Some(name) = node.attribute("name") else {
                continue;
            };
            let qualified = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}::{name}")
            };
            match node.tag_name().name() {
                "module" => self.collect(node, &qualified),
                "struct" | "valuetype" => {
                    let members = node
                        .children()
                        .filter(|n| n.has_tag_name("member"))
                        .filter_map(parse_member)
                        .collect();
                    self.structs.insert(qualified, members);
                }
                "enum" => {
                    self.enums.insert(qualified);
                }
                _ => {}
            }
        }
    }

    /// Members of a struct, or `None` if the type was not declared.
    pub fn members(&self, type_name: &str) -> Option<&[Member]> {
        self.resolve_struct(type_name).map(Vec::as_slice)
    }

    fn resolve_struct(&self, type_name: &str) -> Option<&Vec<Member>> {
        self.resolve(type_name).map(|(_, members)| members)
    }

    /// The qualified name and members of a struct.
    fn resolve(&self, type_name: &str) -> Option<(&str, &Vec<Member>)> {
        self.structs
            .get_key_value(type_name)
            .or_else(|| {
                // Unqualified reference to a type declared inside a module.
                let suffix = format!("::{type_name}");
                self.structs.iter().find(|(name, _)| name.ends_with(&suffix))
            })
            .map(|(name, members)| (name.as_str(), members))
    }

    /// Check that a default instance of `type_name` is finite and small
    /// enough to build.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::RecursiveType`] if a struct contains itself, other
    ///   than through a sequence
    /// - [`ConfigError::TypeTooLarge`] if the instance would hold more than
    ///   65536 values
    pub fn validate(&self, type_name: &str) -> Result<(), ConfigError> {
        let mut sizes = HashMap::new();
        let size = self.instance_size(type_name, &mut Vec::new(), &mut sizes)?;
        if size > MAX_INSTANCE_SIZE {
            return Err(ConfigError::TypeTooLarge(type_name.to_string()));
        }
        Ok(())
    }

    /// Number of values in a default instance, memoized per struct.
    fn instance_size<'a>(
        &'a self,
        type_name: &str,
        chain: &mut Vec<&'a str>,
        sizes: &mut HashMap<&'a str, usize>,
    ) -> Result<usize, ConfigError> {
        let Some((name, members)) = self.resolve(type_name) else {
            return Ok(1);
        };
        if let Some(size) = sizes.get(name) {
            return Ok(*size);
        }
        if chain.contains(&name) {
            let mut cycle: Vec<&str> = chain.clone();
            cycle.push(name);
            return Err(ConfigError::RecursiveType(cycle.join(" -> ")));
        }

        chain.push(name);
        let mut size: usize = 1;
        for member in members {
            let member_size = match &member.kind {
                MemberKind::NonBasic(nested) if !self.is_enum(nested) => {
                    self.instance_size(nested, chain, sizes)?
                }
                _ => 1,
            };
            size = size.saturating_add(member_size);
        }
        chain.pop();

        sizes.insert(name, size);
        Ok(size)
    }

    fn is_enum(&self, type_name: &str) -> bool {
        let suffix = format!("::{type_name}");
        self.enums.contains(type_name) || self.enums.iter().any(|e| e.ends_with(&suffix))
    }

    /// A JSON object holding every member's default value.
    ///
    /// Undeclared types produce an empty object, and so does a struct met
    /// again inside itself. Call [`TypeRegistry::validate`] first to reject
    /// such types instead.
    pub fn default_value(&self, type_name: &str) -> Value {
        self.default_struct(type_name, &mut Vec::new())
    }

    fn default_struct<'a>(&'a self, type_name: &str, chain: &mut Vec<&'a str>) -> Value {
        let mut object = Map::new();
        if let Some((name, members)) = self.resolve(type_name) {
            if !chain.contains(&name) {
                chain.push(name);
                for member in members {
                    object.insert(member.name.clone(), self.default_member(member, chain));
                }
                chain.pop();
            }
        }
        Value::Object(object)
    }

    fn default_member<'a>(&'a self, member: &'a Member, chain: &mut Vec<&'a str>) -> Value {
        match &member.kind {
            MemberKind::Number => Value::from(0),
            MemberKind::Boolean => Value::Bool(false),
            MemberKind::String => Value::String(String::new()),
            MemberKind::Sequence => Value::Array(Vec::new()),
            MemberKind::NonBasic(name) if self.is_enum(name) => Value::from(0),
            MemberKind::NonBasic(name) => self.default_struct(name, chain),
        }
    }
}

fn parse_member(node: Node<'_, '_>) -> Option<Member> {
    let name = node.attribute("name")?.to_string();
    let collection =
        node.attribute("sequenceMaxLength").is_some() || node.attribute("arrayDimensions").is_some();
    let kind = if collection {
        MemberKind::Sequence
    } else {
        match node.attribute("type").unwrap_or("nonBasic") {
            "boolean" => MemberKind::Boolean,
            "string" | "wstring" | "char" | "wchar" => MemberKind::String,
            "nonBasic" => {
                MemberKind::NonBasic(node.attribute("nonBasicTypeName").unwrap_or_default().to_string())
            }
            _ => MemberKind::Number,
        }
    };
    Some(Member { name, kind })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    const TYPES: &str = r#"
<dds>
    <types>
        <enum name="Color">
            <enumerator name="RED"/>
            <enumerator name="BLUE"/>
        </enum>
        <module name="geometry">
            <struct name="Point">
                <member name="x" type="long"/>
                <member name="y" type="double"/>
            </struct>
        </module>
        <struct name="Shape">
            <member name="name" type="string" stringMaxLength="64"/>
            <member name="visible" type="boolean"/>
            <member name="color" type="nonBasic" nonBasicTypeName="Color"/>
            <member name="center" type="nonBasic" nonBasicTypeName="geometry::Point"/>
            <member name="path" type="nonBasic" nonBasicTypeName="Point" sequenceMaxLength="10"/>
        </struct>
    </types>
</dds>"#;

    fn registry() -> TypeRegistry {
        let doc = Document::parse(TYPES).unwrap();
        TypeRegistry::from_xml(doc.root_element())
    }

    #[test]
    fn test_members() {
        let registry = registry();
        let members = registry.members("Shape").unwrap();
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["name", "visible", "color", "center", "path"]);
        assert_eq!(members[4].kind, MemberKind::Sequence);

        assert!(registry.members("geometry::Point").is_some());
        assert!(registry.members("Point").is_some());
        assert!(registry.members("Missing").is_none());
    }

    #[test]
    fn test_default_value() {
        let value = registry().default_value("Shape");
        assert_eq!(
            value,
            serde_json::json!({
                "name": "",
                "visible": false,
                "color": 0,
                "center": { "x": 0, "y": 0 },
                "path": []
            })
        );
    }

    const RECURSIVE: &str = r#"
<dds>
    <types>
        <struct name="Node">
            <member name="value" type="long"/>
            <member name="left" type="nonBasic" nonBasicTypeName="Node"/>
            <member name="right" type="nonBasic" nonBasicTypeName="Node"/>
        </struct>
        <struct name="Ping">
            <member name="pong" type="nonBasic" nonBasicTypeName="Pong"/>
        </struct>
        <struct name="Pong">
            <member name="ping" type="nonBasic" nonBasicTypeName="Ping"/>
        </struct>
        <struct name="List">
            <member name="next" type="nonBasic" nonBasicTypeName="List" sequenceMaxLength="1"/>
        </struct>
    </types>
</dds>"#;

    fn recursive_registry() -> TypeRegistry {
        let doc = Document::parse(RECURSIVE).unwrap();
        TypeRegistry::from_xml(doc.root_element())
    }

    #[test]
    fn test_self_referential_struct_is_rejected() {
        let registry = recursive_registry();
        match registry.validate("Node") {
            Err(ConfigError::RecursiveType(cycle)) => assert_eq!(cycle, "Node -> Node"),
            other => panic!("unexpected result: {other:?}"),
        }
        match registry.validate("Ping") {
            Err(ConfigError::RecursiveType(cycle)) => assert_eq!(cycle, "Ping -> Pong -> Ping"),
            other => panic!("unexpected result: {other:?}"),
        }
        // A sequence of itself starts out empty.
        registry.validate("List").unwrap();
    }

    #[test]
    fn test_self_referential_default_value_is_bounded() {
        let value = recursive_registry().default_value("Node");
        assert_eq!(
            value,
            serde_json::json!({ "value": 0, "left": {}, "right": {} })
        );
    }

    #[test]
    fn test_wide_type_is_rejected() {
        // 24 levels of two members each: 2^25 values without recursion.
        let mut xml = String::from("<dds><types>");
        for level in 0..24 {
            xml.push_str(&format!(
                r#"<struct name="L{level}">
                    <member name="a" type="nonBasic" nonBasicTypeName="L{next}"/>
                    <member name="b" type="nonBasic" nonBasicTypeName="L{next}"/>
                </struct>"#,
                next = level + 1
            ));
        }
        xml.push_str(r#"<struct name="L24"><member name="x" type="long"/></struct>"#);
        xml.push_str("</types></dds>");

        let doc = Document::parse(&xml).unwrap();
        let registry = TypeRegistry::from_xml(doc.root_element());
        assert!(matches!(
            registry.validate("L0"),
            Err(ConfigError::TypeTooLarge(_))
        ));
        registry.validate("L20").unwrap();
    }

    #[test]
    fn test_valid_types() {
        let registry = registry();
        registry.validate("Shape").unwrap();
        registry.validate("geometry::Point").unwrap();
        registry.validate("Undeclared").unwrap();
    }

    #[test]
    fn test_undeclared_type_is_empty_object() {
        assert_eq!(registry().default_value("Nope"), serde_json::json!({}));
    }
}
