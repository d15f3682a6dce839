//! Read-only view over a decoded action response

use thiserror::Error;
use xmltree::{Element, XMLNode};

use crate::value::Value;

/// Failure to read a single key from an [`ActionResult`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No element with this name exists in the response
    #[error("No element named '{0}' in response")]
    NotFound(String),

    /// More than one element shares this name, so the lookup has no single answer
    #[error("Found {count} elements named '{key}' in response")]
    Ambiguous { key: String, count: usize },

    /// The only element with this name has child elements and no value of its own
    #[error("Element '{0}' is a container, not a value")]
    NotALeaf(String),
}

/// The decoded body of a successful action call.
///
/// Wraps the method-response element (e.g. `GetInfoResponse`) and answers
/// lookups by element name anywhere below it.
#[derive(Debug, Clone)]
pub struct ActionResult {
    response: Element,
}

impl ActionResult {
    pub(crate) fn new(response: Element) -> Self {
        Self { response }
    }

    /// Local name of the method-response element
    pub fn name(&self) -> &str {
        &self.response.name
    }

    /// Look up the unique element named `key` below the response element.
    ///
    /// Returns [`LookupError::NotFound`] when nothing matches and
    /// [`LookupError::Ambiguous`] when two or more elements share the name.
    /// A match that has child elements is [`LookupError::NotALeaf`].
    pub fn get(&self, key: &str) -> Result<Value, LookupError> {
        let mut found = Vec::new();
        collect_named(&self.response, key, &mut found);

        match found.as_slice() {
            [] => Err(LookupError::NotFound(key.to_string())),
            [element] if !is_leaf(element) => Err(LookupError::NotALeaf(key.to_string())),
            [element] => Ok(element_value(element)),
            many => Err(LookupError::Ambiguous {
                key: key.to_string(),
                count: many.len(),
            }),
        }
    }

    /// Like [`get`](Self::get) but maps a missing key to `None`
    pub fn get_opt(&self, key: &str) -> Result<Option<Value>, LookupError> {
        match self.get(key) {
            Ok(value) => Ok(Some(value)),
            Err(LookupError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Whether any element below the response is named `key`
    pub fn contains(&self, key: &str) -> bool {
        let mut found = Vec::new();
        collect_named(&self.response, key, &mut found);
        !found.is_empty()
    }

    /// All leaf elements below the response element, in document order
    pub fn leaves(&self) -> Vec<(&str, Value)> {
        let mut leaves = Vec::new();
        collect_leaves(&self.response, &mut leaves);
        leaves
    }

    /// True when the response element has no child elements
    pub fn is_empty(&self) -> bool {
        child_elements(&self.response).next().is_none()
    }
}

fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(|node| match node {
        XMLNode::Element(child) => Some(child),
        _ => None,
    })
}

fn collect_named<'a>(element: &'a Element, key: &str, found: &mut Vec<&'a Element>) {
    for child in child_elements(element) {
        if child.name == key {
            found.push(child);
        }
        collect_named(child, key, found);
    }
}

fn is_leaf(element: &Element) -> bool {
    child_elements(element).next().is_none()
}

fn collect_leaves<'a>(element: &'a Element, leaves: &mut Vec<(&'a str, Value)>) {
    for child in child_elements(element) {
        if is_leaf(child) {
            leaves.push((child.name.as_str(), element_value(child)));
        } else {
            collect_leaves(child, leaves);
        }
    }
}

fn element_value(element: &Element) -> Value {
    match element.get_text() {
        Some(text) => Value::coerce(&text),
        None => Value::Text(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_from(xml: &str) -> ActionResult {
        ActionResult::new(Element::parse(xml.as_bytes()).unwrap())
    }

    #[test]
    fn test_get_single_value() {
        let result = result_from(
            r#"<u:GetSecurityPortResponse xmlns:u="urn:dslforum-org:service:DeviceInfo:1">
                <NewSecurityPort>49443</NewSecurityPort>
            </u:GetSecurityPortResponse>"#,
        );

        assert_eq!(result.name(), "GetSecurityPortResponse");
        assert_eq!(result.get("NewSecurityPort"), Ok(Value::Integer(49443)));
    }

    #[test]
    fn test_get_missing_key() {
        let result = result_from("<GetInfoResponse><NewModelName>7390</NewModelName></GetInfoResponse>");

        assert_eq!(
            result.get("NewSerialNumber"),
            Err(LookupError::NotFound("NewSerialNumber".to_string()))
        );
        assert_eq!(result.get_opt("NewSerialNumber"), Ok(None));
        assert!(!result.contains("NewSerialNumber"));
    }

    #[test]
    fn test_get_ambiguous_key_fails() {
        let result = result_from(
            r#"<GetHostListResponse>
                <Host><NewIPAddress>192.168.1.2</NewIPAddress></Host>
                <Host><NewIPAddress>192.168.1.3</NewIPAddress></Host>
            </GetHostListResponse>"#,
        );

        assert_eq!(
            result.get("NewIPAddress"),
            Err(LookupError::Ambiguous {
                key: "NewIPAddress".to_string(),
                count: 2
            })
        );
        assert!(result.get_opt("NewIPAddress").is_err());
    }

    #[test]
    fn test_nested_unique_key_is_found() {
        let result = result_from(
            "<GetResponse><Outer><NewEnable>1</NewEnable></Outer><NewName>wlan</NewName></GetResponse>",
        );

        assert_eq!(result.get("NewEnable"), Ok(Value::Integer(1)));
        assert_eq!(result.get("NewName"), Ok(Value::Text("wlan".to_string())));
    }

    #[test]
    fn test_container_element_is_not_a_value() {
        let result = result_from(
            "<GetHostResponse><Host><NewIPAddress>1.2.3.4</NewIPAddress></Host></GetHostResponse>",
        );

        assert_eq!(result.get("Host"), Err(LookupError::NotALeaf("Host".to_string())));
        assert!(result.get_opt("Host").is_err());
        assert!(result.contains("Host"));
        assert_eq!(result.get("NewIPAddress"), Ok(Value::Text("1.2.3.4".to_string())));
    }

    #[test]
    fn test_empty_element_is_empty_text() {
        let result = result_from("<GetResponse><NewDescription/></GetResponse>");
        assert_eq!(result.get("NewDescription"), Ok(Value::Text(String::new())));
    }

    #[test]
    fn test_leaves_in_document_order() {
        let result = result_from(
            "<GetInfoResponse><NewA>x</NewA><Group><NewB>2</NewB></Group><NewC>y</NewC></GetInfoResponse>",
        );

        let names: Vec<&str> = result.leaves().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["NewA", "NewB", "NewC"]);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_empty_response() {
        let result = result_from("<RebootResponse></RebootResponse>");
        assert!(result.is_empty());
        assert!(result.leaves().is_empty());
    }
}
