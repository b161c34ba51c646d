use base64::{prelude::BASE64_STANDARD, Engine};
use nxarray_metadata::NodeMetadata;
use serde::{Deserialize, Serialize};

use super::CodecError;
use crate::node::OpaqueObject;

/// The serialized subtree held by an [`OpaqueObject`].
///
/// Field values are base64 encoded little-endian `f64` bytes.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub(crate) struct OpaqueNode {
    pub(crate) name: String,
    pub(crate) metadata: NodeMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) children: Vec<OpaqueNode>,
}

impl OpaqueNode {
    pub(crate) fn new(name: &str, metadata: NodeMetadata, data: Option<&[u8]>) -> Self {
        Self {
            name: name.to_string(),
            metadata,
            data: data.map(|data| BASE64_STANDARD.encode(data)),
            children: Vec::new(),
        }
    }

    pub(crate) fn data(&self) -> Result<Option<Vec<u8>>, CodecError> {
        self.data
            .as_ref()
            .map(|data| BASE64_STANDARD.decode(data))
            .transpose()
            .map_err(|err| CodecError::InvalidOpaqueObject {
                name: self.name.clone(),
                reason: err.to_string(),
            })
    }

    pub(crate) fn into_object(self) -> Result<OpaqueObject, CodecError> {
        let name = self.name.clone();
        let content = serde_json::to_value(&self).map_err(|err| {
            CodecError::InvalidOpaqueObject {
                name: name.clone(),
                reason: err.to_string(),
            }
        })?;
        Ok(OpaqueObject::new(name, content))
    }

    pub(crate) fn from_object(object: &OpaqueObject) -> Result<Self, CodecError> {
        serde_json::from_value(object.content().clone()).map_err(|err| {
            CodecError::InvalidOpaqueObject {
                name: object.name().to_string(),
                reason: err.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use nxarray_metadata::{Attributes, FieldMetadata, GroupMetadata};
    use serde_json::json;

    use super::*;

    #[test]
    fn opaque_node_content() {
        let mut node = OpaqueNode::new(
            "instrument",
            GroupMetadata::new(Some("NXinstrument".to_string()), Attributes::new(), vec!["x".to_string()]).into(),
            None,
        );
        let bytes = 1.5f64.to_le_bytes();
        node.children.push(OpaqueNode::new(
            "x",
            FieldMetadata::new(vec![1], Attributes::new()).into(),
            Some(&bytes),
        ));
        let object = node.clone().into_object().unwrap();
        assert_eq!(object.name(), "instrument");
        assert_eq!(object.content()["children"][0]["data"], json!("AAAAAAAA+D8="));

        let node_out = OpaqueNode::from_object(&object).unwrap();
        assert_eq!(node_out, node);
        assert_eq!(node_out.children[0].data().unwrap(), Some(bytes.to_vec()));
    }

    #[test]
    fn opaque_node_invalid() {
        let object = OpaqueObject::new("instrument", json!({"name": "instrument"}));
        assert!(matches!(
            OpaqueNode::from_object(&object),
            Err(CodecError::InvalidOpaqueObject { .. })
        ));
    }
}
