//! `ResourceCollection.xml` reading and writing
//!
//! ```xml
//! <UnityGameFramework>
//!   <ResourceCollection>
//!     <Resources>
//!       <Resource Name="ui/main" Variant="hd" LoadType="0" Packed="True" ResourceGroups="base,ui" />
//!     </Resources>
//!     <Assets>
//!       <Asset Guid="..." ResourceName="ui/main" ResourceVariant="hd" />
//!     </Assets>
//!   </ResourceCollection>
//! </UnityGameFramework>
//! ```

use crate::constants::XML_ROOT_ELEMENT;
use crate::asset::Asset;
use crate::error::{ResourceError, Result};
use crate::resource::{LoadType, Resource};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use std::collections::HashMap;

const COLLECTION_ELEMENT: &str = "ResourceCollection";
const RESOURCES_ELEMENT: &str = "Resources";
const RESOURCE_ELEMENT: &str = "Resource";
const ASSETS_ELEMENT: &str = "Assets";
const ASSET_ELEMENT: &str = "Asset";

/// A `<Resource>` element
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResourceEntry {
    pub name: String,
    pub variant: Option<String>,
    pub file_system: Option<String>,
    pub load_type: LoadType,
    pub packed: bool,
    pub resource_groups: Vec<String>,
}

/// An `<Asset>` element
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AssetEntry {
    pub guid: String,
    pub resource_name: String,
    pub resource_variant: Option<String>,
}

/// Parsed collection document, not yet validated against naming rules
#[derive(Debug, Default)]
pub(crate) struct CollectionDocument {
    pub resources: Vec<ResourceEntry>,
    pub assets: Vec<AssetEntry>,
}

/// Parse a collection document. Any structural or attribute error is fatal.
pub(crate) fn parse_document(text: &str) -> Result<CollectionDocument> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut document = CollectionDocument::default();
    let mut path: Vec<String> = Vec::new();
    let mut seen_collection = false;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(ResourceError::xml(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        };

        match event {
            Event::Start(e) => {
                let name = element_name(&e);
                visit_element(&path, &name, &e, &mut document, &mut seen_collection)?;
                path.push(name);
            }
            Event::Empty(e) => {
                let name = element_name(&e);
                visit_element(&path, &name, &e, &mut document, &mut seen_collection)?;
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !path.is_empty() {
        return Err(ResourceError::xml(format!("unclosed element <{}>", path.join("/"))));
    }

    if !seen_collection {
        return Err(ResourceError::xml(format!(
            "missing <{}> element",
            COLLECTION_ELEMENT
        )));
    }

    Ok(document)
}

fn visit_element(
    path: &[String],
    name: &str,
    element: &BytesStart<'_>,
    document: &mut CollectionDocument,
    seen_collection: &mut bool,
) -> Result<()> {
    let parents: Vec<&str> = path.iter().map(String::as_str).collect();
    match (parents.as_slice(), name) {
        ([], root) if root != XML_ROOT_ELEMENT => Err(ResourceError::xml(format!(
            "unexpected root element <{}>",
            root
        ))),
        ([_], COLLECTION_ELEMENT) => {
            *seen_collection = true;
            Ok(())
        }
        ([_, COLLECTION_ELEMENT, RESOURCES_ELEMENT], RESOURCE_ELEMENT) => {
            document.resources.push(parse_resource(element)?);
            Ok(())
        }
        ([_, COLLECTION_ELEMENT, ASSETS_ELEMENT], ASSET_ELEMENT) => {
            document.assets.push(parse_asset(element)?);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn element_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

fn attributes(element: &BytesStart<'_>) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| ResourceError::xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| ResourceError::xml(e.to_string()))?
            .into_owned();
        map.insert(key, value);
    }
    Ok(map)
}

fn optional(attrs: &HashMap<String, String>, key: &str) -> Option<String> {
    attrs.get(key).filter(|value| !value.is_empty()).cloned()
}

fn required(attrs: &HashMap<String, String>, element: &str, key: &str) -> Result<String> {
    attrs
        .get(key)
        .cloned()
        .ok_or_else(|| ResourceError::xml(format!("<{}> is missing attribute '{}'", element, key)))
}

fn parse_bool(value: &str) -> Result<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ResourceError::xml(format!("'{}' is not a boolean", value)))
    }
}

fn parse_resource(element: &BytesStart<'_>) -> Result<ResourceEntry> {
    let attrs = attributes(element)?;
    let load_type = match attrs.get("LoadType") {
        Some(value) => {
            let byte = value
                .trim()
                .parse::<u8>()
                .map_err(|e| ResourceError::xml(format!("invalid LoadType '{}': {}", value, e)))?;
            LoadType::from_u8(byte)?
        }
        None => LoadType::default(),
    };
    let packed = match attrs.get("Packed") {
        Some(value) => parse_bool(value)?,
        None => false,
    };
    let resource_groups = attrs
        .get("ResourceGroups")
        .map(|groups| {
            groups
                .split(',')
                .map(str::trim)
                .filter(|group| !group.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(ResourceEntry {
        name: required(&attrs, RESOURCE_ELEMENT, "Name")?,
        variant: optional(&attrs, "Variant"),
        file_system: optional(&attrs, "FileSystem"),
        load_type,
        packed,
        resource_groups,
    })
}

fn parse_asset(element: &BytesStart<'_>) -> Result<AssetEntry> {
    let attrs = attributes(element)?;
    Ok(AssetEntry {
        guid: required(&attrs, ASSET_ELEMENT, "Guid")?,
        resource_name: required(&attrs, ASSET_ELEMENT, "ResourceName")?,
        resource_variant: optional(&attrs, "ResourceVariant"),
    })
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| ResourceError::xml(e.to_string()))
}

/// Render resources and assets as a collection document
pub(crate) fn write_document<'a>(
    resources: impl Iterator<Item = &'a Resource>,
    assets: impl Iterator<Item = &'a Asset>,
) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    emit(&mut writer, Event::Start(BytesStart::new(XML_ROOT_ELEMENT)))?;
    emit(&mut writer, Event::Start(BytesStart::new(COLLECTION_ELEMENT)))?;

    emit(&mut writer, Event::Start(BytesStart::new(RESOURCES_ELEMENT)))?;
    for resource in resources {
        let mut element = BytesStart::new(RESOURCE_ELEMENT);
        element.push_attribute(("Name", resource.name()));
        if let Some(variant) = resource.variant() {
            element.push_attribute(("Variant", variant));
        }
        if let Some(file_system) = resource.file_system() {
            element.push_attribute(("FileSystem", file_system));
        }
        let load_type = resource.load_type().as_u8().to_string();
        element.push_attribute(("LoadType", load_type.as_str()));
        element.push_attribute(("Packed", if resource.packed() { "True" } else { "False" }));
        let groups = resource.resource_groups().collect::<Vec<_>>().join(",");
        if !groups.is_empty() {
            element.push_attribute(("ResourceGroups", groups.as_str()));
        }
        emit(&mut writer, Event::Empty(element))?;
    }
    emit(&mut writer, Event::End(BytesEnd::new(RESOURCES_ELEMENT)))?;

    emit(&mut writer, Event::Start(BytesStart::new(ASSETS_ELEMENT)))?;
    for asset in assets {
        let Some(resource) = asset.resource() else {
            continue;
        };
        let mut element = BytesStart::new(ASSET_ELEMENT);
        element.push_attribute(("Guid", asset.guid()));
        element.push_attribute(("ResourceName", resource.name.as_str()));
        if let Some(variant) = resource.variant.as_deref() {
            element.push_attribute(("ResourceVariant", variant));
        }
        emit(&mut writer, Event::Empty(element))?;
    }
    emit(&mut writer, Event::End(BytesEnd::new(ASSETS_ELEMENT)))?;

    emit(&mut writer, Event::End(BytesEnd::new(COLLECTION_ELEMENT)))?;
    emit(&mut writer, Event::End(BytesEnd::new(XML_ROOT_ELEMENT)))?;

    String::from_utf8(writer.into_inner()).map_err(|e| ResourceError::xml(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<UnityGameFramework>
  <ResourceCollection>
    <Resources>
      <Resource Name="ui/main" Variant="hd" LoadType="1" Packed="True" ResourceGroups="base, ui" />
      <Resource Name="scenes/intro" LoadType="0" Packed="false" />
    </Resources>
    <Assets>
      <Asset Guid="g1" ResourceName="ui/main" ResourceVariant="hd" />
      <Asset Guid="g2" ResourceName="scenes/intro" />
    </Assets>
  </ResourceCollection>
</UnityGameFramework>"#;

    #[test]
    fn test_parse_document() {
        let doc = parse_document(DOCUMENT).unwrap();
        assert_eq!(doc.resources.len(), 2);
        assert_eq!(doc.resources[0].name, "ui/main");
        assert_eq!(doc.resources[0].variant.as_deref(), Some("hd"));
        assert_eq!(doc.resources[0].load_type, LoadType::LoadFromMemory);
        assert!(doc.resources[0].packed);
        assert_eq!(doc.resources[0].resource_groups, vec!["base", "ui"]);
        assert!(!doc.resources[1].packed);
        assert_eq!(doc.resources[1].variant, None);

        assert_eq!(doc.assets.len(), 2);
        assert_eq!(doc.assets[1].guid, "g2");
        assert_eq!(doc.assets[1].resource_variant, None);
    }

    #[test]
    fn test_rejects_malformed_documents() {
        assert!(parse_document("<UnityGameFramework><ResourceCollection>").is_err());
        assert!(parse_document("<Other><ResourceCollection/></Other>").is_err());
        assert!(parse_document("<UnityGameFramework/>").is_err());

        let bad_load_type = DOCUMENT.replace("LoadType=\"1\"", "LoadType=\"x\"");
        assert!(parse_document(&bad_load_type).is_err());

        let bad_packed = DOCUMENT.replace("Packed=\"True\"", "Packed=\"yes\"");
        assert!(parse_document(&bad_packed).is_err());
    }

    #[test]
    fn test_empty_sections() {
        let doc = parse_document(
            "<UnityGameFramework><ResourceCollection><Resources/><Assets/></ResourceCollection></UnityGameFramework>",
        )
        .unwrap();
        assert!(doc.resources.is_empty());
        assert!(doc.assets.is_empty());
    }
}
