use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::file_format::FileFormat;

pub type Result<T> = anyhow::Result<T>;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

pub fn serialize<T: Serialize>(value: &T, format: FileFormat) -> Result<String> {
    let mut text = match format {
        FileFormat::Yaml => serde_yml::to_string(value)?,
        FileFormat::Json => serde_json::to_string_pretty(value)?,
        FileFormat::Xml => {
            let mut body = String::new();
            let mut serializer = quick_xml::se::Serializer::new(&mut body);
            serializer.indent(' ', 2);
            value.serialize(serializer)?;
            format!("{XML_DECLARATION}\n{body}")
        }
    };

    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

pub fn deserialize<T: DeserializeOwned>(serialized: &str, format: FileFormat) -> Result<T> {
    match format {
        FileFormat::Yaml => Ok(serde_yml::from_str(serialized)?),
        FileFormat::Json => Ok(serde_json::from_str(serialized)?),
        FileFormat::Xml => Ok(quick_xml::de::from_str(serialized)?),
    }
}

pub fn read_file<T: DeserializeOwned>(path: &std::path::Path) -> Result<T> {
    let format = FileFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    deserialize(&text, format)
}

pub fn write_file<T: Serialize>(value: &T, path: &std::path::Path) -> Result<()> {
    let format = FileFormat::from_path(path)?;
    let text = serialize(value, format)?;
    std::fs::write(path, text)?;
    Ok(())
}
