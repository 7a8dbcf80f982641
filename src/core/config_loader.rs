// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::computation_node::{generate_node_id, ComputationNode};
use crate::materials::boundary::{lookup_ior, BoundaryMaterial, BoundaryNode};
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use crate::transfer_functions::linear::LinearTransferFunction;

const DEFAULT_INT_IOR: &str = "bk7";
const DEFAULT_EXT_IOR: &str = "air";

#[derive(Debug)]
pub enum ConfigLoadError {
    Io(std::io::Error),
    Parse(String),
    MissingField(&'static str),
}

impl From<std::io::Error> for ConfigLoadError {
    fn from(err: std::io::Error) -> Self {
        ConfigLoadError::Io(err)
    }
}

impl fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigLoadError::Io(e) => write!(f, "io error: {}", e),
            ConfigLoadError::Parse(msg) => write!(f, "parse error: {}", msg),
            ConfigLoadError::MissingField(field) => write!(f, "missing field: {}", field),
        }
    }
}

impl std::error::Error for ConfigLoadError {}

pub struct LoadedConfig {
    pub transfer_functions: Vec<LinearTransferFunction>,
    pub materials: Vec<BoundaryNode>,
}

impl LoadedConfig {
    pub fn transfer_function(&self, id: &str) -> Option<&LinearTransferFunction> {
        self.transfer_functions.iter().find(|tf| tf.id() == id)
    }

    pub fn material(&self, id: &str) -> Option<&BoundaryMaterial> {
        self.materials.iter().find(|node| node.id() == id).map(BoundaryNode::material)
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LoadedConfig, ConfigLoadError> {
    let path = path.as_ref();
    log::info!("Loading config from: {}.", path.display());
    let xml = fs::read_to_string(path)?;
    parse_config(&xml)
}

#[derive(Default)]
struct PendingTransferFunction {
    id: Option<String>,
    range: Option<(Float, Float)>,
    opacity: Option<Vec<Float>>,
    color: Option<Vec<RGBSpectrum>>,
}

#[derive(Default)]
struct PendingBsdf {
    id: Option<String>,
    kind: String,
    int_ior: Option<Float>,
    ext_ior: Option<Float>,
    eta: Option<Vector3f>,
    k: Option<Vector3f>,
}

#[derive(Default)]
struct ConfigParser {
    defaults: HashMap<String, String>,
    current_tf: Option<PendingTransferFunction>,
    current_bsdf: Option<PendingBsdf>,
    transfer_functions: Vec<LinearTransferFunction>,
    materials: Vec<BoundaryNode>,
}

impl ConfigParser {
    fn open(&mut self, e: &BytesStart) -> Result<(), ConfigLoadError> {
        let attrs = read_attributes(e, &self.defaults);
        match e.name().as_ref() {
            b"default" => {
                if let (Some(k), Some(v)) = (attrs.get("name"), attrs.get("value")) {
                    self.defaults.insert(k.clone(), v.clone());
                }
            }
            b"transferfunction" => {
                let kind = attrs.get("type").map(String::as_str).unwrap_or("linear");
                if kind != "linear" {
                    return Err(ConfigLoadError::Parse(format!("unsupported transfer function: {}", kind)));
                }
                self.current_tf = Some(PendingTransferFunction {
                    id: attrs.get("id").cloned(),
                    ..Default::default()
                });
            }
            b"range" => {
                if let Some(tf) = self.current_tf.as_mut() {
                    let lo = attrs.get("lo").ok_or(ConfigLoadError::MissingField("range.lo"))?;
                    let hi = attrs.get("hi").ok_or(ConfigLoadError::MissingField("range.hi"))?;
                    tf.range = Some((parse_float(lo)?, parse_float(hi)?));
                }
            }
            b"opacity" => {
                if let Some(tf) = self.current_tf.as_mut() {
                    let value = attrs.get("value").ok_or(ConfigLoadError::MissingField("opacity.value"))?;
                    tf.opacity = Some(parse_float_list(value)?);
                }
            }
            b"color" => {
                if let Some(tf) = self.current_tf.as_mut() {
                    let value = attrs.get("value").ok_or(ConfigLoadError::MissingField("color.value"))?;
                    tf.color = Some(parse_color_list(value)?);
                }
            }
            b"bsdf" => {
                let kind = attrs.get("type").cloned().unwrap_or_default();
                if kind != "dielectric" && kind != "conductor" {
                    return Err(ConfigLoadError::Parse(format!("unsupported bsdf: {}", kind)));
                }
                self.current_bsdf = Some(PendingBsdf {
                    id: attrs.get("id").cloned(),
                    kind,
                    ..Default::default()
                });
            }
            b"float" | b"string" => {
                if let Some(bsdf) = self.current_bsdf.as_mut() {
                    if let (Some(name), Some(value)) = (attrs.get("name"), attrs.get("value")) {
                        match name.as_str() {
                            "int_ior" => bsdf.int_ior = Some(parse_ior(value)?),
                            "ext_ior" => bsdf.ext_ior = Some(parse_ior(value)?),
                            _ => log::warn!("Ignoring unknown bsdf parameter: {}.", name),
                        }
                    }
                }
            }
            b"rgb" => {
                if let Some(bsdf) = self.current_bsdf.as_mut() {
                    if let (Some(name), Some(value)) = (attrs.get("name"), attrs.get("value")) {
                        match name.as_str() {
                            "eta" => bsdf.eta = Some(parse_vec3(value)?),
                            "k" => bsdf.k = Some(parse_vec3(value)?),
                            _ => log::warn!("Ignoring unknown bsdf parameter: {}.", name),
                        }
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) -> Result<(), ConfigLoadError> {
        match name {
            b"transferfunction" => {
                if let Some(tf) = self.current_tf.take() {
                    let tf = finish_transfer_function(tf)?;
                    log::debug!("Loaded {}.", tf.to_string());
                    self.transfer_functions.push(tf);
                }
            }
            b"bsdf" => {
                if let Some(bsdf) = self.current_bsdf.take() {
                    let id = bsdf.id.clone().unwrap_or_else(|| generate_node_id("bsdf"));
                    let node = BoundaryNode::new(id, finish_bsdf(bsdf)?);
                    log::debug!("Loaded {}.", node.to_string());
                    self.materials.push(node);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

pub fn parse_config(xml: &str) -> Result<LoadedConfig, ConfigLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut parser = ConfigParser::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => parser.open(&e)?,
            // Self-closing elements never produce an End event.
            Ok(Event::Empty(e)) => {
                parser.open(&e)?;
                parser.close(e.name().as_ref())?;
            }
            Ok(Event::End(e)) => parser.close(e.name().as_ref())?,
            Err(e) => {
                return Err(ConfigLoadError::Parse(e.to_string()));
            }
            _ => {}
        }

        buf.clear();
    }

    log::info!(
        "Loaded {} transfer function(s) and {} material(s).",
        parser.transfer_functions.len(),
        parser.materials.len()
    );
    Ok(LoadedConfig {
        transfer_functions: parser.transfer_functions,
        materials: parser.materials,
    })
}

fn read_attributes(e: &BytesStart, defaults: &HashMap<String, String>) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = resolve_value(&attr.unescape_value().unwrap_or_default(), defaults);
        attrs.insert(key, value);
    }
    attrs
}

fn finish_transfer_function(tf: PendingTransferFunction) -> Result<LinearTransferFunction, ConfigLoadError> {
    let opacity = tf.opacity.ok_or(ConfigLoadError::MissingField("transferfunction.opacity"))?;
    let color = tf.color.ok_or(ConfigLoadError::MissingField("transferfunction.color"))?;
    if opacity.is_empty() {
        return Err(ConfigLoadError::MissingField("transferfunction.opacity"));
    }
    if color.is_empty() {
        return Err(ConfigLoadError::MissingField("transferfunction.color"));
    }
    let (lo, hi) = tf.range.unwrap_or((0.0, 1.0));
    let id = tf.id.unwrap_or_else(|| generate_node_id("transferfunction"));
    Ok(LinearTransferFunction::new_with_id(color, opacity, id).with_value_range(lo, hi))
}

fn finish_bsdf(bsdf: PendingBsdf) -> Result<BoundaryMaterial, ConfigLoadError> {
    match bsdf.kind.as_str() {
        "dielectric" => {
            let int_ior = match bsdf.int_ior {
                Some(v) => v,
                None => parse_ior(DEFAULT_INT_IOR)?,
            };
            let ext_ior = match bsdf.ext_ior {
                Some(v) => v,
                None => parse_ior(DEFAULT_EXT_IOR)?,
            };
            Ok(BoundaryMaterial::dielectric(ext_ior, int_ior))
        }
        _ => {
            let eta = bsdf.eta.ok_or(ConfigLoadError::MissingField("bsdf.eta"))?;
            let k = bsdf.k.ok_or(ConfigLoadError::MissingField("bsdf.k"))?;
            Ok(BoundaryMaterial::conductor(eta, k))
        }
    }
}

fn resolve_value(raw: &str, defaults: &HashMap<String, String>) -> String {
    let mut out = raw.to_string();
    for (k, v) in defaults {
        out = out.replace(&format!("${}", k), v);
    }
    out
}

fn parse_float(value: &str) -> Result<Float, ConfigLoadError> {
    value.trim().parse::<Float>().map_err(|_| ConfigLoadError::Parse(format!("invalid float: {}", value)))
}

fn parse_ior(value: &str) -> Result<Float, ConfigLoadError> {
    let ior = match value.trim().parse::<Float>() {
        Ok(v) => v,
        Err(_) => lookup_ior(value).ok_or_else(|| ConfigLoadError::Parse(format!("unknown ior: {}", value)))?,
    };
    if !ior.is_finite() || ior <= 0.0 {
        return Err(ConfigLoadError::Parse(format!("ior must be positive: {}", value)));
    }
    Ok(ior)
}

fn parse_float_list(value: &str) -> Result<Vec<Float>, ConfigLoadError> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(parse_float)
        .collect()
}

fn parse_vec3(value: &str) -> Result<Vector3f, ConfigLoadError> {
    let parts = parse_float_list(value)?;
    if parts.len() != 3 {
        return Err(ConfigLoadError::Parse(format!("invalid vec3: {}", value)));
    }
    Ok(Vector3f::new(parts[0], parts[1], parts[2]))
}

// Colors are comma separated, channels within a color space separated.
fn parse_color_list(value: &str) -> Result<Vec<RGBSpectrum>, ConfigLoadError> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            let v = parse_vec3(s)?;
            Ok(RGBSpectrum::new(v.x, v.y, v.z))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transfer_function::TransferFunction;

    const CONFIG: &str = r#"
        <config>
            <default name="glass" value="bk7"/>
            <transferfunction type="linear" id="skull">
                <range lo="0" hi="255"/>
                <opacity value="0, 0.1, 0.8"/>
                <color value="0 0 1, 1 1 1, 1 0 0"/>
            </transferfunction>
            <transferfunction>
                <opacity value="0.5"/>
                <color value="1 1 1"/>
            </transferfunction>
            <bsdf type="dielectric" id="glass">
                <string name="int_ior" value="$glass"/>
                <float name="ext_ior" value="1.0"/>
            </bsdf>
            <bsdf type="dielectric"/>
            <bsdf type="conductor" id="gold">
                <rgb name="eta" value="0.143, 0.374, 1.442"/>
                <rgb name="k" value="3.983, 2.385, 1.603"/>
            </bsdf>
        </config>
    "#;

    #[test]
    fn test_parse_config() {
        let loaded = parse_config(CONFIG).expect("parse config");
        assert_eq!(loaded.transfer_functions.len(), 2);
        assert_eq!(loaded.materials.len(), 3);

        let skull = loaded.transfer_function("skull").expect("skull");
        assert_eq!(skull.value_range(), (0.0, 255.0));
        assert_eq!(skull.opacity_values(), &[0.0, 0.1, 0.8]);
        assert_eq!(skull.color_values()[1], RGBSpectrum::new(1.0, 1.0, 1.0));
        assert!(skull.max_opacity_in_range(200.0, 255.0) >= 0.8);

        let unnamed = &loaded.transfer_functions[1];
        assert!(unnamed.id().starts_with("transferfunction_"));
        assert_eq!(loaded.transfer_function(unnamed.id()).map(|tf| tf.id()), Some(unnamed.id()));
        assert_eq!(unnamed.value_range(), (0.0, 1.0));

        assert_eq!(loaded.material("glass"), Some(&BoundaryMaterial::dielectric(1.0, 1.5046)));
        let unnamed_bsdf = &loaded.materials[1];
        assert!(unnamed_bsdf.id().starts_with("bsdf_"));
        assert_eq!(loaded.material(unnamed_bsdf.id()), Some(&BoundaryMaterial::dielectric(1.000277, 1.5046)));
        let gold = loaded.material("gold").expect("gold");
        assert!(gold.is_conductor());
    }

    #[test]
    fn test_default_ids_are_distinct_across_loads() {
        let xml = r#"<config><transferfunction><opacity value="1"/><color value="1 1 1"/></transferfunction><bsdf type="dielectric"/><bsdf type="dielectric"/></config>"#;
        let first = parse_config(xml).expect("first load");
        let second = parse_config(xml).expect("second load");
        assert_ne!(first.materials[0].id(), first.materials[1].id());
        assert_ne!(first.transfer_functions[0].id(), second.transfer_functions[0].id());
        assert!(first.materials.iter().all(|node| node.to_string().starts_with("Dielectric[id=bsdf_")));
    }

    #[test]
    fn test_missing_opacity() {
        let xml = r#"<config><transferfunction><color value="1 1 1"/></transferfunction></config>"#;
        match parse_config(xml) {
            Err(ConfigLoadError::MissingField(field)) => assert_eq!(field, "transferfunction.opacity"),
            _ => panic!("expected missing opacity"),
        }
    }

    #[test]
    fn test_conductor_requires_k() {
        let xml = r#"<config><bsdf type="conductor"><rgb name="eta" value="1, 1, 1"/></bsdf></config>"#;
        assert!(matches!(parse_config(xml), Err(ConfigLoadError::MissingField("bsdf.k"))));
    }

    #[test]
    fn test_rejects_bad_values() {
        let unknown_ior = r#"<config><bsdf type="dielectric"><string name="int_ior" value="mithril"/></bsdf></config>"#;
        assert!(matches!(parse_config(unknown_ior), Err(ConfigLoadError::Parse(_))));

        let negative = r#"<config><bsdf type="dielectric"><float name="int_ior" value="-1.5"/></bsdf></config>"#;
        assert!(matches!(parse_config(negative), Err(ConfigLoadError::Parse(_))));

        let bad_kind = r#"<config><bsdf type="plastic"/></config>"#;
        assert!(matches!(parse_config(bad_kind), Err(ConfigLoadError::Parse(_))));

        let bad_color = r#"<config><transferfunction><opacity value="1"/><color value="1 1"/></transferfunction></config>"#;
        assert!(matches!(parse_config(bad_color), Err(ConfigLoadError::Parse(_))));
    }

    #[test]
    fn test_load_config_missing_file() {
        let mut path = std::env::temp_dir();
        path.push("translucent_missing_config.xml");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(load_config(&path), Err(ConfigLoadError::Io(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut path = std::env::temp_dir();
        path.push("translucent_load_config.xml");
        std::fs::write(&path, CONFIG).expect("write config");
        let loaded = load_config(&path).expect("load config");
        assert_eq!(loaded.transfer_functions.len(), 2);
    }
}
