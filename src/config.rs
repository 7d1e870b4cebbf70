use std::{fs, path::Path};

use image::ImageFormat;
use json::{JsonValue, object};
use rand::{SeedableRng, rngs::StdRng};
use tracing::warn;

use crate::{
    error::{DitherError, Result},
    params::{Attribute, AttributeKind, ParamValue, Params},
    registry::{self, Strategy},
    texture::PixelBuffer,
    utils::image::format_from_name,
};

const KNOWN_KEYS: [&str; 4] = ["algorithm", "params", "seed", "output_format"];

/// One batch run: which algorithm, with what parameters, written as what.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessConfig {
    pub strategy: &'static Strategy,
    /// Complete for `strategy`'s schema once parsed.
    pub params: Params,
    /// Fixed seed for the random algorithms, fresh entropy when absent.
    pub seed: Option<u64>,
    pub output_format: ImageFormat,
}

impl ProcessConfig {
    /// Config running `name` with every parameter at its default.
    pub fn new(name: &str) -> Result<Self> {
        let strategy = registry::lookup(name)?;
        Ok(Self {
            strategy,
            params: Params::defaults(strategy.attributes()),
            seed: None,
            output_format: ImageFormat::Png,
        })
    }

    pub fn parse(source: &str) -> Result<Self> {
        let json = json::parse(source)?;
        if !json.is_object() {
            return Err(DitherError::Config("config must be a JSON object".into()));
        }
        if let Some((key, _)) = json.entries().find(|(key, _)| !KNOWN_KEYS.contains(key)) {
            return Err(DitherError::Config(format!("unknown config key `{key}`")));
        }

        let name = match json["algorithm"].as_str() {
            Some(name) => name,
            None => return Err(DitherError::Config("`algorithm` must be a string".into())),
        };
        let strategy = registry::lookup(name)?;
        let params = parse_params(&json["params"], strategy)?;

        let seed = match &json["seed"] {
            JsonValue::Null => None,
            value => match value.as_u64() {
                Some(seed) => Some(seed),
                None => {
                    return Err(DitherError::Config(
                        "`seed` must be a non-negative integer".into(),
                    ));
                }
            },
        };

        let output_format = match &json["output_format"] {
            JsonValue::Null => ImageFormat::Png,
            value => match value.as_str() {
                Some(name) => format_from_name(name)?,
                None => return Err(DitherError::Config("`output_format` must be a string".into())),
            },
        };

        Ok(Self {
            strategy,
            params,
            seed,
            output_format,
        })
    }

    pub fn read_config(path: &Path) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> JsonValue {
        // schema order keeps the output stable
        let mut params = JsonValue::new_object();
        for attr in self.strategy.attributes() {
            if let Some(value) = self.params.get(attr.name) {
                params[attr.name] = value.into();
            }
        }

        let format = self.output_format.extensions_str().first().copied().unwrap_or("png");
        let mut json = object! {
            algorithm: self.strategy.name,
            params: params,
            output_format: format,
        };
        if let Some(seed) = self.seed {
            json["seed"] = seed.into();
        }
        json
    }

    /// Random source for one image. Every image of a seeded run starts from
    /// the same state.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Dither `buffer` in place with this config.
    pub fn apply(&self, buffer: &mut PixelBuffer) -> Result {
        self.strategy.kind.dither(buffer, &self.params, &mut self.rng())
    }
}

fn parse_params(json: &JsonValue, strategy: &Strategy) -> Result<Params> {
    let schema = strategy.attributes();
    let mut params = Params::new();

    match json {
        JsonValue::Null => {}
        JsonValue::Object(object) => {
            for (key, value) in object.iter() {
                let attr = schema.iter().find(|attr| attr.name == key).ok_or_else(|| {
                    DitherError::invalid_parameter(
                        key,
                        format!("not an attribute of {}", strategy.name),
                    )
                })?;
                params.set(key, parse_value(attr, value)?);
            }
        }
        _ => return Err(DitherError::Config("`params` must be an object".into())),
    }

    for attr in schema {
        if !params.contains(attr.name) {
            let value = attr.default_value();
            warn!(
                algorithm = strategy.name,
                attribute = attr.name,
                ?value,
                "parameter missing, using default"
            );
            params.set(attr.name, value);
        }
    }
    params.validate(schema)?;
    Ok(params)
}

fn parse_value(attr: &Attribute, value: &JsonValue) -> Result<ParamValue> {
    let parsed = match attr.kind {
        AttributeKind::Range { .. } => value.as_f64().map(ParamValue::Number),
        AttributeKind::Boolean { .. } => value.as_bool().map(ParamValue::Bool),
        AttributeKind::Choice { .. } => value.as_str().map(ParamValue::from),
    };
    parsed.ok_or_else(|| DitherError::invalid_parameter(attr.name, format!("bad value {value}")))
}
